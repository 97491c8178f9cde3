//! redb-backed cart persistence
//!
//! The whole cart is one JSON blob under a fixed key. Writes commit with
//! redb's default immediate durability, so a cart survives app kills and
//! power loss on mobile devices.

use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::CartState;

/// Single-row table holding the serialized cart
const CART_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cart");

/// Fixed storage key for the cart blob
const CART_KEY: &str = "cart_state";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable key-value store for the cart
#[derive(Clone)]
pub struct CartStorage {
    db: Arc<Database>,
}

impl CartStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CART_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Load the persisted cart, if any
    pub fn load(&self) -> StorageResult<Option<CartState>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_TABLE)?;
        match table.get(CART_KEY)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Persist the full cart snapshot
    pub fn save(&self, state: &CartState) -> StorageResult<()> {
        let bytes = serde_json::to_vec(state)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CART_TABLE)?;
            table.insert(CART_KEY, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove the persisted cart record
    pub fn clear(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CART_TABLE)?;
            table.remove(CART_KEY)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl std::fmt::Debug for CartStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStorage").finish_non_exhaustive()
    }
}

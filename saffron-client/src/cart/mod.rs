//! Local cart store
//!
//! Client-side shopping cart: a table reservation selection, menu item
//! lines and a free-text note. The cart lives in memory and is mirrored
//! into a durable key-value store after every mutation. Persistence is
//! best-effort: load failures fall back to an empty cart, save failures
//! are logged and swallowed.

pub mod storage;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

use shared::models::{DiningTable, MenuItem, TableReservation};

pub use storage::{CartStorage, StorageError, StorageResult};

/// Guest count ceiling used when a table has no seat limit
pub const DEFAULT_MAX_GUESTS: u32 = 10;

/// One cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub item: MenuItem,
    pub quantity: u32,
}

/// Serialized cart snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartState {
    pub reservation: Option<TableReservation>,
    pub items: Vec<CartLine>,
    pub comment: String,
    /// Stamped on every save
    pub saved_at: Option<DateTime<Utc>>,
}

enum PersistCmd {
    Save(CartState),
    Clear,
}

/// Cart aggregate with write-through persistence
#[derive(Debug)]
pub struct CartStore {
    state: CartState,
    storage: Arc<CartStorage>,
    persist_tx: mpsc::UnboundedSender<PersistCmd>,
    /// Saves only start after the initial load has completed
    loaded: bool,
}

impl CartStore {
    /// Wrap a storage handle and spawn the persistence worker. Must be
    /// called from within a tokio runtime.
    pub fn new(storage: CartStorage) -> Self {
        let storage = Arc::new(storage);
        let persist_tx = Self::spawn_persist_worker(storage.clone());
        Self {
            state: CartState::default(),
            storage,
            persist_tx,
            loaded: false,
        }
    }

    /// One worker drains commands in order, so a later snapshot can never
    /// be overwritten by an earlier one.
    fn spawn_persist_worker(storage: Arc<CartStorage>) -> mpsc::UnboundedSender<PersistCmd> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(cmd) = rx.recv().await {
                let storage = storage.clone();
                let result = tokio::task::spawn_blocking(move || match cmd {
                    PersistCmd::Save(state) => storage.save(&state),
                    PersistCmd::Clear => storage.clear(),
                })
                .await;
                match result {
                    Ok(Ok(())) => tracing::debug!("cart persisted"),
                    Ok(Err(e)) => tracing::warn!(error = %e, "Failed to persist cart"),
                    Err(e) => tracing::warn!(error = %e, "Cart persist task panicked"),
                }
            }
        });
        tx
    }

    /// Load the persisted cart once at startup. Any failure logs and
    /// yields an empty cart; the store is usable either way.
    pub async fn load(&mut self) {
        let storage = self.storage.clone();
        let loaded = tokio::task::spawn_blocking(move || storage.load()).await;

        self.state = match loaded {
            Ok(Ok(Some(state))) => state,
            Ok(Ok(None)) => CartState::default(),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Failed to load cart, starting empty");
                CartState::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cart load task panicked, starting empty");
                CartState::default()
            }
        };
        self.loaded = true;
    }

    /// Current cart snapshot
    pub fn state(&self) -> &CartState {
        &self.state
    }

    // ========== Mutations ==========

    /// Set or replace the table reservation selection
    pub fn set_reservation(&mut self, reservation: Option<TableReservation>) {
        self.state.reservation = reservation;
        self.persist();
    }

    /// Adjust the guest count, clamped to [1, table.max_people or 10]
    pub fn set_guest_count(&mut self, requested: u32, table: &DiningTable) {
        let max = table.max_people.unwrap_or(DEFAULT_MAX_GUESTS).max(1);
        if let Some(reservation) = self.state.reservation.as_mut() {
            reservation.guests_count = requested.clamp(1, max);
            self.persist();
        }
    }

    /// Add a menu item. Adding the same item again accumulates quantity
    /// instead of duplicating the line.
    pub fn add_item(&mut self, item: MenuItem, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.state.items.iter_mut().find(|line| line.item.id == item.id) {
            Some(line) => line.quantity += quantity,
            None => self.state.items.push(CartLine { item, quantity }),
        }
        self.persist();
    }

    /// Set a line's quantity; zero or negative removes the line
    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.state.items.retain(|line| line.item.id != item_id);
        } else if let Some(line) = self
            .state
            .items
            .iter_mut()
            .find(|line| line.item.id == item_id)
        {
            line.quantity = quantity as u32;
        } else {
            return;
        }
        self.persist();
    }

    /// Remove a line entirely
    pub fn remove_item(&mut self, item_id: &str) {
        self.update_quantity(item_id, 0);
    }

    /// Set the free-text order note
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.state.comment = comment.into();
        self.persist();
    }

    /// Empty the cart and drop the persisted record (after a successful
    /// order submission)
    pub fn clear(&mut self) {
        self.state = CartState::default();
        let _ = self.persist_tx.send(PersistCmd::Clear);
    }

    // ========== Totals ==========

    /// Σ price × quantity
    pub fn total_price(&self) -> Decimal {
        self.state
            .items
            .iter()
            .map(|line| line.item.price * Decimal::from(line.quantity))
            .sum()
    }

    /// Σ quantity
    pub fn total_count(&self) -> u32 {
        self.state.items.iter().map(|line| line.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty() && self.state.reservation.is_none()
    }

    // ========== Persistence ==========

    /// Fire-and-forget save of the full snapshot. Never runs before the
    /// initial load; failures are logged, not surfaced.
    fn persist(&mut self) {
        if !self.loaded {
            return;
        }
        let mut snapshot = self.state.clone();
        snapshot.saved_at = Some(Utc::now());
        let _ = self.persist_tx.send(PersistCmd::Save(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn menu_item(id: &str, price: f64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            description: None,
            price: Decimal::from_f64(price).unwrap(),
            category: "mains".to_string(),
            image_url: None,
            is_hidden: false,
            is_active: true,
        }
    }

    fn table(max_people: Option<u32>) -> DiningTable {
        DiningTable {
            id: "t1".to_string(),
            name: "Window 1".to_string(),
            zone: None,
            max_people,
            is_active: true,
        }
    }

    fn reservation() -> TableReservation {
        TableReservation {
            table_id: "t1".to_string(),
            table_name: "Window 1".to_string(),
            start_time: "2026-03-10T19:00:00".parse().unwrap(),
            end_time: "2026-03-10T21:00:00".parse().unwrap(),
            guests_count: 2,
        }
    }

    async fn test_store() -> CartStore {
        let mut store = CartStore::new(CartStorage::open_in_memory().unwrap());
        store.load().await;
        store
    }

    #[tokio::test]
    async fn test_add_same_item_accumulates() {
        let mut store = test_store().await;
        store.add_item(menu_item("1", 9.5), 1);
        store.add_item(menu_item("1", 9.5), 2);

        assert_eq!(store.state().items.len(), 1);
        assert_eq!(store.state().items[0].quantity, 3);
        assert_eq!(store.total_count(), 3);
    }

    #[tokio::test]
    async fn test_zero_quantity_removes_line() {
        let mut store = test_store().await;
        store.add_item(menu_item("1", 9.5), 2);
        store.add_item(menu_item("2", 4.0), 1);

        store.update_quantity("1", 0);
        assert_eq!(store.state().items.len(), 1);
        assert_eq!(store.state().items[0].item.id, "2");

        store.update_quantity("2", -3);
        assert!(store.state().items.is_empty());
    }

    #[tokio::test]
    async fn test_totals() {
        let mut store = test_store().await;
        store.add_item(menu_item("1", 9.5), 2);
        store.add_item(menu_item("2", 4.25), 3);

        assert_eq!(store.total_count(), 5);
        assert_eq!(store.total_price(), Decimal::from_f64(31.75).unwrap());
    }

    #[tokio::test]
    async fn test_guest_count_clamped() {
        let mut store = test_store().await;
        store.set_reservation(Some(reservation()));

        store.set_guest_count(25, &table(Some(6)));
        assert_eq!(store.state().reservation.as_ref().unwrap().guests_count, 6);

        store.set_guest_count(0, &table(Some(6)));
        assert_eq!(store.state().reservation.as_ref().unwrap().guests_count, 1);

        // No seat limit on the table: default ceiling applies
        store.set_guest_count(25, &table(None));
        assert_eq!(
            store.state().reservation.as_ref().unwrap().guests_count,
            DEFAULT_MAX_GUESTS
        );
    }

    #[tokio::test]
    async fn test_persistence_roundtrip() {
        let storage = CartStorage::open_in_memory().unwrap();

        let mut state = CartState::default();
        state.items.push(CartLine {
            item: menu_item("1", 9.5),
            quantity: 2,
        });
        state.comment = "no onions".to_string();
        state.saved_at = Some(Utc::now());
        storage.save(&state).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.comment, "no onions");
        assert!(loaded.saved_at.is_some());

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_on_disk_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.redb");

        {
            let storage = CartStorage::open(&path).unwrap();
            let mut state = CartState::default();
            state.items.push(CartLine {
                item: menu_item("1", 9.5),
                quantity: 2,
            });
            storage.save(&state).unwrap();
        }

        let storage = CartStorage::open(&path).unwrap();
        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_load_missing_record_yields_empty_cart() {
        let store = test_store().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_clear_resets_state() {
        let mut store = test_store().await;
        store.add_item(menu_item("1", 9.5), 2);
        store.set_reservation(Some(reservation()));
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.total_count(), 0);
    }
}

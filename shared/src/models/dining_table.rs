//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: String,
    pub name: String,
    pub zone: Option<String>,
    /// Maximum number of guests the table seats
    pub max_people: Option<u32>,
    pub is_active: bool,
}

/// Hall-map placement of a table (position in the venue floor plan)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablePlacement {
    pub table_id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

//! Table Reservation Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Table reservation selection carried in the cart and submitted with an
/// order. Times are venue-local wall clock; the backend performs conflict
/// detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableReservation {
    pub table_id: String,
    pub table_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub guests_count: u32,
}

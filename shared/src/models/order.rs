//! Order Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::reservation::TableReservation;

/// Order status as reported by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// A single line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub menu_item_id: String,
    pub name: String,
    /// Unit price at order time
    pub price: Decimal,
    pub quantity: u32,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub items: Vec<OrderLine>,
    pub reservation: Option<TableReservation>,
    pub comment: Option<String>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderLine>,
    pub reservation: Option<TableReservation>,
    pub comment: Option<String>,
}

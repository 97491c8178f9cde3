//! Menu Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Price in currency units
    pub price: Decimal,
    pub category: String,
    /// Public image URL (image host), empty when no photo uploaded
    pub image_url: Option<String>,
    /// Hidden items are only returned to administrators
    pub is_hidden: bool,
    pub is_active: bool,
}

/// Create menu item payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub image_url: Option<String>,
    pub is_hidden: Option<bool>,
}

/// Update menu item payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_hidden: Option<bool>,
    pub is_active: Option<bool>,
}

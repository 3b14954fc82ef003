//! Order aggregate view
//!
//! Only the parts of an order the lookup layer reads: who placed it and
//! which products it references. Persistence and validation of orders
//! belong to the order store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Line of a stored order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Referenced product
    #[serde(rename = "productID")]
    pub product_id: Uuid,
    /// Price per unit at order time
    pub unit_price: f64,
    /// Ordered units
    pub quantity: u32,
}

impl OrderItem {
    /// Price of the whole line
    pub fn total_price(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Stored order referencing a user and products by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier
    #[serde(rename = "orderID")]
    pub order_id: Uuid,
    /// User who placed the order
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    /// When the order was placed
    pub order_date: DateTime<Utc>,
    /// Ordered lines
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of all line totals
    pub fn total_bill(&self) -> f64 {
        self.items.iter().map(OrderItem::total_price).sum()
    }

    /// Distinct product ids in line order
    pub fn product_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if !ids.contains(&item.product_id) {
                ids.push(item.product_id);
            }
        }
        ids
    }
}

/// Order line with product details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedOrderItem {
    /// Referenced product
    #[serde(rename = "productID")]
    pub product_id: Uuid,
    /// Price per unit at order time
    pub unit_price: f64,
    /// Ordered units
    pub quantity: u32,
    /// Price of the whole line
    pub total_price: f64,
    /// Product name, if known
    pub product_name: Option<String>,
    /// Product category, if known
    pub category: Option<String>,
    /// Product image, if known
    pub img_url: Option<String>,
}

/// Order with user and product details filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedOrder {
    /// Order identifier
    #[serde(rename = "orderID")]
    pub order_id: Uuid,
    /// User who placed the order
    #[serde(rename = "userID")]
    pub user_id: Uuid,
    /// Sum of all line totals
    pub total_bill: f64,
    /// When the order was placed
    pub order_date: DateTime<Utc>,
    /// User name, if known
    pub name: Option<String>,
    /// User email, if known
    pub email: Option<String>,
    /// Lines with product details
    pub items: Vec<EnrichedOrderItem>,
    /// True when any detail came from a degraded lookup
    pub degraded: bool,
}

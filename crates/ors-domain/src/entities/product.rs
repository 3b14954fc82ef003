//! Product catalog entity

use super::RemoteEntity;
use crate::constants::{
    PRODUCT_UNAVAILABLE_CATEGORY, PRODUCT_UNAVAILABLE_IMAGE, PRODUCT_UNAVAILABLE_NAME,
};
use crate::value_objects::EntityKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product as returned by `GET /product/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    /// Product identifier
    #[serde(rename = "productID")]
    pub product_id: Uuid,
    /// Product name
    pub product_name: String,
    /// Catalog category
    pub category: String,
    /// Unit price
    #[serde(default)]
    pub unit_price: Option<f64>,
    /// Units in stock
    #[serde(default)]
    pub quantity_in_stock: Option<i32>,
    /// Image URL
    #[serde(default)]
    pub img_url: Option<String>,
}

impl RemoteEntity for ProductDto {
    const KIND: EntityKind = EntityKind::Product;

    fn entity_id(&self) -> Uuid {
        self.product_id
    }

    fn unavailable() -> Self {
        Self {
            product_id: Uuid::nil(),
            product_name: PRODUCT_UNAVAILABLE_NAME.to_string(),
            category: PRODUCT_UNAVAILABLE_CATEGORY.to_string(),
            unit_price: Some(0.0),
            quantity_in_stock: Some(0),
            img_url: Some(PRODUCT_UNAVAILABLE_IMAGE.to_string()),
        }
    }
}

//! Wire types for the TilesView provider webhooks.
//!
//! Field names match the remote schema exactly. Note that the remote API uses
//! `tv_prod_id` as the id field for categories as well as products.

use serde::{Deserialize, Serialize};
use tvsync_core::EntityType;

/// Maximum number of items accepted by the batch sync endpoints.
pub const MAX_BATCH_SIZE: usize = 100;

/// A TilesView webhook endpoint, relative to the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Product,
    Category,
    Filters,
    /// Name lookup shares the `filters` resource but has no trailing slash.
    FilterLookup,
    ProductSync,
    CategorySync,
}

impl Endpoint {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Product => "product",
            Endpoint::Category => "category/",
            Endpoint::Filters => "filters/",
            Endpoint::FilterLookup => "filters",
            Endpoint::ProductSync => "product/sync/",
            Endpoint::CategorySync => "category/sync/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPayload {
    /// Present only on updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tv_prod_id: Option<String>,
    /// Always exactly one entry.
    pub category: Vec<String>,
    pub sku: String,
    pub name: String,
    pub price: String,
    pub price_type: u8,
    pub image_path: String,
    pub thumb_path: String,
    pub surface_type: String,
    pub product_surface: String,
    pub is_bookmatch: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tv_prod_id: Option<String>,
    pub name: String,
    pub height: i64,
    pub width: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePayload {
    pub tv_prod_ids: Vec<i64>,
    pub hard_delete: bool,
}

impl DeletePayload {
    #[must_use]
    pub fn hard(remote_ids: Vec<i64>) -> Self {
        Self {
            tv_prod_ids: remote_ids,
            hard_delete: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPayload {
    pub lbl_name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterLookup {
    pub lbl_name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProductBatch<'a> {
    pub product: &'a [ProductPayload],
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoryBatch<'a> {
    pub category: &'a [CategoryPayload],
}

/// A built create/update payload for either tracked entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPayload {
    Product(ProductPayload),
    Category(CategoryPayload),
}

impl SyncPayload {
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        match self {
            SyncPayload::Product(_) => EntityType::Product,
            SyncPayload::Category(_) => EntityType::Category,
        }
    }

    /// Attach the remote id, turning a create payload into an update payload.
    #[must_use]
    pub fn with_remote_id(self, remote_id: &str) -> Self {
        match self {
            SyncPayload::Product(mut p) => {
                p.tv_prod_id = Some(remote_id.to_owned());
                SyncPayload::Product(p)
            }
            SyncPayload::Category(mut c) => {
                c.tv_prod_id = Some(remote_id.to_owned());
                SyncPayload::Category(c)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product() -> ProductPayload {
        ProductPayload {
            tv_prod_id: None,
            category: vec!["Marble".to_string()],
            sku: "CM-1".to_string(),
            name: "Carrara".to_string(),
            price: "49.90".to_string(),
            price_type: 0,
            image_path: String::new(),
            thumb_path: String::new(),
            surface_type: "0".to_string(),
            product_surface: "floor,wall".to_string(),
            is_bookmatch: 0,
        }
    }

    #[test]
    fn create_payload_omits_remote_id() {
        let value = serde_json::to_value(product()).unwrap();
        assert!(value.get("tv_prod_id").is_none());
        assert_eq!(value["surface_type"], json!("0"));
        assert_eq!(value["price_type"], json!(0));
    }

    #[test]
    fn with_remote_id_sets_tv_prod_id() {
        let payload = SyncPayload::Product(product()).with_remote_id("42");
        let SyncPayload::Product(p) = payload else {
            panic!("expected product payload");
        };
        assert_eq!(p.tv_prod_id.as_deref(), Some("42"));
    }

    #[test]
    fn category_update_uses_tv_prod_id_field() {
        let payload = SyncPayload::Category(CategoryPayload {
            tv_prod_id: None,
            name: "Marble".to_string(),
            height: 600,
            width: 600,
        })
        .with_remote_id("9");
        assert_eq!(payload.entity_type(), EntityType::Category);
        let SyncPayload::Category(c) = payload else {
            panic!("expected category payload");
        };
        assert_eq!(
            serde_json::to_value(c).unwrap(),
            json!({"tv_prod_id": "9", "name": "Marble", "height": 600, "width": 600})
        );
    }

    #[test]
    fn delete_payload_is_hard_delete() {
        let value = serde_json::to_value(DeletePayload::hard(vec![42])).unwrap();
        assert_eq!(value, json!({"tv_prod_ids": [42], "hard_delete": true}));
    }

    #[test]
    fn endpoint_paths_keep_trailing_slash_conventions() {
        assert_eq!(Endpoint::Product.path(), "product");
        assert_eq!(Endpoint::Category.path(), "category/");
        assert_eq!(Endpoint::Filters.path(), "filters/");
        assert_eq!(Endpoint::FilterLookup.path(), "filters");
        assert_eq!(Endpoint::ProductSync.path(), "product/sync/");
        assert_eq!(Endpoint::CategorySync.path(), "category/sync/");
    }
}

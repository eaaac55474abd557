//! Mapping of host catalog records onto TilesView payloads.

use reqwest::Url;
use tvsync_client::{CategoryPayload, DeletePayload, ProductPayload, SyncPayload};
use tvsync_core::{CatalogEntity, Category, EntityType, Product};

use crate::error::BuildError;

/// Category sent for products that belong to no category.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

/// Surface list sent when the product has no `product_surface` metadata.
pub const DEFAULT_PRODUCT_SURFACE: &str = "floor,wall";

/// Category tile height/width used when the term metadata is unset.
pub const DEFAULT_CATEGORY_DIMENSION: i64 = 600;

const PRICE_TYPE: u8 = 0;
const SURFACE_TYPE: &str = "0";

/// Builds the create payload for a tracked record.
///
/// `image_url` is the host's resolution of the product's featured image and
/// is ignored for categories.
///
/// # Errors
///
/// Returns [`BuildError::Untracked`] for records that are not synced, or
/// [`BuildError::MissingRequiredField`] if the name is empty.
pub fn build_payload(
    entity: &CatalogEntity,
    image_url: Option<&str>,
) -> Result<SyncPayload, BuildError> {
    match entity {
        CatalogEntity::Product(product) => {
            build_product_payload(product, image_url).map(SyncPayload::Product)
        }
        CatalogEntity::Category(category) => {
            build_category_payload(category).map(SyncPayload::Category)
        }
        CatalogEntity::Untracked { id, kind } => Err(BuildError::Untracked {
            local_id: *id,
            kind: kind.clone(),
        }),
    }
}

/// Builds a product payload.
///
/// Only the first category is sent; the remote schema accepts a list but
/// products are filed under a single category there.
///
/// # Errors
///
/// Returns [`BuildError::MissingRequiredField`] if the product name is empty.
pub fn build_product_payload(
    product: &Product,
    image_url: Option<&str>,
) -> Result<ProductPayload, BuildError> {
    let name = product.name.trim();
    if name.is_empty() {
        tracing::error!(local_id = product.id, "product name missing");
        return Err(BuildError::MissingRequiredField {
            entity_type: EntityType::Product,
            local_id: product.id,
            field: "name",
        });
    }

    let sku = product
        .sku
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_owned();
    if sku.is_empty() {
        tracing::warn!(local_id = product.id, "product SKU missing");
    }

    let category = product
        .categories
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .find(|c| !c.is_empty())
        .unwrap_or(FALLBACK_CATEGORY)
        .to_owned();

    let price = product.price.map(|p| p.to_string()).unwrap_or_default();
    let image = image_url.map(absolute_url).unwrap_or_default();

    let product_surface = product
        .meta
        .product_surface
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_PRODUCT_SURFACE)
        .to_owned();

    Ok(ProductPayload {
        tv_prod_id: None,
        category: vec![category],
        sku,
        name: name.to_owned(),
        price,
        price_type: PRICE_TYPE,
        image_path: image.clone(),
        thumb_path: image,
        surface_type: SURFACE_TYPE.to_owned(),
        product_surface,
        is_bookmatch: u8::from(product.meta.is_bookmatch.unwrap_or(false)),
    })
}

/// Builds a category payload.
///
/// # Errors
///
/// Returns [`BuildError::MissingRequiredField`] if the category name is empty.
pub fn build_category_payload(category: &Category) -> Result<CategoryPayload, BuildError> {
    let name = category.name.trim();
    if name.is_empty() {
        tracing::error!(local_id = category.id, "category name missing");
        return Err(BuildError::MissingRequiredField {
            entity_type: EntityType::Category,
            local_id: category.id,
            field: "name",
        });
    }

    Ok(CategoryPayload {
        tv_prod_id: None,
        name: name.to_owned(),
        height: coerce_dimension(category.height.as_deref()),
        width: coerce_dimension(category.width.as_deref()),
    })
}

/// Builds the hard-delete payload for one mapped record.
///
/// # Errors
///
/// Returns [`BuildError::InvalidRemoteId`] if the stored remote id is not an
/// integer; the delete endpoint only accepts numeric ids.
pub fn build_delete_payload(
    entity_type: EntityType,
    local_id: u64,
    remote_id: &str,
) -> Result<DeletePayload, BuildError> {
    let id = remote_id
        .trim()
        .parse::<i64>()
        .map_err(|_| BuildError::InvalidRemoteId {
            entity_type,
            local_id,
            remote_id: remote_id.to_owned(),
        })?;
    Ok(DeletePayload::hard(vec![id]))
}

/// Coerces raw dimension metadata to an integer.
///
/// Unset, empty, and `"0"` fall back to the default. Anything else takes its
/// leading integer (`"1200px"` is 1200); text without one coerces to 0.
fn coerce_dimension(raw: Option<&str>) -> i64 {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() || raw == "0" {
        return DEFAULT_CATEGORY_DIMENSION;
    }

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = match &digits[..end] {
        "" => 0,
        d => d.parse::<i64>().unwrap_or(i64::MAX),
    };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Returns `raw`, trimmed but otherwise as the host produced it, if it is an
/// absolute http(s) URL; otherwise an empty string.
fn absolute_url(raw: &str) -> String {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => trimmed.to_owned(),
        _ => {
            tracing::debug!(image_url = raw, "image reference is not an absolute URL");
            String::new()
        }
    }
}

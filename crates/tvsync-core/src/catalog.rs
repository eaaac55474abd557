//! Host catalog records as seen by the sync engine.
//!
//! The commerce platform owns these records; `tvsync` only reads them. Field
//! shapes mirror what the platform stores: category dimensions, for example,
//! arrive as raw term-metadata strings and are coerced at payload build time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog record kinds that are mirrored to TilesView.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Product,
    Category,
}

impl EntityType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Product => "product",
            EntityType::Category => "category",
        }
    }

    /// The metadata key under which the host stores the remote id.
    #[must_use]
    pub fn meta_key(self) -> &'static str {
        match self {
            EntityType::Product => "_tilesview_id",
            EntityType::Category => "_tilesview_cat_id",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(EntityType::Product),
            "category" => Ok(EntityType::Category),
            other => Err(format!("unknown entity type '{other}'")),
        }
    }
}

/// Publication status of a post-like record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    #[serde(alias = "publish")]
    Published,
    Draft,
    Pending,
    Private,
    #[serde(alias = "trash")]
    Trashed,
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityStatus::Published => write!(f, "published"),
            EntityStatus::Draft => write!(f, "draft"),
            EntityStatus::Pending => write!(f, "pending"),
            EntityStatus::Private => write!(f, "private"),
            EntityStatus::Trashed => write!(f, "trashed"),
        }
    }
}

/// Custom product metadata read by the payload builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMeta {
    /// Whether tiles are book-matched. Unset means `false`.
    #[serde(default)]
    pub is_bookmatch: Option<bool>,

    /// Comma-separated surface list, e.g. `"floor,wall"`.
    #[serde(default)]
    pub product_surface: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub status: EntityStatus,

    /// Autosave/revision copies share the product's type but must never sync.
    #[serde(default)]
    pub is_revision: bool,

    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub price: Option<Decimal>,

    /// Attachment id of the featured image, resolved to a URL by the host.
    #[serde(default)]
    pub image_id: Option<u64>,

    /// Category names in the order the platform reports them.
    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub meta: ProductMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,

    /// Raw `height` term metadata.
    #[serde(default)]
    pub height: Option<String>,

    /// Raw `width` term metadata.
    #[serde(default)]
    pub width: Option<String>,
}

/// Any record the host hands to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEntity {
    Product(Product),
    Category(Category),
    /// A record of a kind that is not mirrored (pages, orders, blog posts...).
    Untracked { id: u64, kind: String },
}

impl CatalogEntity {
    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            CatalogEntity::Product(p) => p.id,
            CatalogEntity::Category(c) => c.id,
            CatalogEntity::Untracked { id, .. } => *id,
        }
    }

    /// `None` for untracked records.
    #[must_use]
    pub fn entity_type(&self) -> Option<EntityType> {
        match self {
            CatalogEntity::Product(_) => Some(EntityType::Product),
            CatalogEntity::Category(_) => Some(EntityType::Category),
            CatalogEntity::Untracked { .. } => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            CatalogEntity::Product(_) => EntityType::Product.as_str(),
            CatalogEntity::Category(_) => EntityType::Category.as_str(),
            CatalogEntity::Untracked { kind, .. } => kind,
        }
    }
}

impl From<Product> for CatalogEntity {
    fn from(product: Product) -> Self {
        CatalogEntity::Product(product)
    }
}

impl From<Category> for CatalogEntity {
    fn from(category: Category) -> Self {
        CatalogEntity::Category(category)
    }
}

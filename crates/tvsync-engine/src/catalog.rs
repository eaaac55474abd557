//! The host platform as seen by the engine: lookups it answers and the
//! events it emits.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock};

use tvsync_core::{CatalogEntity, CatalogSnapshot, Category, Product};

/// Read access to the host catalog.
///
/// Posts (products and any other post-like records) and category terms live in
/// separate id spaces.
pub trait Catalog {
    /// Looks up a post-like record. Non-product records come back as
    /// [`CatalogEntity::Untracked`].
    fn find_post(&self, id: u64) -> impl Future<Output = Option<CatalogEntity>> + Send;

    fn find_category(&self, term_id: u64) -> impl Future<Output = Option<Category>> + Send;

    /// Resolves an image attachment to its public URL.
    fn attachment_url(&self, attachment_id: u64) -> impl Future<Output = Option<String>> + Send;
}

/// A catalog mutation reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    ProductCreated(u64),
    ProductUpdated(u64),
    PostTrashed(u64),
    /// Fired before the record is removed; the host may pass it along since a
    /// later lookup can miss.
    PostDeleted {
        id: u64,
        entity: Option<CatalogEntity>,
    },
    PostRestored(u64),
    CategoryCreated(u64),
    CategoryUpdated(u64),
}

impl CatalogEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CatalogEvent::ProductCreated(_) => "product_created",
            CatalogEvent::ProductUpdated(_) => "product_updated",
            CatalogEvent::PostTrashed(_) => "post_trashed",
            CatalogEvent::PostDeleted { .. } => "post_deleted",
            CatalogEvent::PostRestored(_) => "post_restored",
            CatalogEvent::CategoryCreated(_) => "category_created",
            CatalogEvent::CategoryUpdated(_) => "category_updated",
        }
    }
}

/// In-process catalog, filled programmatically or from a [`CatalogSnapshot`].
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    posts: RwLock<HashMap<u64, CatalogEntity>>,
    categories: RwLock<HashMap<u64, Category>>,
    attachments: RwLock<HashMap<u64, String>>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let catalog = Self::new();
        for product in snapshot.products {
            catalog.insert_product(product);
        }
        for post in snapshot.other_posts {
            catalog.insert_untracked(post.id, &post.kind);
        }
        for category in snapshot.categories {
            catalog.insert_category(category);
        }
        for (id, url) in snapshot.attachments {
            catalog.insert_attachment(id, &url);
        }
        catalog
    }

    pub fn insert_product(&self, product: Product) {
        let mut posts = self.posts.write().unwrap_or_else(PoisonError::into_inner);
        posts.insert(product.id, CatalogEntity::Product(product));
    }

    pub fn insert_untracked(&self, id: u64, kind: &str) {
        let mut posts = self.posts.write().unwrap_or_else(PoisonError::into_inner);
        posts.insert(
            id,
            CatalogEntity::Untracked {
                id,
                kind: kind.to_owned(),
            },
        );
    }

    pub fn insert_category(&self, category: Category) {
        let mut categories = self
            .categories
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        categories.insert(category.id, category);
    }

    pub fn insert_attachment(&self, id: u64, url: &str) {
        let mut attachments = self
            .attachments
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        attachments.insert(id, url.to_owned());
    }

    /// Removes a post, returning it if it existed.
    pub fn remove_post(&self, id: u64) -> Option<CatalogEntity> {
        let mut posts = self.posts.write().unwrap_or_else(PoisonError::into_inner);
        posts.remove(&id)
    }

    /// All products, ordered by id.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        let posts = self.posts.read().unwrap_or_else(PoisonError::into_inner);
        let mut products: Vec<Product> = posts
            .values()
            .filter_map(|e| match e {
                CatalogEntity::Product(p) => Some(p.clone()),
                _ => None,
            })
            .collect();
        products.sort_by_key(|p| p.id);
        products
    }

    /// All categories, ordered by id.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let categories = self
            .categories
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<Category> = categories.values().cloned().collect();
        all.sort_by_key(|c| c.id);
        all
    }
}

impl Catalog for MemoryCatalog {
    async fn find_post(&self, id: u64) -> Option<CatalogEntity> {
        let posts = self.posts.read().unwrap_or_else(PoisonError::into_inner);
        posts.get(&id).cloned()
    }

    async fn find_category(&self, term_id: u64) -> Option<Category> {
        let categories = self
            .categories
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        categories.get(&term_id).cloned()
    }

    async fn attachment_url(&self, attachment_id: u64) -> Option<String> {
        let attachments = self
            .attachments
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        attachments.get(&attachment_id).cloned()
    }
}

//! YAML snapshot of a host catalog, used by the operator CLI to replay
//! catalog events without a live commerce platform.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Product};
use crate::ConfigError;

/// A post-like record that exists on the platform but is not mirrored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntrackedPost {
    pub id: u64,
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub products: Vec<Product>,

    #[serde(default)]
    pub categories: Vec<Category>,

    /// Attachment id to public URL.
    #[serde(default)]
    pub attachments: BTreeMap<u64, String>,

    /// Other post ids sharing the product id space.
    #[serde(default)]
    pub other_posts: Vec<UntrackedPost>,
}

/// Load and validate a catalog snapshot from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog_snapshot(path: &Path) -> Result<CatalogSnapshot, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog_snapshot(&content)
}

/// Parse and validate snapshot YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog_snapshot(content: &str) -> Result<CatalogSnapshot, ConfigError> {
    let snapshot: CatalogSnapshot = serde_yaml::from_str(content)?;
    validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

fn validate_snapshot(snapshot: &CatalogSnapshot) -> Result<(), ConfigError> {
    // Products and other posts share one id space; categories (terms) have their own.
    let mut post_ids = HashSet::new();
    let post_id_iter = snapshot
        .products
        .iter()
        .map(|p| p.id)
        .chain(snapshot.other_posts.iter().map(|p| p.id));
    for id in post_id_iter {
        if !post_ids.insert(id) {
            return Err(ConfigError::Validation(format!("duplicate post id {id}")));
        }
    }

    let mut term_ids = HashSet::new();
    for category in &snapshot.categories {
        if !term_ids.insert(category.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate category id {}",
                category.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EntityStatus;

    const SAMPLE: &str = r#"
products:
  - id: 101
    name: Carrara Marble 60x60
    status: publish
    sku: CM-6060
    price: "49.90"
    image_id: 7
    categories: [Marble, Floor]
    meta:
      is_bookmatch: true
      product_surface: floor
  - id: 102
    name: Slate Draft
    status: draft
categories:
  - id: 12
    name: Marble
    height: "1200"
attachments:
  7: https://shop.example.com/uploads/cm-6060.jpg
other_posts:
  - id: 500
    kind: page
"#;

    #[test]
    fn parses_sample_snapshot() {
        let snap = parse_catalog_snapshot(SAMPLE).unwrap();
        assert_eq!(snap.products.len(), 2);
        assert_eq!(snap.products[0].status, EntityStatus::Published);
        assert_eq!(snap.products[0].categories, vec!["Marble", "Floor"]);
        assert_eq!(snap.products[0].meta.is_bookmatch, Some(true));
        assert_eq!(snap.categories[0].height.as_deref(), Some("1200"));
        assert!(snap.categories[0].width.is_none());
        assert_eq!(
            snap.attachments.get(&7).map(String::as_str),
            Some("https://shop.example.com/uploads/cm-6060.jpg")
        );
        assert_eq!(snap.other_posts[0].kind, "page");
    }

    #[test]
    fn empty_document_is_an_empty_catalog() {
        let snap = parse_catalog_snapshot("{}").unwrap();
        assert!(snap.products.is_empty());
        assert!(snap.categories.is_empty());
    }

    #[test]
    fn rejects_duplicate_post_ids_across_kinds() {
        let yaml = "products:\n  - {id: 1, name: A, status: publish}\nother_posts:\n  - {id: 1, kind: page}\n";
        let err = parse_catalog_snapshot(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate post id 1")));
    }

    #[test]
    fn category_ids_do_not_collide_with_post_ids() {
        let yaml = "products:\n  - {id: 1, name: A, status: publish}\ncategories:\n  - {id: 1, name: Tiles}\n";
        assert!(parse_catalog_snapshot(yaml).is_ok());
    }

    #[test]
    fn rejects_duplicate_category_ids() {
        let yaml = "categories:\n  - {id: 3, name: A}\n  - {id: 3, name: B}\n";
        assert!(matches!(
            parse_catalog_snapshot(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_catalog_snapshot(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::CatalogFileIo { .. }));
    }
}

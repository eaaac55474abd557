pub mod app_config;
pub mod catalog;
pub mod config;
pub mod mapping;
pub mod snapshot;

pub use app_config::{AppConfig, Credentials, DEFAULT_BASE_URL};
pub use catalog::{CatalogEntity, Category, EntityStatus, EntityType, Product, ProductMeta};
pub use config::{load_app_config, load_app_config_from_env};
pub use mapping::{MappingStore, MemoryMappingStore};
pub use snapshot::{load_catalog_snapshot, parse_catalog_snapshot, CatalogSnapshot, UntrackedPost};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog snapshot {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog snapshot: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation error: {0}")]
    Validation(String),
}

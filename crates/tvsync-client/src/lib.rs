pub mod client;
pub mod error;
pub mod response;
pub mod types;

pub use client::TilesViewClient;
pub use error::{NetworkErrorKind, TransportError};
pub use response::{extract_remote_id, ApiResponse, EnvelopeShape, Interpretation};
pub use types::{
    CategoryPayload, DeletePayload, Endpoint, FilterLookup, FilterPayload, ProductPayload,
    SyncPayload, MAX_BATCH_SIZE,
};

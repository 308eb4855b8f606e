#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod record;

pub mod catalog;
pub mod catalog_factory;
pub mod catalog_http;

pub mod fix;
pub mod reader;
pub mod validate;

pub mod backup {
    pub mod journal;
    pub mod store;
}

pub mod batch {
    pub mod id;
    pub mod processor;
    pub mod window;
}

// Re-exports: stable API surface
pub use backup::journal::BackupEntry;
pub use backup::store::{BackupStore, BatchSink, RevertResult, SaveReceipt};
pub use batch::id::generate_batch_id;
pub use batch::processor::{
    BatchOptions, BatchProcessor, BatchSummary, Clock, DEFAULT_CHUNK_SIZE, SystemClock,
};
pub use batch::window::TimeWindow;
pub use catalog::{CatalogClient, UpdateMessage, UpdateResponse};
pub use error::{FixError, Result};
pub use fix::{FixOutcome, FixSession};
pub use record::{Record, RecordId};
pub use validate::{Issue, RecordValidator, ValidationOutcome, ValidationReport, ValidatorPipeline};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::{Record, RecordId};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMessage {
    pub message: String,
}

/// Opaque acknowledgment from the remote catalog for one record update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub messages: Vec<UpdateMessage>,
}

/// Remote catalog boundary. `load_record` returns `None` when the catalog
/// has no such record; the caller decides whether that is an error.
pub trait CatalogClient: Send + Sync {
    fn load_record(&self, id: RecordId) -> Result<Option<Record>>;

    fn update_record(&self, record: &Record) -> Result<UpdateResponse>;
}

use std::path::Path;

use time::OffsetDateTime;
use tracing::warn;

use crate::backup::journal::{BackupEntry, Journal};
use crate::catalog::{CatalogClient, UpdateResponse};
use crate::error::{FixError, Result};
use crate::fix::FixOutcome;
use crate::record::RecordId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveReceipt {
    pub inserted_count: usize,
    pub inserted_ids: Vec<RecordId>,
}

#[derive(Debug)]
pub struct RevertResult {
    pub record_id: RecordId,
    pub result: std::result::Result<UpdateResponse, FixError>,
}

/// Persistence seam for the batch walk: one write per chunk. `BackupStore`
/// is the production sink; tests substitute failing ones.
pub trait BatchSink {
    fn save_batch(
        &mut self,
        outcomes: &[Option<FixOutcome>],
        batch_id: &str,
    ) -> Result<SaveReceipt>;
}

/// Append-only log of before/after snapshots keyed by record id and batch
/// id. Reverts read the log and re-submit original snapshots upstream; they
/// never delete entries.
pub struct BackupStore {
    journal: Journal,
}

impl BatchSink for BackupStore {
    fn save_batch(
        &mut self,
        outcomes: &[Option<FixOutcome>],
        batch_id: &str,
    ) -> Result<SaveReceipt> {
        BackupStore::save_batch(self, outcomes, batch_id)
    }
}

impl BackupStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            journal: Journal::open(path)?,
        })
    }

    /// Persist one entry per defined outcome, in input order. Sparse slots
    /// (failed fixes) are skipped. A mid-write failure surfaces as a single
    /// store error; rows already written stay written.
    pub fn save_batch(
        &mut self,
        outcomes: &[Option<FixOutcome>],
        batch_id: &str,
    ) -> Result<SaveReceipt> {
        let inserted_at = OffsetDateTime::now_utc().unix_timestamp();
        let mut receipt = SaveReceipt::default();
        for outcome in outcomes.iter().flatten() {
            let entry = BackupEntry {
                batch_id: batch_id.to_string(),
                record_id: outcome.record_id(),
                original: outcome.validation.original.clone(),
                validated: outcome.validation.validated.clone(),
                inserted_at,
            };
            self.journal.append(&entry)?;
            receipt.inserted_count += 1;
            receipt.inserted_ids.push(entry.record_id);
        }
        Ok(receipt)
    }

    /// Revert one record to its snapshot from the most recent entry across
    /// all batches. `Ok(false)` (no update issued) when no entry exists.
    pub fn revert_single(&mut self, id: RecordId, catalog: &dyn CatalogClient) -> Result<bool> {
        let mut latest: Option<BackupEntry> = None;
        for entry in self.journal.iter()? {
            let entry = entry?;
            if entry.record_id == id {
                latest = Some(entry);
            }
        }
        match latest {
            None => Ok(false),
            Some(entry) => {
                catalog.update_record(&entry.original)?;
                Ok(true)
            }
        }
    }

    /// Revert every record of one batch. One failed update does not block
    /// the others, mirroring the fix path.
    pub fn revert_batch(
        &mut self,
        batch_id: &str,
        catalog: &dyn CatalogClient,
    ) -> Result<Vec<RevertResult>> {
        let mut entries = Vec::new();
        for entry in self.journal.iter()? {
            let entry = entry?;
            if entry.batch_id == batch_id {
                entries.push(entry);
            }
        }
        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            let result = catalog.update_record(&entry.original);
            if let Err(e) = &result {
                warn!(id = %entry.record_id, error = %e, "revert failed");
            }
            results.push(RevertResult {
                record_id: entry.record_id,
                result,
            });
        }
        Ok(results)
    }

    /// Delete every entry unconditionally. Irreversible.
    pub fn wipe(&mut self) -> Result<()> {
        self.journal.reset()
    }

    pub fn entries(&mut self) -> Result<Vec<BackupEntry>> {
        self.journal.iter()?.collect()
    }
}

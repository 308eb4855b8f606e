use crate::catalog::{CatalogClient, UpdateResponse};
use crate::error::{FixError, Result};
use crate::record::{Record, RecordId};
use crate::validate::{ValidationOutcome, ValidatorPipeline};

/// A validated-and-written fix. Never constructed without an update
/// acknowledgment; persisted once, never mutated after.
#[derive(Clone, Debug)]
pub struct FixOutcome {
    pub validation: ValidationOutcome,
    pub update: UpdateResponse,
}

impl FixOutcome {
    pub fn record_id(&self) -> RecordId {
        self.validation.original.id
    }
}

/// Explicit context for validation and fix runs: the catalog boundary plus
/// the validator pipeline, injected by the owning process.
#[derive(Clone, Copy)]
pub struct FixSession<'a> {
    catalog: &'a dyn CatalogClient,
    validators: &'a ValidatorPipeline,
}

impl<'a> FixSession<'a> {
    pub fn new(catalog: &'a dyn CatalogClient, validators: &'a ValidatorPipeline) -> Self {
        Self {
            catalog,
            validators,
        }
    }

    /// Fetch, clone, validate, and re-validate when the validator corrected
    /// the record. `Ok(None)` when the catalog has no such record.
    pub fn validate_record(&self, id: &str) -> Result<Option<ValidationOutcome>> {
        let id = RecordId::parse(id)?;
        self.validate_id(id)
    }

    pub fn validate_id(&self, id: RecordId) -> Result<Option<ValidationOutcome>> {
        let Some(original) = self.catalog.load_record(id)? else {
            return Ok(None);
        };
        Ok(Some(self.validate_fetched(original)?))
    }

    /// Validate a record already in hand (e.g. read from a local file).
    pub fn validate_local(&self, record: &Record) -> Result<ValidationOutcome> {
        self.validate_fetched(record.clone())
    }

    fn validate_fetched(&self, original: Record) -> Result<ValidationOutcome> {
        // Validators mutate in place; keep the fetched copy pristine.
        let mut working = original.clone();
        let results = self.validators.run(&mut working)?;
        // Corrective side effects can unmask new issues; check the corrected
        // record once more.
        let revalidation = if working != original {
            Some(self.validators.run(&mut working)?)
        } else {
            None
        };
        Ok(ValidationOutcome {
            original,
            validated: working,
            results,
            revalidation,
        })
    }

    /// Validate then submit the validated record for remote update.
    pub fn fix(&self, id: &str) -> Result<FixOutcome> {
        let id = RecordId::parse(id)?;
        self.fix_id(id)
    }

    pub fn fix_id(&self, id: RecordId) -> Result<FixOutcome> {
        let validation = self.validate_id(id)?.ok_or(FixError::NotFound(id))?;
        let update = self.catalog.update_record(&validation.validated)?;
        Ok(FixOutcome { validation, update })
    }
}

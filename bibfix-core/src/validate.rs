use serde::{Deserialize, Serialize};

use crate::error::{FixError, Result};
use crate::record::Record;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
}

impl Issue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of one named validator over one record. Empty `issues` means the
/// validator passed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorReport {
    pub validator: String,
    pub issues: Vec<Issue>,
}

/// Ordered reports, one per validator in pipeline order. Immutable once
/// produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub entries: Vec<ValidatorReport>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(|r| r.issues.is_empty())
    }

    pub fn issue_count(&self) -> usize {
        self.entries.iter().map(|r| r.issues.len()).sum()
    }
}

/// One rule-evaluation collaborator. Rule internals are opaque to this crate;
/// a validator may correct the record it is given as a side effect, so
/// callers must clone first if the pre-validation state is needed.
pub trait RecordValidator: Send + Sync {
    fn name(&self) -> &str;
    fn check(&self, record: &mut Record) -> Result<Vec<Issue>>;
}

/// Runs validators in order, collecting one report per validator.
pub struct ValidatorPipeline {
    validators: Vec<Box<dyn RecordValidator>>,
}

impl ValidatorPipeline {
    pub fn new(validators: Vec<Box<dyn RecordValidator>>) -> Self {
        Self { validators }
    }

    pub fn run(&self, record: &mut Record) -> Result<ValidationReport> {
        let mut entries = Vec::with_capacity(self.validators.len());
        for v in &self.validators {
            let issues = v.check(record).map_err(|e| FixError::Validator {
                name: v.name().to_string(),
                reason: e.to_string(),
            })?;
            entries.push(ValidatorReport {
                validator: v.name().to_string(),
                issues,
            });
        }
        Ok(ValidationReport { entries })
    }
}

/// Fetch → clone → validate result. `revalidation` is `Some` only when the
/// validator mutated the record (`validated != original`).
#[derive(Clone, Debug)]
pub struct ValidationOutcome {
    pub original: Record,
    pub validated: Record,
    pub results: ValidationReport,
    pub revalidation: Option<ValidationReport>,
}

impl ValidationOutcome {
    pub fn was_corrected(&self) -> bool {
        self.validated != self.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;
    use serde_json::json;

    struct Fixed {
        name: &'static str,
        issues: Vec<Issue>,
    }

    impl RecordValidator for Fixed {
        fn name(&self) -> &str {
            self.name
        }
        fn check(&self, _record: &mut Record) -> Result<Vec<Issue>> {
            Ok(self.issues.clone())
        }
    }

    struct Failing;

    impl RecordValidator for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn check(&self, _record: &mut Record) -> Result<Vec<Issue>> {
            Err(FixError::Format("boom".into()))
        }
    }

    fn sample() -> Record {
        Record::new(RecordId::parse("1").unwrap(), json!({"leader": "l"}))
    }

    #[test]
    fn reports_follow_pipeline_order() {
        let pipeline = ValidatorPipeline::new(vec![
            Box::new(Fixed {
                name: "first",
                issues: vec![],
            }),
            Box::new(Fixed {
                name: "second",
                issues: vec![Issue::new("bad field")],
            }),
        ]);
        let report = pipeline.run(&mut sample()).unwrap();
        let names: Vec<_> = report.entries.iter().map(|r| r.validator.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert!(!report.is_clean());
        assert_eq!(report.issue_count(), 1);
    }

    #[test]
    fn validator_error_carries_validator_name() {
        let pipeline = ValidatorPipeline::new(vec![Box::new(Failing)]);
        match pipeline.run(&mut sample()) {
            Err(FixError::Validator { name, .. }) => assert_eq!(name, "failing"),
            other => panic!("expected Validator error, got {other:?}"),
        }
    }
}

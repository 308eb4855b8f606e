use serde_json::Value;

use bibfix_core::error::Result;
use bibfix_core::{Issue, Record, RecordValidator, ValidatorPipeline};

/// The stock pipeline shipped with the CLI. Site-specific rule sets plug in
/// through `RecordValidator`; these two are deliberately generic.
pub fn default_pipeline() -> ValidatorPipeline {
    ValidatorPipeline::new(vec![Box::new(LeaderShape), Box::new(WhitespaceNormalizer)])
}

/// MARC leaders are exactly 24 characters. Reports, never corrects.
pub struct LeaderShape;

impl RecordValidator for LeaderShape {
    fn name(&self) -> &str {
        "leader-shape"
    }

    fn check(&self, record: &mut Record) -> Result<Vec<Issue>> {
        let issues = match record.body.get("leader").and_then(Value::as_str) {
            None => vec![Issue::new("leader is missing")],
            Some(l) if l.len() != 24 => {
                vec![Issue::new(format!("leader has {} chars, expected 24", l.len()))]
            }
            Some(_) => vec![],
        };
        Ok(issues)
    }
}

/// Corrective validator: strips leading/trailing whitespace from every
/// string value in the record body, reporting one issue per corrected
/// value. Idempotent, so revalidation of a corrected record comes back
/// clean.
pub struct WhitespaceNormalizer;

impl RecordValidator for WhitespaceNormalizer {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn check(&self, record: &mut Record) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        trim_strings(&mut record.body, "$", &mut issues);
        Ok(issues)
    }
}

fn trim_strings(value: &mut Value, path: &str, issues: &mut Vec<Issue>) {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                issues.push(Issue::new(format!("stray whitespace at {path}")));
                *s = trimmed.to_string();
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                trim_strings(item, &format!("{path}[{i}]"), issues);
            }
        }
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                trim_strings(item, &format!("{path}.{key}"), issues);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibfix_core::RecordId;
    use serde_json::json;

    fn rec(body: Value) -> Record {
        Record::new(RecordId::parse("1").unwrap(), body)
    }

    #[test]
    fn leader_shape_flags_short_leaders() {
        let mut r = rec(json!({"leader": "too short"}));
        let issues = LeaderShape.check(&mut r).unwrap();
        assert_eq!(issues.len(), 1);

        let mut ok = rec(json!({"leader": "00000nam a22000000a 4500"}));
        assert!(LeaderShape.check(&mut ok).unwrap().is_empty());
    }

    #[test]
    fn whitespace_normalizer_corrects_in_place_and_is_idempotent() {
        let mut r = rec(json!({"title": "  padded  ", "fields": [{"a": "fine"}]}));
        let issues = WhitespaceNormalizer.check(&mut r).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(r.body["title"], "padded");

        assert!(WhitespaceNormalizer.check(&mut r).unwrap().is_empty());
    }
}

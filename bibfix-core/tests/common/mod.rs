#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;

use bibfix_core::batch::processor::Clock;
use bibfix_core::{
    CatalogClient, FixError, Issue, Record, RecordId, RecordValidator, Result, UpdateMessage,
    UpdateResponse,
};

/// In-memory catalog double: records by id, every accepted update recorded,
/// selected ids rejecting updates.
pub struct MemCatalog {
    records: Mutex<HashMap<RecordId, Record>>,
    pub updates: Mutex<Vec<Record>>,
    fail_updates: Mutex<HashSet<RecordId>>,
}

impl MemCatalog {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            updates: Mutex::new(Vec::new()),
            fail_updates: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let cat = Self::new();
        for r in records {
            cat.insert(r);
        }
        cat
    }

    pub fn insert(&self, record: Record) {
        self.records.lock().unwrap().insert(record.id, record);
    }

    pub fn fail_update_for(&self, id: RecordId) {
        self.fail_updates.lock().unwrap().insert(id);
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub fn updated_ids(&self) -> Vec<RecordId> {
        self.updates.lock().unwrap().iter().map(|r| r.id).collect()
    }
}

impl CatalogClient for MemCatalog {
    fn load_record(&self, id: RecordId) -> Result<Option<Record>> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    fn update_record(&self, record: &Record) -> Result<UpdateResponse> {
        if self.fail_updates.lock().unwrap().contains(&record.id) {
            return Err(FixError::UpdateFailed {
                id: record.id,
                reason: "rejected by test catalog".into(),
            });
        }
        self.records
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        self.updates.lock().unwrap().push(record.clone());
        Ok(UpdateResponse {
            messages: vec![UpdateMessage {
                message: format!("record {} updated", record.id),
            }],
        })
    }
}

/// Passes everything, touches nothing.
pub struct PassValidator;

impl RecordValidator for PassValidator {
    fn name(&self) -> &str {
        "pass"
    }
    fn check(&self, _record: &mut Record) -> Result<Vec<Issue>> {
        Ok(vec![])
    }
}

/// Corrective validator: uppercases `body.title` in place, reporting an
/// issue only on the pass that changed it. Idempotent, so a second run is
/// clean.
pub struct TitleCaseValidator;

impl RecordValidator for TitleCaseValidator {
    fn name(&self) -> &str {
        "title-case"
    }
    fn check(&self, record: &mut Record) -> Result<Vec<Issue>> {
        let Some(title) = record.body.get("title").and_then(|t| t.as_str()) else {
            return Ok(vec![Issue::new("title missing")]);
        };
        let upper = title.to_uppercase();
        if upper != title {
            record.body["title"] = json!(upper);
            return Ok(vec![Issue::new("title was not upper case")]);
        }
        Ok(vec![])
    }
}

pub struct ErroringValidator;

impl RecordValidator for ErroringValidator {
    fn name(&self) -> &str {
        "erroring"
    }
    fn check(&self, _record: &mut Record) -> Result<Vec<Issue>> {
        Err(FixError::Format("rule engine exploded".into()))
    }
}

/// Scripted clock: serves the configured hours in order (repeating the last
/// one), recording every pause.
pub struct FakeClock {
    hours: Mutex<Vec<u8>>,
    pub pauses: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn new(hours: &[u8]) -> Self {
        Self {
            hours: Mutex::new(hours.to_vec()),
            pauses: Mutex::new(Vec::new()),
        }
    }

    pub fn pause_count(&self) -> usize {
        self.pauses.lock().unwrap().len()
    }
}

impl Clock for FakeClock {
    fn local_hour(&self) -> u8 {
        let mut hours = self.hours.lock().unwrap();
        if hours.len() > 1 {
            hours.remove(0)
        } else {
            hours.first().copied().unwrap_or(12)
        }
    }

    fn pause(&self, d: Duration) {
        self.pauses.lock().unwrap().push(d);
    }
}

pub fn id(n: u32) -> RecordId {
    RecordId::parse(&n.to_string()).unwrap()
}

pub fn record(n: u32, title: &str) -> Record {
    Record::new(id(n), json!({"leader": "00000nam a22000000a 4500", "title": title}))
}

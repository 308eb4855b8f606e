use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::Path;

use crate::error::{FixError, Result};
use crate::record::Record;

/// Open a record file as a lazy sequence, dispatching on the file suffix.
/// One codec family per suffix; currently JSON lines (`.jsonl`).
pub fn open_record_file(path: &Path) -> Result<Box<dyn Iterator<Item = Result<Record>>>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("jsonl") => Ok(Box::new(JsonLinesReader::open(path)?)),
        other => Err(FixError::Config(format!(
            "unsupported record file suffix {other:?} for {}; supported: .jsonl",
            path.display()
        ))),
    }
}

/// Write records with the codec matching the file suffix.
pub fn write_record_file(path: &Path, records: &[Record]) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("jsonl") => {
            let mut f = File::create(path)?;
            for record in records {
                let line = serde_json::to_string(record)
                    .map_err(|e| FixError::Format(format!("record encode: {e}")))?;
                writeln!(f, "{line}")?;
            }
            f.flush()?;
            Ok(())
        }
        other => Err(FixError::Config(format!(
            "unsupported record file suffix {other:?} for {}; supported: .jsonl",
            path.display()
        ))),
    }
}

/// One record per line, blank lines skipped.
pub struct JsonLinesReader {
    lines: Lines<BufReader<File>>,
}

impl JsonLinesReader {
    pub fn open(path: &Path) -> Result<Self> {
        let f = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(f).lines(),
        })
    }
}

impl Iterator for JsonLinesReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(l) => l,
                Err(e) => return Some(Err(e.into())),
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(
                serde_json::from_str(&line)
                    .map_err(|e| FixError::Format(format!("record decode: {e}"))),
            );
        }
    }
}

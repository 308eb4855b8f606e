use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FixError, Result};

/// Catalog identifier: strictly between 0 and 100,000,000, printed with
/// leading zeros to a fixed width of 9 digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(u32);

pub const ID_WIDTH: usize = 9;
const ID_UPPER: u32 = 100_000_000;

impl RecordId {
    /// Parse a decimal string; leading zeros are accepted and stripped.
    pub fn parse(s: &str) -> Result<Self> {
        let n: u32 = s
            .trim()
            .parse()
            .map_err(|_| FixError::InvalidId(s.to_string()))?;
        if n == 0 || n >= ID_UPPER {
            return Err(FixError::InvalidId(s.to_string()));
        }
        Ok(Self(n))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Re-pad a numeric id to the fixed catalog width.
    pub fn padded(self) -> String {
        format!("{:0width$}", self.0, width = ID_WIDTH)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = ID_WIDTH)
    }
}

impl FromStr for RecordId {
    type Err = FixError;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = FixError;
    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> String {
        id.padded()
    }
}

/// A bibliographic record: a catalog id plus an opaque structured body.
/// `clone` is a deep copy; `==` is deep structural comparison. A record is
/// owned by whichever step currently holds it and is never shared mutably
/// across concurrent fixes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub body: Value,
}

impl Record {
    pub fn new(id: RecordId, body: Value) -> Self {
        Self { id, body }
    }
}

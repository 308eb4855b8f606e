use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FixError, Result};
use crate::record::{Record, RecordId};

const MAGIC: &[u8; 8] = b"BFXLOG\0\0";
const VERSION: u8 = 1;
const HEADER_LEN: usize = MAGIC.len() + 1;

/// One before/after snapshot pair. Append-only; a revert re-submits
/// `original` upstream but never deletes the entry, so the audit trail
/// survives a revert.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BackupEntry {
    pub batch_id: String,
    pub record_id: RecordId,
    pub original: Record,
    pub validated: Record,
    pub inserted_at: i64,
}

/// Append-only, length-delimited CBOR log of backup entries.
pub struct Journal {
    f: File,
    pub path: PathBuf,
}

pub struct JournalIter<'a> {
    f: &'a mut File,
}

impl<'a> Iterator for JournalIter<'a> {
    type Item = Result<BackupEntry>;
    fn next(&mut self) -> Option<Self::Item> {
        match read_next_entry(self.f) {
            Ok(Some(e)) => Some(Ok(e)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

fn read_next_entry(f: &mut File) -> Result<Option<BackupEntry>> {
    let len = match get_uvarint(f)? {
        Some(n) => n,
        None => return Ok(None),
    };
    let mut buf = vec![0u8; len as usize];
    if let Err(e) = f.read_exact(&mut buf) {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            // Partial tail from an interrupted write; ignore it.
            return Ok(None);
        }
        return Err(e.into());
    }
    let entry: BackupEntry = serde_cbor::from_slice(&buf)
        .map_err(|e| FixError::Store(format!("entry decode: {e}")))?;
    Ok(Some(entry))
}

fn put_uvarint(out: &mut Vec<u8>, mut x: u64) {
    while x >= 0x80 {
        out.push((x as u8) | 0x80);
        x >>= 7;
    }
    out.push(x as u8);
}

fn get_uvarint<R: Read>(r: &mut R) -> Result<Option<u64>> {
    let mut x: u64 = 0;
    let mut s: u32 = 0;
    for _ in 0..10 {
        let mut b = [0u8; 1];
        match r.read(&mut b) {
            Ok(0) => return Ok(None),
            Ok(_) => {
                let byte = b[0];
                if byte < 0x80 {
                    x |= (byte as u64) << s;
                    return Ok(Some(x));
                }
                x |= ((byte & 0x7f) as u64) << s;
                s += 7;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(FixError::Store("varint too long".into()))
}

impl Journal {
    pub fn open(path: &Path) -> Result<Self> {
        let existed = path.exists();
        let mut f = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        if !existed {
            f.write_all(MAGIC)?;
            f.write_all(&[VERSION])?;
            f.flush()?;
        } else {
            // A file too short to hold the header was never written by us;
            // refuse it the same way as a bad magic.
            let mut header = [0u8; HEADER_LEN];
            match f.read_exact(&mut header) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Err(FixError::Store(format!(
                        "not a backup journal: {}",
                        path.display()
                    )));
                }
                Err(e) => return Err(e.into()),
            }
            if &header[..MAGIC.len()] != MAGIC {
                return Err(FixError::Store(format!(
                    "not a backup journal: {}",
                    path.display()
                )));
            }
            let ver = header[MAGIC.len()];
            if ver != VERSION {
                return Err(FixError::Store(format!("unsupported journal version {ver}")));
            }
        }
        // Seek to end for appends
        f.seek(SeekFrom::End(0))?;
        Ok(Self {
            f,
            path: path.to_path_buf(),
        })
    }

    /// Append a single entry (length-delimited). Partial tails are ignored
    /// on read.
    pub fn append(&mut self, entry: &BackupEntry) -> Result<()> {
        let mut plain = Vec::with_capacity(256);
        serde_cbor::to_writer(&mut plain, entry)
            .map_err(|e| FixError::Store(format!("entry encode: {e}")))?;
        let mut lenv = Vec::with_capacity(10);
        put_uvarint(&mut lenv, plain.len() as u64);
        self.f.seek(SeekFrom::End(0))?;
        self.f.write_all(&lenv)?;
        self.f.write_all(&plain)?;
        self.f.flush()?;
        Ok(())
    }

    /// Create an iterator starting after the header.
    pub fn iter(&mut self) -> Result<JournalIter<'_>> {
        self.f.flush()?;
        self.f.seek(SeekFrom::Start(HEADER_LEN as u64))?;
        Ok(JournalIter { f: &mut self.f })
    }

    /// Drop every entry, keeping the header. Irreversible.
    pub fn reset(&mut self) -> Result<()> {
        self.f.set_len(HEADER_LEN as u64)?;
        self.f.seek(SeekFrom::End(0))?;
        Ok(())
    }
}

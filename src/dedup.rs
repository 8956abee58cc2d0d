//! Deduplication against the persisted seen-set.
//!
//! Each layout mode keeps its own seen-set file: one lowercase hex hash per
//! line, sorted ascending so diffs stay stable. [`filter_new`] is pure; the
//! binary decides when (and whether) the updated set is written back.

use crate::record::Record;
use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Persisted collection of content hashes already turned into labels.
///
/// Backed by a `BTreeSet` so iteration (and the file format) is sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    hashes: BTreeSet<String>,
}

impl SeenSet {
    /// Loads a seen-set from disk. A missing file is an empty set, not an
    /// error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents =
            fs::read_to_string(path).map_err(|e| Error::op("read_seen_set", e))?;
        let hashes = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self { hashes })
    }

    /// Writes the set back atomically: temp file in the same directory,
    /// fsync, rename over the target. A crash mid-write leaves the previous
    /// file intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp_path = path.with_extension("hashes.tmp");

        let mut contents = String::new();
        for hash in &self.hashes {
            contents.push_str(hash);
            contents.push('\n');
        }

        let mut file =
            File::create(&tmp_path).map_err(|e| Error::op("write_seen_set", e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| Error::op("write_seen_set", e))?;
        file.sync_all().map_err(|e| Error::op("write_seen_set", e))?;

        fs::rename(&tmp_path, path).map_err(|e| Error::op("rename_seen_set", e))?;

        // fsync the directory so the rename itself is durable
        #[cfg(unix)]
        if let Some(dir) = path.parent() {
            if let Ok(dir) = File::open(dir) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }

    /// Whether this hash has already been labeled.
    #[must_use]
    pub fn contains(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }

    /// Adds a hash to the set.
    pub fn insert(&mut self, hash: String) {
        self.hashes.insert(hash);
    }

    /// Number of hashes in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Filters `records` down to the ones never seen before.
///
/// Returns the new records in their original relative order, plus the full
/// updated set (prior hashes ∪ hashes accepted this run). A record equal
/// under normalization to a persisted one, or to an earlier row in the same
/// batch, is dropped. Does not touch disk.
pub fn filter_new(records: Vec<Record>, prior: &SeenSet) -> (Vec<Record>, SeenSet) {
    let mut updated = prior.clone();
    let mut new_records = Vec::new();

    for record in records {
        let hash = record.content_hash();
        if updated.contains(&hash) {
            tracing::debug!(key = %record.canonical_key(), "skipping duplicate");
            continue;
        }
        updated.insert(hash);
        new_records.push(record);
    }

    (new_records, updated)
}

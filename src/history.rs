//! Command history with usage counts.
//!
//! The store keeps one [`HistoryEntry`] per distinct command and a [`RankedSnapshot`]
//! derived from it. The snapshot is rebuilt eagerly after every mutation, which keeps
//! reads free and is cheap at interactive history sizes.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A distinct command and how many times it has been seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Trimmed, never empty.
    pub text: String,
    /// Always at least 1.
    pub frequency: u32,
}

/// History entries ordered by frequency, most used first.
///
/// Entries with equal frequency keep the order in which they were first observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedSnapshot {
    entries: Vec<HistoryEntry>,
}

impl RankedSnapshot {
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<HistoryEntry>> for RankedSnapshot {
    /// Build a snapshot from arbitrary entries, ranking them.
    fn from(mut entries: Vec<HistoryEntry>) -> Self {
        // `sort_by` is stable: ties stay in discovery order.
        entries.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        Self { entries }
    }
}

/// Owner of the in-memory frequency table and the append-only history log.
#[derive(Debug, Default)]
pub struct HistoryStore {
    log_path: Option<PathBuf>,
    /// Entries in discovery order.
    entries: Vec<HistoryEntry>,
    index: HashMap<String, usize>,
    ranked: RankedSnapshot,
}

impl HistoryStore {
    /// Create an empty store persisting to `log_path`.
    ///
    /// Nothing is read until [`HistoryStore::load_log`] is called.
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: Some(log_path.into()),
            ..Self::default()
        }
    }

    /// Create a store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Create a store for `log_path` and load whatever the log already holds.
    ///
    /// A missing or unreadable log yields an empty store.
    pub fn open(log_path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(log_path);
        match store.load_log() {
            Ok(count) => debug!(count, "loaded history"),
            Err(e) if e.is_not_found() => debug!("no history yet: {e}"),
            Err(e) => warn!("history not loaded: {e}"),
        }
        store
    }

    /// Read the persisted log into the frequency table.
    ///
    /// Returns the number of commands counted.
    pub fn load_log(&mut self) -> Result<usize> {
        let Some(path) = self.log_path.clone() else {
            return Ok(0);
        };
        let file = File::open(&path).map_err(|e| Error::from_io(&path, e))?;
        Ok(self.load(BufReader::new(file)))
    }

    /// Count every non-blank line of `source` as one observation of that command.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than dropping the line, so
    /// one stray byte never hides the commands after it. Reading stops quietly at the
    /// first I/O error.
    pub fn load<R: BufRead>(&mut self, source: R) -> usize {
        let mut count = 0;
        for record in source.split(b'\n') {
            let mut bytes = match record {
                Ok(bytes) => bytes,
                Err(e) => {
                    debug!("stopped reading history: {e}");
                    break;
                }
            };
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            if self.observe(&String::from_utf8_lossy(&bytes)) {
                count += 1;
            }
        }
        self.rebuild();
        count
    }

    /// Record a submitted command: persist it and bump its count.
    ///
    /// Blank commands are ignored. Failing to write the log is logged and otherwise
    /// ignored; the in-memory count is still updated.
    pub fn append(&mut self, command: &str) {
        let command = command.trim();
        if command.is_empty() {
            return;
        }
        if let Some(path) = &self.log_path {
            if let Err(e) = append_line(path, command) {
                warn!(path = %path.display(), "could not persist history: {e}");
            }
        }
        self.observe(command);
        self.rebuild();
    }

    /// Re-derive the ranked snapshot from the frequency table.
    pub fn rebuild(&mut self) {
        self.ranked = RankedSnapshot::from(self.entries.clone());
    }

    pub fn snapshot(&self) -> &RankedSnapshot {
        &self.ranked
    }

    pub fn frequency(&self, command: &str) -> Option<u32> {
        self.index
            .get(command)
            .map(|&i| self.entries[i].frequency)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn observe(&mut self, command: &str) -> bool {
        let command = command.trim();
        if command.is_empty() {
            return false;
        }
        match self.index.get(command) {
            Some(&i) => self.entries[i].frequency += 1,
            None => {
                self.index.insert(command.to_string(), self.entries.len());
                self.entries.push(HistoryEntry {
                    text: command.to_string(),
                    frequency: 1,
                });
            }
        }
        true
    }
}

fn append_line(path: &Path, command: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    writeln!(file, "{command}")
}

//! Resumable downloads into an append-only file of pretty-printed notes.
//!
//! Complete records are never rewritten. On startup every stored
//! `(id, version)` is read back into a [`SeenSet`] and only snapshots outside
//! that set are appended, so the file holds each snapshot at most once no
//! matter how often a download is repeated. An incomplete last record (from an
//! interrupted write) is cut off before appending.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::NoteSource;
use crate::error::{Error, Result};
use crate::models::{Note, SnapshotKey};

/// Conventional name of the download file
pub const DEFAULT_NOTES_FILE: &str = "notes.json";

/// Snapshots already present in the download file
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    keys: HashSet<SnapshotKey>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream the records of `path` and collect their keys. A missing file
    /// is an empty set. Only `id` and `version` of each record are read.
    pub fn load(path: &Path) -> Result<Self> {
        Self::scan(path).map(|(seen, _)| seen)
    }

    /// Like [`SeenSet::load`], also returning the byte offset where an
    /// incomplete last record starts. Keys before it are kept. A malformed
    /// record anywhere else is a decode error naming its offset.
    pub fn scan(path: &Path) -> Result<(Self, Option<u64>)> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok((Self::new(), None)),
            Err(e) => return Err(e.into()),
        };

        let mut seen = Self::new();
        let mut records = serde_json::Deserializer::from_reader(BufReader::new(file))
            .into_iter::<SnapshotKey>();
        loop {
            let offset = records.byte_offset() as u64;
            match records.next() {
                None => return Ok((seen, None)),
                Some(Ok(key)) => {
                    seen.insert(key);
                }
                Some(Err(e)) if e.is_eof() => {
                    warn!(
                        path = %path.display(),
                        offset,
                        error = %e,
                        "incomplete record at the end of the file"
                    );
                    return Ok((seen, Some(offset)));
                }
                Some(Err(e)) => {
                    return Err(Error::decode(format!(
                        "{}: bad record after byte {}: {}",
                        path.display(),
                        offset,
                        e
                    )))
                }
            }
        }
    }

    pub fn contains(&self, id: &str, version: u64) -> bool {
        self.keys.contains(&SnapshotKey::new(id, version))
    }

    /// Returns false if the key was already there.
    pub fn insert(&mut self, key: SnapshotKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DownloadMode {
    /// Current version of every note
    #[default]
    HeadsOnly,
    /// Current version plus every older version the server still has
    AllVersions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DownloadStats {
    pub heads_written: usize,
    pub versions_written: usize,
    /// Snapshots that were already in the file
    pub skipped: usize,
    /// Older versions the server would not return
    pub failed_versions: usize,
}

impl DownloadStats {
    pub fn written(&self) -> usize {
        self.heads_written + self.versions_written
    }
}

/// Owns the note source, the seen set and the open download file.
#[derive(Debug)]
pub struct IncrementalCoordinator<S> {
    source: S,
    seen: SeenSet,
    file: File,
    path: PathBuf,
}

impl<S: NoteSource> IncrementalCoordinator<S> {
    /// Read the existing state from `path` and open it for appending.
    pub fn open(source: S, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (seen, incomplete_at) = SeenSet::scan(&path)?;
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        if let Some(offset) = incomplete_at {
            file.set_len(offset)?;
            info!(path = %path.display(), offset, "dropped incomplete last record");
        }
        info!(path = %path.display(), known = seen.len(), "download state loaded");

        Ok(IncrementalCoordinator {
            source,
            seen,
            file,
            path,
        })
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Append `note` unless its snapshot is already stored. Returns whether it
    /// was written.
    pub fn record(&mut self, note: &Note) -> Result<bool> {
        if self.seen.contains(&note.id, note.version) {
            return Ok(false);
        }

        let mut bytes = serde_json::to_vec_pretty(note)?;
        bytes.push(b'\n');
        self.file.write_all(&bytes)?;
        self.seen.insert(note.key());
        debug!(id = %note.id, version = note.version, "snapshot written");
        Ok(true)
    }

    /// Fetch the index and append every snapshot not stored yet.
    pub fn run(&mut self, mode: DownloadMode) -> Result<DownloadStats> {
        let heads = self.source.list()?;
        info!(notes = heads.len(), ?mode, "index fetched");

        let mut stats = DownloadStats::default();
        for head in &heads {
            if self.record(head)? {
                stats.heads_written += 1;
            } else {
                stats.skipped += 1;
            }

            if mode == DownloadMode::AllVersions {
                self.download_history(head, &mut stats)?;
            }
        }

        self.file.flush()?;
        info!(
            heads = stats.heads_written,
            versions = stats.versions_written,
            skipped = stats.skipped,
            failed = stats.failed_versions,
            "download finished"
        );
        Ok(stats)
    }

    /// Older versions, newest first. The server drops old versions without
    /// telling anyone, so a failed fetch is logged and skipped.
    fn download_history(&mut self, head: &Note, stats: &mut DownloadStats) -> Result<()> {
        for version in (1..head.version).rev() {
            if self.seen.contains(&head.id, version) {
                stats.skipped += 1;
                continue;
            }

            match self.source.get_note(&head.id, version) {
                Ok(note) => {
                    if self.record(&note)? {
                        stats.versions_written += 1;
                    } else {
                        stats.skipped += 1;
                    }
                }
                Err(e) => {
                    warn!(id = %head.id, version, error = %e, "older version not available");
                    stats.failed_versions += 1;
                }
            }
        }
        Ok(())
    }
}

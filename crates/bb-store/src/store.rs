//! File-backed document store with atomic replacement.
//!
//! Reads fail open: a missing, unreadable, or corrupt file yields a fresh
//! document instead of an error, so a bad file never takes the bot down.
//! A corrupt file is copied to `<path>.corrupt` before it can be overwritten.
//! An unreadable file is never overwritten: [`JsonStore::update`] reports it
//! instead of saving a fresh document over it.
//!
//! Writes go to a temp file in the same directory which is fsynced and then
//! renamed over the canonical path. Concurrent readers see either the old or
//! the new document, never a partial one, and a crash before the rename
//! leaves the previous file intact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::error::{StoreError, StoreResult};

/// A JSON document persisted to a single file.
///
/// All read-modify-write cycles run through [`JsonStore::update`], which
/// holds a writer lock for the whole cycle. Two updates in this process can
/// therefore never interleave and silently drop each other's changes.
/// There is no cross-process locking.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl JsonStore {
    /// Create a store backed by `path`. The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a corrupt file is copied before being replaced.
    pub fn corrupt_backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    /// Load the document, failing open to an empty one.
    pub fn load(&self) -> Document {
        self.read_or_fresh().0
    }

    /// Load the document, reporting unreadable and corrupt files as errors.
    /// A missing file is not an error and yields an empty document.
    pub fn try_load(&self) -> StoreResult<Document> {
        self.read().map(|(doc, _)| doc)
    }

    /// Atomically replace the backing file with `doc`.
    pub fn save(&self, doc: &Document) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.write_failed(e))?;
        serde_json::to_writer_pretty(&mut tmp, doc).map_err(|e| self.write_failed(e.into()))?;
        tmp.write_all(b"\n").map_err(|e| self.write_failed(e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| self.write_failed(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.write_failed(e.error))?;

        debug!(path = %self.path.display(), players = doc.players.len(), "document saved");
        Ok(())
    }

    /// Run one load-mutate-save cycle under the writer lock.
    ///
    /// The document is saved only if `f` succeeded and something changed
    /// (including a load-time migration). If `f` fails nothing is written.
    /// A file that exists but cannot be read fails with
    /// [`StoreError::Unavailable`] before `f` runs.
    pub fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Document) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let (mut doc, migrated) = match self.read() {
            Err(e @ StoreError::Unavailable { .. }) => {
                warn!(error = %e, "not overwriting an unreadable document");
                return Err(e.into());
            }
            loaded => self.recover(loaded),
        };
        let before = doc.clone();
        let value = f(&mut doc)?;

        if migrated || doc != before {
            self.save(&doc)?;
        }
        Ok(value)
    }

    /// Replace the whole document with an empty one.
    pub fn reset(&self) -> StoreResult<()> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.save(&Document::new())?;
        info!(path = %self.path.display(), "document reset");
        Ok(())
    }

    /// Read and migrate. The flag reports whether migration changed anything.
    fn read(&self) -> StoreResult<(Document, bool)> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok((Document::new(), false)),
            Err(source) => {
                return Err(StoreError::Unavailable {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut doc: Document =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        let migrated = doc.migrate();
        if migrated {
            debug!(path = %self.path.display(), "document migrated on load");
        }
        Ok((doc, migrated))
    }

    fn read_or_fresh(&self) -> (Document, bool) {
        self.recover(self.read())
    }

    fn recover(&self, loaded: StoreResult<(Document, bool)>) -> (Document, bool) {
        match loaded {
            Ok(loaded) => loaded,
            Err(e @ StoreError::Corrupt { .. }) => {
                warn!(error = %e, "falling back to an empty document");
                let backup = self.corrupt_backup_path();
                match fs::copy(&self.path, &backup) {
                    Ok(_) => warn!(backup = %backup.display(), "corrupt document backed up"),
                    Err(copy_err) => {
                        warn!(error = %copy_err, "could not back up corrupt document")
                    }
                }
                (Document::new(), false)
            }
            Err(e) => {
                warn!(error = %e, "falling back to an empty document");
                (Document::new(), false)
            }
        }
    }

    fn write_failed(&self, source: std::io::Error) -> StoreError {
        StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        }
    }
}

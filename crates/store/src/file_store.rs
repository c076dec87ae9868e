//! File-based document store: one JSON file per save.
//!
//! Storage location: the configured history directory (`works/` by default).
//! Files are opened create-only, so an existing record is never touched and
//! concurrent writers cannot clobber each other.

use chrono::{Local, NaiveDateTime};
use scriptorium_core::error::StoreError;
use scriptorium_core::store::{DocumentStore, HistoryEntry};
use scriptorium_core::Document;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::record::{DocumentRecord, DATE_CREATED_FORMAT, FILE_STAMP_FORMAT};

/// Give up after this many same-second collisions for one id.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Length of the `%Y%m%d_%H%M%S_` file-name prefix.
const STAMP_PREFIX_LEN: usize = 16;

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store over `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        debug!(dir = %dir.display(), "File store opened");
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn save_at(&self, document: &mut Document, now: NaiveDateTime) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            StoreError::Io(format!("Failed to create history directory {}: {e}", self.dir.display()))
        })?;

        let id = document
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let created_at = document.created_at.unwrap_or(now);
        let stamp = now.format(FILE_STAMP_FORMAT).to_string();

        let (path, file) = self.create_unique(&stamp, &id)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut record = DocumentRecord::from_document(document);
        record.id = Some(id.clone());
        record.date_created = Some(created_at.format(DATE_CREATED_FORMAT).to_string());
        record.timestamp = Some(stamp);
        record.json_filename = Some(file_name);

        if let Err(e) = write_pretty(file, &record) {
            if let Err(cleanup) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), error = %cleanup, "Failed to remove partial record");
            }
            return Err(StoreError::Io(format!(
                "Failed to write record {}: {e}",
                path.display()
            )));
        }

        document.id = Some(id.clone());
        document.created_at = Some(created_at);
        document.source_path = Some(path.clone());
        info!(id = %id, path = %path.display(), created = %created_at, "Document saved");
        Ok(path)
    }

    /// Open `{stamp}_{id}.json`, or `{stamp}_{id}-N.json` if taken.
    fn create_unique(&self, stamp: &str, id: &str) -> Result<(PathBuf, File), StoreError> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{stamp}_{id}.json")
            } else {
                format!("{stamp}_{id}-{}.json", attempt + 1)
            };
            let path = self.dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StoreError::Io(format!(
                        "Failed to create {}: {e}",
                        path.display()
                    )));
                }
            }
        }

        Err(StoreError::Io(format!(
            "No free file name for {stamp}_{id} after {MAX_NAME_ATTEMPTS} attempts"
        )))
    }

    /// Turn a lookup key into a record path.
    fn resolve(&self, key: &str) -> Option<PathBuf> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }

        let direct = Path::new(key);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }

        for candidate in [self.dir.join(key), self.dir.join(format!("{key}.json"))] {
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        self.newest_file_for_id(key)
    }

    /// The most recent save of the document with this id, by file name.
    fn newest_file_for_id(&self, id: &str) -> Option<PathBuf> {
        let entries = std::fs::read_dir(&self.dir).ok()?;

        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                let (stamp, file_id, counter) = parse_file_name(&name)?;
                (file_id == id).then(|| ((stamp.to_string(), counter), e.path()))
            })
            .max_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, path)| path)
    }

    fn read_record(path: &Path, key: &str) -> Result<DocumentRecord, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "Record unreadable");
            StoreError::NotFound { key: key.to_string() }
        })?;

        serde_json::from_str(&content).map_err(|e| StoreError::CorruptRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

impl DocumentStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn save(&self, document: &mut Document) -> Result<PathBuf, StoreError> {
        self.save_at(document, Local::now().naive_local())
    }

    fn load(&self, key: &str) -> Result<Document, StoreError> {
        let path = self
            .resolve(key)
            .ok_or_else(|| StoreError::NotFound { key: key.to_string() })?;

        let record = Self::read_record(&path, key)?;
        debug!(key, path = %path.display(), "Record loaded");
        Ok(record.into_document(path))
    }

    fn list_history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "Failed to read history directory {}: {e}",
                    self.dir.display()
                )));
            }
        };

        let mut history: Vec<HistoryEntry> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| {
                let key = path.display().to_string();
                match Self::read_record(&path, &key) {
                    Ok(record) => {
                        let document = record.into_document(path.clone());
                        Some(HistoryEntry::from_document(&document, path))
                    }
                    Err(e) => {
                        warn!(error = %e, "Skipping unreadable history record");
                        None
                    }
                }
            })
            .collect();

        // Newest first; undated records last.
        history.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.path.cmp(&a.path))
        });

        Ok(history)
    }
}

/// Split `{stamp}_{id}[-N].json` into its parts. Plain names count as N = 1.
pub(crate) fn parse_file_name(name: &str) -> Option<(&str, &str, u32)> {
    let stem = name.strip_suffix(".json")?;
    if stem.len() <= STAMP_PREFIX_LEN || !stem.is_char_boundary(STAMP_PREFIX_LEN) {
        return None;
    }
    let (stamp, rest) = stem.split_at(STAMP_PREFIX_LEN);
    let stamp = stamp.strip_suffix('_')?;
    NaiveDateTime::parse_from_str(stamp, FILE_STAMP_FORMAT).ok()?;

    // Ids are UUIDs, whose last group is hex; a trailing `-N` with N > 1
    // only appears on collisions.
    if let Some((id, counter)) = rest.rsplit_once('-') {
        if let Ok(n) = counter.parse::<u32>() {
            if n > 1 && counter.len() < 12 {
                return Some((stamp, id, n));
            }
        }
    }
    Some((stamp, rest, 1))
}

/// Pretty-print with four-space indentation, non-ASCII kept verbatim.
fn write_pretty(file: File, record: &DocumentRecord) -> std::io::Result<()> {
    let mut writer = std::io::BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    record.serialize(&mut serializer).map_err(std::io::Error::other)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

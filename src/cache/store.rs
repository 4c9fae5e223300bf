// Widget snapshot store.
// Persists the latest keyword list and its timestamp in a per-group key-value slot.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrendlyError};
use crate::feed::{KeywordEntry, WidgetSnapshot, parse_entries};

/// Storage for the current widget snapshot.
///
/// Implementations keep exactly one snapshot; every save replaces the previous one.
pub trait SnapshotStore: Send + Sync {
    /// Persist `snapshot`, stamping it with the current time unless it already
    /// carries a timestamp. Returns the timestamp written.
    fn save(&self, snapshot: &WidgetSnapshot) -> Result<DateTime<Utc>>;

    /// Read back the stored snapshot, if any.
    fn load(&self) -> Result<Option<WidgetSnapshot>>;
}

/// On-disk layout of a widget slot: the entry list as a JSON string plus an ISO-8601 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSlot {
    pub keywords: String,
    #[serde(rename = "lastUpdate", default)]
    pub last_update: Option<String>,
}

impl StoredSlot {
    fn encode(entries: &[KeywordEntry], at: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            keywords: serde_json::to_string(entries)?,
            last_update: Some(at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        })
    }

    fn decode(&self) -> Result<Option<WidgetSnapshot>> {
        if self.keywords.trim().is_empty() {
            return Ok(None);
        }

        let entries = parse_entries(&self.keywords, usize::MAX)
            .map_err(|e| TrendlyError::CorruptSnapshot(e.to_string()))?;
        let last_updated = self.last_update.as_deref().and_then(|raw| {
            match DateTime::parse_from_rfc3339(raw) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(e) => {
                    tracing::warn!(
                        event = "store.bad_timestamp",
                        last_update = raw,
                        error = %e,
                        "Ignoring unreadable lastUpdate in widget slot"
                    );
                    None
                }
            }
        });

        Ok(Some(WidgetSnapshot {
            entries,
            last_updated,
        }))
    }
}

/// Snapshot store backed by one JSON file per widget group.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `group` under the default cache directory.
    pub fn for_group(group: &str) -> Result<Self> {
        super::paths::widget_slot_path(group)
            .map(Self::new)
            .ok_or(TrendlyError::NoCacheDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileStore {
    fn save(&self, snapshot: &WidgetSnapshot) -> Result<DateTime<Utc>> {
        let at = snapshot.last_updated.unwrap_or_else(Utc::now);
        let slot = StoredSlot::encode(&snapshot.entries, at)?;
        let json = serde_json::to_string_pretty(&slot)?;
        write_atomic(&self.path, &json)?;
        Ok(at)
    }

    fn load(&self) -> Result<Option<WidgetSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let slot: StoredSlot = serde_json::from_str(&contents)
            .map_err(|e| TrendlyError::CorruptSnapshot(e.to_string()))?;
        slot.decode()
    }
}

/// In-process snapshot store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RwLock<Option<StoredSlot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything has been saved yet.
    pub fn is_written(&self) -> bool {
        self.slot.read().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&self, snapshot: &WidgetSnapshot) -> Result<DateTime<Utc>> {
        let at = snapshot.last_updated.unwrap_or_else(Utc::now);
        let encoded = StoredSlot::encode(&snapshot.entries, at)?;
        let mut slot = self
            .slot
            .write()
            .map_err(|_| TrendlyError::CorruptSnapshot("store lock poisoned".to_string()))?;
        *slot = Some(encoded);
        Ok(at)
    }

    fn load(&self) -> Result<Option<WidgetSnapshot>> {
        let slot = self
            .slot
            .read()
            .map_err(|_| TrendlyError::CorruptSnapshot("store lock poisoned".to_string()))?;
        match slot.as_ref() {
            Some(stored) => stored.decode(),
            None => Ok(None),
        }
    }
}

/// Write text to `path` atomically via a temp file.
fn write_atomic(path: &Path, text: &str) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

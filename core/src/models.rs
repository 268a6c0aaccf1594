use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note at one version, as handed to callers and stored in the download file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Server-assigned key, stable across versions
    #[serde(alias = "ID")]
    pub id: String,
    /// Starts at 1 and only grows
    #[serde(alias = "Version")]
    pub version: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    /// e.g. `markdown`, `published`, `pinned`
    #[serde(default)]
    pub system_tags: Vec<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub content: String,
    pub creation_date: DateTime<Utc>,
    pub modification_date: DateTime<Utc>,
    #[serde(rename = "shareURL", default, skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    #[serde(rename = "publishURL", default, skip_serializing_if = "Option::is_none")]
    pub publish_url: Option<String>,
    /// Legacy api only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_num: Option<i64>,
    /// Legacy api only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<i64>,
}

impl Note {
    pub fn key(&self) -> SnapshotKey {
        SnapshotKey::new(&self.id, self.version)
    }
}

/// Index entry of the legacy api: everything but the content
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteInfo {
    pub id: String,
    pub version: u64,
    pub tags: Vec<String>,
    pub system_tags: Vec<String>,
    pub deleted: bool,
    pub creation_date: DateTime<Utc>,
    pub modification_date: DateTime<Utc>,
    pub sync_num: Option<i64>,
    pub min_version: Option<i64>,
    pub share_key: Option<String>,
    pub publish_key: Option<String>,
}

impl NoteInfo {
    pub fn key(&self) -> SnapshotKey {
        SnapshotKey::new(&self.id, self.version)
    }
}

/// `(id, version)`: names one immutable snapshot of a note
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotKey {
    #[serde(alias = "ID")]
    pub id: String,
    #[serde(alias = "Version")]
    pub version: u64,
}

impl SnapshotKey {
    pub fn new(id: &str, version: u64) -> Self {
        SnapshotKey {
            id: id.to_string(),
            version,
        }
    }
}

impl std::fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.id, self.version)
    }
}

use serde::{Deserialize, Serialize};

use super::{decode_legacy_date, deleted, null_as_default, DeletedFlag};
use crate::error::Result;
use crate::models::{Note, NoteInfo};
use crate::urls::encode_form_value;

/// One page of `GET /api2/index`
#[derive(Debug, Deserialize)]
pub struct LegacyIndexResponse {
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mark: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<LegacyNote>,
}

/// A note as the legacy api returns it. `content` is missing in index pages
/// and in the answer to most updates.
#[derive(Debug, Deserialize)]
pub struct LegacyNote {
    pub key: String,
    #[serde(default)]
    pub deleted: Option<DeletedFlag>,
    pub modifydate: String,
    pub createdate: String,
    #[serde(default)]
    pub syncnum: Option<i64>,
    pub version: u64,
    #[serde(default)]
    pub minversion: Option<i64>,
    #[serde(default)]
    pub sharekey: Option<String>,
    #[serde(default)]
    pub publishkey: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub systemtags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl LegacyNote {
    pub fn into_info(self) -> Result<NoteInfo> {
        Ok(NoteInfo {
            deleted: deleted::resolve(self.deleted)?,
            creation_date: decode_legacy_date(&self.createdate)?,
            modification_date: decode_legacy_date(&self.modifydate)?,
            id: self.key,
            version: self.version,
            tags: self.tags,
            system_tags: self.systemtags,
            sync_num: self.syncnum,
            min_version: self.minversion,
            share_key: self.sharekey,
            publish_key: self.publishkey,
        })
    }

    pub fn into_note(self) -> Result<Note> {
        Ok(Note {
            deleted: deleted::resolve(self.deleted)?,
            creation_date: decode_legacy_date(&self.createdate)?,
            modification_date: decode_legacy_date(&self.modifydate)?,
            id: self.key,
            version: self.version,
            tags: self.tags,
            system_tags: self.systemtags,
            content: self.content.unwrap_or_default(),
            share_url: None,
            publish_url: None,
            sync_num: self.syncnum,
            min_version: self.minversion,
        })
    }
}

/// Body of a create or update call. Unset fields are left out.
#[derive(Debug, Default, Serialize)]
pub struct NoteUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifydate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<u8>,
}

impl NoteUpdate<'_> {
    /// JSON, then percent-encoded as one form value: what the server reads.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(encode_form_value(&json))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::DateTime;

    const RECORD: &str = r#"{
        "key": "agtzaW1wbGUtbm90ZXIMCxIETm90ZRiElgkM",
        "deleted": 0,
        "modifydate": "1700000001.5",
        "createdate": "1700000000.123456",
        "syncnum": 12,
        "version": 4,
        "minversion": 1,
        "systemtags": ["pinned"],
        "tags": ["work"]
    }"#;

    #[test]
    fn test_note_info_projection() {
        let record: LegacyNote = serde_json::from_str(RECORD).unwrap();

        let info = record.into_info().unwrap();

        assert_eq!(info.id, "agtzaW1wbGUtbm90ZXIMCxIETm90ZRiElgkM");
        assert_eq!(info.version, 4);
        assert!(!info.deleted);
        assert_eq!(info.sync_num, Some(12));
        assert_eq!(info.min_version, Some(1));
        assert_eq!(info.system_tags, vec!["pinned"]);
        assert_eq!(
            info.creation_date,
            DateTime::from_timestamp(1_700_000_000, 123_456_000).unwrap()
        );
        assert_eq!(
            info.modification_date,
            DateTime::from_timestamp(1_700_000_001, 500_000_000).unwrap()
        );
    }

    #[test]
    fn test_missing_content_defaults_to_empty() {
        let record: LegacyNote = serde_json::from_str(RECORD).unwrap();
        assert_eq!(record.into_note().unwrap().content, "");
    }

    #[test]
    fn test_bad_date_is_a_decode_error() {
        let json = RECORD.replace("1700000001.5", "yesterday");
        let record: LegacyNote = serde_json::from_str(&json).unwrap();

        assert!(record.into_note().unwrap_err().is_decode());
    }

    #[test]
    fn test_update_body_only_carries_set_fields() {
        let tags = vec!["a".to_string(), "b".to_string()];
        let update = NoteUpdate {
            key: Some("k"),
            tags: Some(&tags),
            ..Default::default()
        };

        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"key":"k","tags":["a","b"]}"#);
        assert_eq!(
            update.encode().unwrap(),
            "%7B%22key%22%3A%22k%22%2C%22tags%22%3A%5B%22a%22%2C%22b%22%5D%7D"
        );
    }
}

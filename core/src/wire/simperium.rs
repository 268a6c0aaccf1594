use serde::Deserialize;

use super::{decode_float_date, deleted, non_empty, null_as_default, DeletedFlag};
use crate::error::{Error, Result};
use crate::models::Note;

/// One page of `GET /Note/index`
#[derive(Debug, Deserialize)]
pub struct IndexResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub current: String,
    /// Empty at the end of the index
    #[serde(default, deserialize_with = "null_as_default")]
    pub mark: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub index: Vec<IndexEntry>,
}

#[derive(Debug, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    #[serde(rename = "v")]
    pub version: u64,
    /// Present when the index was requested with `data=1`
    #[serde(rename = "d", default)]
    pub data: Option<BucketNote>,
}

/// Note object as stored in the `Note` bucket
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketNote {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub deleted: Option<DeletedFlag>,
    #[serde(rename = "shareURL", default, deserialize_with = "null_as_default")]
    pub share_url: String,
    #[serde(rename = "publishURL", default, deserialize_with = "null_as_default")]
    pub publish_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub system_tags: Vec<String>,
    pub modification_date: f64,
    pub creation_date: f64,
}

/// Body of a successful `/authorize/` call
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub username: String,
    pub access_token: String,
    #[serde(default)]
    pub userid: String,
}

/// Project a bucket object onto a [`Note`]. Id and version come from the
/// surrounding index entry or request path, not from the object itself.
pub fn to_note(id: &str, version: u64, data: BucketNote) -> Result<Note> {
    Ok(Note {
        id: id.to_string(),
        version,
        tags: data.tags,
        system_tags: data.system_tags,
        deleted: deleted::resolve(data.deleted)?,
        content: data.content,
        creation_date: decode_float_date(data.creation_date)?,
        modification_date: decode_float_date(data.modification_date)?,
        share_url: non_empty(data.share_url),
        publish_url: non_empty(data.publish_url),
        sync_num: None,
        min_version: None,
    })
}

impl IndexEntry {
    pub fn into_note(self) -> Result<Note> {
        let data = self
            .data
            .ok_or_else(|| Error::decode(format!("index entry {} has no data", self.id)))?;
        to_note(&self.id, self.version, data)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_bucket_note_projection() {
        let data: BucketNote = serde_json::from_str(
            r#"{ "deleted": 1.0, "creationDate": 1700000000.0, "modificationDate": 1700000001.5,
                 "content": "hi", "tags": ["t"], "systemTags": [] }"#,
        )
        .unwrap();

        let note = to_note("abc", 3, data).unwrap();

        assert!(note.deleted);
        assert_eq!(note.content, "hi");
        assert_eq!(note.tags, vec!["t"]);
        assert!(note.system_tags.is_empty());
        assert_eq!(note.id, "abc");
        assert_eq!(note.version, 3);
        assert_eq!(
            note.creation_date,
            DateTime::from_timestamp(1_700_000_000, 0).unwrap()
        );
        assert_eq!(
            note.modification_date,
            DateTime::from_timestamp(1_700_000_001, 500_000_000).unwrap()
        );
        assert_eq!(note.share_url, None);
    }

    #[test]
    fn test_unknown_fields_and_nulls_are_tolerated() {
        let data: BucketNote = serde_json::from_str(
            r#"{ "creationDate": 1, "modificationDate": 2, "tags": null,
                 "publishURL": "p", "somethingNew": {"a": 1} }"#,
        )
        .unwrap();

        let note = to_note("x", 1, data).unwrap();

        assert!(!note.deleted);
        assert!(note.tags.is_empty());
        assert_eq!(note.content, "");
        assert_eq!(note.publish_url.as_deref(), Some("p"));
    }

    #[test]
    fn test_missing_dates_fail() {
        let result: std::result::Result<BucketNote, _> =
            serde_json::from_str(r#"{ "content": "hi" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_deleted_value_fails_projection() {
        let data: BucketNote = serde_json::from_str(
            r#"{ "deleted": 3, "creationDate": 1, "modificationDate": 2 }"#,
        )
        .unwrap();

        assert!(to_note("x", 1, data).unwrap_err().is_decode());
    }

    #[test]
    fn test_index_page() {
        let page: IndexResponse = serde_json::from_str(
            r#"{ "current": "cv", "mark": "m1", "index": [
                 { "id": "a", "v": 3, "d": { "creationDate": 1, "modificationDate": 2, "content": "A" } },
                 { "id": "b", "v": 1 } ] }"#,
        )
        .unwrap();

        assert_eq!(page.current, "cv");
        assert_eq!(page.mark, "m1");
        assert_eq!(page.index.len(), 2);

        let mut entries = page.index.into_iter();
        let a = entries.next().unwrap().into_note().unwrap();
        assert_eq!((a.id.as_str(), a.version, a.content.as_str()), ("a", 3, "A"));

        let b = entries.next().unwrap().into_note().unwrap_err();
        assert!(b.is_decode());
    }

    #[test]
    fn test_last_page_without_mark() {
        let page: IndexResponse = serde_json::from_str(r#"{ "index": [] }"#).unwrap();
        assert_eq!(page.mark, "");
    }
}

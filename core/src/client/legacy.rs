use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use super::NoteSource;
use crate::config::{ClientConfig, Endpoints, PAGE_SIZE};
use crate::error::{from_json, Result};
use crate::index::{self, IndexPage};
use crate::models::{Note, NoteInfo};
use crate::session::{Credentials, LegacySession};
use crate::transport::Transport;
use crate::wire::encode_legacy_date;
use crate::wire::legacy::{LegacyIndexResponse, LegacyNote, NoteUpdate};

/// Listing filters for the legacy index
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ListOptions {
    /// Stop after this many notes
    pub limit: Option<usize>,
    /// Only notes modified on or after this (local) day
    pub since: Option<NaiveDate>,
}

/// Client for the legacy Simplenote api (`simple-note.appspot.com/api2`).
/// The only dialect that can write.
#[derive(Debug)]
pub struct LegacyClient {
    transport: Transport,
    endpoints: Endpoints,
    credentials: Credentials,
    session: Option<LegacySession>,
}

impl LegacyClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Ok(LegacyClient {
            transport: Transport::new(&config)?,
            endpoints: config.endpoints,
            credentials,
            session: None,
        })
    }

    /// Log in if that has not happened yet.
    pub fn session(&mut self) -> Result<&LegacySession> {
        let session = match self.session.take() {
            Some(session) => session,
            None => LegacySession::login(&self.transport, &self.endpoints, &self.credentials)?,
        };
        Ok(self.session.insert(session))
    }

    /// `/api2<path>?<args>&auth=..&email=..`
    fn url(&mut self, path: &str, args: &[&str]) -> Result<String> {
        let session = self.session()?.clone();
        let mut all: Vec<&str> = args.to_vec();
        all.extend(session.auth_args());
        Ok(self.endpoints.legacy_url(path, &all))
    }

    fn fetch_index_page(&mut self, mark: &str, since: Option<NaiveDate>) -> Result<IndexPage<NoteInfo>> {
        let page_size = PAGE_SIZE.to_string();
        let since = since.map(|day| day.format("%Y-%m-%d").to_string());
        let mut args = vec!["length", page_size.as_str()];
        if !mark.is_empty() {
            args.extend(["mark", mark]);
        }
        if let Some(since) = since.as_deref() {
            args.extend(["since", since]);
        }
        let url = self.url("/index", &args)?;

        let body = self.transport.get_with_retry(&url, &[])?;
        let response: LegacyIndexResponse = from_json(&body)?;
        let records = response
            .data
            .into_iter()
            .map(LegacyNote::into_info)
            .collect::<Result<Vec<_>>>()?;

        Ok(IndexPage {
            records,
            mark: response.mark,
            current: None,
            count: response.count,
        })
    }

    /// Stream index entries to `f` page by page; see [`index::traverse`].
    pub fn for_each_info<F>(&mut self, options: ListOptions, f: F) -> Result<usize>
    where
        F: FnMut(NoteInfo) -> Result<()>,
    {
        index::traverse(
            options.limit,
            |mark| self.fetch_index_page(mark, options.since),
            f,
        )
    }

    pub fn list_with_options(&mut self, options: ListOptions) -> Result<Vec<NoteInfo>> {
        index::collect(options.limit, |mark| {
            self.fetch_index_page(mark, options.since)
        })
    }

    /// At most `limit` index entries (all when `None`). Entries carry no content.
    pub fn list_with_limit(&mut self, limit: Option<usize>) -> Result<Vec<NoteInfo>> {
        self.list_with_options(ListOptions { limit, since: None })
    }

    /// Every note at its latest version, content included. Costs one request
    /// per note on top of the index.
    pub fn list(&mut self) -> Result<Vec<Note>> {
        let infos = self.list_with_limit(None)?;
        let mut notes = Vec::with_capacity(infos.len());
        for info in infos {
            notes.push(self.get_latest(&info.id)?);
        }
        Ok(notes)
    }

    pub fn get_note(&mut self, id: &str, version: u64) -> Result<Note> {
        self.fetch_note(&format!("/data/{}/{}", id, version))
    }

    pub fn get_latest(&mut self, id: &str) -> Result<Note> {
        self.fetch_note(&format!("/data/{}", id))
    }

    fn fetch_note(&mut self, path: &str) -> Result<Note> {
        let url = self.url(path, &[])?;
        let body = self.transport.get_with_retry(&url, &[])?;
        let record: LegacyNote = from_json(&body)?;
        record.into_note()
    }

    fn post(&mut self, path: &str, update: &NoteUpdate) -> Result<LegacyNote> {
        let url = self.url(path, &[])?;
        let body = self.transport.post(&url, &[], update.encode()?)?;
        from_json(&body)
    }

    /// Create a note. The server answers without the content, so the content we
    /// sent is put back into the returned note.
    pub fn add_note(&mut self, content: &str, tags: Option<&[String]>) -> Result<Note> {
        let update = NoteUpdate {
            content: Some(content),
            tags,
            ..Default::default()
        };
        let mut note = self.post("/data", &update)?.into_note()?;
        note.content = content.to_string();
        info!(id = %note.id, version = note.version, "note created");
        Ok(note)
    }

    pub fn update_content(&mut self, id: &str, content: &str) -> Result<Note> {
        let update = NoteUpdate {
            key: Some(id),
            content: Some(content),
            modifydate: Some(encode_legacy_date(Utc::now())),
            ..Default::default()
        };
        let record = self.post(&format!("/data/{}", id), &update)?;
        let sent_back = record.content.is_some();
        let mut note = record.into_note()?;
        if !sent_back {
            note.content = content.to_string();
        }
        debug!(id, version = note.version, "content updated");
        Ok(note)
    }

    /// Replace the tags. The returned note has content only if the server
    /// chose to send it.
    pub fn update_tags(&mut self, id: &str, tags: &[String]) -> Result<Note> {
        let update = NoteUpdate {
            key: Some(id),
            tags: Some(tags),
            modifydate: Some(encode_legacy_date(Utc::now())),
            ..Default::default()
        };
        let note = self.post(&format!("/data/{}", id), &update)?.into_note()?;
        debug!(id, version = note.version, "tags updated");
        Ok(note)
    }

    /// Move a note to the trash. A note that is already there is returned as is.
    pub fn trash_note(&mut self, id: &str) -> Result<Note> {
        self.set_deleted(id, true)
    }

    /// Take a note out of the trash. A note that is not trashed is returned as is.
    pub fn restore_note(&mut self, id: &str) -> Result<Note> {
        self.set_deleted(id, false)
    }

    fn set_deleted(&mut self, id: &str, deleted: bool) -> Result<Note> {
        let current = self.get_latest(id)?;
        if current.deleted == deleted {
            return Ok(current);
        }

        let update = NoteUpdate {
            key: Some(id),
            deleted: Some(u8::from(deleted)),
            ..Default::default()
        };
        let record = self.post(&format!("/data/{}", id), &update)?;
        let sent_back = record.content.is_some();
        let mut note = record.into_note()?;
        if !sent_back {
            note.content = current.content;
        }
        debug!(id, deleted, version = note.version, "trash state changed");
        Ok(note)
    }

    /// Delete a note for good. The server only deletes trashed notes, so the
    /// note is trashed first if needed.
    pub fn delete_note(&mut self, id: &str) -> Result<()> {
        self.trash_note(id)?;
        let url = self.url(&format!("/data/{}", id), &[])?;
        self.transport.delete_with_retry(&url, &[])?;
        info!(id, "note deleted");
        Ok(())
    }
}

impl NoteSource for LegacyClient {
    fn list(&mut self) -> Result<Vec<Note>> {
        LegacyClient::list(self)
    }

    fn get_note(&mut self, id: &str, version: u64) -> Result<Note> {
        LegacyClient::get_note(self, id, version)
    }
}

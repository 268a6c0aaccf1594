use tracing::debug;

use super::NoteSource;
use crate::config::{ClientConfig, Endpoints, PAGE_SIZE};
use crate::error::{from_json, Result};
use crate::index::{self, IndexPage};
use crate::models::Note;
use crate::session::{Credentials, SimperiumSession};
use crate::transport::Transport;
use crate::wire::non_empty;
use crate::wire::simperium::{to_note, BucketNote, IndexEntry, IndexResponse};

/// Client for the Simperium api (`api.simperium.com`), read only
#[derive(Debug)]
pub struct SimperiumClient {
    transport: Transport,
    endpoints: Endpoints,
    app_id: String,
    credentials: Credentials,
    session: Option<SimperiumSession>,
}

impl SimperiumClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Ok(SimperiumClient {
            transport: Transport::new(&config)?,
            endpoints: config.endpoints,
            app_id: config.app_id,
            credentials,
            session: None,
        })
    }

    /// Log in if that has not happened yet.
    pub fn session(&mut self) -> Result<&SimperiumSession> {
        let session = match self.session.take() {
            Some(session) => session,
            None => SimperiumSession::login(
                &self.transport,
                &self.endpoints,
                &self.app_id,
                &self.credentials,
            )?,
        };
        Ok(self.session.insert(session))
    }

    fn get(&mut self, url: &str) -> Result<Vec<u8>> {
        let session = self.session()?.clone();
        self.transport.get_with_retry(url, &[session.token_header()])
    }

    fn fetch_index_page(&mut self, mark: &str) -> Result<IndexPage<Note>> {
        let page_size = PAGE_SIZE.to_string();
        let mut args = vec!["limit", page_size.as_str(), "data", "1"];
        if !mark.is_empty() {
            args.extend(["mark", mark]);
        }
        let url = self.endpoints.bucket_url(&self.app_id, "/index", &args);

        let body = self.get(&url)?;
        let response: IndexResponse = from_json(&body)?;
        let records = response
            .index
            .into_iter()
            .map(IndexEntry::into_note)
            .collect::<Result<Vec<_>>>()?;

        Ok(IndexPage {
            records,
            mark: response.mark,
            current: non_empty(response.current),
            count: None,
        })
    }

    /// Stream notes to `f` page by page; see [`index::traverse`].
    pub fn for_each_note<F>(&mut self, limit: Option<usize>, f: F) -> Result<usize>
    where
        F: FnMut(Note) -> Result<()>,
    {
        index::traverse(limit, |mark| self.fetch_index_page(mark), f)
    }

    /// At most `limit` notes (all when `None`), fully populated.
    pub fn list_with_limit(&mut self, limit: Option<usize>) -> Result<Vec<Note>> {
        index::collect(limit, |mark| self.fetch_index_page(mark))
    }

    pub fn get_note(&mut self, id: &str, version: u64) -> Result<Note> {
        let url = self
            .endpoints
            .bucket_url(&self.app_id, &format!("/i/{}/v/{}", id, version), &[]);
        let body = self.get(&url)?;
        let data: BucketNote = from_json(&body)?;
        debug!(id, version, "fetched note");
        to_note(id, version, data)
    }
}

impl NoteSource for SimperiumClient {
    fn list(&mut self) -> Result<Vec<Note>> {
        self.list_with_limit(None)
    }

    fn get_note(&mut self, id: &str, version: u64) -> Result<Note> {
        SimperiumClient::get_note(self, id, version)
    }
}

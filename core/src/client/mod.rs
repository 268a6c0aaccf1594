//! Dialect-specific clients. Both own a [`Transport`](crate::transport::Transport)
//! and log in lazily on the first call, reusing the session afterwards.
//!
//! Clients are not meant to be shared between threads; every call takes
//! `&mut self`.

pub mod legacy;
pub mod simperium;

pub use legacy::{LegacyClient, ListOptions};
pub use simperium::SimperiumClient;

use crate::error::Result;
use crate::models::Note;

/// What the download front-ends need from a server.
pub trait NoteSource {
    /// Every note at its current version, in index order.
    fn list(&mut self) -> Result<Vec<Note>>;

    /// One specific version of a note.
    fn get_note(&mut self, id: &str, version: u64) -> Result<Note>;
}

impl<S: NoteSource + ?Sized> NoteSource for Box<S> {
    fn list(&mut self) -> Result<Vec<Note>> {
        (**self).list()
    }

    fn get_note(&mut self, id: &str, version: u64) -> Result<Note> {
        (**self).get_note(id, version)
    }
}

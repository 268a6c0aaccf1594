//! Walking a paginated index with opaque `mark` cursors.

use tracing::debug;

use crate::error::Result;

/// One decoded index page
#[derive(Debug, Clone, PartialEq)]
pub struct IndexPage<T> {
    pub records: Vec<T>,
    /// Cursor for the next page; empty when this was the last one
    pub mark: String,
    /// Simperium `current` change pointer, if the server sent one
    pub current: Option<String>,
    /// Legacy total count, if the server sent one
    pub count: Option<i64>,
}

impl<T> IndexPage<T> {
    pub fn new(records: Vec<T>, mark: impl Into<String>) -> Self {
        IndexPage {
            records,
            mark: mark.into(),
            current: None,
            count: None,
        }
    }

    pub fn is_last(&self) -> bool {
        self.mark.is_empty()
    }
}

/// `-1` (or any negative count) means no limit.
pub fn limit_from_count(n: i64) -> Option<usize> {
    usize::try_from(n).ok()
}

/// Request pages until the mark runs out or `limit` records were emitted.
///
/// `fetch_page` gets the mark to send ("" for the first page). Records are
/// handed to `emit` in page order, so a caller can keep what arrived before a
/// failure. Returns the number of emitted records.
pub fn traverse<T, F, E>(limit: Option<usize>, mut fetch_page: F, mut emit: E) -> Result<usize>
where
    F: FnMut(&str) -> Result<IndexPage<T>>,
    E: FnMut(T) -> Result<()>,
{
    let reached = |emitted: usize| limit.is_some_and(|max| emitted >= max);

    let mut mark = String::new();
    let mut emitted = 0;
    let mut pages = 0;

    while !reached(emitted) {
        let page = fetch_page(&mark)?;
        pages += 1;
        debug!(
            page = pages,
            records = page.records.len(),
            last = page.is_last(),
            current = page.current.as_deref(),
            count = page.count,
            "index page"
        );

        for record in page.records {
            if reached(emitted) {
                break;
            }
            emit(record)?;
            emitted += 1;
        }

        if page.mark.is_empty() {
            break;
        }
        mark = page.mark;
    }

    debug!(pages, emitted, "index traversal done");
    Ok(emitted)
}

/// [`traverse`] into a `Vec`. Nothing is returned if any page fails.
pub fn collect<T, F>(limit: Option<usize>, fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(&str) -> Result<IndexPage<T>>,
{
    let mut records = Vec::new();
    traverse(limit, fetch_page, |record| {
        records.push(record);
        Ok(())
    })?;
    Ok(records)
}

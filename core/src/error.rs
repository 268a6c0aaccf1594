use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response (connect, TLS, timeout, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response arrived but its status was not 200.
    #[error("status code {code} (not 200) for {url}")]
    HttpStatus { code: u16, url: String },

    /// The login endpoint answered with something that is not a usable token.
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn decode(msg: impl Into<String>) -> Self {
        Error::Decode(msg.into())
    }

    /// True for every failure to interpret a server payload.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_) | Error::Json(_))
    }

    /// HTTP status code, if this is a status error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Parse a JSON payload, rejecting an empty body up front.
pub(crate) fn from_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::decode("empty response body"));
    }
    Ok(serde_json::from_slice(body)?)
}

use std::borrow::Cow;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Target that carries raw url/body traces. Subscribe to it to get a wire log.
pub const WIRE_TARGET: &str = "simplenote::wire";

pub type Headers<'a> = &'a [(&'a str, &'a str)];

/// Blocking one-shot HTTP calls. Every body is read to the end before returning
/// and anything but a 200 is an error.
#[derive(Debug, Clone)]
pub struct Transport {
    http: Client,
    retry_delay: Duration,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            retry_delay: config.retry_delay,
        })
    }

    pub fn get(&self, url: &str, headers: Headers) -> Result<Vec<u8>> {
        let (status, body) = self.execute(Method::GET, url, headers, None)?;
        ensure_ok(status, url)?;
        Ok(body)
    }

    /// GET that waits `retry_delay` and tries once more if the first answer was a 500.
    pub fn get_with_retry(&self, url: &str, headers: Headers) -> Result<Vec<u8>> {
        self.with_retry(Method::GET, url, headers)
    }

    /// POST `body` verbatim. No content type is added; pass one in `headers` if needed.
    pub fn post(&self, url: &str, headers: Headers, body: String) -> Result<Vec<u8>> {
        let (status, response) = self.execute(Method::POST, url, headers, Some(body))?;
        ensure_ok(status, url)?;
        Ok(response)
    }

    pub fn delete(&self, url: &str, headers: Headers) -> Result<()> {
        let (status, _) = self.execute(Method::DELETE, url, headers, None)?;
        ensure_ok(status, url)
    }

    pub fn delete_with_retry(&self, url: &str, headers: Headers) -> Result<()> {
        self.with_retry(Method::DELETE, url, headers).map(|_| ())
    }

    fn with_retry(&self, method: Method, url: &str, headers: Headers) -> Result<Vec<u8>> {
        let (mut status, mut body) = self.execute(method.clone(), url, headers, None)?;
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            debug!(
                %method,
                url = %redact_url(url),
                delay = ?self.retry_delay,
                "server returned 500, retrying once"
            );
            thread::sleep(self.retry_delay);
            (status, body) = self.execute(method, url, headers, None)?;
        }
        ensure_ok(status, url)?;
        Ok(body)
    }

    fn execute(
        &self,
        method: Method,
        url: &str,
        headers: Headers,
        body: Option<String>,
    ) -> Result<(StatusCode, Vec<u8>)> {
        debug!(%method, url = %redact_url(url), "request");

        let mut request = self.http.request(method.clone(), url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send()?;
        let status = response.status();
        // bytes() consumes the response, so the connection is released on every path
        let bytes = response.bytes()?.to_vec();

        trace!(
            target: WIRE_TARGET,
            "{} {} -> {}\n{}\n",
            method,
            redact_url(url),
            status.as_u16(),
            String::from_utf8_lossy(&bytes)
        );

        Ok((status, bytes))
    }
}

fn ensure_ok(status: StatusCode, url: &str) -> Result<()> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(Error::HttpStatus {
            code: status.as_u16(),
            url: url.to_string(),
        })
    }
}

/// `url` with the legacy session token (`auth=`) masked, for logging.
pub(crate) fn redact_url(url: &str) -> Cow<'_, str> {
    let Some((base, query)) = url.split_once('?') else {
        return Cow::Borrowed(url);
    };
    if !query.split('&').any(|pair| pair.starts_with("auth=")) {
        return Cow::Borrowed(url);
    }

    let query: Vec<&str> = query
        .split('&')
        .map(|pair| if pair.starts_with("auth=") { "auth=***" } else { pair })
        .collect();
    Cow::Owned(format!("{}?{}", base, query.join("&")))
}

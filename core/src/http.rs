//! HTTP wire types and the transport seam.
//!
//! # Design
//! The client describes an outgoing request as plain data (`HttpRequest`)
//! and interprets the transport's reply as plain data (`HttpResponse`).
//! The actual network exchange is behind the [`Transport`] trait, so the
//! pipeline stays deterministic and testable: unit tests supply a canned
//! transport, integration tests plug in a real HTTP agent.
//!
//! A response body is consumable exactly once. `HttpResponse::take_body`
//! hands out the raw body and leaves `None` behind, mirroring a network
//! stream that cannot be re-read.

use std::fmt;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Trace,
    Options,
    Connect,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered header mapping with case-insensitive names.
///
/// Insertion order is preserved. Re-inserting an existing name replaces the
/// value in place, keeping the original position, so merged header sets stay
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any existing value under the same name
    /// (compared case-insensitively).
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Overlay `other` on top of `self`; `other` wins on name collision.
    pub fn merge(&mut self, other: &Headers) {
        for (name, value) in &other.entries {
            self.insert(name.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// How the transport should treat cross-origin requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Cors,
    NoCors,
    SameOrigin,
}

/// How the transport should treat redirect responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    Follow,
    Error,
    Manual,
}

/// The outgoing message handed to the transport.
///
/// Built exactly once per call by the client and consumed exactly once by
/// [`Transport::fetch`]. The optional `signal` is a one-shot cancellation
/// channel the transport must honor by failing with
/// [`TransportError::Aborted`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
    pub mode: RequestMode,
    pub redirect: RedirectPolicy,
    pub signal: Option<CancellationToken>,
}

/// The transport's reply.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub url: String,
    pub headers: Headers,
    body: Option<String>,
}

impl HttpResponse {
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        url: impl Into<String>,
        headers: Headers,
        body: Option<String>,
    ) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            url: url.into(),
            headers,
            body,
        }
    }

    /// Whether the status indicates success (2xx or 3xx).
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }

    /// Consume the body. Returns `None` if it was already taken.
    pub fn take_body(&mut self) -> Option<String> {
        self.body.take()
    }
}

/// The external component performing the actual network exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the request and return the reply.
    ///
    /// Cancellation via the request's `signal` must surface as
    /// [`TransportError::Aborted`], never as a fabricated response.
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_case_insensitively_in_place() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("Accept", "application/json");
        headers.insert("content-type", "application/json;charset=utf-8");

        assert_eq!(headers.len(), 2);
        assert_eq!(
            headers.get("CONTENT-TYPE"),
            Some("application/json;charset=utf-8")
        );
        // The replaced entry keeps its original position.
        let first = headers.iter().next().unwrap();
        assert_eq!(first.0, "Content-Type");
    }

    #[test]
    fn merge_lets_other_win_on_collision() {
        let mut base: Headers = [("X-Base", "1"), ("Shared", "base")].into_iter().collect();
        let overlay: Headers = [("Shared", "overlay"), ("X-New", "2")].into_iter().collect();
        base.merge(&overlay);

        assert_eq!(base.get("Shared"), Some("overlay"));
        assert_eq!(base.get("X-Base"), Some("1"));
        assert_eq!(base.get("X-New"), Some("2"));
    }

    #[test]
    fn success_covers_2xx_and_3xx() {
        for status in [200, 204, 301, 399] {
            let res = HttpResponse::new(status, "OK", "http://x/", Headers::new(), None);
            assert!(res.is_success(), "{status} should be success");
        }
        for status in [199, 400, 404, 500] {
            let res = HttpResponse::new(status, "NO", "http://x/", Headers::new(), None);
            assert!(!res.is_success(), "{status} should not be success");
        }
    }

    #[test]
    fn body_is_consumable_once() {
        let mut res =
            HttpResponse::new(200, "OK", "http://x/", Headers::new(), Some("{}".into()));
        assert_eq!(res.take_body().as_deref(), Some("{}"));
        assert!(res.take_body().is_none());
    }
}

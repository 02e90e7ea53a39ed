//! Error types for the client pipeline.
//!
//! # Design
//! `Http` gets a dedicated payload type because callers frequently inspect
//! the failed response (status, headers, body) from an error listener or a
//! surrounding retry wrapper. Transport problems, decode problems, and
//! listener problems are kept as separate variants: only `Http` is ever
//! subject to suppression through the error hook, the rest always propagate.

use std::fmt;
use std::time::SystemTime;

use serde::de::DeserializeOwned;

use crate::http::HttpResponse;

/// Failure of the underlying network exchange. Never suppressible.
#[derive(Debug)]
pub enum TransportError {
    /// The request's cancellation signal fired before completion.
    Aborted,

    /// The exchange could not complete (connection, DNS, protocol).
    Network(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Aborted => write!(f, "request aborted"),
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// A response was received but its status indicates failure.
///
/// Constructed only from a non-success [`HttpResponse`]. Keeps the original
/// response so the body and headers stay inspectable after the throw.
#[derive(Debug)]
pub struct HttpError {
    /// Status code of the failed response.
    pub code: u16,

    pub status_text: String,

    pub url: String,

    /// Construction time of this error.
    pub date: SystemTime,

    /// The original response, for header and status inspection.
    pub response: HttpResponse,
}

impl HttpError {
    pub fn new(response: HttpResponse) -> Self {
        Self {
            code: response.status,
            status_text: response.status_text.clone(),
            url: response.url.clone(),
            date: SystemTime::now(),
            response,
        }
    }

    /// Lazily decode the failed response's JSON body.
    ///
    /// The body is consumable once; a second call fails with
    /// [`Error::BodyConsumed`].
    pub fn decode_body<T: DeserializeOwned>(&mut self) -> Result<T, Error> {
        let raw = self.response.take_body().ok_or(Error::BodyConsumed)?;
        serde_json::from_str(&raw).map_err(|e| Error::Decode(e.to_string()))
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.status_text, self.url)
    }
}

impl std::error::Error for HttpError {}

/// Errors surfaced by [`HttpClient`](crate::HttpClient) calls.
#[derive(Debug)]
pub enum Error {
    /// The transport could not complete the exchange.
    Transport(TransportError),

    /// The server replied with a non-success status and no listener
    /// suppressed the throw.
    Http(HttpError),

    /// The response body could not be parsed as the expected type.
    Decode(String),

    /// An event listener failed; the call was aborted at that point.
    Listener(String),

    /// The structured request body could not be serialized to JSON.
    Serialize(String),

    /// The response body was already consumed.
    BodyConsumed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "transport failed: {e}"),
            Error::Http(e) => write!(f, "{e}"),
            Error::Decode(msg) => write!(f, "decoding failed: {msg}"),
            Error::Listener(msg) => write!(f, "listener failed: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization failed: {msg}"),
            Error::BodyConsumed => write!(f, "body already consumed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(e) => Some(e),
            Error::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

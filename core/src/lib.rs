//! HTTP client library with a lifecycle of named extension points.
//!
//! # Overview
//! Wraps a caller-supplied [`Transport`] with a request construction →
//! dispatch → validation pipeline. Registered listeners observe every call
//! through four lifecycle events and, on a failed response, may veto the
//! error via a shared [`ThrowDecision`] so the call completes as if
//! successful.
//!
//! # Design
//! - `HttpClient` owns only a base URL, default headers, and the listener
//!   table; each call's request, response, and decision are call-local.
//! - The network exchange lives behind the [`Transport`] trait; unit tests
//!   run against canned transports, integration tests against a real agent.
//! - Connection pooling, retries, caching, and auth are out of scope here —
//!   callers layer them on through the event hooks.

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod url;

pub use cancel::{AbortController, AbortToken};
pub use client::HttpClient;
pub use config::{RequestConfig, RequestOptions};
pub use error::{Error, HttpError, TransportError};
pub use events::{
    EventEmitter, EventListener, EventPayload, FnListener, HttpClientEvent, ListenerError,
    ThrowDecision,
};
pub use http::{
    Headers, HttpMethod, HttpRequest, HttpResponse, RedirectPolicy, RequestMode, Transport,
};
pub use url::{build_url, Params};

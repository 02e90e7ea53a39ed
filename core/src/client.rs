//! The request pipeline.
//!
//! # Design
//! Each verb method runs one sequential chain: merge config → build the
//! request (URL, header merge, signal) → `RequestCreate` → transport fetch →
//! `ResponseFetched` → status validation with the `ResponseError` veto →
//! `ResponseCreate` → JSON body decode. Nothing is caught or retried inside
//! the pipeline; every failure kind propagates to the caller as an
//! [`Error`] variant.
//!
//! The client carries no per-call state. Concurrent calls on one instance
//! each own their request, response, and throw decision; the only shared
//! pieces are the read-mostly default headers and the listener table.

use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::{RequestConfig, RequestOptions};
use crate::error::{Error, HttpError};
use crate::events::{EventEmitter, EventListener, EventPayload, HttpClientEvent, ThrowDecision};
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::url::{build_url, Params};

/// HTTP client with named lifecycle extension points.
pub struct HttpClient {
    base_url: String,
    default_headers: RwLock<Headers>,
    transport: Arc<dyn Transport>,
    emitter: EventEmitter,
}

impl HttpClient {
    /// Build a client over the given transport. Both `base_url` and
    /// `default_headers` may be empty.
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        default_headers: Headers,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: RwLock::new(default_headers),
            transport,
            emitter: EventEmitter::new(),
        }
    }

    /// Register a lifecycle listener. Listeners for the same event run in
    /// registration order.
    pub fn on(&self, event: HttpClientEvent, listener: Arc<dyn EventListener>) {
        self.emitter.register(event, listener);
    }

    /// Set a header merged into every outgoing request. Call-site headers
    /// win on collision. Mutation is caller-serialized.
    pub fn set_default_header(&self, name: impl Into<String>, value: impl Into<String>) {
        self.default_headers
            .write()
            .expect("default header table poisoned")
            .insert(name, value);
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<Params>,
        config: Option<RequestConfig>,
        options: Option<RequestOptions>,
    ) -> Result<T, Error> {
        let mut base = RequestConfig::defaults();
        base.params = params;
        let config = config.unwrap_or_default().merge_over(base);

        let request = self.create_request(HttpMethod::Get, path, &config, options).await?;
        self.create_response(request, &config).await
    }

    pub async fn post<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
        options: Option<RequestOptions>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(HttpMethod::Post, path, body, config, options).await
    }

    pub async fn put<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
        options: Option<RequestOptions>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(HttpMethod::Put, path, body, config, options).await
    }

    pub async fn patch<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
        options: Option<RequestOptions>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(HttpMethod::Patch, path, body, config, options).await
    }

    /// DELETE takes query parameters only; there is no structured-body
    /// convenience and no per-call config.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<Params>,
        options: Option<RequestOptions>,
    ) -> Result<T, Error> {
        let mut config = RequestConfig::defaults();
        config.params = params;

        let request = self.create_request(HttpMethod::Delete, path, &config, options).await?;
        self.create_response(request, &config).await
    }

    /// Shared POST/PUT/PATCH path: a structured body is JSON-encoded only
    /// when the config does not already carry an explicit raw body.
    async fn send_json<T, B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        config: Option<RequestConfig>,
        options: Option<RequestOptions>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut config = config.unwrap_or_default().merge_over(RequestConfig::defaults());
        if config.body.is_none() {
            if let Some(body) = body {
                config.body =
                    Some(serde_json::to_string(body).map_err(|e| Error::Serialize(e.to_string()))?);
            }
        }

        let request = self.create_request(method, path, &config, options).await?;
        self.create_response(request, &config).await
    }

    /// Assemble the request descriptor and emit `RequestCreate`.
    ///
    /// Header precedence: client default headers, then option headers, then
    /// the forced JSON content type whenever a body is present. Supplied
    /// options replace the default option set wholesale.
    async fn create_request(
        &self,
        method: HttpMethod,
        path: &str,
        config: &RequestConfig,
        options: Option<RequestOptions>,
    ) -> Result<HttpRequest, Error> {
        let options = options.unwrap_or_default();

        let mut headers = self
            .default_headers
            .read()
            .expect("default header table poisoned")
            .clone();
        headers.merge(&options.headers);

        let url = build_url(&self.base_url, path, config.params.as_ref());
        let signal = config.abort_token.as_ref().map(|token| token.get_signal());

        let mut request = HttpRequest {
            method,
            url,
            headers,
            body: config.body.clone(),
            mode: options.mode,
            redirect: options.redirect,
            signal,
        };

        if request.body.is_some() {
            request
                .headers
                .insert("Content-Type", "application/json;charset=utf-8");
        }

        debug!(method = %request.method, url = %request.url, "request created");

        if config.events_enabled() {
            self.emitter
                .dispatch(HttpClientEvent::RequestCreate, EventPayload::Request(&request))
                .await?;
        }

        Ok(request)
    }

    /// Fetch, validate, and decode. The transport call is the single
    /// network-bound suspension point; the attached signal may interrupt it.
    async fn create_response<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
        config: &RequestConfig,
    ) -> Result<T, Error> {
        let events = config.events_enabled();

        let response = self
            .transport
            .fetch(request.clone())
            .await
            .map_err(Error::Transport)?;

        debug!(status = response.status, url = %response.url, "response fetched");

        if events {
            self.emitter
                .dispatch(HttpClientEvent::ResponseFetched, EventPayload::Request(&request))
                .await?;
        }

        let mut response = self.check_response(response, events).await?;

        if events {
            self.emitter
                .dispatch(HttpClientEvent::ResponseCreate, EventPayload::Request(&request))
                .await?;
        }

        let raw = response.take_body().ok_or(Error::BodyConsumed)?;
        serde_json::from_str(&raw).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Status validation with the veto protocol.
    ///
    /// On a non-success status with events enabled, `ResponseError`
    /// listeners share one [`ThrowDecision`]; the value left after the last
    /// listener decides between raising and continuing. Without events there
    /// is no suppression path.
    async fn check_response(
        &self,
        response: HttpResponse,
        events: bool,
    ) -> Result<HttpResponse, Error> {
        if response.is_success() {
            return Ok(response);
        }

        let mut should_throw = true;
        if events {
            let decision = ThrowDecision::new();
            self.emitter
                .dispatch(
                    HttpClientEvent::ResponseError,
                    EventPayload::ResponseError(&response, &decision),
                )
                .await?;
            should_throw = decision.should_throw();
        }

        if should_throw {
            debug!(status = response.status, url = %response.url, "raising http failure");
            return Err(Error::Http(HttpError::new(response)));
        }

        debug!(status = response.status, "failure suppressed by listener");
        Ok(response)
    }
}

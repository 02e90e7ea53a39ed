//! Lifecycle event substrate.
//!
//! # Design
//! The emitter is a plain name → listener-list table. Dispatch awaits every
//! listener for the event one at a time, in registration order; a listener
//! error stops the chain and aborts the surrounding call. Listener ordering
//! is a contract here, not incidental behavior.
//!
//! Payload shapes differ by event on purpose: the three observation events
//! carry the request descriptor, while `ResponseError` carries the failed
//! response together with a shared [`ThrowDecision`]. That decision record is
//! the single place where a listener can influence control flow.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse};

/// The four lifecycle extension points of a client call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpClientEvent {
    RequestCreate,
    ResponseFetched,
    ResponseCreate,
    ResponseError,
}

/// Mutable throw/suppress decision shared with `ResponseError` listeners.
///
/// Starts as "throw". Listeners run sequentially and may overwrite the
/// decision; the value left after the last listener wins.
#[derive(Debug)]
pub struct ThrowDecision {
    throw: AtomicBool,
}

impl ThrowDecision {
    pub fn new() -> Self {
        Self {
            throw: AtomicBool::new(true),
        }
    }

    pub fn set_throw(&self, throw: bool) {
        self.throw.store(throw, Ordering::SeqCst);
    }

    /// Shorthand for `set_throw(false)`.
    pub fn suppress(&self) {
        self.set_throw(false);
    }

    pub fn should_throw(&self) -> bool {
        self.throw.load(Ordering::SeqCst)
    }
}

impl Default for ThrowDecision {
    fn default() -> Self {
        Self::new()
    }
}

/// Event payload handed to listeners.
#[derive(Clone, Copy)]
pub enum EventPayload<'a> {
    /// `RequestCreate`, `ResponseFetched`, `ResponseCreate`.
    Request(&'a HttpRequest),

    /// `ResponseError`: the failed response and the shared veto record.
    ResponseError(&'a HttpResponse, &'a ThrowDecision),
}

/// Error type listeners may fail with.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// A registered lifecycle listener. May suspend.
#[async_trait]
pub trait EventListener: Send + Sync {
    async fn handle(&self, payload: EventPayload<'_>) -> Result<(), ListenerError>;
}

/// Adapter turning a synchronous closure into an [`EventListener`].
pub struct FnListener<F>(pub F);

#[async_trait]
impl<F> EventListener for FnListener<F>
where
    F: Fn(EventPayload<'_>) + Send + Sync,
{
    async fn handle(&self, payload: EventPayload<'_>) -> Result<(), ListenerError> {
        (self.0)(payload);
        Ok(())
    }
}

/// Named-event registration with sequential async dispatch.
#[derive(Default)]
pub struct EventEmitter {
    listeners: RwLock<HashMap<HttpClientEvent, Vec<Arc<dyn EventListener>>>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener for `event`. Listeners run in registration order.
    pub fn register(&self, event: HttpClientEvent, listener: Arc<dyn EventListener>) {
        self.listeners
            .write()
            .expect("listener table poisoned")
            .entry(event)
            .or_default()
            .push(listener);
    }

    /// Await every listener registered for `event`, one at a time.
    ///
    /// The first listener error stops the chain and surfaces as
    /// [`Error::Listener`].
    pub async fn dispatch(
        &self,
        event: HttpClientEvent,
        payload: EventPayload<'_>,
    ) -> Result<(), Error> {
        // Snapshot outside the await points; registrations made during a
        // dispatch affect later calls only.
        let listeners: Vec<Arc<dyn EventListener>> = self
            .listeners
            .read()
            .expect("listener table poisoned")
            .get(&event)
            .cloned()
            .unwrap_or_default();

        for listener in listeners {
            listener
                .handle(payload)
                .await
                .map_err(|e| Error::Listener(e.to_string()))?;
        }
        Ok(())
    }
}

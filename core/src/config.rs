//! Per-call configuration and transport options.
//!
//! # Design
//! `RequestConfig` fields are all optional so an explicit default-config
//! value can be merged with caller overrides at call entry (caller wins
//! field by field). An empty config is therefore identical to no config,
//! and concurrent clients with different defaults never share state.
//!
//! `RequestOptions` are taken as given when supplied: the caller's options
//! replace the default set wholesale instead of being merged into it. Only
//! headers escape that rule, because they independently receive the client
//! default-header merge during request construction.

use std::sync::Arc;

use crate::cancel::AbortToken;
use crate::http::{Headers, RedirectPolicy, RequestMode};
use crate::url::Params;

/// Per-call options, immutable once merged.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, in iteration order.
    pub params: Option<Params>,

    /// Explicit raw body. When set, verb methods never auto-serialize a
    /// structured body over it.
    pub body: Option<String>,

    /// Whether lifecycle events fire for this call. Defaults to `true`.
    pub with_events: Option<bool>,

    /// Source of the per-request cancellation signal.
    pub abort_token: Option<Arc<AbortToken>>,
}

impl RequestConfig {
    /// The process-wide baseline merged under every call's config.
    pub fn defaults() -> Self {
        Self {
            with_events: Some(true),
            ..Self::default()
        }
    }

    /// Field-wise overlay: `self` wins wherever it sets a value, `base`
    /// fills the gaps.
    pub fn merge_over(self, base: Self) -> Self {
        Self {
            params: self.params.or(base.params),
            body: self.body.or(base.body),
            with_events: self.with_events.or(base.with_events),
            abort_token: self.abort_token.or(base.abort_token),
        }
    }

    /// Resolved event switch.
    pub fn events_enabled(&self) -> bool {
        self.with_events.unwrap_or(true)
    }
}

/// Raw transport options for a single request.
///
/// Supplying a value replaces the default set entirely; see the module docs
/// for the header exception.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub mode: RequestMode,
    pub redirect: RedirectPolicy,
    pub headers: Headers,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            mode: RequestMode::Cors,
            redirect: RedirectPolicy::Follow,
            headers: Headers::new(),
        }
    }
}

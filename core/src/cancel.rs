//! Request cancellation.
//!
//! # Design
//! An [`AbortToken`] holds only a setup closure. Every [`AbortToken::get_signal`]
//! call mints a fresh [`CancellationToken`] pair: the controller half goes to
//! the setup closure (which may arm a timer or stash it for a UI handler), the
//! signal half is attached to the outgoing request. Signals from separate
//! calls are fully independent, so one token can serve many requests.

use std::fmt;

use tokio_util::sync::CancellationToken;

/// Handle that triggers cancellation of a single request.
#[derive(Debug, Clone)]
pub struct AbortController {
    token: CancellationToken,
}

impl AbortController {
    /// Fire the cancellation signal. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Reusable factory for per-request cancellation signals.
pub struct AbortToken {
    setup: Box<dyn Fn(AbortController) + Send + Sync>,
}

impl AbortToken {
    /// Wrap a setup closure that receives the controller for each new signal.
    pub fn new(setup: impl Fn(AbortController) + Send + Sync + 'static) -> Self {
        Self {
            setup: Box::new(setup),
        }
    }

    /// Create a fresh controller/signal pair, hand the controller to the
    /// setup closure, and return the signal.
    pub fn get_signal(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let signal = token.clone();
        (self.setup)(AbortController { token });
        signal
    }
}

impl fmt::Debug for AbortToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortToken").finish_non_exhaustive()
    }
}

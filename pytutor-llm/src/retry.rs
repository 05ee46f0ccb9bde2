//! Retry controller — fixed-delay retries with cancellation.
//!
//! Every generation call goes through [`with_retry`]:
//! - the whole operation (prompt building included) is re-run on failure
//! - network errors and parse errors are treated the same
//! - the delay between attempts is fixed, never exponential
//! - a [`CancelScope`] tied to the owning surface stops pending retries
//!
//! ```text
//!            failure, attempt < bound          delay elapsed
//!  Pending ───────────────────────────▶ Retrying ─────────────▶ Pending (attempt + 1)
//!     │ success                            │ cancelled
//!     ▼                                    ▼
//!  Succeeded          failure,           Cancelled
//!                     attempt >= bound ─▶ Failed
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pytutor_core::config::RetryConfig;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::error::RetryError;

// ---------------------------------------------------------------------------
// Policy & state
// ---------------------------------------------------------------------------

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Re-attempts after the first failure.
    pub max_retries: u32,
    /// Fixed wait between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, config.delay())
    }
}

/// Where a retried request currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPhase {
    /// An attempt is about to run or running.
    Pending,
    /// The last attempt failed; waiting for the delay to elapse.
    Retrying,
    /// An attempt succeeded.
    Succeeded,
    /// The bound was reached.
    Failed,
}

/// Per-request retry bookkeeping. Created for each logical request and
/// dropped once it succeeds or fails for good.
#[derive(Debug, Clone)]
pub struct RetryState {
    attempt: u32,
    bound: u32,
    delay: Duration,
    phase: RetryPhase,
}

impl RetryState {
    #[must_use]
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempt: 0,
            bound: policy.max_retries,
            delay: policy.delay,
            phase: RetryPhase::Pending,
        }
    }

    /// 0 for the first try, 1 for the first retry, and so on.
    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    #[must_use]
    pub fn bound(&self) -> u32 {
        self.bound
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn phase(&self) -> RetryPhase {
        self.phase
    }

    /// Invocations started so far, counting the current one.
    #[must_use]
    pub fn invocations(&self) -> u32 {
        self.attempt + 1
    }

    /// Record a failed attempt. Returns `Retrying` while retries remain,
    /// `Failed` once the bound is reached.
    pub fn record_failure(&mut self) -> RetryPhase {
        self.phase = if self.attempt < self.bound {
            RetryPhase::Retrying
        } else {
            RetryPhase::Failed
        };
        self.phase
    }

    pub fn record_success(&mut self) {
        self.phase = RetryPhase::Succeeded;
    }

    /// Leave `Retrying` once the delay has elapsed.
    pub fn resume(&mut self) {
        if self.phase == RetryPhase::Retrying {
            self.attempt += 1;
            self.phase = RetryPhase::Pending;
        }
    }
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Owner side of a cancellation scope. Cancels every token on
/// [`cancel`](Self::cancel) or when dropped.
#[derive(Debug)]
pub struct CancelScope {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelScope {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// A token observing this scope.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: Some(self.tx.subscribe()),
        }
    }

    /// A clonable handle that can cancel this scope from another task.
    #[must_use]
    pub fn handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.tx),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Re-arm the scope for the next request. Handles stay valid.
    pub fn reset(&self) {
        self.tx.send_replace(false);
    }
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CancelScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Clonable remote control for a [`CancelScope`].
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Observer side of a [`CancelScope`].
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelToken {
    /// A token that is never cancelled.
    #[must_use]
    pub fn never() -> Self {
        Self { rx: None }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once the scope is cancelled or gone.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Run `op` until it succeeds, the retry bound is reached, or `cancel` fires.
///
/// `op` receives the 0-based attempt number and is invoked at most
/// `policy.max_retries + 1` times.
///
/// # Errors
/// [`RetryError::Exhausted`] with the last failure's message once every
/// attempt failed, or [`RetryError::Cancelled`] if the scope was cancelled
/// while an attempt or a delay was pending.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancelToken,
    mut op: F,
) -> Result<T, RetryError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut state = RetryState::new(policy);

    loop {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled {
                attempts: state.attempt(),
            });
        }

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(RetryError::Cancelled { attempts: state.invocations() });
            }
            outcome = op(state.attempt()) => outcome,
        };

        match outcome {
            Ok(value) => {
                state.record_success();
                if state.attempt() > 0 {
                    debug!(attempts = state.invocations(), "succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) => {
                let last_error = e.to_string();
                warn!(
                    "Attempt {}/{} failed: {}",
                    state.invocations(),
                    state.bound() + 1,
                    last_error
                );

                if state.record_failure() == RetryPhase::Failed {
                    error!(attempts = state.invocations(), "giving up: {}", last_error);
                    return Err(RetryError::Exhausted {
                        attempts: state.invocations(),
                        last_error,
                    });
                }

                debug!("Retrying in {}ms", state.delay().as_millis());
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        debug!("retry cancelled");
                        return Err(RetryError::Cancelled { attempts: state.invocations() });
                    }
                    () = tokio::time::sleep(state.delay()) => {}
                }
                state.resume();
            }
        }
    }
}

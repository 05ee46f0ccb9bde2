//! Routes Ctrl-C to whichever request is pending.
//!
//! The binary listens for the signal once for the whole process. While a
//! request runs through [`Interrupt::run`] the signal cancels it; otherwise
//! [`Interrupt::interrupt`] reports that nothing was pending and the caller
//! exits.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use pytutor_llm::CancelHandle;
use tracing::debug;

/// Shared slot holding the cancel handle of the pending request.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    pending: Arc<Mutex<Option<CancelHandle>>>,
}

impl Interrupt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive `fut` with `handle` registered as the pending request.
    pub async fn run<F: Future>(&self, handle: CancelHandle, fut: F) -> F::Output {
        *self.pending.lock() = Some(handle);
        let output = fut.await;
        self.pending.lock().take();
        output
    }

    /// Cancel the pending request. Returns `false` if there was none.
    pub fn interrupt(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) => {
                debug!("interrupt cancels pending request");
                handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether a request is registered right now.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pytutor_core::Persona;
    use pytutor_llm::{RetryPolicy, ScriptedGenerator};

    use super::*;
    use crate::surface::SurfaceError;
    use crate::tutor::TutorView;

    #[test]
    fn nothing_pending_means_exit() {
        let interrupt = Interrupt::new();
        assert!(!interrupt.is_pending());
        assert!(!interrupt.interrupt());
    }

    #[tokio::test(start_paused = true)]
    async fn every_request_can_be_interrupted_and_idle_falls_through() {
        let generator = Arc::new(ScriptedGenerator::new().with_latency(Duration::from_secs(5)));
        let mut view = TutorView::new(
            Arc::clone(&generator),
            RetryPolicy::new(100, Duration::from_secs(1)),
            Persona::Standard,
            "beginner",
        );
        let interrupt = Interrupt::new();

        for round in 1..=2 {
            let signal = interrupt.clone();
            let ctrl_c = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                signal.interrupt()
            });

            let handle = view.cancel_handle();
            let result = interrupt.run(handle, view.send("slow question")).await;
            assert_eq!(result.err(), Some(SurfaceError::Cancelled));
            assert!(ctrl_c.await.expect("signal task"), "request was pending");
            assert_eq!(generator.calls(), round);

            // Back at the prompt: the next Ctrl-C has nothing to cancel.
            assert!(!interrupt.is_pending());
            assert!(!interrupt.interrupt());
        }
    }
}

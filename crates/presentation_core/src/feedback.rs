//! Flags that switch on and clear themselves after a fixed duration.

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{task::JoinHandle, time::Instant};
use tracing::debug;

pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(2000);
pub const SUCCESS_BANNER_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackDurations {
    pub copy: Duration,
    pub success_banner: Duration,
}

impl Default for FeedbackDurations {
    fn default() -> Self {
        Self {
            copy: COPY_FEEDBACK_DURATION,
            success_banner: SUCCESS_BANNER_DURATION,
        }
    }
}

#[derive(Default)]
struct FeedbackState {
    active: bool,
    armed_at: Option<Instant>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// A flag that is set by [`EphemeralFeedback::arm`] and cleared by a single
/// timer. Arming again while active restarts the timer.
///
/// Must be armed from within a tokio runtime.
#[derive(Clone, Default)]
pub struct EphemeralFeedback {
    label: &'static str,
    inner: Arc<Mutex<FeedbackState>>,
}

fn lock(inner: &Mutex<FeedbackState>) -> MutexGuard<'_, FeedbackState> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EphemeralFeedback {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            inner: Arc::default(),
        }
    }

    pub fn arm(&self, duration: Duration) {
        self.arm_then(duration, async {});
    }

    /// Arms the flag and runs `on_clear` right after the timer clears it.
    /// A superseded timer never runs its follow-up.
    pub fn arm_then<F>(&self, duration: Duration, on_clear: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut state = lock(&self.inner);
        if let Some(previous) = state.timer.take() {
            previous.abort();
        }
        state.generation = state.generation.wrapping_add(1);
        state.active = true;
        state.armed_at = Some(Instant::now());

        let generation = state.generation;
        let inner = Arc::clone(&self.inner);
        let label = self.label;
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let cleared = {
                let mut state = lock(&inner);
                // A re-arm may have landed after this timer woke up.
                if state.generation == generation {
                    state.active = false;
                    state.timer = None;
                    true
                } else {
                    false
                }
            };
            if cleared {
                debug!(feedback = label, "feedback cleared");
                on_clear.await;
            }
        }));
        debug!(feedback = label, ?duration, generation, "feedback armed");
    }

    /// Clears immediately and cancels the pending timer along with its follow-up.
    pub fn disarm(&self) {
        let mut state = lock(&self.inner);
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation = state.generation.wrapping_add(1);
        state.active = false;
    }

    pub fn is_active(&self) -> bool {
        lock(&self.inner).active
    }

    pub fn armed_at(&self) -> Option<Instant> {
        lock(&self.inner).armed_at
    }
}

#[cfg(test)]
#[path = "tests/feedback_tests.rs"]
mod tests;

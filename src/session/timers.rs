//! Explicit, message-driven timers for the session loop.
//!
//! Per the concurrency redesign note, suspension is modeled as a single
//! `tokio::select!` loop rather than coroutine-based suspension: every timer
//! here is a `tokio::time::Sleep`/`Interval` future polled alongside the
//! inbound channels, not a background thread.

use std::time::Duration;

use tokio::time::{Instant, Sleep};

pub const SILENCE_WATCHDOG_TICK: Duration = Duration::from_millis(200);
pub const SILENCE_THRESHOLD: Duration = Duration::from_millis(1500);
pub const END_OF_CONVERSATION_SILENCE: Duration = Duration::from_millis(3000);
pub const EDIT_FOLLOW_UP_TIMEOUT: Duration = Duration::from_secs(5);
pub const TOOL_REQUEST_TIMEOUT_DEFAULT: Duration = Duration::from_secs(30);
pub const TRANSCRIPTION_FINAL_GRACE: Duration = Duration::from_millis(1000);
pub const STREAM_FINAL_GRACE: Duration = Duration::from_millis(500);
/// Burst-detection window for escalating repeated `MalformedEnvelope`
/// decode errors into the `Error` state.
pub const DECODE_ERROR_BURST_WINDOW: Duration = Duration::from_secs(10);
pub const DECODE_ERROR_BURST_THRESHOLD: usize = 5;

/// A one-shot deadline the session loop can re-arm or cancel.
///
/// Wraps `Option<Pin<Box<Sleep>>>` so that `tokio::select!` can branch on a
/// timer that may not currently be armed without the branch ever firing
/// spuriously (a `None` timer future never resolves).
pub struct Deadline {
    sleep: Option<std::pin::Pin<Box<Sleep>>>,
}

impl Deadline {
    pub fn disarmed() -> Self {
        Deadline { sleep: None }
    }

    pub fn arm(&mut self, from_now: Duration) {
        self.sleep = Some(Box::pin(tokio::time::sleep(from_now)));
    }

    pub fn arm_at(&mut self, at: Instant) {
        self.sleep = Some(Box::pin(tokio::time::sleep_until(at)));
    }

    pub fn cancel(&mut self) {
        self.sleep = None;
    }

    pub fn is_armed(&self) -> bool {
        self.sleep.is_some()
    }

    /// Resolves when the armed deadline elapses; never resolves while
    /// disarmed. Safe to poll repeatedly inside a `tokio::select!` loop.
    pub async fn wait(&mut self) {
        match self.sleep.as_mut() {
            Some(sleep) => sleep.as_mut().await,
            None => std::future::pending().await,
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::disarmed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disarmed_deadline_never_resolves_within_a_short_budget() {
        let mut deadline = Deadline::disarmed();
        let raced = tokio::time::timeout(Duration::from_millis(20), deadline.wait()).await;
        assert!(raced.is_err(), "disarmed deadline should not resolve");
    }

    #[tokio::test]
    async fn armed_deadline_resolves_after_its_duration() {
        let mut deadline = Deadline::disarmed();
        deadline.arm(Duration::from_millis(5));
        tokio::time::timeout(Duration::from_millis(200), deadline.wait())
            .await
            .expect("armed deadline should resolve");
    }

    #[tokio::test]
    async fn cancel_disarms_a_previously_armed_deadline() {
        let mut deadline = Deadline::disarmed();
        deadline.arm(Duration::from_millis(5));
        deadline.cancel();
        assert!(!deadline.is_armed());
    }
}

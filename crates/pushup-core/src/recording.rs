//! Recording screen state.
//!
//! The screen shows a short countdown when it appears, then switches to
//! "recording in progress" once the countdown completes. Stopping the
//! recording tears the countdown down. Media capture itself is supplied by
//! the platform and is not modelled here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::countdown::{CountdownHandle, CountdownState, CountdownTimer};
use crate::error::CountdownError;
use crate::events::Event;

/// Seconds of countdown before recording begins.
pub const DEFAULT_COUNTDOWN_SECONDS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecordingDisplay {
    /// Screen not shown yet.
    Idle,
    Countdown { remaining_seconds: u64 },
    RecordingInProgress,
    Stopped,
}

#[derive(Debug)]
pub struct RecordingShell {
    timer: CountdownTimer,
    countdown_seconds: i64,
    countdown: Option<CountdownHandle>,
    countdown_completed: Arc<AtomicBool>,
    stopped: bool,
}

impl RecordingShell {
    pub fn new(timer: CountdownTimer, countdown_seconds: i64) -> Self {
        Self {
            timer,
            countdown_seconds,
            countdown: None,
            countdown_completed: Arc::new(AtomicBool::new(false)),
            stopped: false,
        }
    }

    /// The screen appeared: start the countdown. No-op if one already
    /// exists or the shell was stopped.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError::InvalidArgument`] if the configured
    /// countdown is not positive; the shell stays `Idle`.
    pub fn appear(&mut self) -> Result<(), CountdownError> {
        if self.countdown.is_some() || self.stopped {
            return Ok(());
        }
        let completed = Arc::clone(&self.countdown_completed);
        let handle = self.timer.start(
            self.countdown_seconds,
            Box::new(move || {
                completed.store(true, Ordering::SeqCst);
            }),
        )?;
        debug!(seconds = self.countdown_seconds, "recording countdown started");
        self.countdown = Some(handle);
        Ok(())
    }

    pub fn display(&self) -> RecordingDisplay {
        if self.stopped {
            return RecordingDisplay::Stopped;
        }
        if self.countdown_completed.load(Ordering::SeqCst) {
            return RecordingDisplay::RecordingInProgress;
        }
        match &self.countdown {
            Some(handle) => RecordingDisplay::Countdown {
                remaining_seconds: handle.remaining_seconds(),
            },
            None => RecordingDisplay::Idle,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.display() == RecordingDisplay::RecordingInProgress
    }

    /// "Stop Recording": cancel a running countdown and discard it.
    /// Returns the cancellation event if the countdown was still running.
    pub fn stop(&mut self) -> Option<Event> {
        self.stopped = true;
        let mut handle = self.countdown.take()?;
        let event = handle.cancel();
        info!(
            cancelled = event.is_some(),
            state = ?handle.state(),
            "recording stopped"
        );
        event
    }

    /// The active countdown, for callers that want its event stream.
    pub fn countdown_mut(&mut self) -> Option<&mut CountdownHandle> {
        self.countdown.as_mut()
    }

    /// Wait until the countdown finishes. `None` if there is no countdown.
    pub async fn countdown_finished(&self) -> Option<CountdownState> {
        match &self.countdown {
            Some(handle) => Some(handle.finished().await),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn shell(seconds: i64) -> RecordingShell {
        RecordingShell::new(CountdownTimer::default(), seconds)
    }

    #[tokio::test(start_paused = true)]
    async fn shows_countdown_then_recording() {
        let mut shell = shell(DEFAULT_COUNTDOWN_SECONDS);
        assert_eq!(shell.display(), RecordingDisplay::Idle);

        shell.appear().unwrap();
        assert_eq!(shell.display(), RecordingDisplay::Countdown { remaining_seconds: 3 });

        let handle = shell.countdown_mut().unwrap();
        handle.next_event().await; // started
        handle.next_event().await; // first tick
        assert_eq!(shell.display(), RecordingDisplay::Countdown { remaining_seconds: 2 });

        assert_eq!(shell.countdown_finished().await, Some(CountdownState::Completed));
        assert_eq!(shell.display(), RecordingDisplay::RecordingInProgress);
        assert!(shell.is_recording());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_during_countdown_cancels_it() {
        let mut shell = shell(3);
        shell.appear().unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let event = shell.stop();
        assert!(matches!(
            event,
            Some(Event::CountdownCancelled { remaining_seconds: 2, .. })
        ));
        assert_eq!(shell.display(), RecordingDisplay::Stopped);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!shell.countdown_completed.load(Ordering::SeqCst));
        assert_eq!(shell.display(), RecordingDisplay::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_recording_has_nothing_to_cancel() {
        let mut shell = shell(1);
        shell.appear().unwrap();
        shell.countdown_finished().await;

        assert!(shell.stop().is_none());
        assert_eq!(shell.display(), RecordingDisplay::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn appear_twice_keeps_first_countdown() {
        let mut shell = shell(2);
        shell.appear().unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        shell.appear().unwrap();
        assert_eq!(shell.display(), RecordingDisplay::Countdown { remaining_seconds: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn appear_after_stop_stays_stopped() {
        let mut shell = shell(2);
        shell.appear().unwrap();
        shell.stop();

        shell.appear().unwrap();
        assert_eq!(shell.display(), RecordingDisplay::Stopped);
        assert!(shell.countdown_mut().is_none());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(shell.display(), RecordingDisplay::Stopped);
        assert!(!shell.countdown_completed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn invalid_countdown_leaves_shell_idle() {
        let mut shell = shell(0);
        assert!(shell.appear().is_err());
        assert_eq!(shell.display(), RecordingDisplay::Idle);
        assert!(shell.countdown_finished().await.is_none());
    }
}

//! Countdown session state machine.
//!
//! A session is a plain owned value with no internal thread. Whatever owns
//! it (see [`super::CountdownTimer`]) calls `tick()` once per period.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --begin--> Running --tick(remaining > 0)--> Running
//! Running --tick(remaining == 0)--> Completed   (fires on_complete)
//! Running --cancel--> Cancelled
//! ```
//!
//! `Completed` and `Cancelled` are terminal: `tick`, `begin` and `cancel`
//! all return `None` and leave the session untouched.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = CountdownSession::start(3, Box::new(|| println!("go")))?;
//! while !session.state().is_terminal() {
//!     session.tick();
//! }
//! ```

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CountdownError;
use crate::events::Event;

/// Completion callback. Taken out of the session when it fires.
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl CountdownState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CountdownState::Completed | CountdownState::Cancelled)
    }
}

/// Serializable view of a session for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub state: CountdownState,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub ticks: u64,
}

impl CountdownSnapshot {
    /// 0.0 .. 1.0 progress through the countdown.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_seconds as f64 / self.total_seconds as f64)
    }
}

pub struct CountdownSession {
    total_seconds: u64,
    /// Always within `0..=total_seconds`.
    remaining_seconds: u64,
    state: CountdownState,
    ticks: u64,
    on_complete: Option<CompletionCallback>,
}

impl CountdownSession {
    /// Create an idle session.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError::InvalidArgument`] when `total_seconds <= 0`.
    /// The callback is dropped without being called.
    pub fn new(total_seconds: i64, on_complete: CompletionCallback) -> Result<Self, CountdownError> {
        let total = validate_total(total_seconds)?;
        Ok(Self {
            total_seconds: total,
            remaining_seconds: total,
            state: CountdownState::Idle,
            ticks: 0,
            on_complete: Some(on_complete),
        })
    }

    /// Create a session that is already running.
    ///
    /// # Errors
    ///
    /// Same as [`CountdownSession::new`].
    pub fn start(total_seconds: i64, on_complete: CompletionCallback) -> Result<Self, CountdownError> {
        let mut session = Self::new(total_seconds, on_complete)?;
        session.begin();
        Ok(session)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// Number of ticks applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot {
            state: self.state,
            total_seconds: self.total_seconds,
            remaining_seconds: self.remaining_seconds,
            ticks: self.ticks,
        }
    }

    /// 0.0 .. 1.0 progress through the countdown.
    pub fn progress(&self) -> f64 {
        self.snapshot().progress()
    }

    /// Build a full state snapshot event.
    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            total_seconds: self.total_seconds,
            remaining_seconds: self.remaining_seconds,
            progress_pct: self.progress() * 100.0,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn begin(&mut self) -> Option<Event> {
        if self.state != CountdownState::Idle {
            return None;
        }
        self.state = CountdownState::Running;
        debug!(total_seconds = self.total_seconds, "countdown started");
        Some(Event::CountdownStarted {
            total_seconds: self.total_seconds,
            at: Utc::now(),
        })
    }

    /// Apply one tick. Invokes the completion callback on the tick that
    /// reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        let (event, callback) = self.advance();
        if let Some(callback) = callback {
            callback();
        }
        event
    }

    /// Stop the countdown without firing the completion callback.
    pub fn cancel(&mut self) -> Option<Event> {
        if self.state != CountdownState::Running {
            return None;
        }
        self.state = CountdownState::Cancelled;
        self.on_complete = None;
        debug!(remaining_seconds = self.remaining_seconds, "countdown cancelled");
        Some(Event::CountdownCancelled {
            remaining_seconds: self.remaining_seconds,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Tick without running the callback; it is handed back instead so a
    /// caller holding a lock can release it first.
    pub(crate) fn advance(&mut self) -> (Option<Event>, Option<CompletionCallback>) {
        if self.state != CountdownState::Running {
            return (None, None);
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.ticks += 1;

        if self.remaining_seconds == 0 {
            self.state = CountdownState::Completed;
            debug!(ticks = self.ticks, "countdown completed");
            let event = Event::CountdownCompleted {
                total_seconds: self.total_seconds,
                remaining_seconds: self.remaining_seconds,
                at: Utc::now(),
            };
            return (Some(event), self.on_complete.take());
        }

        let event = Event::CountdownTicked {
            remaining_seconds: self.remaining_seconds,
            tick: self.ticks,
            at: Utc::now(),
        };
        (Some(event), None)
    }
}

impl fmt::Debug for CountdownSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownSession")
            .field("total_seconds", &self.total_seconds)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("state", &self.state)
            .field("ticks", &self.ticks)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

fn validate_total(total_seconds: i64) -> Result<u64, CountdownError> {
    if total_seconds <= 0 {
        return Err(CountdownError::InvalidArgument { total_seconds });
    }
    Ok(total_seconds as u64)
}

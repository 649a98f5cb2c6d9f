//! Tokio-driven tick source for [`CountdownSession`].
//!
//! `CountdownTimer::start` spawns one task per session that ticks on a
//! `tokio::time::interval`. The session is shared with the returned
//! [`CountdownHandle`] behind a mutex; ticks and cancels both take the
//! lock and the session refuses to tick once it is no longer running, so a
//! tick that races a cancel can never touch a cancelled session.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::session::{CompletionCallback, CountdownSession, CountdownSnapshot, CountdownState};
use crate::error::CountdownError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub tick_interval: Duration,
    /// How late a tick may arrive before it is reported.
    pub tick_tolerance: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            tick_tolerance: Duration::from_millis(100),
        }
    }
}

/// Starts countdown sessions on the current tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct CountdownTimer {
    config: TimerConfig,
}

impl CountdownTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    /// Start a running session and its tick task.
    ///
    /// Nothing is spawned when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError::InvalidArgument`] when `total_seconds <= 0`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime, like `tokio::spawn`.
    pub fn start(
        &self,
        total_seconds: i64,
        on_complete: CompletionCallback,
    ) -> Result<CountdownHandle, CountdownError> {
        let mut session = CountdownSession::new(total_seconds, on_complete)?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        if let Some(started) = session.begin() {
            let _ = event_tx.send(started);
        }
        let snapshots = Arc::new(watch::channel(session.snapshot()).0);
        let shared = Arc::new(Mutex::new(session));
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let first_tick = Instant::now() + self.config.tick_interval;

        let task = tokio::spawn(run_ticks(
            Arc::clone(&shared),
            self.config,
            first_tick,
            event_tx.clone(),
            Arc::clone(&snapshots),
            cancel_rx,
        ));

        Ok(CountdownHandle {
            session: shared,
            events: event_rx,
            event_tx: Some(event_tx),
            snapshots,
            cancel_tx: Some(cancel_tx),
            task: Some(task),
        })
    }
}

/// Owner's view of a running countdown.
///
/// Dropping the handle cancels the session if it is still running.
pub struct CountdownHandle {
    session: Arc<Mutex<CountdownSession>>,
    events: mpsc::UnboundedReceiver<Event>,
    /// Used to report cancellation; released once the session is terminal
    /// so `next_event` can end.
    event_tx: Option<mpsc::UnboundedSender<Event>>,
    snapshots: Arc<watch::Sender<CountdownSnapshot>>,
    cancel_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl CountdownHandle {
    pub fn state(&self) -> CountdownState {
        lock(&self.session).state()
    }

    pub fn remaining_seconds(&self) -> u64 {
        lock(&self.session).remaining_seconds()
    }

    pub fn snapshot(&self) -> CountdownSnapshot {
        lock(&self.session).snapshot()
    }

    pub fn snapshot_event(&self) -> Event {
        lock(&self.session).snapshot_event()
    }

    /// Receiver that observes every published snapshot.
    pub fn watch(&self) -> watch::Receiver<CountdownSnapshot> {
        self.snapshots.subscribe()
    }

    /// Next event in order: `CountdownStarted`, the `CountdownTicked`
    /// events, then `CountdownCompleted` or `CountdownCancelled`.
    /// Returns `None` once the terminal event has been consumed.
    pub async fn next_event(&mut self) -> Option<Event> {
        if self.state().is_terminal() {
            self.event_tx = None;
        }
        self.events.recv().await
    }

    /// Resolves once the session reaches a terminal state.
    pub async fn finished(&self) -> CountdownState {
        let mut rx = self.snapshots.subscribe();
        let result = rx.wait_for(|s| s.state.is_terminal()).await.map(|s| s.state);
        match result {
            Ok(state) => state,
            Err(_) => self.state(),
        }
    }

    /// Cancel the session. No-op once it has completed or been cancelled.
    pub fn cancel(&mut self) -> Option<Event> {
        let event = {
            let mut session = lock(&self.session);
            let event = session.cancel()?;
            self.snapshots.send_replace(session.snapshot());
            if let Some(tx) = &self.event_tx {
                let _ = tx.send(event.clone());
            }
            event
        };
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
        Some(event)
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl fmt::Debug for CountdownHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownHandle")
            .field("session", &*lock(&self.session))
            .finish_non_exhaustive()
    }
}

async fn run_ticks(
    shared: Arc<Mutex<CountdownSession>>,
    config: TimerConfig,
    first_tick: Instant,
    events: mpsc::UnboundedSender<Event>,
    snapshots: Arc<watch::Sender<CountdownSnapshot>>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let mut interval = time::interval_at(first_tick, config.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = &mut cancel_rx => {
                debug!("tick task stopped");
                break;
            }

            scheduled = interval.tick() => {
                let late_by = Instant::now().saturating_duration_since(scheduled);
                if late_by > config.tick_tolerance {
                    warn!(late_ms = late_by.as_millis() as u64, "countdown tick delivered late");
                }

                // Non-final ticks are published under the lock so a cancel
                // event can never overtake them.
                let finished = {
                    let mut session = lock(&shared);
                    let (event, callback) = session.advance();
                    let Some(event) = event else { break };
                    let snapshot = session.snapshot();
                    if event.is_terminal() {
                        Some((event, callback, snapshot))
                    } else {
                        snapshots.send_replace(snapshot);
                        let _ = events.send(event);
                        None
                    }
                };

                // The terminal snapshot must go out even if the callback
                // panics, or `finished()` would never resolve.
                if let Some((event, callback, snapshot)) = finished {
                    if let Some(callback) = callback {
                        if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
                            warn!("countdown completion callback panicked");
                        }
                    }
                    snapshots.send_replace(snapshot);
                    let _ = events.send(event);
                    break;
                }
            }
        }
    }
}

fn lock(session: &Mutex<CountdownSession>) -> MutexGuard<'_, CountdownSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

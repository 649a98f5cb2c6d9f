use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::CountdownState;

/// Every countdown state change produces an Event.
/// Display layers consume them in order; the CLI prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CountdownStarted {
        total_seconds: u64,
        at: DateTime<Utc>,
    },
    CountdownTicked {
        remaining_seconds: u64,
        /// 1-based tick number within the session.
        tick: u64,
        at: DateTime<Utc>,
    },
    /// The final tick. Carries no separate `CountdownTicked`.
    CountdownCompleted {
        total_seconds: u64,
        /// Always 0.
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    CountdownCancelled {
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: CountdownState,
        total_seconds: u64,
        remaining_seconds: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for the events that end a session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::CountdownCompleted { .. } | Event::CountdownCancelled { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_type_tag() {
        let event = Event::CountdownTicked {
            remaining_seconds: 2,
            tick: 1,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "countdown_ticked");
        assert_eq!(json["remaining_seconds"], 2);
    }

    #[test]
    fn only_completion_and_cancellation_are_terminal() {
        let at = Utc::now();
        assert!(Event::CountdownCompleted { total_seconds: 3, remaining_seconds: 0, at }.is_terminal());
        assert!(Event::CountdownCancelled { remaining_seconds: 1, at }.is_terminal());
        assert!(!Event::CountdownStarted { total_seconds: 3, at }.is_terminal());
    }
}

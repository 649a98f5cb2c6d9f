//! # Push-Up Plus Core Library
//!
//! Core logic for the Push-Up Plus workout app. The screens themselves are
//! presentation shells; what lives here is the part with real behaviour:
//! the countdown that precedes a recording, and the state those screens
//! derive from it. The `pushup-cli` binary exposes all of it.
//!
//! ## Architecture
//!
//! - **Countdown session**: a pure state machine that the caller ticks
//! - **Countdown timer**: a tokio task that ticks a session once per second
//!   and supports cancellation at any point
//! - **Recording shell**: the recording screen's display state
//! - **Messages**: congratulatory message selection with an injected RNG
//!
//! ## Key Components
//!
//! - [`CountdownSession`]: Countdown state machine
//! - [`CountdownTimer`] / [`CountdownHandle`]: Scheduled countdowns
//! - [`RecordingShell`]: Countdown-then-record screen state
//! - [`Config`]: Application configuration

pub mod config;
pub mod countdown;
pub mod error;
pub mod events;
pub mod messages;
pub mod recording;

pub use config::Config;
pub use countdown::{
    CompletionCallback, CountdownHandle, CountdownSession, CountdownSnapshot, CountdownState,
    CountdownTimer, TimerConfig,
};
pub use error::{ConfigError, CoreError, CountdownError};
pub use events::Event;
pub use messages::{message_rng, pick_random, CongratulatoryMessages};
pub use recording::{RecordingDisplay, RecordingShell};

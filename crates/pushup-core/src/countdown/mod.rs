mod session;
mod timer;

pub use session::{CompletionCallback, CountdownSession, CountdownSnapshot, CountdownState};
pub use timer::{CountdownHandle, CountdownTimer, TimerConfig};

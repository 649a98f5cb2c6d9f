pub mod config;
pub mod congrats;
pub mod countdown;
pub mod record;

use pushup_core::error::Result;

/// Single-threaded runtime: ticks and user actions share one context.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(rt)
}

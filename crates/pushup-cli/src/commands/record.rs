use std::time::Duration;

use clap::Args;
use pushup_core::error::Result;
use pushup_core::{Config, CountdownTimer, RecordingDisplay, RecordingShell};

#[derive(Args)]
pub struct RecordArgs {
    /// Countdown before recording, in seconds (defaults to countdown.seconds)
    #[arg(long, allow_negative_numbers = true)]
    seconds: Option<i64>,
    /// Stop after recording this many seconds; otherwise wait for Ctrl-C
    #[arg(long)]
    record_for: Option<u64>,
}

pub fn run(args: RecordArgs, config: &Config) -> Result<()> {
    let seconds = args.seconds.unwrap_or(config.countdown.seconds);
    let mut shell = RecordingShell::new(CountdownTimer::new(config.timer_config()), seconds);
    let rt = super::runtime()?;
    rt.block_on(drive(&mut shell, args.record_for.map(Duration::from_secs)))
}

async fn drive(shell: &mut RecordingShell, record_for: Option<Duration>) -> Result<()> {
    shell.appear()?;
    let mut display = shell.display();
    println!("{}", describe(display));

    let Some(mut rx) = shell.countdown_mut().map(|handle| handle.watch()) else {
        return Ok(());
    };

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = shell.display();
                if next != display {
                    display = next;
                    println!("{}", describe(display));
                }
                if rx.borrow().state.is_terminal() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                shell.stop();
                println!("{}", describe(shell.display()));
                return Ok(());
            }
        }
    }

    if shell.is_recording() {
        match record_for {
            Some(limit) => {
                tokio::select! {
                    _ = tokio::time::sleep(limit) => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            None => tokio::signal::ctrl_c().await?,
        }
        shell.stop();
        println!("{}", describe(shell.display()));
    }
    Ok(())
}

fn describe(display: RecordingDisplay) -> String {
    match display {
        RecordingDisplay::Idle => "Waiting".to_string(),
        RecordingDisplay::Countdown { remaining_seconds } => remaining_seconds.to_string(),
        RecordingDisplay::RecordingInProgress => "Recording in progress...".to_string(),
        RecordingDisplay::Stopped => "Recording stopped".to_string(),
    }
}

use clap::Args;
use pushup_core::error::Result;
use pushup_core::{Config, CountdownHandle, CountdownTimer, Event};
use tracing::info;

#[derive(Args)]
pub struct CountdownArgs {
    /// Countdown length in seconds (defaults to countdown.seconds)
    #[arg(long, allow_negative_numbers = true)]
    seconds: Option<i64>,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

pub fn run(args: CountdownArgs, config: &Config) -> Result<()> {
    let seconds = args.seconds.unwrap_or(config.countdown.seconds);
    let timer = CountdownTimer::new(config.timer_config());
    let rt = super::runtime()?;

    rt.block_on(async {
        let handle = timer.start(seconds, Box::new(|| info!("countdown reached zero")))?;
        drive(handle, args.json).await
    })
}

/// Print events until the session ends. Ctrl-C cancels.
async fn drive(mut handle: CountdownHandle, json: bool) -> Result<()> {
    loop {
        tokio::select! {
            event = handle.next_event() => match event {
                Some(event) => print_event(&event, json)?,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                handle.cancel();
            }
        }
    }
    Ok(())
}

fn print_event(event: &Event, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::CountdownStarted { total_seconds, .. } => {
            println!("Starting {total_seconds}s countdown");
        }
        Event::CountdownTicked { remaining_seconds, .. } => println!("{remaining_seconds}"),
        Event::CountdownCompleted { .. } => println!("Go!"),
        Event::CountdownCancelled { remaining_seconds, .. } => {
            println!("Cancelled with {remaining_seconds}s left");
        }
        Event::StateSnapshot { .. } => println!("{}", serde_json::to_string_pretty(event)?),
    }
    Ok(())
}

use clap::Args;
use pushup_core::error::Result;
use pushup_core::{message_rng, Config};

#[derive(Args)]
pub struct CongratsArgs {
    /// Seed for a repeatable pick
    #[arg(long)]
    seed: Option<u64>,
}

pub fn run(args: CongratsArgs, config: &Config) -> Result<()> {
    let mut rng = message_rng(args.seed);
    println!("{}", config.messages().pick(&mut rng));
    Ok(())
}

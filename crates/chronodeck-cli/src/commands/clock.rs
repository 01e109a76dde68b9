use chronodeck_core::{Config, Deck, Mode, SystemTimeSource, TimeSource};
use clap::Args;

use super::CommandResult;
use crate::session::{self, SessionOptions};

#[derive(Args)]
pub struct ClockArgs {
    /// Print a single reading and exit
    #[arg(long)]
    pub once: bool,
    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ClockArgs) -> CommandResult {
    let config = Config::load()?;

    if args.once {
        let settings = config.deck_settings()?;
        let sample = settings.sampler.sample(SystemTimeSource.now());
        if args.json {
            println!("{}", serde_json::to_string_pretty(&sample)?);
        } else {
            println!("{}", sample.readout());
            println!("{}", sample.date);
            println!("{}", sample.timezone);
        }
        return Ok(());
    }

    let controller =
        session::build_controller(&config, Mode::Clock, false, args.json)?;
    let (mut deck, mut updates) = Deck::new(controller);
    session::run(
        &mut deck,
        &mut updates,
        SessionOptions {
            json: args.json,
            exit_on_complete: false,
            allow_switch: false,
            interactive: true,
        },
    )
    .await
}

use chronodeck_core::{Command, Config, Deck, Mode};
use clap::Args;

use super::CommandResult;
use crate::render;
use crate::session::{self, SessionOptions};

#[derive(Args)]
pub struct StopwatchArgs {
    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,
    /// Start running immediately
    #[arg(long)]
    pub start: bool,
}

pub async fn run(args: StopwatchArgs) -> CommandResult {
    let config = Config::load()?;
    let controller =
        session::build_controller(&config, Mode::Stopwatch, false, args.json)?;
    let (mut deck, mut updates) = Deck::new(controller);

    if !args.json {
        render::println_clear("s: start/pause  l: lap  r: reset  q: quit");
    }
    if args.start {
        deck.command(Command::Start);
    }

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
    .await?;

    let (readout, laps) = deck.with_controller(|c| {
        let laps = c.stopwatch().map(|s| s.laps().to_vec()).unwrap_or_default();
        (c.display().readout, laps)
    });
    if args.json {
        println!("{}", serde_json::to_string(&laps)?);
    } else {
        println!("total {readout}");
        if !laps.is_empty() {
            print!("{}", render::lap_table(&laps));
        }
    }
    Ok(())
}

use chronodeck_core::{parse_duration, Command, Config, Deck, Mode};
use clap::Args;

use super::CommandResult;
use crate::session::{self, SessionOptions};

#[derive(Args)]
pub struct TimerArgs {
    /// Countdown length (e.g. "90s", "5m", "1h30m")
    #[arg(long, short, conflicts_with = "preset")]
    pub duration: Option<String>,
    /// Load a preset by label (see `chronodeck presets`)
    #[arg(long, short)]
    pub preset: Option<String>,
    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,
    /// Skip the audible alert
    #[arg(long)]
    pub no_sound: bool,
    /// Wait for `s` instead of starting right away
    #[arg(long)]
    pub paused: bool,
}

pub async fn run(args: TimerArgs) -> CommandResult {
    let config = Config::load()?;
    let controller =
        session::build_controller(&config, Mode::Timer, !args.no_sound, args.json)?;
    let (mut deck, mut updates) = Deck::new(controller);

    if let Some(label) = &args.preset {
        deck.select_preset(label)?;
    } else if let Some(input) = &args.duration {
        let duration_ms = parse_duration(input)?;
        deck.command(Command::SetDuration { duration_ms });
    }
    if !args.paused && deck.command(Command::Start).is_none() {
        return Err("countdown has no time to run".into());
    }

    session::run(
        &mut deck,
        &mut updates,
        SessionOptions {
            json: args.json,
            exit_on_complete: true,
            allow_switch: false,
            interactive: true,
        },
    )
    .await
}

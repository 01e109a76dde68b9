use chronodeck_core::{Config, Deck, Mode};
use clap::Args;

use super::CommandResult;
use crate::input::HELP;
use crate::render;
use crate::session::{self, SessionOptions};

#[derive(Args)]
pub struct DeckArgs {
    /// Mode to open in (defaults to `general.default_mode`)
    #[arg(long, short)]
    pub mode: Option<Mode>,
    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,
    /// Skip the audible alert
    #[arg(long)]
    pub no_sound: bool,
}

pub async fn run(args: DeckArgs) -> CommandResult {
    let config = Config::load()?;
    let mode = match args.mode {
        Some(mode) => mode,
        None => config.general.default_mode.parse()?,
    };
    let controller =
        session::build_controller(&config, mode, !args.no_sound, args.json)?;
    let (mut deck, mut updates) = Deck::new(controller);

    if !args.json {
        render::println_clear(HELP);
    }
    session::run(
        &mut deck,
        &mut updates,
        SessionOptions {
            json: args.json,
            exit_on_complete: false,
            allow_switch: true,
            interactive: true,
        },
    )
    .await
}

use chronodeck_core::Config;
use chronodeck_core::format::format_countdown;
use clap::Args;

use super::CommandResult;

#[derive(Args)]
pub struct PresetsArgs {
    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PresetsArgs) -> CommandResult {
    let config = Config::load()?;
    let presets = &config.timer.presets;

    if args.json {
        println!("{}", serde_json::to_string_pretty(presets)?);
        return Ok(());
    }
    for preset in presets {
        println!("{:<8} {}", preset.label, format_countdown(preset.duration_ms));
    }
    Ok(())
}

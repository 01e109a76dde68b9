//! Line-based keyboard commands for the interactive modes.

use chronodeck_core::{Command, Mode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    /// One adjust step up or down.
    Nudge(i64),
    Preset(String),
    Switch(Mode),
    Help,
    Quit,
}

pub const HELP: &str = "\
  s | <enter>   start / pause / stop alarm
  l             lap (stopwatch)
  r             reset
  + | -         adjust countdown by one step
  p <label>     load a countdown preset (e.g. p 10m)
  d <duration>  set countdown duration (e.g. d 90s)
  m <mode>      switch mode (clock, stopwatch, timer)
  b             toggle sound
  q             quit";

/// Parse one line of input. Unknown input yields `Err` with a message.
pub fn parse(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (head, arg) = match line.split_once(char::is_whitespace) {
        Some((head, arg)) => (head, arg.trim()),
        None => (line, ""),
    };

    match head {
        "" | "s" | "space" => Ok(Input::Command(Command::Toggle)),
        "l" | "lap" => Ok(Input::Command(Command::Lap)),
        "r" | "reset" => Ok(Input::Command(Command::Reset)),
        "x" | "stop" => Ok(Input::Command(Command::Stop)),
        "b" | "bell" => Ok(Input::Command(Command::ToggleSound)),
        "+" => Ok(Input::Nudge(1)),
        "-" => Ok(Input::Nudge(-1)),
        "p" | "preset" if !arg.is_empty() => Ok(Input::Preset(arg.to_string())),
        "d" | "duration" if !arg.is_empty() => chronodeck_core::parse_duration(arg)
            .map(|duration_ms| Input::Command(Command::SetDuration { duration_ms }))
            .map_err(|e| e.to_string()),
        "m" | "mode" if !arg.is_empty() => arg
            .parse::<Mode>()
            .map(Input::Switch)
            .map_err(|e| e.to_string()),
        "h" | "help" | "?" => Ok(Input::Help),
        "q" | "quit" | "exit" => Ok(Input::Quit),
        other => Err(format!("unknown command '{other}' (h for help)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_toggles() {
        assert_eq!(parse(""), Ok(Input::Command(Command::Toggle)));
        assert_eq!(parse("  s "), Ok(Input::Command(Command::Toggle)));
    }

    #[test]
    fn arguments() {
        assert_eq!(parse("p 10m"), Ok(Input::Preset("10m".into())));
        assert_eq!(
            parse("d 90s"),
            Ok(Input::Command(Command::SetDuration { duration_ms: 90_000 }))
        );
        assert_eq!(parse("m stopwatch"), Ok(Input::Switch(Mode::Stopwatch)));
        assert_eq!(parse("-"), Ok(Input::Nudge(-1)));
    }

    #[test]
    fn rejects_unknown() {
        assert!(parse("zz").is_err());
        assert!(parse("p").is_err(), "preset needs a label");
        assert!(parse("d soon").is_err());
        assert!(parse("m alarm").is_err());
    }
}

//! Digital readout formatting and duration parsing.

use crate::error::ValidationError;

pub const MS_PER_SECOND: u64 = 1_000;
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Stopwatch readout: `HH:MM:SS.cc` from one hour up, `MM:SS.cc` below.
///
/// Centiseconds are truncated, never rounded, so the readout never shows a
/// value the stopwatch has not reached yet.
pub fn format_stopwatch(ms: u64) -> String {
    let total_secs = ms / MS_PER_SECOND;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    let cs = (ms % MS_PER_SECOND) / 10;
    if h > 0 {
        format!("{:02}:{:02}:{:02}.{:02}", h, m, s, cs)
    } else {
        format!("{:02}:{:02}.{:02}", m, s, cs)
    }
}

/// Countdown readout: `HH:MM:SS` from one hour up, `MM:SS` below.
pub fn format_countdown(ms: u64) -> String {
    let total_secs = ms / MS_PER_SECOND;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    if h > 0 {
        format!("{:02}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

/// Short human label for a duration, as used for preset names (`90s`, `5m`, `1h`, `1h30m`).
pub fn duration_label(ms: u64) -> String {
    if ms == 0 {
        return "0s".into();
    }
    if ms % MS_PER_SECOND != 0 {
        return format!("{ms}ms");
    }
    let h = ms / MS_PER_HOUR;
    let m = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let s = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let mut out = String::new();
    if h > 0 {
        out.push_str(&format!("{h}h"));
    }
    if m > 0 {
        out.push_str(&format!("{m}m"));
    }
    if s > 0 {
        out.push_str(&format!("{s}s"));
    }
    out
}

/// Parse a duration such as `90s`, `5m`, `1h30m`, `1500ms` or a bare number
/// of milliseconds.
pub fn parse_duration(input: &str) -> Result<u64, ValidationError> {
    let trimmed = input.trim();
    let invalid = |message: &str| ValidationError::InvalidDuration {
        input: input.to_string(),
        message: message.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("empty input"));
    }
    if let Ok(ms) = trimmed.parse::<u64>() {
        return Ok(ms);
    }

    let mut total: u64 = 0;
    let mut rest = trimmed;
    while !rest.is_empty() {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return Err(invalid("expected a number"));
        }
        let value: u64 = rest[..digits]
            .parse()
            .map_err(|_| invalid("number out of range"))?;
        rest = &rest[digits..];

        let unit_len = rest
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .count();
        let unit = &rest[..unit_len];
        let scale = match unit {
            "ms" => 1,
            "s" => MS_PER_SECOND,
            "m" => MS_PER_MINUTE,
            "h" => MS_PER_HOUR,
            "" => return Err(invalid("missing unit")),
            _ => return Err(invalid(&format!("unknown unit '{unit}'"))),
        };
        rest = &rest[unit_len..];

        total = value
            .checked_mul(scale)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| invalid("duration overflows"))?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopwatch_below_an_hour() {
        assert_eq!(format_stopwatch(0), "00:00.00");
        assert_eq!(format_stopwatch(12_345), "00:12.34");
        assert_eq!(format_stopwatch(61_999), "01:01.99");
        assert_eq!(format_stopwatch(3_599_999), "59:59.99");
    }

    #[test]
    fn stopwatch_from_an_hour() {
        assert_eq!(format_stopwatch(3_600_000), "01:00:00.00");
        assert_eq!(format_stopwatch(3_723_450), "01:02:03.45");
    }

    #[test]
    fn countdown_readouts() {
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(300_000), "05:00");
        assert_eq!(format_countdown(299_999), "04:59");
        assert_eq!(format_countdown(3_600_000), "01:00:00");
        assert_eq!(format_countdown(86_400_000), "24:00:00");
    }

    #[test]
    fn labels() {
        assert_eq!(duration_label(60_000), "1m");
        assert_eq!(duration_label(3_600_000), "1h");
        assert_eq!(duration_label(5_400_000), "1h30m");
        assert_eq!(duration_label(90_000), "1m30s");
        assert_eq!(duration_label(1_500), "1500ms");
    }

    #[test]
    fn parses_units() {
        assert_eq!(parse_duration("90s"), Ok(90_000));
        assert_eq!(parse_duration("5m"), Ok(300_000));
        assert_eq!(parse_duration("1h30m"), Ok(5_400_000));
        assert_eq!(parse_duration("1500ms"), Ok(1_500));
        assert_eq!(parse_duration(" 2500 "), Ok(2_500));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("m5").is_err());
        assert!(parse_duration("5x").is_err());
        assert!(parse_duration("10m5").is_err());
    }
}

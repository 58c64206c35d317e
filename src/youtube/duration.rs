// src/youtube/duration.rs
// The Data API reports video length as an ISO-8601 duration ("PT1H2M3S").

use regex::Regex;
use std::sync::LazyLock;

static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").expect("duration regex is valid")
});

/// Parses "PT1H2M3S" into seconds. Unrecognised input counts as zero.
pub fn parse_duration(value: &str) -> u64 {
    let Some(caps) = DURATION_REGEX.captures(value.trim()) else {
        return 0;
    };

    let part = |index: usize| -> u64 {
        caps.get(index)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    part(1)
        .saturating_mul(86_400)
        .saturating_add(part(2).saturating_mul(3_600))
        .saturating_add(part(3).saturating_mul(60))
        .saturating_add(part(4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_durations() {
        assert_eq!(parse_duration("PT1H2M3S"), 3723);
        assert_eq!(parse_duration("PT2M5S"), 125);
        assert_eq!(parse_duration("PT45S"), 45);
        assert_eq!(parse_duration("PT10M"), 600);
        assert_eq!(parse_duration("P1DT1S"), 86_401);
    }

    #[test]
    fn test_live_and_garbage_are_zero() {
        assert_eq!(parse_duration("P0D"), 0);
        assert_eq!(parse_duration(""), 0);
        assert_eq!(parse_duration("one hour"), 0);
    }

    #[test]
    fn test_absurd_values_saturate() {
        assert_eq!(parse_duration("P999999999999999999D"), u64::MAX);
        assert_eq!(parse_duration("P99999999999999999999D"), 0);
    }
}

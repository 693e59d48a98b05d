//! UPnP time strings

/// Parses a UPnP duration or position into seconds
///
/// Accepts `H:MM:SS`, `H:MM:SS.fff`, `MM:SS` and plain seconds. Renderers report
/// `NOT_IMPLEMENTED` (or an empty string) when they have no value, which
/// yields `None` like any other unparsable input.
pub fn parse_duration_secs(time_str: &str) -> Option<f64> {
    let time_str = time_str.trim();
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let (seconds_part, whole_parts) = parts.split_last()?;
    let seconds: f64 = seconds_part.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    let mut total = seconds;
    let mut multiplier = 60.0;
    for part in whole_parts.iter().rev() {
        let value: u64 = part.parse().ok()?;
        total += value as f64 * multiplier;
        multiplier *= 60.0;
    }

    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0:00:00", Some(0.0))]
    #[case("0:01:00", Some(60.0))]
    #[case("1:00:00", Some(3600.0))]
    #[case("0:03:45", Some(225.0))]
    #[case("0:03:45.500", Some(225.5))]
    #[case("03:45", Some(225.0))]
    #[case("12:00:01", Some(43201.0))]
    #[case("42", Some(42.0))]
    #[case("7.25", Some(7.25))]
    #[case("NOT_IMPLEMENTED", None)]
    #[case("NaN", None)]
    #[case("inf", None)]
    #[case("", None)]
    #[case("1:2:3:4", None)]
    #[case("a:00:10", None)]
    #[case("0:00:-1", None)]
    fn test_parse_duration_secs(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_duration_secs(input), expected);
    }
}

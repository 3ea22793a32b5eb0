use std::time::Duration;

use crate::AuthError;

/// Parses a token lifetime such as `30m`, `24 hours` or `3600`.
///
/// The value is a run of ASCII digits followed by an optional unit. A missing
/// unit means seconds. Case and surrounding whitespace are ignored.
pub fn parse_duration(raw: &str) -> Result<Duration, AuthError> {
    let invalid = |reason: &str| AuthError::InvalidDuration {
        raw: raw.to_string(),
        reason: reason.to_string(),
    };

    let value = raw.trim().to_ascii_lowercase();
    let digits = value.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return Err(invalid("no numeric value"));
    }

    let number: u64 = value[..digits]
        .parse()
        .map_err(|_| invalid("number out of range"))?;

    let seconds_per_unit = match value[digits..].trim() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 60 * 60,
        "d" | "day" | "days" => 24 * 60 * 60,
        unit => return Err(invalid(&format!("unknown unit '{unit}'"))),
    };

    number
        .checked_mul(seconds_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| invalid("number out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_unit_spelling() {
        let cases = [
            ("45", 45),
            ("45s", 45),
            ("45 seconds", 45),
            ("15m", 15 * 60),
            ("15 mins", 15 * 60),
            ("2h", 2 * 3600),
            ("2 HRS", 2 * 3600),
            ("1d", 86_400),
            ("  7 days ", 7 * 86_400),
        ];

        for (raw, secs) in cases {
            assert_eq!(
                parse_duration(raw).unwrap(),
                Duration::from_secs(secs),
                "{raw}"
            );
        }
    }

    #[test]
    fn rejects_missing_number() {
        let err = parse_duration("h").unwrap_err();
        assert!(err.to_string().contains("no numeric value"), "{err}");
    }

    #[test]
    fn rejects_unknown_unit() {
        let err = parse_duration("3 weeks").unwrap_err();
        assert!(err.to_string().contains("unknown unit 'weeks'"), "{err}");
    }

    #[test]
    fn rejects_overflow() {
        assert!(parse_duration("99999999999999999999").is_err());
        assert!(parse_duration("18446744073709551615d").is_err());
    }
}

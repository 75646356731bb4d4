use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];
const NAIVE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a timestamp string into epoch milliseconds.
///
/// Accepts RFC 3339, naive date-times and plain dates (UTC), or a bare number
/// of milliseconds.
#[must_use]
pub fn parse_timestamp_millis(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Ok(millis) = text.parse::<f64>() {
        return millis.is_finite().then_some(millis);
    }
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Some(time.timestamp_millis() as f64);
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().timestamp_millis() as f64);
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return Some(naive.and_utc().timestamp_millis() as f64);
        }
    }
    None
}

#[must_use]
pub fn unix_millis_to_datetime(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt(millis.round() as i64).single()
}

#[cfg(test)]
mod tests {
    use super::{parse_timestamp_millis, unix_millis_to_datetime};

    #[test]
    fn parses_supported_timestamp_shapes() {
        assert_eq!(parse_timestamp_millis("1970-01-02"), Some(86_400_000.0));
        assert_eq!(parse_timestamp_millis("1970-01-01 00:00:01"), Some(1_000.0));
        assert_eq!(
            parse_timestamp_millis("1970-01-01T00:00:02Z"),
            Some(2_000.0)
        );
        assert_eq!(parse_timestamp_millis("2500"), Some(2_500.0));
        assert_eq!(parse_timestamp_millis("yesterday"), None);
    }

    #[test]
    fn non_finite_millis_have_no_datetime() {
        assert!(unix_millis_to_datetime(f64::NAN).is_none());
        assert!(unix_millis_to_datetime(0.0).is_some());
    }
}

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Sort-first sentinel for records without a usable timestamp
pub const EARLIEST: DateTime<Utc> = DateTime::<Utc>::MIN_UTC;

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp, falling back to [`EARLIEST`] on empty or bad input.
///
/// Never fails: ordering degrades gracefully instead of aborting a merge.
pub fn parse_timestamp(ts: &str) -> DateTime<Utc> {
    try_parse_timestamp(ts).unwrap_or(EARLIEST)
}

/// Parse an ISO-8601 timestamp into a UTC instant.
///
/// Accepts a trailing `Z`, explicit offsets with or without a colon,
/// offset-less date-times (taken as UTC) and bare dates (midnight UTC).
pub fn try_parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if ts.is_empty() {
        return None;
    }

    let normalized = match ts.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => ts.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Timestamp format used for synthesized records, e.g. `2025-01-01T10:00:00.123456+00:00`
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_zulu_suffix() {
        assert_eq!(
            parse_timestamp("2025-03-01T12:30:00Z"),
            utc(2025, 3, 1, 12, 30, 0)
        );
        assert_eq!(
            parse_timestamp("2025-03-01T12:30:00.250Z").timestamp_subsec_millis(),
            250
        );
    }

    #[test]
    fn test_explicit_offsets() {
        assert_eq!(
            parse_timestamp("2025-03-01T14:30:00+02:00"),
            utc(2025, 3, 1, 12, 30, 0)
        );
        assert_eq!(
            parse_timestamp("2025-03-01T14:30:00+0200"),
            utc(2025, 3, 1, 12, 30, 0)
        );
    }

    #[test]
    fn test_naive_inputs_are_utc() {
        assert_eq!(
            parse_timestamp("2025-03-01T12:30:00"),
            utc(2025, 3, 1, 12, 30, 0)
        );
        assert_eq!(
            parse_timestamp("2025-03-01 12:30:00.5").timestamp(),
            utc(2025, 3, 1, 12, 30, 0).timestamp()
        );
        assert_eq!(parse_timestamp("2025-03-01"), utc(2025, 3, 1, 0, 0, 0));
    }

    #[test]
    fn test_empty_and_garbage_fall_back_to_earliest() {
        assert_eq!(parse_timestamp(""), EARLIEST);
        assert_eq!(parse_timestamp("   "), EARLIEST);
        assert_eq!(parse_timestamp("yesterday"), EARLIEST);
        assert_eq!(parse_timestamp("2025-13-45T99:00:00Z"), EARLIEST);
        assert!(try_parse_timestamp("not a date").is_none());
    }

    #[test]
    fn test_earliest_sorts_before_everything() {
        assert!(EARLIEST < parse_timestamp("0001-01-01T00:00:00Z"));
    }

    #[test]
    fn test_format_timestamp() {
        let dt = utc(2025, 3, 1, 12, 30, 0);
        assert_eq!(format_timestamp(dt), "2025-03-01T12:30:00.000000+00:00");
        assert_eq!(parse_timestamp(&format_timestamp(dt)), dt);
    }
}

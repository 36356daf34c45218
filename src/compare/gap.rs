//! Human-readable time between two posts

use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Describe the time between two instants in coarse buckets.
///
/// Symmetric in its arguments. Counts whole elapsed days and then picks the
/// first matching bucket. The templates are literal: 7..13 days is
/// "1 weeks", 30..59 days is "1 months".
pub fn format_gap(t1: DateTime<Utc>, t2: DateTime<Utc>) -> String {
    let elapsed_ms = t2.signed_duration_since(t1).num_milliseconds().abs();
    let days = elapsed_ms / MILLIS_PER_DAY;

    match days {
        0 => "Less than a day".to_string(),
        1 => "1 day".to_string(),
        d if d < 7 => format!("{} days", d),
        d if d < 30 => format!("{} weeks", d / 7),
        d if d < 365 => format!("{} months", d / 30),
        d => format!("{} years", d / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    fn after_days(days: i64) -> String {
        format_gap(day0(), day0() + Duration::days(days))
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(format_gap(day0(), day0()), "Less than a day");
        assert_eq!(after_days(1), "1 day");
        assert_eq!(after_days(2), "2 days");
        assert_eq!(after_days(6), "6 days");
        assert_eq!(after_days(7), "1 weeks");
        assert_eq!(after_days(13), "1 weeks");
        assert_eq!(after_days(14), "2 weeks");
        assert_eq!(after_days(29), "4 weeks");
        assert_eq!(after_days(30), "1 months");
        assert_eq!(after_days(35), "1 months");
        assert_eq!(after_days(364), "12 months");
        assert_eq!(after_days(365), "1 years");
        assert_eq!(after_days(400), "1 years");
        assert_eq!(after_days(800), "2 years");
    }

    #[test]
    fn test_partial_days_are_floored() {
        let almost_two = day0() + Duration::days(2) - Duration::seconds(1);
        assert_eq!(format_gap(day0(), almost_two), "1 day");

        let almost_one = day0() + Duration::hours(23) + Duration::minutes(59);
        assert_eq!(format_gap(day0(), almost_one), "Less than a day");
    }

    #[test]
    fn test_symmetric() {
        for days in [0, 1, 5, 9, 45, 400] {
            let later = day0() + Duration::days(days);
            assert_eq!(format_gap(day0(), later), format_gap(later, day0()));
        }
    }
}

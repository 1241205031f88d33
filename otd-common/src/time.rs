//! Timestamp utilities and "today" resolution

use chrono::{DateTime, Datelike, Local, NaiveDate, SecondsFormat, Utc};
use chrono_tz::Tz;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a UTC instant the way the catalog stores it (`2024-03-15T10:30:00Z`)
pub fn to_catalog_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Query key for "on this day" matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayKey {
    /// Month (1-12)
    pub month: u32,
    /// Day of month (1-31)
    pub day: u32,
    /// Human-readable `"%B %d"` form, e.g. `March 05`
    pub formatted: String,
}

impl TodayKey {
    /// Build the key for a calendar date (the year only feeds the formatter)
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
            formatted: date.format("%B %d").to_string(),
        }
    }

    /// Build the key for an explicit month/day
    ///
    /// Uses leap year 2000 so that February 29 is accepted.
    pub fn from_month_day(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(2000, month, day).map(Self::from_date)
    }

    /// Month name, e.g. `March`
    pub fn month_name(&self) -> &str {
        self.formatted.split(' ').next().unwrap_or_default()
    }

    /// Zero-padded day, e.g. `05`
    pub fn day_padded(&self) -> &str {
        self.formatted.split(' ').nth(1).unwrap_or_default()
    }
}

/// Resolve today's key at `instant` in the named timezone
///
/// Falls back to the local system timezone when `timezone` is absent or not a
/// valid IANA name.
pub fn today_at(instant: DateTime<Utc>, timezone: Option<&str>) -> TodayKey {
    let date = match timezone.map(str::trim).filter(|tz| !tz.is_empty()) {
        Some(name) => match name.parse::<Tz>() {
            Ok(tz) => instant.with_timezone(&tz).date_naive(),
            Err(_) => {
                tracing::warn!(timezone = %name, "Unknown timezone, using local time");
                instant.with_timezone(&Local).date_naive()
            }
        },
        None => instant.with_timezone(&Local).date_naive(),
    };

    TodayKey::from_date(date)
}

/// Resolve today's key from the system clock
pub fn today(timezone: Option<&str>) -> TodayKey {
    today_at(now(), timezone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_catalog_timestamp_format() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap();
        assert_eq!(to_catalog_timestamp(instant), "2024-03-15T10:30:00Z");
    }

    #[test]
    fn test_catalog_timestamp_drops_subseconds() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
            + chrono::Duration::milliseconds(750);
        assert_eq!(to_catalog_timestamp(instant), "2024-03-15T10:30:00Z");
    }

    #[test]
    fn test_today_at_named_timezone() {
        // 03:00 UTC on March 16 is still March 15 in New York
        let instant = Utc.with_ymd_and_hms(2024, 3, 16, 3, 0, 0).unwrap();
        let key = today_at(instant, Some("America/New_York"));
        assert_eq!(key.month, 3);
        assert_eq!(key.day, 15);
        assert_eq!(key.formatted, "March 15");
    }

    #[test]
    fn test_today_at_utc() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 16, 3, 0, 0).unwrap();
        let key = today_at(instant, Some("UTC"));
        assert_eq!((key.month, key.day), (3, 16));
    }

    #[test]
    fn test_today_at_invalid_timezone_falls_back_to_local() {
        let instant = Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap();
        let expected = TodayKey::from_date(instant.with_timezone(&Local).date_naive());
        assert_eq!(today_at(instant, Some("Not/AZone")), expected);
        assert_eq!(today_at(instant, None), expected);
        assert_eq!(today_at(instant, Some("  ")), expected);
    }

    #[test]
    fn test_formatted_day_is_zero_padded() {
        let key = TodayKey::from_month_day(1, 4).unwrap();
        assert_eq!(key.formatted, "January 04");
        assert_eq!(key.month_name(), "January");
        assert_eq!(key.day_padded(), "04");
    }

    #[test]
    fn test_from_month_day_accepts_leap_day() {
        let key = TodayKey::from_month_day(2, 29).unwrap();
        assert_eq!((key.month, key.day), (2, 29));
        assert!(TodayKey::from_month_day(2, 30).is_none());
        assert!(TodayKey::from_month_day(13, 1).is_none());
    }
}

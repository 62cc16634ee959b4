//! Wall-clock parsing helpers
//!
//! Stored documents keep dates as "yyyy-MM-dd" and times of day as "HH:mm"
//! with no zone attached. These helpers parse them and pin them to a zone.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).ok()
}

/// Parses a date and a time of day jointly, as "yyyy-MM-dd HH:mm"
pub fn parse_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let joined = format!("{} {}", date.trim(), time.trim());
    NaiveDateTime::parse_from_str(&joined, DATE_TIME_FORMAT).ok()
}

pub fn format_clock_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Clock arithmetic on a time of day; wraps across midnight and drops the day carry.
pub fn minus_minutes(time: NaiveTime, minutes: i64) -> NaiveTime {
    time.overflowing_sub_signed(Duration::minutes(minutes)).0
}

pub fn plus_minutes(time: NaiveTime, minutes: i64) -> NaiveTime {
    time.overflowing_add_signed(Duration::minutes(minutes)).0
}

/// Pins a wall-clock value to `tz`. Nonexistent local times (DST gaps) yield None,
/// ambiguous ones resolve to the earliest instant.
pub fn to_zoned<Tz: TimeZone>(naive: &NaiveDateTime, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(naive).earliest()
}

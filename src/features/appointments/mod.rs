//! # Feature: Appointments
//!
//! Booking rules for doctor appointments: half-hour slot generation from a
//! doctor's opening hours, filtering out booked slots, date checks and the
//! validation a booking request must pass.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0
//! - **Toggleable**: false

use crate::core::clock::{parse_date, parse_date_time};
use crate::core::models::{Appointment, DoctorAvailability};
use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, NaiveDate, TimeZone};

pub const DEFAULT_OPEN_TIMING: &str = "09:00";
pub const DEFAULT_CLOSE_TIMING: &str = "17:00";

fn hour_of(timing: &str) -> Result<u32> {
    let hour = timing
        .split(':')
        .next()
        .unwrap_or_default()
        .trim()
        .parse::<u32>()
        .map_err(|e| anyhow!("Invalid timing '{}': {}", timing, e))?;
    if hour > 24 {
        return Err(anyhow!("Invalid timing '{}': hour out of range", timing));
    }
    Ok(hour)
}

/// "HH:00" and "HH:30" for every whole hour from `open` up to (not including) `close`.
/// Minutes in the timings are ignored.
pub fn generate_time_slots(open: &str, close: &str) -> Result<Vec<String>> {
    let open_hour = hour_of(open)?;
    let close_hour = hour_of(close)?;

    let mut slots = Vec::new();
    for hour in open_hour..close_hour {
        slots.push(format!("{hour:02}:00"));
        slots.push(format!("{hour:02}:30"));
    }
    Ok(slots)
}

/// Slots still free on a day, given the doctor's hours and the appointments already booked
pub fn available_slots(
    availability: Option<&DoctorAvailability>,
    booked: &[Appointment],
) -> Result<Vec<String>> {
    let (open, close) = match availability {
        Some(a) => (a.open_timing.as_str(), a.close_timing.as_str()),
        None => (DEFAULT_OPEN_TIMING, DEFAULT_CLOSE_TIMING),
    };
    let slots = generate_time_slots(open, close)?;
    Ok(slots
        .into_iter()
        .filter(|slot| !booked.iter().any(|a| &a.time == slot))
        .collect())
}

/// Strict "yyyy-MM-dd" check
pub fn is_valid_date_format(date: &str) -> bool {
    parse_date(date).is_some()
}

/// Midnight of `date` lies strictly after `now`. Unparseable dates are never in the future.
pub fn is_future_date<Tz: TimeZone>(date: &str, now: &DateTime<Tz>) -> bool {
    parse_date(date)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|midnight| now.timezone().from_local_datetime(&midnight).earliest())
        .is_some_and(|midnight| midnight > *now)
}

/// Checks a booking request before it is stored. Rules apply in order and the
/// first failure is returned as the user-facing message.
pub fn validate_booking<Tz: TimeZone>(
    request: &Appointment,
    availability: Option<&DoctorAvailability>,
    now: &DateTime<Tz>,
) -> Result<()> {
    let required = [
        &request.patient_name,
        &request.age,
        &request.date,
        &request.time,
    ];
    if required.iter().any(|field| field.is_empty()) {
        bail!("Please fill all fields");
    }
    if availability.is_some_and(|a| a.holidays.iter().any(|h| h == &request.date)) {
        bail!("Doctor is unavailable on this date. Please select another date.");
    }
    if !is_valid_date_format(&request.date) {
        bail!("Invalid date format. Please use yyyy-MM-dd.");
    }
    if !is_future_date(&request.date, now) {
        bail!("Please select a future date.");
    }
    Ok(())
}

impl Appointment {
    /// Scheduled date and time lies strictly after `now`
    pub fn is_upcoming<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        parse_date_time(&self.date, &self.time)
            .and_then(|naive| now.timezone().from_local_datetime(&naive).earliest())
            .is_some_and(|at| at > *now)
    }

    pub fn is_today(&self, today: NaiveDate) -> bool {
        parse_date(&self.date).is_some_and(|d| d == today)
    }
}

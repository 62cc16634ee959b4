//! # Trigger-Time Resolver
//!
//! Turns one dose of a reminder into the instant its alarm should fire, from the
//! user's meal/sleep times, any snooze override and the current instant.
//! Past-due doses are suppressed, never rolled over to the next day.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Resolve against the zone of the supplied "now"
//! - 1.0.0: Initial release

use crate::core::clock::{
    format_clock_time, minus_minutes, parse_clock_time, parse_date_time, to_zoned,
};
use crate::core::models::{DailyAnchor, Reminder, User};
use chrono::{DateTime, NaiveTime, TimeZone};
use log::{debug, warn};

/// "Before X" doses fire this many minutes ahead of X
pub const BEFORE_MEAL_OFFSET_MINUTES: i64 = 15;

/// Dose label vocabulary stored in `Reminder::times`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSlot {
    BeforeBreakfast,
    AfterBreakfast,
    BeforeLunch,
    AfterLunch,
    BeforeDinner,
    AfterDinner,
    BeforeSleep,
    Unrecognized,
}

impl TimeSlot {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Before Breakfast" => TimeSlot::BeforeBreakfast,
            "After Breakfast" => TimeSlot::AfterBreakfast,
            "Before Lunch" => TimeSlot::BeforeLunch,
            "After Lunch" => TimeSlot::AfterLunch,
            "Before Dinner" => TimeSlot::BeforeDinner,
            "After Dinner" => TimeSlot::AfterDinner,
            "Before Sleep" => TimeSlot::BeforeSleep,
            _ => TimeSlot::Unrecognized,
        }
    }

    /// The user preference this slot hangs off, and whether it fires ahead of it
    fn anchor(&self) -> Option<(DailyAnchor, bool)> {
        match self {
            TimeSlot::BeforeBreakfast => Some((DailyAnchor::Breakfast, true)),
            TimeSlot::AfterBreakfast => Some((DailyAnchor::Breakfast, false)),
            TimeSlot::BeforeLunch => Some((DailyAnchor::Lunch, true)),
            TimeSlot::AfterLunch => Some((DailyAnchor::Lunch, false)),
            TimeSlot::BeforeDinner => Some((DailyAnchor::Dinner, true)),
            TimeSlot::AfterDinner => Some((DailyAnchor::Dinner, false)),
            TimeSlot::BeforeSleep => Some((DailyAnchor::Sleep, true)),
            TimeSlot::Unrecognized => None,
        }
    }

    /// Used as-is when the preference is unset. "Before" defaults are flat
    /// literals, not the "After" default minus the offset.
    fn default_time(&self) -> NaiveTime {
        let (h, m) = match self {
            TimeSlot::BeforeBreakfast => (8, 0),
            TimeSlot::AfterBreakfast => (8, 15),
            TimeSlot::BeforeLunch => (13, 0),
            TimeSlot::AfterLunch => (13, 15),
            TimeSlot::BeforeDinner => (19, 0),
            TimeSlot::AfterDinner => (19, 15),
            TimeSlot::BeforeSleep => (22, 0),
            TimeSlot::Unrecognized => (8, 0),
        };
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Time of day for this slot, or None when the user's preference is unparseable
    pub fn clock_time(&self, user: &User) -> Option<NaiveTime> {
        let Some((anchor, before)) = self.anchor() else {
            return Some(self.default_time());
        };
        match user.anchor_time(anchor) {
            None => Some(self.default_time()),
            Some(raw) => {
                let time = parse_clock_time(raw)?;
                if before {
                    Some(minus_minutes(time, BEFORE_MEAL_OFFSET_MINUTES))
                } else {
                    Some(time)
                }
            }
        }
    }
}

/// Next trigger instant for dose `index`, or None when it must not be scheduled.
///
/// Wall-clock strings are read in `now`'s time zone. The result is strictly
/// after `now`. Pure: same inputs, same answer.
pub fn resolve_trigger_time<Tz: TimeZone>(
    reminder: &Reminder,
    user: &User,
    index: usize,
    now: &DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    let label = reminder.times.get(index)?;

    // Snooze overrides the computed schedule
    if let Some(snooze) = reminder.snooze_time(index) {
        let Some(trigger) = parse_date_time(&reminder.date, snooze)
            .and_then(|naive| to_zoned(&naive, &now.timezone()))
        else {
            warn!(
                "Failed to parse snooze time for reminder {} at index {}: {} {}",
                reminder.id, index, reminder.date, snooze
            );
            return None;
        };
        if trigger <= *now {
            debug!(
                "Snooze time for reminder {} at index {} is in the past: {}",
                reminder.id,
                index,
                trigger.naive_local()
            );
            return None;
        }
        debug!(
            "Snooze trigger for reminder {} at index {}: {} (snooze {})",
            reminder.id,
            index,
            trigger.naive_local(),
            snooze
        );
        return Some(trigger);
    }

    let slot = TimeSlot::from_label(label);
    let Some(trigger) = slot
        .clock_time(user)
        .and_then(|time| parse_date_time(&reminder.date, &format_clock_time(time)))
        .and_then(|naive| to_zoned(&naive, &now.timezone()))
    else {
        warn!(
            "Failed to resolve trigger time for reminder {} at index {} ({}, date {})",
            reminder.id, index, label, reminder.date
        );
        return None;
    };

    if trigger <= *now {
        debug!(
            "Trigger time for reminder {} at index {} is in the past: {}",
            reminder.id,
            index,
            trigger.naive_local()
        );
        return None;
    }

    debug!(
        "Trigger for reminder {} at index {}: {} ({})",
        reminder.id,
        index,
        trigger.naive_local(),
        label
    );
    Some(trigger)
}

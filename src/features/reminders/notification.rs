//! # Medicine Notification
//!
//! Builds the persistent "Medicine Reminder" notification and derives the ids
//! that keep one notification (and one pair of action buttons) per dose.
//!
//! Ids are `hash(reminderId) + timeIndex`, with `+1` for Taken and `+2` for
//! Snooze, where `hash` is the 32-bit Java `String.hashCode`. Re-firing a dose
//! therefore replaces its pending notification instead of stacking another.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use crate::platform::types::{
    ActionIntent, ActionKind, AlarmPayload, Importance, Notification, NotificationAction,
    NotificationChannel, Priority, Sound,
};

pub const CHANNEL_ID: &str = "reminder_channel";
pub const CHANNEL_NAME: &str = "Reminders";
pub const NOTIFICATION_TITLE: &str = "Medicine Reminder";

/// Off/on vibration durations in milliseconds
pub const VIBRATION_PATTERN: [u64; 4] = [0, 500, 500, 500];

const TAKEN_OFFSET: i32 = 1;
const SNOOZE_OFFSET: i32 = 2;

pub fn reminder_channel() -> NotificationChannel {
    NotificationChannel {
        id: CHANNEL_ID.to_string(),
        name: CHANNEL_NAME.to_string(),
        importance: Importance::High,
        lights: true,
        vibration: true,
        sound: Sound::AlarmAlert,
    }
}

/// Java's `String.hashCode`: `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 code
/// units with 32-bit wrapping.
pub fn java_string_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

fn dose_base(reminder_id: &str, time_index: usize) -> i32 {
    java_string_hash(reminder_id).wrapping_add(time_index as i32)
}

/// Id of the notification (and of the alarm) for one dose
pub fn notification_id(reminder_id: &str, time_index: usize) -> i32 {
    dose_base(reminder_id, time_index)
}

/// Request code of an action button's pending intent
pub fn action_request_code(reminder_id: &str, time_index: usize, kind: ActionKind) -> i32 {
    let offset = match kind {
        ActionKind::Taken => TAKEN_OFFSET,
        ActionKind::Snooze => SNOOZE_OFFSET,
    };
    dose_base(reminder_id, time_index).wrapping_add(offset)
}

pub fn build_action(reminder_id: &str, time_index: usize, kind: ActionKind) -> NotificationAction {
    NotificationAction {
        label: kind.label().to_string(),
        request_code: action_request_code(reminder_id, time_index, kind),
        intent: ActionIntent {
            kind,
            reminder_id: reminder_id.to_string(),
            time_index,
        },
    }
}

pub fn notification_body(medicine_name: &str, time: &str) -> String {
    format!("Time to take {medicine_name} ({time})")
}

/// The notification posted when a dose's alarm fires
pub fn build_notification(payload: &AlarmPayload) -> Notification {
    Notification {
        channel_id: CHANNEL_ID.to_string(),
        title: NOTIFICATION_TITLE.to_string(),
        body: notification_body(&payload.medicine_name, &payload.time),
        priority: Priority::High,
        auto_cancel: false,
        ongoing: true,
        sound: Sound::AlarmAlert,
        vibration_pattern: VIBRATION_PATTERN.to_vec(),
        actions: vec![
            build_action(&payload.reminder_id, payload.time_index, ActionKind::Taken),
            build_action(&payload.reminder_id, payload.time_index, ActionKind::Snooze),
        ],
    }
}

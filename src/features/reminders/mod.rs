//! # Reminders Feature
//!
//! Medicine dose reminders: trigger-time resolution from the user's daily
//! schedule, alarm arming, notification delivery, and the Taken/Snooze actions.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add Taken/Snooze action handling
//! - 1.0.0: Initial release with resolver, scheduler and receiver

pub mod actions;
pub mod notification;
pub mod receiver;
pub mod resolver;
pub mod scheduler;

pub use actions::{ActionOutcome, ReminderActionHandler};
pub use notification::{build_notification, java_string_hash, notification_id};
pub use receiver::{
    AlarmExtras, Delivery, RearmReport, ReminderEvent, ReminderReceiver, SkipReason,
    BOOT_COMPLETED, REMINDER_ALARM,
};
pub use resolver::{resolve_trigger_time, TimeSlot};
pub use scheduler::{ReminderScheduler, ScheduleOutcome};

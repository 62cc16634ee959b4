//! # Platform Seams
//!
//! Device facilities the reminder feature depends on: the wall clock, the
//! signed-in session, the alarm scheduler and the notification manager.
//! Reminder logic only ever talks to these traits.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add alarm and notification cancellation for the Taken/Snooze actions
//! - 1.1.0: Add LogPlatform for running without a device
//! - 1.0.0: Initial release with RecordingPlatform test double

pub mod log_platform;
pub mod recording;
pub mod types;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};

pub use log_platform::LogPlatform;
pub use recording::{NotifierCall, RecordingPlatform, ScheduledAlarm};
pub use types::{
    ActionIntent, ActionKind, AlarmPayload, Importance, Notification, NotificationAction,
    NotificationChannel, Priority, Sound,
};

/// Source of "now"
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Authentication state of the device
pub trait Session: Send + Sync {
    /// The signed-in user's id, or None when nobody is logged in
    fn current_user_id(&self) -> Option<String>;
}

/// Session fixed at construction time
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user_id: Option<String>,
}

impl StaticSession {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn signed_out() -> Self {
        Self { user_id: None }
    }
}

impl Session for StaticSession {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}

/// Exact-time alarm facility.
///
/// Alarms are keyed by `request_code`: scheduling again with the same code
/// replaces the pending alarm.
pub trait AlarmScheduler: Send + Sync {
    fn schedule_at(&self, at: DateTime<Utc>, request_code: i32, payload: &AlarmPayload)
        -> Result<()>;

    fn cancel(&self, request_code: i32) -> Result<()>;
}

/// Local notification manager.
///
/// Notifications are keyed by `id`: posting again with the same id replaces
/// the visible notification.
pub trait Notifier: Send + Sync {
    /// Registers a channel. Calling it again for an existing channel is harmless.
    fn create_channel(&self, channel: &NotificationChannel) -> Result<()>;

    /// Runtime permission check. Hosts without a permission model always allow.
    fn notifications_permitted(&self) -> bool {
        true
    }

    fn post_notification(&self, id: i32, notification: &Notification) -> Result<()>;

    fn cancel_notification(&self, id: i32) -> Result<()>;
}

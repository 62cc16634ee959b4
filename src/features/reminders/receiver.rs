//! # Reminder Receiver
//!
//! Entry point for system-delivered events. A boot event re-arms every dose
//! the signed-in user has not taken yet; an alarm event posts the medicine
//! notification for one dose. Runs unattended, so every failure is logged and
//! reported in the returned `Delivery` rather than raised.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Read alarm extras field by field; malformed events are dropped, not raised
//! - 1.1.0: Report per-event outcome for callers and tests
//! - 1.0.0: Initial release with boot re-arm and alarm delivery

use crate::database::Database;
use crate::features::reminders::notification::{
    build_notification, notification_id, reminder_channel,
};
use crate::features::reminders::scheduler::{ReminderScheduler, ScheduleOutcome};
use crate::platform::types::AlarmPayload;
use crate::platform::{Notifier, Session};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

pub const BOOT_COMPLETED: &str = "android.intent.action.BOOT_COMPLETED";
pub const REMINDER_ALARM: &str = "com.vitalrite.action.REMINDER_ALARM";

/// Extras carried by a fired alarm, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmExtras {
    #[serde(default)]
    pub reminder_id: Option<String>,
    #[serde(default)]
    pub medicine_name: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    /// -1 when absent
    #[serde(default = "missing_time_index")]
    pub time_index: i64,
}

fn missing_time_index() -> i64 {
    -1
}

impl Default for AlarmExtras {
    fn default() -> Self {
        Self {
            reminder_id: None,
            medicine_name: None,
            time: None,
            time_index: missing_time_index(),
        }
    }
}

impl AlarmExtras {
    /// A complete payload, or None if any field is missing or empty, or the
    /// index is negative or does not fit a 32-bit int
    pub fn into_payload(self) -> Option<AlarmPayload> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Some(AlarmPayload {
            reminder_id: present(self.reminder_id)?,
            medicine_name: present(self.medicine_name)?,
            time: present(self.time)?,
            time_index: i32::try_from(self.time_index)
                .ok()
                .and_then(|i| usize::try_from(i).ok())?,
        })
    }

    /// Reads each field on its own; a missing or wrong-typed field becomes
    /// `None` (or -1 for the index) instead of failing the whole event.
    pub fn from_json(extras: &serde_json::Value) -> Self {
        let text = |key: &str| {
            extras
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };
        Self {
            reminder_id: text("reminderId"),
            medicine_name: text("medicineName"),
            time: text("time"),
            time_index: extras
                .get("timeIndex")
                .and_then(serde_json::Value::as_i64)
                .unwrap_or_else(missing_time_index),
        }
    }
}

impl From<AlarmPayload> for AlarmExtras {
    fn from(payload: AlarmPayload) -> Self {
        Self {
            reminder_id: Some(payload.reminder_id),
            medicine_name: Some(payload.medicine_name),
            time: Some(payload.time),
            time_index: payload.time_index as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderEvent {
    BootCompleted,
    AlarmFired(AlarmExtras),
}

impl ReminderEvent {
    /// Any action other than boot is treated as an alarm. Malformed extras are
    /// kept as-is and rejected at delivery.
    pub fn from_intent(action: &str, extras: &serde_json::Value) -> Self {
        if action == BOOT_COMPLETED {
            return ReminderEvent::BootCompleted;
        }
        ReminderEvent::AlarmFired(AlarmExtras::from_json(extras))
    }
}

/// Counts from one boot re-arm pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RearmReport {
    pub scheduled: usize,
    /// Doses with no future trigger time
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoSignedInUser,
    UserNotFound,
    FetchFailed,
    InvalidPayload,
    PermissionDenied,
    PostFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Rearmed(RearmReport),
    /// Notification posted under this id
    Notified(i32),
    Skipped(SkipReason),
}

pub struct ReminderReceiver {
    database: Arc<dyn Database>,
    session: Arc<dyn Session>,
    scheduler: ReminderScheduler,
    notifier: Arc<dyn Notifier>,
    /// Set once the notification channel exists
    channel_ready: Mutex<bool>,
}

impl ReminderReceiver {
    pub fn new(
        database: Arc<dyn Database>,
        session: Arc<dyn Session>,
        scheduler: ReminderScheduler,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            database,
            session,
            scheduler,
            notifier,
            channel_ready: Mutex::new(false),
        }
    }

    pub async fn on_receive(&self, event: ReminderEvent) -> Delivery {
        match event {
            ReminderEvent::BootCompleted => self.rearm_all().await,
            ReminderEvent::AlarmFired(extras) => self.deliver(extras),
        }
    }

    /// Re-arm every untaken dose of the signed-in user
    async fn rearm_all(&self) -> Delivery {
        let Some(user_id) = self.session.current_user_id() else {
            warn!("User not logged in, cannot reschedule reminders after BOOT_COMPLETED");
            return Delivery::Skipped(SkipReason::NoSignedInUser);
        };

        let user = match self.database.fetch_user(&user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("User data not found for userId: {user_id}");
                return Delivery::Skipped(SkipReason::UserNotFound);
            }
            Err(e) => {
                error!("Failed to fetch user data for rescheduling: {e:#}");
                return Delivery::Skipped(SkipReason::FetchFailed);
            }
        };

        let reminders = match self.database.fetch_reminders(&user_id).await {
            Ok(reminders) => reminders,
            Err(e) => {
                error!("Failed to fetch reminders for rescheduling: {e:#}");
                return Delivery::Skipped(SkipReason::FetchFailed);
            }
        };

        let mut report = RearmReport::default();
        for reminder in &reminders {
            for index in reminder.pending_indices() {
                match self.scheduler.schedule_reminder(reminder, &user, index) {
                    Ok(ScheduleOutcome::Scheduled(_)) => {
                        report.scheduled += 1;
                        debug!(
                            "Rescheduled reminder {} at index {} after BOOT_COMPLETED",
                            reminder.id, index
                        );
                    }
                    Ok(ScheduleOutcome::Skipped) => report.skipped += 1,
                    Err(e) => {
                        report.failed += 1;
                        error!(
                            "Failed to reschedule reminder {} at index {}: {e:#}",
                            reminder.id, index
                        );
                    }
                }
            }
        }

        info!(
            "Re-armed reminders for {}: {} scheduled, {} past due, {} failed",
            user_id, report.scheduled, report.skipped, report.failed
        );
        Delivery::Rearmed(report)
    }

    /// Post the notification for a fired alarm
    fn deliver(&self, extras: AlarmExtras) -> Delivery {
        let Some(payload) = extras.into_payload() else {
            debug!("Ignoring reminder alarm with incomplete extras");
            return Delivery::Skipped(SkipReason::InvalidPayload);
        };

        self.ensure_channel();

        let notification = build_notification(&payload);
        let id = notification_id(&payload.reminder_id, payload.time_index);

        if !self.notifier.notifications_permitted() {
            warn!(
                "Notification permission not granted, cannot show notification for reminder {} at index {}",
                payload.reminder_id, payload.time_index
            );
            return Delivery::Skipped(SkipReason::PermissionDenied);
        }

        match self.notifier.post_notification(id, &notification) {
            Ok(()) => {
                info!(
                    "Notification shown for reminder {} at index {}",
                    payload.reminder_id, payload.time_index
                );
                Delivery::Notified(id)
            }
            Err(e) => {
                error!(
                    "Failed to show notification for reminder {} at index {}: {e:#}",
                    payload.reminder_id, payload.time_index
                );
                Delivery::Skipped(SkipReason::PostFailed)
            }
        }
    }

    /// One-time channel registration; a failed attempt is retried on the next alarm
    fn ensure_channel(&self) {
        // Held across creation so a concurrent alarm waits for the channel
        let mut ready = self.channel_ready.lock().unwrap_or_else(|e| e.into_inner());
        if *ready {
            return;
        }
        match self.notifier.create_channel(&reminder_channel()) {
            Ok(()) => *ready = true,
            Err(e) => warn!("Failed to create notification channel: {e:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Reminder, User};
    use crate::database::MemoryDatabase;
    use crate::platform::types::ActionKind;
    use crate::platform::{FixedClock, NotifierCall, RecordingPlatform, StaticSession};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{Local, TimeZone};

    struct Harness {
        platform: Arc<RecordingPlatform>,
        receiver: ReminderReceiver,
    }

    fn harness_with(
        database: Arc<dyn Database>,
        session: StaticSession,
        platform: RecordingPlatform,
    ) -> Harness {
        let platform = Arc::new(platform);
        let now = Local.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
        let scheduler = ReminderScheduler::new(platform.clone(), Arc::new(FixedClock(now)));
        let receiver =
            ReminderReceiver::new(database, Arc::new(session), scheduler, platform.clone());
        Harness { platform, receiver }
    }

    fn seeded_database() -> MemoryDatabase {
        let db = MemoryDatabase::new();
        db.insert_user(User {
            uid: "u1".to_string(),
            dinner_time: Some("20:00".to_string()),
            ..Default::default()
        });
        db.insert_reminder(
            "u1",
            Reminder {
                id: "r1".to_string(),
                medicine_name: "Metformin".to_string(),
                times: vec![
                    "Before Breakfast".to_string(),
                    "Before Dinner".to_string(),
                    "After Dinner".to_string(),
                ],
                taken: vec![false, true],
                snooze_times: vec![],
                date: "2025-03-20".to_string(),
            },
        );
        db.insert_reminder(
            "u1",
            Reminder {
                id: "r2".to_string(),
                medicine_name: "Vitamin D".to_string(),
                times: vec!["Before Sleep".to_string()],
                taken: vec![false],
                snooze_times: vec![Some("21:30".to_string())],
                date: "2025-03-20".to_string(),
            },
        );
        db
    }

    fn alarm(reminder_id: &str, index: i64) -> ReminderEvent {
        ReminderEvent::AlarmFired(AlarmExtras {
            reminder_id: Some(reminder_id.to_string()),
            medicine_name: Some("Metformin".to_string()),
            time: Some("After Dinner".to_string()),
            time_index: index,
        })
    }

    struct FailingDatabase {
        fail_user: bool,
    }

    #[async_trait]
    impl Database for FailingDatabase {
        async fn fetch_user(&self, user_id: &str) -> Result<Option<User>> {
            if self.fail_user {
                Err(anyhow!("network unavailable"))
            } else {
                Ok(Some(User {
                    uid: user_id.to_string(),
                    ..Default::default()
                }))
            }
        }

        async fn fetch_reminders(&self, _user_id: &str) -> Result<Vec<Reminder>> {
            Err(anyhow!("network unavailable"))
        }

        async fn fetch_reminder(&self, _: &str, _: &str) -> Result<Option<Reminder>> {
            Err(anyhow!("network unavailable"))
        }

        async fn save_reminder(&self, _: &str, _: &Reminder) -> Result<()> {
            Err(anyhow!("network unavailable"))
        }
    }

    #[tokio::test]
    async fn test_boot_rearms_untaken_future_doses() {
        let h = harness_with(
            Arc::new(seeded_database()),
            StaticSession::signed_in("u1"),
            RecordingPlatform::new(),
        );

        let delivery = h.receiver.on_receive(ReminderEvent::BootCompleted).await;

        // r1[0] is past due at noon, r1[1] is taken, r1[2] and r2[0] are armed
        assert_eq!(
            delivery,
            Delivery::Rearmed(RearmReport {
                scheduled: 2,
                skipped: 1,
                failed: 0,
            })
        );
        let alarms = h.platform.alarms();
        let armed: Vec<(&str, usize)> = alarms
            .iter()
            .map(|a| (a.payload.reminder_id.as_str(), a.payload.time_index))
            .collect();
        assert_eq!(armed, vec![("r1", 2), ("r2", 0)]);
        assert_eq!(
            alarms[1].at,
            Local
                .with_ymd_and_hms(2025, 3, 20, 21, 30, 0)
                .unwrap()
                .with_timezone(&chrono::Utc)
        );
    }

    #[tokio::test]
    async fn test_boot_without_user_schedules_nothing() {
        let h = harness_with(
            Arc::new(seeded_database()),
            StaticSession::signed_out(),
            RecordingPlatform::new(),
        );

        let delivery = h.receiver.on_receive(ReminderEvent::BootCompleted).await;

        assert_eq!(delivery, Delivery::Skipped(SkipReason::NoSignedInUser));
        assert!(h.platform.is_untouched());
    }

    #[tokio::test]
    async fn test_boot_with_unknown_user() {
        let h = harness_with(
            Arc::new(seeded_database()),
            StaticSession::signed_in("ghost"),
            RecordingPlatform::new(),
        );

        let delivery = h.receiver.on_receive(ReminderEvent::BootCompleted).await;

        assert_eq!(delivery, Delivery::Skipped(SkipReason::UserNotFound));
        assert!(h.platform.is_untouched());
    }

    #[tokio::test]
    async fn test_boot_fetch_failures_stop_quietly() {
        for fail_user in [true, false] {
            let h = harness_with(
                Arc::new(FailingDatabase { fail_user }),
                StaticSession::signed_in("u1"),
                RecordingPlatform::new(),
            );

            let delivery = h.receiver.on_receive(ReminderEvent::BootCompleted).await;

            assert_eq!(delivery, Delivery::Skipped(SkipReason::FetchFailed));
            assert!(h.platform.is_untouched());
        }
    }

    #[tokio::test]
    async fn test_boot_failure_for_one_dose_does_not_abort_batch() {
        let h = harness_with(
            Arc::new(seeded_database()),
            StaticSession::signed_in("u1"),
            RecordingPlatform::new().failing_for("r1", 2),
        );

        let delivery = h.receiver.on_receive(ReminderEvent::BootCompleted).await;

        assert_eq!(
            delivery,
            Delivery::Rearmed(RearmReport {
                scheduled: 1,
                skipped: 1,
                failed: 1,
            })
        );
        let alarms = h.platform.alarms();
        assert_eq!(alarms.len(), 1);
        assert_eq!(alarms[0].payload.reminder_id, "r2");
    }

    #[tokio::test]
    async fn test_alarm_posts_notification() {
        let h = harness_with(
            Arc::new(MemoryDatabase::new()),
            StaticSession::signed_out(),
            RecordingPlatform::new(),
        );

        let delivery = h.receiver.on_receive(alarm("r1", 2)).await;

        let id = notification_id("r1", 2);
        assert_eq!(delivery, Delivery::Notified(id));

        let posted = h.platform.posted();
        assert_eq!(posted.len(), 1);
        let (posted_id, notification) = &posted[0];
        assert_eq!(*posted_id, id);
        assert_eq!(notification.title, "Medicine Reminder");
        assert_eq!(notification.body, "Time to take Metformin (After Dinner)");
        assert!(!notification.auto_cancel);
        assert_eq!(notification.actions[0].intent.kind, ActionKind::Taken);
        assert_eq!(notification.actions[0].request_code, id.wrapping_add(1));
        assert_eq!(notification.actions[1].intent.kind, ActionKind::Snooze);
        assert_eq!(notification.actions[1].request_code, id.wrapping_add(2));
    }

    #[tokio::test]
    async fn test_alarm_refire_replaces_notification() {
        let h = harness_with(
            Arc::new(MemoryDatabase::new()),
            StaticSession::signed_out(),
            RecordingPlatform::new(),
        );

        h.receiver.on_receive(alarm("r1", 0)).await;
        h.receiver.on_receive(alarm("r1", 0)).await;

        let posted = h.platform.posted();
        assert_eq!(posted.len(), 2);
        assert_eq!(posted[0].0, posted[1].0);
    }

    #[tokio::test]
    async fn test_channel_created_once() {
        let h = harness_with(
            Arc::new(MemoryDatabase::new()),
            StaticSession::signed_out(),
            RecordingPlatform::new(),
        );

        h.receiver.on_receive(alarm("r1", 0)).await;
        h.receiver.on_receive(alarm("r1", 1)).await;
        h.receiver.on_receive(alarm("r2", 0)).await;

        assert_eq!(h.platform.channels_created(), 1);
        assert!(matches!(
            h.platform.notifier_calls().first(),
            Some(NotifierCall::CreateChannel(channel)) if channel.id == "reminder_channel"
        ));
    }

    #[tokio::test]
    async fn test_failed_channel_creation_is_retried() {
        let h = harness_with(
            Arc::new(MemoryDatabase::new()),
            StaticSession::signed_out(),
            RecordingPlatform::new().failing_channel(1),
        );

        let first = h.receiver.on_receive(alarm("r1", 0)).await;
        assert_eq!(first, Delivery::Notified(notification_id("r1", 0)));
        assert_eq!(h.platform.channels_created(), 0);

        h.receiver.on_receive(alarm("r1", 1)).await;
        h.receiver.on_receive(alarm("r1", 2)).await;
        assert_eq!(h.platform.channels_created(), 1);
    }

    #[tokio::test]
    async fn test_alarm_missing_index_has_no_side_effect() {
        let h = harness_with(
            Arc::new(MemoryDatabase::new()),
            StaticSession::signed_out(),
            RecordingPlatform::new(),
        );
        let extras = serde_json::json!({
            "reminderId": "r1",
            "medicineName": "Metformin",
            "time": "After Dinner"
        });
        let event = ReminderEvent::from_intent(REMINDER_ALARM, &extras);
        assert!(matches!(&event, ReminderEvent::AlarmFired(e) if e.time_index == -1));

        let delivery = h.receiver.on_receive(event).await;

        assert_eq!(delivery, Delivery::Skipped(SkipReason::InvalidPayload));
        assert!(h.platform.is_untouched());
    }

    #[tokio::test]
    async fn test_alarm_with_missing_or_empty_fields_is_ignored() {
        let h = harness_with(
            Arc::new(MemoryDatabase::new()),
            StaticSession::signed_out(),
            RecordingPlatform::new(),
        );
        let mut no_name = AlarmExtras::from(AlarmPayload {
            reminder_id: "r1".to_string(),
            medicine_name: "Metformin".to_string(),
            time: "After Dinner".to_string(),
            time_index: 0,
        });
        no_name.medicine_name = None;
        let mut empty_id = no_name.clone();
        empty_id.medicine_name = Some("Metformin".to_string());
        empty_id.reminder_id = Some(String::new());

        for extras in [no_name, empty_id, AlarmExtras::default()] {
            let delivery = h.receiver.on_receive(ReminderEvent::AlarmFired(extras)).await;
            assert_eq!(delivery, Delivery::Skipped(SkipReason::InvalidPayload));
        }
        assert!(h.platform.is_untouched());
    }

    #[tokio::test]
    async fn test_alarm_without_permission_is_skipped() {
        let h = harness_with(
            Arc::new(MemoryDatabase::new()),
            StaticSession::signed_out(),
            RecordingPlatform::new().with_permission(false),
        );

        let delivery = h.receiver.on_receive(alarm("r1", 0)).await;

        assert_eq!(delivery, Delivery::Skipped(SkipReason::PermissionDenied));
        assert!(h.platform.posted().is_empty());
    }

    #[tokio::test]
    async fn test_alarm_post_failure_is_contained() {
        let h = harness_with(
            Arc::new(MemoryDatabase::new()),
            StaticSession::signed_out(),
            RecordingPlatform::new().failing_posts(),
        );

        let delivery = h.receiver.on_receive(alarm("r1", 0)).await;

        assert_eq!(delivery, Delivery::Skipped(SkipReason::PostFailed));
    }

    #[test]
    fn test_event_from_intent() {
        let boot = ReminderEvent::from_intent(BOOT_COMPLETED, &serde_json::Value::Null);
        assert_eq!(boot, ReminderEvent::BootCompleted);

        let extras = serde_json::json!({
            "reminderId": "r1",
            "medicineName": "Metformin",
            "time": "After Dinner",
            "timeIndex": 2
        });
        let fired = ReminderEvent::from_intent(REMINDER_ALARM, &extras);
        let ReminderEvent::AlarmFired(extras) = fired else {
            panic!("expected alarm event");
        };
        assert_eq!(extras.into_payload().map(|p| p.time_index), Some(2));
    }

    #[tokio::test]
    async fn test_malformed_alarm_extras_have_no_side_effect() {
        let h = harness_with(
            Arc::new(MemoryDatabase::new()),
            StaticSession::signed_out(),
            RecordingPlatform::new(),
        );
        let malformed = [
            serde_json::json!({
                "reminderId": "r1",
                "medicineName": "Metformin",
                "time": "After Dinner",
                "timeIndex": "two"
            }),
            serde_json::json!({
                "reminderId": 5,
                "medicineName": "Metformin",
                "time": "After Dinner",
                "timeIndex": 0
            }),
            serde_json::json!("junk"),
            serde_json::Value::Null,
        ];

        for extras in &malformed {
            let event = ReminderEvent::from_intent(REMINDER_ALARM, extras);
            assert!(matches!(event, ReminderEvent::AlarmFired(_)));
            let delivery = h.receiver.on_receive(event).await;
            assert_eq!(delivery, Delivery::Skipped(SkipReason::InvalidPayload));
        }
        assert!(h.platform.is_untouched());

        let ReminderEvent::AlarmFired(extras) =
            ReminderEvent::from_intent(REMINDER_ALARM, &malformed[0])
        else {
            panic!("expected alarm event");
        };
        assert_eq!(extras.reminder_id.as_deref(), Some("r1"));
        assert_eq!(extras.time_index, -1);
    }

    #[test]
    fn test_index_beyond_i32_is_rejected() {
        let mut extras = AlarmExtras::from(AlarmPayload {
            reminder_id: "r1".to_string(),
            medicine_name: "Metformin".to_string(),
            time: "After Dinner".to_string(),
            time_index: 0,
        });
        extras.time_index = i64::from(i32::MAX) + 1;
        assert!(extras.clone().into_payload().is_none());

        extras.time_index = i64::from(i32::MAX);
        assert_eq!(
            extras.into_payload().map(|p| p.time_index),
            Some(i32::MAX as usize)
        );
    }
}

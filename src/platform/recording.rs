//! Recording platform
//!
//! Implements `AlarmScheduler` and `Notifier` by remembering every call instead
//! of touching a device. Failures and permission denial can be injected.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use super::types::{AlarmPayload, Notification, NotificationChannel};
use super::{AlarmScheduler, Notifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledAlarm {
    pub at: DateTime<Utc>,
    pub request_code: i32,
    pub payload: AlarmPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    CreateChannel(NotificationChannel),
    Post { id: i32, notification: Notification },
    Cancel(i32),
}

#[derive(Default)]
struct Recorded {
    alarms: Vec<ScheduledAlarm>,
    cancelled_alarms: Vec<i32>,
    notifier_calls: Vec<NotifierCall>,
    /// Channel creations still to reject
    channel_failures: usize,
}

pub struct RecordingPlatform {
    recorded: Mutex<Recorded>,
    permitted: bool,
    /// (reminder id, dose index) pairs whose scheduling fails
    failing_doses: HashSet<(String, usize)>,
    fail_posting: bool,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Recorded::default()),
            permitted: true,
            failing_doses: HashSet::new(),
            fail_posting: false,
        }
    }

    pub fn with_permission(mut self, permitted: bool) -> Self {
        self.permitted = permitted;
        self
    }

    pub fn failing_for(mut self, reminder_id: &str, time_index: usize) -> Self {
        self.failing_doses
            .insert((reminder_id.to_string(), time_index));
        self
    }

    /// Reject the first `times` channel creations
    pub fn failing_channel(mut self, times: usize) -> Self {
        self.recorded
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .channel_failures = times;
        self
    }

    pub fn failing_posts(mut self) -> Self {
        self.fail_posting = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn alarms(&self) -> Vec<ScheduledAlarm> {
        self.lock().alarms.clone()
    }

    pub fn cancelled_alarms(&self) -> Vec<i32> {
        self.lock().cancelled_alarms.clone()
    }

    pub fn notifier_calls(&self) -> Vec<NotifierCall> {
        self.lock().notifier_calls.clone()
    }

    pub fn posted(&self) -> Vec<(i32, Notification)> {
        self.lock()
            .notifier_calls
            .iter()
            .filter_map(|call| match call {
                NotifierCall::Post { id, notification } => Some((*id, notification.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn channels_created(&self) -> usize {
        self.lock()
            .notifier_calls
            .iter()
            .filter(|call| matches!(call, NotifierCall::CreateChannel(_)))
            .count()
    }

    /// True when nothing at all was asked of the platform
    pub fn is_untouched(&self) -> bool {
        let recorded = self.lock();
        recorded.alarms.is_empty()
            && recorded.cancelled_alarms.is_empty()
            && recorded.notifier_calls.is_empty()
    }
}

impl Default for RecordingPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmScheduler for RecordingPlatform {
    fn schedule_at(
        &self,
        at: DateTime<Utc>,
        request_code: i32,
        payload: &AlarmPayload,
    ) -> Result<()> {
        if self
            .failing_doses
            .contains(&(payload.reminder_id.clone(), payload.time_index))
        {
            return Err(anyhow!(
                "alarm manager rejected {} at index {}",
                payload.reminder_id,
                payload.time_index
            ));
        }

        self.lock().alarms.push(ScheduledAlarm {
            at,
            request_code,
            payload: payload.clone(),
        });
        Ok(())
    }

    fn cancel(&self, request_code: i32) -> Result<()> {
        self.lock().cancelled_alarms.push(request_code);
        Ok(())
    }
}

impl Notifier for RecordingPlatform {
    fn create_channel(&self, channel: &NotificationChannel) -> Result<()> {
        let mut recorded = self.lock();
        if recorded.channel_failures > 0 {
            recorded.channel_failures -= 1;
            return Err(anyhow!("could not register channel {}", channel.id));
        }
        recorded
            .notifier_calls
            .push(NotifierCall::CreateChannel(channel.clone()));
        Ok(())
    }

    fn notifications_permitted(&self) -> bool {
        self.permitted
    }

    fn post_notification(&self, id: i32, notification: &Notification) -> Result<()> {
        if self.fail_posting {
            return Err(anyhow!("notification manager refused id {}", id));
        }
        self.lock().notifier_calls.push(NotifierCall::Post {
            id,
            notification: notification.clone(),
        });
        Ok(())
    }

    fn cancel_notification(&self, id: i32) -> Result<()> {
        self.lock().notifier_calls.push(NotifierCall::Cancel(id));
        Ok(())
    }
}

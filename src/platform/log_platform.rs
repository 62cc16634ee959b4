//! Log-only platform for running the daemon off-device
//!
//! Every alarm and notification is written to the log instead of the OS.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use log::info;

use super::types::{AlarmPayload, Notification, NotificationChannel};
use super::{AlarmScheduler, Notifier};

pub struct LogPlatform {
    permitted: bool,
}

impl LogPlatform {
    pub fn new(permitted: bool) -> Self {
        Self { permitted }
    }
}

impl AlarmScheduler for LogPlatform {
    fn schedule_at(
        &self,
        at: DateTime<Utc>,
        request_code: i32,
        payload: &AlarmPayload,
    ) -> Result<()> {
        info!(
            "⏰ Alarm #{} set for {} ({} / {} at index {})",
            request_code,
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            payload.medicine_name,
            payload.time,
            payload.time_index
        );
        Ok(())
    }

    fn cancel(&self, request_code: i32) -> Result<()> {
        info!("Alarm #{request_code} cancelled");
        Ok(())
    }
}

impl Notifier for LogPlatform {
    fn create_channel(&self, channel: &NotificationChannel) -> Result<()> {
        info!(
            "Notification channel '{}' ({}) ready, importance {:?}",
            channel.id, channel.name, channel.importance
        );
        Ok(())
    }

    fn notifications_permitted(&self) -> bool {
        self.permitted
    }

    fn post_notification(&self, id: i32, notification: &Notification) -> Result<()> {
        let buttons: Vec<&str> = notification
            .actions
            .iter()
            .map(|a| a.label.as_str())
            .collect();
        info!(
            "🔔 [{}] {}: {} [{}]",
            id,
            notification.title,
            notification.body,
            buttons.join(" | ")
        );
        Ok(())
    }

    fn cancel_notification(&self, id: i32) -> Result<()> {
        info!("Notification [{id}] dismissed");
        Ok(())
    }
}

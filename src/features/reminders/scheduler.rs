//! # Reminder Scheduler
//!
//! Arms the platform alarm for one dose of a reminder. The alarm's request
//! code is the dose's notification id, so arming a dose twice replaces the
//! earlier alarm.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use crate::core::models::{Reminder, User};
use crate::features::reminders::notification::notification_id;
use crate::features::reminders::resolver::resolve_trigger_time;
use crate::platform::types::AlarmPayload;
use crate::platform::{AlarmScheduler, Clock};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, Utc};
use log::{debug, info};
use std::sync::Arc;

/// What happened to one dose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled(DateTime<Local>),
    /// No future trigger time; nothing was armed
    Skipped,
}

#[derive(Clone)]
pub struct ReminderScheduler {
    alarms: Arc<dyn AlarmScheduler>,
    clock: Arc<dyn Clock>,
}

impl ReminderScheduler {
    pub fn new(alarms: Arc<dyn AlarmScheduler>, clock: Arc<dyn Clock>) -> Self {
        Self { alarms, clock }
    }

    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    /// Resolve dose `index` and hand it to the alarm facility
    pub fn schedule_reminder(
        &self,
        reminder: &Reminder,
        user: &User,
        index: usize,
    ) -> Result<ScheduleOutcome> {
        let Some(label) = reminder.times.get(index) else {
            return Err(anyhow!(
                "Reminder {} has no dose at index {}",
                reminder.id,
                index
            ));
        };

        let now = self.clock.now();
        let Some(trigger) = resolve_trigger_time(reminder, user, index, &now) else {
            debug!(
                "Not scheduling reminder {} at index {}: no future trigger time",
                reminder.id, index
            );
            return Ok(ScheduleOutcome::Skipped);
        };

        let payload = AlarmPayload {
            reminder_id: reminder.id.clone(),
            medicine_name: reminder.medicine_name.clone(),
            time: label.clone(),
            time_index: index,
        };
        self.alarms.schedule_at(
            trigger.with_timezone(&Utc),
            notification_id(&reminder.id, index),
            &payload,
        )?;

        info!(
            "Scheduled {} for reminder {} at index {}: {}",
            reminder.medicine_name,
            reminder.id,
            index,
            trigger.format("%Y-%m-%d %H:%M")
        );
        Ok(ScheduleOutcome::Scheduled(trigger))
    }

    /// Drop the pending alarm for a dose
    pub fn cancel(&self, reminder_id: &str, index: usize) -> Result<()> {
        self.alarms.cancel(notification_id(reminder_id, index))
    }
}

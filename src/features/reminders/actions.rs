//! # Reminder Actions
//!
//! Applies the notification buttons back onto the stored reminder:
//! "Taken" flags the dose and clears its alarm and notification, "Snooze"
//! writes a new "HH:mm" override and re-arms the dose.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0

use crate::core::clock::{format_clock_time, plus_minutes};
use crate::core::models::User;
use crate::database::Database;
use crate::features::reminders::notification::notification_id;
use crate::features::reminders::scheduler::{ReminderScheduler, ScheduleOutcome};
use crate::platform::types::{ActionIntent, ActionKind};
use crate::platform::{Notifier, Session};
use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    MarkedTaken,
    /// Snooze stored; the outcome of re-arming the dose
    Snoozed(ScheduleOutcome),
    /// Nothing to act on (signed out, unknown reminder or dose)
    Ignored,
}

pub struct ReminderActionHandler {
    database: Arc<dyn Database>,
    session: Arc<dyn Session>,
    scheduler: ReminderScheduler,
    notifier: Arc<dyn Notifier>,
    snooze_minutes: i64,
}

impl ReminderActionHandler {
    pub fn new(
        database: Arc<dyn Database>,
        session: Arc<dyn Session>,
        scheduler: ReminderScheduler,
        notifier: Arc<dyn Notifier>,
        snooze_minutes: i64,
    ) -> Self {
        Self {
            database,
            session,
            scheduler,
            notifier,
            snooze_minutes,
        }
    }

    pub async fn handle(&self, intent: &ActionIntent) -> Result<ActionOutcome> {
        let Some(user_id) = self.session.current_user_id() else {
            warn!(
                "User not logged in, ignoring {} for reminder {}",
                intent.kind, intent.reminder_id
            );
            return Ok(ActionOutcome::Ignored);
        };

        let Some(mut reminder) = self
            .database
            .fetch_reminder(&user_id, &intent.reminder_id)
            .await?
        else {
            warn!(
                "Reminder {} not found for user {}, ignoring {}",
                intent.reminder_id, user_id, intent.kind
            );
            return Ok(ActionOutcome::Ignored);
        };

        let index = intent.time_index;
        match intent.kind {
            ActionKind::Taken => {
                if !reminder.mark_taken(index) {
                    warn!("Reminder {} has no dose at index {}", reminder.id, index);
                    return Ok(ActionOutcome::Ignored);
                }
                self.database.save_reminder(&user_id, &reminder).await?;

                if let Err(e) = self.scheduler.cancel(&reminder.id, index) {
                    warn!(
                        "Failed to cancel alarm for reminder {} at index {}: {e:#}",
                        reminder.id, index
                    );
                }
                self.dismiss(&reminder.id, index);

                info!(
                    "Marked {} taken for reminder {} at index {}",
                    reminder.medicine_name, reminder.id, index
                );
                Ok(ActionOutcome::MarkedTaken)
            }
            ActionKind::Snooze => {
                let now = self.scheduler.now();
                let until =
                    format_clock_time(plus_minutes(now.naive_local().time(), self.snooze_minutes));
                if !reminder.set_snooze(index, until.clone()) {
                    warn!("Reminder {} has no dose at index {}", reminder.id, index);
                    return Ok(ActionOutcome::Ignored);
                }
                self.database.save_reminder(&user_id, &reminder).await?;
                self.dismiss(&reminder.id, index);

                // Snooze ignores meal preferences, so a missing profile is fine here
                let user = self
                    .database
                    .fetch_user(&user_id)
                    .await?
                    .unwrap_or_else(|| User {
                        uid: user_id.clone(),
                        ..Default::default()
                    });
                let outcome = self.scheduler.schedule_reminder(&reminder, &user, index)?;

                info!(
                    "Snoozed {} for reminder {} at index {} until {}",
                    reminder.medicine_name, reminder.id, index, until
                );
                Ok(ActionOutcome::Snoozed(outcome))
            }
        }
    }

    fn dismiss(&self, reminder_id: &str, index: usize) {
        if let Err(e) = self
            .notifier
            .cancel_notification(notification_id(reminder_id, index))
        {
            warn!(
                "Failed to dismiss notification for reminder {reminder_id} at index {index}: {e:#}"
            );
        }
    }
}

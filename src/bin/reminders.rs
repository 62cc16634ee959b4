use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;

use vitalrite::core::Config;
use vitalrite::database::MemoryDatabase;
use vitalrite::features::reminders::{
    AlarmExtras, ActionOutcome, Delivery, ReminderActionHandler, ReminderEvent, ReminderReceiver,
    ReminderScheduler,
};
use vitalrite::platform::{ActionIntent, ActionKind, LogPlatform, StaticSession, SystemClock};
use vitalrite::platform::{Clock, Session};

const USAGE: &str = "usage: vitalrite-reminders <command>

commands:
  boot                                          re-arm every untaken dose
  alarm <reminderId> <medicineName> <time> <timeIndex>
                                                deliver a fired alarm
  taken <reminderId> <timeIndex>                mark a dose as taken
  snooze <reminderId> <timeIndex>               snooze a dose";

enum Command {
    Receive(ReminderEvent),
    Action(ActionIntent),
}

fn parse_index(raw: &str) -> Result<usize> {
    raw.parse::<usize>()
        .map_err(|e| anyhow!("Invalid time index '{}': {}", raw, e))
}

fn parse_command(args: &[String]) -> Result<Command> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["boot"] => Ok(Command::Receive(ReminderEvent::BootCompleted)),
        ["alarm", reminder_id, medicine_name, time, index] => {
            Ok(Command::Receive(ReminderEvent::AlarmFired(AlarmExtras {
                reminder_id: Some(reminder_id.to_string()),
                medicine_name: Some(medicine_name.to_string()),
                time: Some(time.to_string()),
                time_index: index.parse::<i64>().unwrap_or(-1),
            })))
        }
        [action @ ("taken" | "snooze"), reminder_id, index] => {
            let kind = if *action == "taken" {
                ActionKind::Taken
            } else {
                ActionKind::Snooze
            };
            Ok(Command::Action(ActionIntent {
                kind,
                reminder_id: reminder_id.to_string(),
                time_index: parse_index(index)?,
            }))
        }
        _ => Err(anyhow!("{USAGE}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command(&args)?;

    info!("Loading reminder data from {}", config.data_path);
    let database = Arc::new(MemoryDatabase::load(&config.data_path)?);
    let platform = Arc::new(LogPlatform::new(config.notifications_permitted));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let session: Arc<dyn Session> = Arc::new(match &config.user_id {
        Some(uid) => StaticSession::signed_in(uid.clone()),
        None => StaticSession::signed_out(),
    });
    let scheduler = ReminderScheduler::new(platform.clone(), clock);

    match command {
        Command::Receive(event) => {
            let receiver =
                ReminderReceiver::new(database.clone(), session, scheduler, platform.clone());
            match receiver.on_receive(event).await {
                Delivery::Rearmed(report) => info!(
                    "Boot re-arm done: {} scheduled, {} skipped, {} failed",
                    report.scheduled, report.skipped, report.failed
                ),
                Delivery::Notified(id) => info!("Reminder notification {id} delivered"),
                Delivery::Skipped(reason) => info!("Nothing delivered: {reason:?}"),
            }
        }
        Command::Action(intent) => {
            let handler = ReminderActionHandler::new(
                database.clone(),
                session,
                scheduler,
                platform.clone(),
                config.snooze_minutes,
            );
            match handler.handle(&intent).await {
                Ok(ActionOutcome::Ignored) => info!("{} ignored", intent.kind),
                Ok(outcome) => {
                    info!("{} applied: {:?}", intent.kind, outcome);
                    database.save(&config.data_path)?;
                }
                Err(e) => {
                    error!("Failed to apply {}: {}", intent.kind, e);
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}

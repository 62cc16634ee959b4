//! Payloads exchanged with the alarm and notification facilities

use serde::{Deserialize, Serialize};

/// Extras attached to a scheduled alarm and handed back when it fires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmPayload {
    pub reminder_id: String,
    pub medicine_name: String,
    /// Display string for the dose, e.g. "After Breakfast"
    pub time: String,
    pub time_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Importance {
    Default,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Default,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    Silent,
    DefaultNotification,
    /// The device's default alarm alert tone
    AlarmAlert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub importance: Importance,
    pub lights: bool,
    pub vibration: bool,
    pub sound: Sound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    #[serde(rename = "ACTION_TAKEN")]
    Taken,
    #[serde(rename = "ACTION_SNOOZE")]
    Snooze,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Taken => "ACTION_TAKEN",
            ActionKind::Snooze => "ACTION_SNOOZE",
        }
    }

    /// Button label shown on the notification
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Taken => "Taken",
            ActionKind::Snooze => "Snooze",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "ACTION_TAKEN" => Ok(ActionKind::Taken),
            "ACTION_SNOOZE" => Ok(ActionKind::Snooze),
            _ => Err(anyhow::anyhow!("Unknown reminder action: {}", s)),
        }
    }
}

/// What a notification button delivers when pressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionIntent {
    #[serde(rename = "action")]
    pub kind: ActionKind,
    pub reminder_id: String,
    pub time_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
    /// Identity of the pending intent behind the button
    pub request_code: i32,
    pub intent: ActionIntent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub channel_id: String,
    pub title: String,
    pub body: String,
    pub priority: Priority,
    /// Dismissed by tapping the body when true
    pub auto_cancel: bool,
    /// Cannot be swiped away when true
    pub ongoing: bool,
    pub sound: Sound,
    /// Off/on durations in milliseconds
    pub vibration_pattern: Vec<u64>,
    pub actions: Vec<NotificationAction>,
}

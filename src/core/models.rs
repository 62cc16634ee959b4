//! # Data Model
//!
//! Documents persisted by the hosted database. Field names follow the stored
//! camelCase keys so records deserialize straight from exported documents.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Tolerate short `taken`/`snoozeTimes` sequences in Reminder mutators
//! - 1.0.0: Initial release

use serde::{Deserialize, Serialize};

/// Patient profile. Only the four time-of-day preferences drive reminders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub uid: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub email: String,
    pub breakfast_time: Option<String>,
    pub lunch_time: Option<String>,
    pub dinner_time: Option<String>,
    pub sleep_time: Option<String>,
    pub blood_group: String,
    pub medical_condition: String,
    pub operation: String,
    pub allergy: String,
    pub emergency_contact: String,
    pub address: String,
    pub active_prescriptions: Vec<String>,
    pub last_reminder_reset_date: String,
}

/// Which of the user's daily anchors a dose label refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyAnchor {
    Breakfast,
    Lunch,
    Dinner,
    Sleep,
}

impl User {
    /// Returns the stored "HH:mm" preference, treating empty strings as unset.
    pub fn anchor_time(&self, anchor: DailyAnchor) -> Option<&str> {
        let value = match anchor {
            DailyAnchor::Breakfast => &self.breakfast_time,
            DailyAnchor::Lunch => &self.lunch_time,
            DailyAnchor::Dinner => &self.dinner_time,
            DailyAnchor::Sleep => &self.sleep_time,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Doctor {
    pub uid: String,
    pub name: String,
    pub name_lowercase: String,
    pub age: String,
    pub gender: String,
    pub email: String,
    pub degree: String,
    pub specialization: String,
    pub experience: String,
    pub clinic_name: String,
    pub clinic_address: String,
    pub clinic_phone: String,
    pub hospital_name: String,
    pub hospital_address: String,
    pub hospital_phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    /// "yyyy-MM-dd"
    pub date: String,
    /// "HH:mm"
    pub time: String,
    pub age: String,
    pub gender: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Prescription {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub doctor_name: String,
    pub date: String,
    pub main_cause: String,
    pub medicines: Vec<Medicine>,
    pub weight: String,
    pub age: String,
    /// "yyyy-MM-dd"
    pub expiry_date: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoctorAvailability {
    pub doctor_id: String,
    pub open_timing: String,
    pub close_timing: String,
    pub max_appointments_per_hour: u32,
    pub holidays: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Medicine {
    pub name: String,
    pub diagnosis: String,
    /// Older documents store a single comma-separated string here
    #[serde(rename = "time")]
    pub times: MedicineTimes,
    pub no_of_days: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MedicineTimes {
    List(Vec<String>),
    Single(String),
    Missing,
}

impl Default for MedicineTimes {
    fn default() -> Self {
        MedicineTimes::List(Vec::new())
    }
}

impl MedicineTimes {
    /// Normalized list of dose labels
    pub fn to_list(&self) -> Vec<String> {
        match self {
            MedicineTimes::List(items) => items
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            MedicineTimes::Single(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            MedicineTimes::Missing => Vec::new(),
        }
    }
}

/// One medicine's dose schedule for a single day.
///
/// `times`, `taken` and `snooze_times` are parallel by dose index. The shorter
/// two may lag behind `times`; a missing entry reads as "not taken" / "no snooze".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reminder {
    pub id: String,
    pub medicine_name: String,
    pub times: Vec<String>,
    pub taken: Vec<bool>,
    pub snooze_times: Vec<Option<String>>,
    /// "yyyy-MM-dd"
    pub date: String,
}

impl Reminder {
    pub fn dose_count(&self) -> usize {
        self.times.len()
    }

    pub fn is_taken(&self, index: usize) -> bool {
        self.taken.get(index).copied().unwrap_or(false)
    }

    pub fn snooze_time(&self, index: usize) -> Option<&str> {
        self.snooze_times.get(index).and_then(|s| s.as_deref())
    }

    /// Dose indices that still need an alarm
    pub fn pending_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.times.len()).filter(move |&i| !self.is_taken(i))
    }

    pub fn all_taken(&self) -> bool {
        self.pending_indices().next().is_none()
    }

    /// Marks a dose as taken. Returns false for an out-of-range index.
    pub fn mark_taken(&mut self, index: usize) -> bool {
        if index >= self.times.len() {
            return false;
        }
        if self.taken.len() <= index {
            self.taken.resize(index + 1, false);
        }
        self.taken[index] = true;
        true
    }

    /// Overrides a dose's time with an "HH:mm" snooze. Returns false for an out-of-range index.
    pub fn set_snooze(&mut self, index: usize, time: impl Into<String>) -> bool {
        if index >= self.times.len() {
            return false;
        }
        if self.snooze_times.len() <= index {
            self.snooze_times.resize(index + 1, None);
        }
        self.snooze_times[index] = Some(time.into());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder(times: &[&str]) -> Reminder {
        Reminder {
            id: "r1".to_string(),
            medicine_name: "Paracetamol".to_string(),
            times: times.iter().map(|t| t.to_string()).collect(),
            taken: vec![],
            snooze_times: vec![],
            date: "2025-03-20".to_string(),
        }
    }

    #[test]
    fn test_reminder_deserializes_document_fields() {
        let json = r#"{
            "id": "abc",
            "medicineName": "Metformin",
            "times": ["Before Breakfast", "After Dinner"],
            "taken": [true, false],
            "snoozeTimes": [null, "21:30"],
            "date": "2025-03-20"
        }"#;
        let reminder: Reminder = serde_json::from_str(json).unwrap();

        assert_eq!(reminder.medicine_name, "Metformin");
        assert!(reminder.is_taken(0));
        assert!(!reminder.is_taken(1));
        assert_eq!(reminder.snooze_time(0), None);
        assert_eq!(reminder.snooze_time(1), Some("21:30"));
    }

    #[test]
    fn test_short_parallel_sequences_read_as_defaults() {
        let mut r = reminder(&["After Breakfast", "After Lunch", "Before Sleep"]);
        r.taken = vec![true];

        assert!(!r.is_taken(2));
        assert_eq!(r.snooze_time(2), None);
        assert_eq!(r.pending_indices().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_mark_taken_pads_sequence() {
        let mut r = reminder(&["After Breakfast", "After Lunch", "Before Sleep"]);

        assert!(r.mark_taken(2));
        assert_eq!(r.taken, vec![false, false, true]);
        assert!(!r.mark_taken(3));
        assert!(!r.all_taken());

        r.mark_taken(0);
        r.mark_taken(1);
        assert!(r.all_taken());
    }

    #[test]
    fn test_set_snooze_pads_sequence() {
        let mut r = reminder(&["After Breakfast", "After Lunch"]);

        assert!(r.set_snooze(1, "13:40"));
        assert_eq!(r.snooze_times, vec![None, Some("13:40".to_string())]);
        assert!(!r.set_snooze(5, "13:40"));
    }

    #[test]
    fn test_user_empty_preference_is_unset() {
        let json = r#"{"uid": "u1", "breakfastTime": "", "lunchTime": "12:30"}"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.anchor_time(DailyAnchor::Breakfast), None);
        assert_eq!(user.anchor_time(DailyAnchor::Lunch), Some("12:30"));
        assert_eq!(user.anchor_time(DailyAnchor::Dinner), None);
    }

    #[test]
    fn test_medicine_times_both_shapes() {
        let list: Medicine =
            serde_json::from_str(r#"{"name": "A", "time": ["After Lunch", "Before Sleep"]}"#)
                .unwrap();
        let single: Medicine =
            serde_json::from_str(r#"{"name": "B", "time": "After Lunch, Before Sleep"}"#).unwrap();
        let null: Medicine = serde_json::from_str(r#"{"name": "C", "time": null}"#).unwrap();

        assert_eq!(list.times.to_list(), vec!["After Lunch", "Before Sleep"]);
        assert_eq!(single.times.to_list(), vec!["After Lunch", "Before Sleep"]);
        assert!(null.times.to_list().is_empty());
    }
}

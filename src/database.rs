//! # Database
//!
//! Access to the hosted document store: `Users/{uid}` and
//! `Users/{uid}/Reminders/{id}`. The `Database` trait is the seam; the bundled
//! `MemoryDatabase` keeps documents in memory and can load/save a YAML snapshot.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add YAML snapshot load/save for the daemon
//! - 1.0.0: Initial release with in-memory store

use crate::core::models::{Reminder, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait Database: Send + Sync {
    /// `Ok(None)` when no user document exists
    async fn fetch_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Every reminder under the user, in stored order
    async fn fetch_reminders(&self, user_id: &str) -> Result<Vec<Reminder>>;

    async fn fetch_reminder(&self, user_id: &str, reminder_id: &str) -> Result<Option<Reminder>>;

    /// Insert or replace by reminder id
    async fn save_reminder(&self, user_id: &str, reminder: &Reminder) -> Result<()>;
}

/// On-disk snapshot layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    users: Vec<UserRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UserRecord {
    #[serde(flatten)]
    user: User,
    #[serde(default)]
    reminders: Vec<Reminder>,
}

#[derive(Clone, Default)]
pub struct MemoryDatabase {
    users: DashMap<String, User>,
    reminders: DashMap<String, Vec<Reminder>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a YAML snapshot from disk
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read data file {path}"))?;
        let db = Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse data file {path}"))?;
        info!("📄 Loaded {} user(s) from {}", db.users.len(), path);
        Ok(db)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_yaml::from_str(contents)?;
        let db = Self::new();
        for record in snapshot.users {
            let uid = record.user.uid.clone();
            db.reminders.insert(uid.clone(), record.reminders);
            db.users.insert(uid, record.user);
        }
        Ok(db)
    }

    /// Write the current contents back as YAML
    pub fn save(&self, path: &str) -> Result<()> {
        std::fs::write(path, self.to_yaml()?)
            .with_context(|| format!("Failed to write data file {path}"))?;
        debug!("Saved data file {path}");
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        let mut users: Vec<UserRecord> = self
            .users
            .iter()
            .map(|entry| UserRecord {
                user: entry.value().clone(),
                reminders: self
                    .reminders
                    .get(entry.key())
                    .map(|r| r.value().clone())
                    .unwrap_or_default(),
            })
            .collect();
        users.sort_by(|a, b| a.user.uid.cmp(&b.user.uid));
        Ok(serde_yaml::to_string(&Snapshot { users })?)
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.uid.clone(), user);
    }

    pub fn insert_reminder(&self, user_id: &str, reminder: Reminder) {
        self.reminders
            .entry(user_id.to_string())
            .or_default()
            .push(reminder);
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn fetch_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users.get(user_id).map(|u| u.value().clone()))
    }

    async fn fetch_reminders(&self, user_id: &str) -> Result<Vec<Reminder>> {
        Ok(self
            .reminders
            .get(user_id)
            .map(|r| r.value().clone())
            .unwrap_or_default())
    }

    async fn fetch_reminder(&self, user_id: &str, reminder_id: &str) -> Result<Option<Reminder>> {
        Ok(self
            .reminders
            .get(user_id)
            .and_then(|list| list.iter().find(|r| r.id == reminder_id).cloned()))
    }

    async fn save_reminder(&self, user_id: &str, reminder: &Reminder) -> Result<()> {
        let mut list = self.reminders.entry(user_id.to_string()).or_default();
        match list.iter_mut().find(|r| r.id == reminder.id) {
            Some(existing) => *existing = reminder.clone(),
            None => list.push(reminder.clone()),
        }
        Ok(())
    }
}

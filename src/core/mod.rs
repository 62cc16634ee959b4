//! # Core Module
//!
//! Core domain types, configuration, and wall-clock parsing shared by every feature.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add clock module with "HH:mm" / "yyyy-MM-dd" helpers
//! - 1.0.0: Initial creation with config and models

pub mod clock;
pub mod config;
pub mod models;

// Re-export commonly used items
pub use clock::{parse_clock_time, parse_date, parse_date_time, DATE_FORMAT, TIME_FORMAT};
pub use config::Config;
pub use models::{
    Appointment, DailyAnchor, Doctor, DoctorAvailability, Medicine, MedicineTimes, Prescription,
    Reminder, User,
};

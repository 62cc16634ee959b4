//! # Features
//!
//! Domain features built on the core types and platform seams.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Add appointments and prescriptions
//! - 1.0.0: Initial release with reminders

pub mod appointments;
pub mod prescriptions;
pub mod reminders;

pub use appointments::{available_slots, generate_time_slots, validate_booking};
pub use prescriptions::SearchFilter;
pub use reminders::{
    ReminderActionHandler, ReminderEvent, ReminderReceiver, ReminderScheduler,
};

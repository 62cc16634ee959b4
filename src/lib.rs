// Core layer - shared types, configuration and clock helpers
pub mod core;

// Features layer - reminders, appointments, prescriptions
pub mod features;

// Platform layer - alarm, notification, session and clock seams
pub mod platform;

// Infrastructure
pub mod database;

pub use core::Config;
pub use database::{Database, MemoryDatabase};

pub use features::{
    // Reminders
    ReminderActionHandler, ReminderEvent, ReminderReceiver, ReminderScheduler,
    // Appointments
    available_slots, generate_time_slots, validate_booking,
    // Prescriptions
    SearchFilter,
};

pub use platform::{AlarmScheduler, Clock, Notifier, Session};

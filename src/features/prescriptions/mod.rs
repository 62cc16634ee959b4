//! # Feature: Prescriptions
//!
//! Expiry rules and search for e-prescriptions. A prescription is active while
//! its `active` flag is set and its expiry date is still ahead.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.1.0
//! - **Toggleable**: false

use crate::core::clock::parse_date;
use crate::core::models::Prescription;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Which field a search query matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchFilter {
    Diagnosis,
    DoctorName,
    Prescription,
}

impl SearchFilter {
    pub fn label(&self) -> &'static str {
        match self {
            SearchFilter::Diagnosis => "Diagnosis",
            SearchFilter::DoctorName => "Doctor Name",
            SearchFilter::Prescription => "Prescription",
        }
    }
}

impl Prescription {
    pub fn expiry(&self) -> Option<NaiveDate> {
        parse_date(&self.expiry_date)
    }

    /// Unparseable expiry dates never count as current
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.active && self.expiry().is_some_and(|expiry| expiry > today)
    }

    /// Still flagged active although it has expired. A prescription expires at
    /// the start of its expiry date, so one expiring today qualifies.
    pub fn needs_deactivation(&self, today: NaiveDate) -> bool {
        self.active && self.expiry().is_some_and(|expiry| expiry <= today)
    }

    fn matches(&self, query: &str, filters: &HashSet<SearchFilter>) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        let field = if filters.contains(&SearchFilter::Diagnosis) {
            &self.main_cause
        } else if filters.contains(&SearchFilter::DoctorName) {
            &self.doctor_name
        } else if filters.contains(&SearchFilter::Prescription) {
            &self.name
        } else {
            return true;
        };
        field.to_lowercase().contains(&query)
    }
}

/// Split into (active, past)
pub fn partition(
    prescriptions: Vec<Prescription>,
    today: NaiveDate,
) -> (Vec<Prescription>, Vec<Prescription>) {
    prescriptions.into_iter().partition(|p| p.is_current(today))
}

/// Case-insensitive search. With several filters selected, the first in
/// Diagnosis, Doctor Name, Prescription order decides the field.
pub fn filter<'a>(
    prescriptions: &'a [Prescription],
    query: &str,
    filters: &HashSet<SearchFilter>,
) -> Vec<&'a Prescription> {
    prescriptions
        .iter()
        .filter(|p| p.matches(query, filters))
        .collect()
}

/// Keep only ids whose prescription is still current
pub fn prune_active_ids(
    ids: &[String],
    prescriptions: &[Prescription],
    today: NaiveDate,
) -> Vec<String> {
    ids.iter()
        .filter(|id| {
            prescriptions
                .iter()
                .any(|p| &p.id == *id && p.is_current(today))
        })
        .cloned()
        .collect()
}

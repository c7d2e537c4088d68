//! Typed records sent to the submission collaborator.
//!
//! Records are produced only by a successful form validation. They are
//! write-once: nothing in this crate mutates or reads them back.

use serde::{Deserialize, Serialize};

use crate::blood::{BloodType, Gender, Urgency};

/// A donor registration, as inserted into the `donors` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorRecord {
    /// Donor's full name.
    pub full_name: String,
    /// Age in years, 18 to 65.
    pub age: u8,
    /// Self-reported gender.
    pub gender: Gender,
    /// Donor's blood type.
    pub blood_type: BloodType,
    /// Phone number, free format.
    pub contact_number: String,
    /// Email address.
    pub email: String,
    /// Postal address.
    pub address: String,
    /// Free-text medical history. Blank input is stored as `null`, never omitted.
    pub medical_history: Option<String>,
}

/// A blood request, as inserted into the `blood_requests` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodRequestRecord {
    /// Name of the person filing the request.
    pub name: String,
    /// Requester's phone number.
    pub contact_number: String,
    /// Blood type needed.
    pub blood_type: BloodType,
    /// Units requested, at least 1.
    pub quantity: u32,
    /// Hospital where the patient is treated.
    pub hospital_name: String,
    /// Patient the blood is for.
    pub patient_name: String,
    /// How soon the blood is needed.
    pub urgency: Urgency,
    /// Free-text patient condition. Blank input is stored as `null`, never omitted.
    pub patient_condition: Option<String>,
}

/// Turn a blank optional text field into `None`.
#[must_use]
pub(crate) fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

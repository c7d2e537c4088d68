//! Blood request form.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::blood::Urgency;
use crate::records::{optional_text, BloodRequestRecord};

use super::rules::{
    parse_quantity, validate_quantity, validate_request_blood_type, validate_urgency,
    QUANTITY_MESSAGE, REQUEST_BLOOD_TYPE_MESSAGE, URGENCY_MESSAGE,
};
use super::{Form, Notice, NoticeKind, Violations};

/// Field values of the blood request form, as typed by the user.
///
/// A fresh form asks for one unit at normal urgency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RequestForm {
    /// Requester's name.
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    /// Requester's phone number.
    #[validate(length(min = 10, message = "Contact number is required"))]
    pub contact_number: String,
    /// Blood type needed.
    #[validate(custom(function = "validate_request_blood_type"))]
    pub blood_type: String,
    /// Units requested.
    #[validate(custom(function = "validate_quantity"))]
    pub quantity: String,
    /// Treating hospital.
    #[validate(length(min = 2, message = "Hospital name is required"))]
    pub hospital_name: String,
    /// Patient's name.
    #[validate(length(min = 2, message = "Patient name is required"))]
    pub patient_name: String,
    /// Urgency level.
    #[validate(custom(function = "validate_urgency"))]
    pub urgency: String,
    /// Optional free text.
    pub patient_condition: String,
}

impl Default for RequestForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            contact_number: String::new(),
            blood_type: String::new(),
            quantity: "1".to_string(),
            hospital_name: String::new(),
            patient_name: String::new(),
            urgency: Urgency::default().label().to_string(),
            patient_condition: String::new(),
        }
    }
}

impl RequestForm {
    /// Copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            contact_number: self.contact_number.trim().to_string(),
            blood_type: self.blood_type.trim().to_string(),
            quantity: self.quantity.trim().to_string(),
            hospital_name: self.hospital_name.trim().to_string(),
            patient_name: self.patient_name.trim().to_string(),
            urgency: self.urgency.trim().to_string(),
            patient_condition: self.patient_condition.trim().to_string(),
        }
    }
}

impl Form for RequestForm {
    type Record = BloodRequestRecord;

    const NAME: &'static str = "request";

    const FIELDS: &'static [&'static str] = &[
        "name",
        "contact_number",
        "blood_type",
        "quantity",
        "hospital_name",
        "patient_name",
        "urgency",
        "patient_condition",
    ];

    fn value(&self, field: &str) -> Option<&str> {
        let value = match field {
            "name" => &self.name,
            "contact_number" => &self.contact_number,
            "blood_type" => &self.blood_type,
            "quantity" => &self.quantity,
            "hospital_name" => &self.hospital_name,
            "patient_name" => &self.patient_name,
            "urgency" => &self.urgency,
            "patient_condition" => &self.patient_condition,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn value_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "name" => Some(&mut self.name),
            "contact_number" => Some(&mut self.contact_number),
            "blood_type" => Some(&mut self.blood_type),
            "quantity" => Some(&mut self.quantity),
            "hospital_name" => Some(&mut self.hospital_name),
            "patient_name" => Some(&mut self.patient_name),
            "urgency" => Some(&mut self.urgency),
            "patient_condition" => Some(&mut self.patient_condition),
            _ => None,
        }
    }

    fn validate_record(&self) -> Result<BloodRequestRecord, Violations> {
        let form = self.trimmed();
        form.validate()
            .map_err(|errors| Violations::from_validation_errors(&errors, Self::FIELDS))?;

        let blood_type = form
            .blood_type
            .parse()
            .map_err(|_| Violations::single("blood_type", REQUEST_BLOOD_TYPE_MESSAGE))?;
        let quantity = parse_quantity(&form.quantity)
            .ok_or_else(|| Violations::single("quantity", QUANTITY_MESSAGE))?;
        let urgency = form
            .urgency
            .parse()
            .map_err(|_| Violations::single("urgency", URGENCY_MESSAGE))?;

        Ok(BloodRequestRecord {
            name: form.name,
            contact_number: form.contact_number,
            blood_type,
            quantity,
            hospital_name: form.hospital_name,
            patient_name: form.patient_name,
            urgency,
            patient_condition: optional_text(&form.patient_condition),
        })
    }

    fn success_notice() -> Notice {
        Notice {
            kind: NoticeKind::Success,
            title: "Success",
            description: "Blood request submitted successfully!",
        }
    }

    fn failure_notice() -> Notice {
        Notice {
            kind: NoticeKind::Error,
            title: "Error",
            description: "There was an error submitting your request. Please try again.",
        }
    }
}

//! Donor registration form.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::records::{optional_text, DonorRecord};

use super::rules::{
    parse_age, validate_age, validate_donor_blood_type, validate_gender, AGE_MESSAGE,
    DONOR_BLOOD_TYPE_MESSAGE, GENDER_MESSAGE,
};
use super::{Form, Notice, NoticeKind, Violations};

/// Field values of the donor registration form, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DonorForm {
    /// Donor's full name.
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub full_name: String,
    /// Age in whole years.
    #[validate(custom(function = "validate_age"))]
    pub age: String,
    /// One of the gender options.
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
    /// One of the eight blood type labels.
    #[validate(custom(function = "validate_donor_blood_type"))]
    pub blood_type: String,
    /// Phone number.
    #[validate(length(min = 10, message = "Contact number is required"))]
    pub contact_number: String,
    /// Email address.
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    /// Postal address.
    #[validate(length(min = 5, message = "Address is required"))]
    pub address: String,
    /// Optional free text.
    pub medical_history: String,
}

impl DonorForm {
    /// Copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            age: self.age.trim().to_string(),
            gender: self.gender.trim().to_string(),
            blood_type: self.blood_type.trim().to_string(),
            contact_number: self.contact_number.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            medical_history: self.medical_history.trim().to_string(),
        }
    }
}

impl Form for DonorForm {
    type Record = DonorRecord;

    const NAME: &'static str = "donor";

    const FIELDS: &'static [&'static str] = &[
        "full_name",
        "age",
        "gender",
        "blood_type",
        "contact_number",
        "email",
        "address",
        "medical_history",
    ];

    fn value(&self, field: &str) -> Option<&str> {
        let value = match field {
            "full_name" => &self.full_name,
            "age" => &self.age,
            "gender" => &self.gender,
            "blood_type" => &self.blood_type,
            "contact_number" => &self.contact_number,
            "email" => &self.email,
            "address" => &self.address,
            "medical_history" => &self.medical_history,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn value_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "full_name" => Some(&mut self.full_name),
            "age" => Some(&mut self.age),
            "gender" => Some(&mut self.gender),
            "blood_type" => Some(&mut self.blood_type),
            "contact_number" => Some(&mut self.contact_number),
            "email" => Some(&mut self.email),
            "address" => Some(&mut self.address),
            "medical_history" => Some(&mut self.medical_history),
            _ => None,
        }
    }

    fn validate_record(&self) -> Result<DonorRecord, Violations> {
        let form = self.trimmed();
        form.validate()
            .map_err(|errors| Violations::from_validation_errors(&errors, Self::FIELDS))?;

        let age = parse_age(&form.age).ok_or_else(|| Violations::single("age", AGE_MESSAGE))?;
        let gender = form
            .gender
            .parse()
            .map_err(|_| Violations::single("gender", GENDER_MESSAGE))?;
        let blood_type = form
            .blood_type
            .parse()
            .map_err(|_| Violations::single("blood_type", DONOR_BLOOD_TYPE_MESSAGE))?;

        Ok(DonorRecord {
            full_name: form.full_name,
            age,
            gender,
            blood_type,
            contact_number: form.contact_number,
            email: form.email,
            address: form.address,
            medical_history: optional_text(&form.medical_history),
        })
    }

    fn success_notice() -> Notice {
        Notice {
            kind: NoticeKind::Success,
            title: "Success!",
            description: "Thank you for registering as a donor!",
        }
    }

    fn failure_notice() -> Notice {
        Notice {
            kind: NoticeKind::Error,
            title: "Error",
            description: "Failed to register as donor. Please try again.",
        }
    }
}

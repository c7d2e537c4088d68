//! Custom field rules plugged into the `validator` derive.
//!
//! Each rule carries its user-facing message in the returned
//! [`ValidationError`], so the derive does not need a `message` attribute.

use std::borrow::Cow;
use std::str::FromStr;

use validator::ValidationError;

use crate::blood::{BloodType, Gender, Urgency};

pub(crate) const AGE_MESSAGE: &str = "Age must be between 18 and 65";
pub(crate) const QUANTITY_MESSAGE: &str = "Quantity must be greater than 0";
pub(crate) const GENDER_MESSAGE: &str = "Please select your gender";
pub(crate) const DONOR_BLOOD_TYPE_MESSAGE: &str = "Please select your blood type";
pub(crate) const REQUEST_BLOOD_TYPE_MESSAGE: &str = "Please select blood type required";
pub(crate) const URGENCY_MESSAGE: &str = "Please select urgency level";

/// Youngest and oldest eligible donor ages.
pub(crate) const DONOR_AGE_RANGE: std::ops::RangeInclusive<u8> = 18..=65;

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Parse a donor age. Only whole numbers inside [`DONOR_AGE_RANGE`] pass.
pub(crate) fn parse_age(value: &str) -> Option<u8> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|age| DONOR_AGE_RANGE.contains(age))
}

/// Parse a requested unit count. Only whole numbers above zero pass.
pub(crate) fn parse_quantity(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|q| *q > 0)
}

pub(crate) fn validate_age(value: &str) -> Result<(), ValidationError> {
    parse_age(value)
        .map(|_| ())
        .ok_or_else(|| failure("age_range", AGE_MESSAGE))
}

pub(crate) fn validate_quantity(value: &str) -> Result<(), ValidationError> {
    parse_quantity(value)
        .map(|_| ())
        .ok_or_else(|| failure("quantity_positive", QUANTITY_MESSAGE))
}

fn validate_option<T: FromStr>(
    value: &str,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    value
        .parse::<T>()
        .map(|_| ())
        .map_err(|_| failure(code, message))
}

pub(crate) fn validate_gender(value: &str) -> Result<(), ValidationError> {
    validate_option::<Gender>(value, "gender_option", GENDER_MESSAGE)
}

pub(crate) fn validate_donor_blood_type(value: &str) -> Result<(), ValidationError> {
    validate_option::<BloodType>(value, "blood_type_option", DONOR_BLOOD_TYPE_MESSAGE)
}

pub(crate) fn validate_request_blood_type(value: &str) -> Result<(), ValidationError> {
    validate_option::<BloodType>(value, "blood_type_option", REQUEST_BLOOD_TYPE_MESSAGE)
}

pub(crate) fn validate_urgency(value: &str) -> Result<(), ValidationError> {
    validate_option::<Urgency>(value, "urgency_option", URGENCY_MESSAGE)
}

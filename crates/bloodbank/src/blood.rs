//! Fixed vocabularies shared by the forms and the inventory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A text value that is not a member of a fixed option set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct ParseOptionError {
    /// Which option set was being parsed.
    pub kind: &'static str,
    /// The rejected text.
    pub value: String,
}

/// The eight ABO/Rh blood types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BloodType {
    /// A positive.
    #[serde(rename = "A+")]
    APositive,
    /// A negative.
    #[serde(rename = "A-")]
    ANegative,
    /// B positive.
    #[serde(rename = "B+")]
    BPositive,
    /// B negative.
    #[serde(rename = "B-")]
    BNegative,
    /// AB positive.
    #[serde(rename = "AB+")]
    AbPositive,
    /// AB negative.
    #[serde(rename = "AB-")]
    AbNegative,
    /// O positive.
    #[serde(rename = "O+")]
    OPositive,
    /// O negative.
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    /// All blood types in display order.
    pub const ALL: [BloodType; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];

    /// The conventional label, e.g. `AB-`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }

    /// Labels of all blood types, for option lists.
    #[must_use]
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.label()).collect()
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BloodType {
    type Err = ParseOptionError;

    /// Accepts the label in any letter case (`ab+` parses as `AB+`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseOptionError {
                kind: "blood type",
                value: s.to_string(),
            })
    }
}

/// Donor gender options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other.
    Other,
    /// The donor declined to answer.
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    /// All options in display order.
    pub const ALL: [Gender; 4] = [
        Self::Male,
        Self::Female,
        Self::Other,
        Self::PreferNotToSay,
    ];

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
            Self::PreferNotToSay => "Prefer not to say",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseOptionError {
                kind: "gender",
                value: s.to_string(),
            })
    }
}

/// How soon a requested unit is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    /// Routine request.
    #[default]
    Normal,
    /// Needed soon.
    Urgent,
    /// Needed immediately.
    Critical,
}

impl Urgency {
    /// All levels in display order.
    pub const ALL: [Urgency; 3] = [Self::Normal, Self::Urgent, Self::Critical];

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Urgent => "Urgent",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Urgency {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|u| u.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseOptionError {
                kind: "urgency",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blood_type_labels_in_display_order() {
        assert_eq!(
            BloodType::labels(),
            vec!["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"]
        );
    }

    #[test]
    fn test_blood_type_parse_is_case_insensitive() {
        assert_eq!("ab+".parse::<BloodType>().unwrap(), BloodType::AbPositive);
        assert_eq!("O-".parse::<BloodType>().unwrap(), BloodType::ONegative);
        assert_eq!(" o+ ".parse::<BloodType>().unwrap(), BloodType::OPositive);
    }

    #[test]
    fn test_blood_type_parse_rejects_unknown() {
        let err = "C+".parse::<BloodType>().unwrap_err();
        assert_eq!(err.kind, "blood type");
        assert_eq!(err.to_string(), "'C+' is not a valid blood type");
        assert!("".parse::<BloodType>().is_err());
    }

    #[test]
    fn test_blood_type_serializes_as_label() {
        let json = serde_json::to_string(&BloodType::AbNegative).unwrap();
        assert_eq!(json, "\"AB-\"");
        let parsed: BloodType = serde_json::from_str("\"O+\"").unwrap();
        assert_eq!(parsed, BloodType::OPositive);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(
            "Prefer not to say".parse::<Gender>().unwrap(),
            Gender::PreferNotToSay
        );
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("".parse::<Gender>().is_err());
    }

    #[test]
    fn test_gender_serializes_as_label() {
        let json = serde_json::to_string(&Gender::PreferNotToSay).unwrap();
        assert_eq!(json, "\"Prefer not to say\"");
    }

    #[test]
    fn test_urgency_default_and_parse() {
        assert_eq!(Urgency::default(), Urgency::Normal);
        assert_eq!("critical".parse::<Urgency>().unwrap(), Urgency::Critical);
        assert!("Whenever".parse::<Urgency>().is_err());
    }
}

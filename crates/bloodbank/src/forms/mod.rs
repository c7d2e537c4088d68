//! Validated submission forms.
//!
//! Each form keeps every field as text until submit time. Submitting runs the
//! form's declarative schema over the whole record at once:
//!
//! - on violations, the collaborator is not called and each failing field gets
//!   the message of its first violated rule;
//! - on success, the text is coerced into a typed record and inserted, then
//!   the form is reset;
//! - if the insert fails, a generic notice is returned and the field values
//!   are kept so the user can retry.
//!
//! # Example
//!
//! ```
//! use bloodbank::forms::{DonorForm, FormState, SubmitOutcome};
//! use bloodbank::store::SqliteStore;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = SqliteStore::open_in_memory().unwrap();
//! let mut form = FormState::<DonorForm>::new();
//! form.set_field("full_name", "Jo").unwrap();
//! form.set_field("age", "17").unwrap();
//!
//! match form.submit(&store).await {
//!     SubmitOutcome::Rejected(violations) => {
//!         assert!(violations.message_for("age").is_some());
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! # });
//! ```

mod donor;
mod request;
mod rules;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, error, info};
use validator::ValidationErrors;

use crate::error::{Error, Result};
use crate::records::{BloodRequestRecord, DonorRecord};
use crate::store::{Submission, SubmissionStore};

pub use donor::DonorForm;
pub use request::RequestForm;

/// One failed field and the message of its first violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Form field name.
    pub field: &'static str,
    /// User-facing message.
    pub message: String,
}

/// All violations found in one validation pass, in the form's field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// A single violation.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self(vec![Violation {
            field,
            message: message.into(),
        }])
    }

    /// Collect validator output into `fields` order, keeping the first
    /// message per field.
    #[must_use]
    pub fn from_validation_errors(errors: &ValidationErrors, fields: &[&'static str]) -> Self {
        let by_field = errors.field_errors();
        let violations = fields
            .iter()
            .filter_map(|field| {
                let first = by_field.get(*field)?.first()?;
                let message = first
                    .message
                    .as_ref()
                    .map_or_else(|| first.code.to_string(), ToString::to_string);
                Some(Violation {
                    field: *field,
                    message,
                })
            })
            .collect();
        Self(violations)
    }

    /// True if nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }

    /// Names of the failing fields.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|v| v.field).collect()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

/// Field name to error message, as shown inline under each field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Error for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Drop the error for `field`, leaving the others.
    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    /// True if no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl From<&Violations> for FieldErrors {
    fn from(violations: &Violations) -> Self {
        let mut map = BTreeMap::new();
        for violation in violations {
            map.entry(violation.field)
                .or_insert_with(|| violation.message.clone());
        }
        Self(map)
    }
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The submission was stored.
    Success,
    /// The submission could not be stored.
    Error,
}

/// A short user-facing message about a submission's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Success or failure.
    pub kind: NoticeKind,
    /// Heading.
    pub title: &'static str,
    /// Body text.
    pub description: &'static str,
}

/// Result of [`FormState::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored; the form has been reset.
    Submitted(Notice),
    /// Validation failed; the collaborator was not called.
    Rejected(Violations),
    /// The collaborator call failed; the form keeps its values.
    Failed(Notice),
}

impl SubmitOutcome {
    /// True for [`SubmitOutcome::Submitted`].
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// A form schema: its fields, initial values, validation and notices.
pub trait Form: Clone + Default + Send + Sync + fmt::Debug {
    /// Typed record produced by a successful validation.
    type Record: Submission + fmt::Debug;

    /// Form name for logs and errors.
    const NAME: &'static str;

    /// Field names in display order.
    const FIELDS: &'static [&'static str];

    /// Current text of `field`.
    fn value(&self, field: &str) -> Option<&str>;

    /// Mutable text of `field`.
    fn value_mut(&mut self, field: &str) -> Option<&mut String>;

    /// Run the schema over the whole form and coerce it to a record.
    ///
    /// # Errors
    ///
    /// Returns every violated field, first message per field, in
    /// [`Form::FIELDS`] order.
    fn validate_record(&self) -> std::result::Result<Self::Record, Violations>;

    /// Notice shown after a successful insert.
    fn success_notice() -> Notice;

    /// Notice shown after a failed insert.
    fn failure_notice() -> Notice;
}

/// Validate a donor form and coerce it to a record.
///
/// # Errors
///
/// Returns the violations, first message per field, in field order.
pub fn validate_donor(form: &DonorForm) -> std::result::Result<DonorRecord, Violations> {
    form.validate_record()
}

/// Validate a blood request form and coerce it to a record.
///
/// # Errors
///
/// Returns the violations, first message per field, in field order.
pub fn validate_request(form: &RequestForm) -> std::result::Result<BloodRequestRecord, Violations> {
    form.validate_record()
}

/// Per-form state: field values and inline errors.
///
/// [`FormState::submit`] borrows the state mutably for the duration of the
/// collaborator call, so a given form cannot have two submissions in flight.
#[derive(Debug, Clone, Default)]
pub struct FormState<F: Form> {
    values: F,
    errors: FieldErrors,
}

impl<F: Form> FormState<F> {
    /// A form holding its initial values.
    #[must_use]
    pub fn new() -> Self {
        Self::from_values(F::default())
    }

    /// A form pre-filled with `values` and no errors.
    #[must_use]
    pub fn from_values(values: F) -> Self {
        Self {
            values,
            errors: FieldErrors::default(),
        }
    }

    /// Current field values.
    #[must_use]
    pub fn values(&self) -> &F {
        &self.values
    }

    /// Current text of `field`.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.value(field)
    }

    /// Replace the text of `field` and clear that field's error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if the form has no such field.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        let slot = self
            .values
            .value_mut(field)
            .ok_or_else(|| Error::unknown_field(F::NAME, field))?;
        *slot = value.into();
        self.errors.clear(field);
        Ok(())
    }

    /// Current inline errors.
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Inline error for `field`.
    #[must_use]
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    /// Restore initial values and clear all errors.
    pub fn reset(&mut self) {
        self.values = F::default();
        self.errors = FieldErrors::default();
    }

    /// Validate and, if valid, insert through `store`.
    pub async fn submit(&mut self, store: &dyn SubmissionStore) -> SubmitOutcome {
        let record = match self.values.validate_record() {
            Ok(record) => record,
            Err(violations) => {
                debug!(
                    form = F::NAME,
                    fields = ?violations.fields(),
                    "Submission rejected by validation"
                );
                self.errors = FieldErrors::from(&violations);
                return SubmitOutcome::Rejected(violations);
            }
        };
        self.errors = FieldErrors::default();

        match record.send_to(store).await {
            Ok(()) => {
                info!(form = F::NAME, backend = store.name(), "Submission stored");
                self.reset();
                SubmitOutcome::Submitted(F::success_notice())
            }
            Err(err) => {
                error!(
                    form = F::NAME,
                    backend = store.name(),
                    collaborator = err.is_collaborator_error(),
                    error = %err,
                    "Submission failed"
                );
                SubmitOutcome::Failed(F::failure_notice())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingStore;
    use super::*;

    #[test]
    fn test_violations_display() {
        let violations = Violations(vec![
            Violation {
                field: "age",
                message: "Age must be between 18 and 65".to_string(),
            },
            Violation {
                field: "email",
                message: "Please enter a valid email address".to_string(),
            },
        ]);
        assert_eq!(
            violations.to_string(),
            "age: Age must be between 18 and 65\nemail: Please enter a valid email address"
        );
        assert_eq!(violations.fields(), vec!["age", "email"]);
    }

    #[test]
    fn test_field_errors_clear_one() {
        let violations = Violations(vec![
            Violation {
                field: "age",
                message: "bad age".to_string(),
            },
            Violation {
                field: "email",
                message: "bad email".to_string(),
            },
        ]);
        let mut errors = FieldErrors::from(&violations);
        errors.clear("age");

        assert_eq!(errors.get("age"), None);
        assert_eq!(errors.get("email"), Some("bad email"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let errors = FieldErrors::from(&Violations::single("quantity", "too small"));
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "quantity": "too small" }));
    }

    #[test]
    fn test_validate_functions() {
        let violations = validate_donor(&DonorForm::default()).unwrap_err();
        assert_eq!(violations.fields()[0], "full_name");

        let violations = validate_request(&RequestForm::default()).unwrap_err();
        assert_eq!(violations.message_for("quantity"), None);
        assert_eq!(violations.message_for("urgency"), None);
    }

    #[test]
    fn test_set_unknown_field() {
        let mut form = FormState::<DonorForm>::new();
        let err = form.set_field("nickname", "JJ").unwrap_err();
        assert!(matches!(err, Error::UnknownField { form: "donor", .. }));
    }

    #[tokio::test]
    async fn test_editing_clears_only_that_field() {
        let store = RecordingStore::default();
        let mut form = FormState::<DonorForm>::new();

        let outcome = form.submit(&store).await;
        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert!(form.error("age").is_some());
        assert!(form.error("email").is_some());
        let before = form.errors().len();

        form.set_field("age", "30").unwrap();

        assert_eq!(form.error("age"), None);
        assert!(form.error("email").is_some());
        assert_eq!(form.errors().len(), before - 1);
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_editing_field_without_error_keeps_others() {
        let store = RecordingStore::default();
        let mut form = FormState::<RequestForm>::new();
        form.set_field("quantity", "0").unwrap();
        form.submit(&store).await;
        let before = form.errors().clone();

        // `urgency` starts valid, so it has no error to clear.
        form.set_field("urgency", "Critical").unwrap();
        assert_eq!(form.errors(), &before);
    }
}

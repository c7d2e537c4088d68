//! Form lifecycle through the public API, stored in a real database.

use bloodbank::forms::{DonorForm, Form, FormState, NoticeKind, SubmitOutcome};
use bloodbank::SqliteStore;

fn fill_donor(form: &mut FormState<DonorForm>) {
    for (field, value) in [
        ("full_name", "Ada Obi"),
        ("age", "30"),
        ("gender", "Female"),
        ("blood_type", "O-"),
        ("contact_number", "0801234567"),
        ("email", "ada@example.com"),
        ("address", "12 Marina Road"),
    ] {
        form.set_field(field, value).unwrap();
    }
}

#[tokio::test]
async fn correct_then_resubmit() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut form = FormState::<DonorForm>::new();
    fill_donor(&mut form);
    form.set_field("email", "not-an-email").unwrap();
    form.set_field("age", "70").unwrap();

    let outcome = form.submit(&store).await;
    let SubmitOutcome::Rejected(violations) = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(violations.fields(), vec!["age", "email"]);
    assert_eq!(store.stats().unwrap().donors, 0);

    form.set_field("email", "ada@example.com").unwrap();
    assert_eq!(form.error("email"), None);
    assert_eq!(form.error("age"), Some("Age must be between 18 and 65"));

    form.set_field("age", "65").unwrap();
    let outcome = form.submit(&store).await;

    let SubmitOutcome::Submitted(notice) = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(form.values(), &DonorForm::default());
    assert!(form.errors().is_empty());
    assert_eq!(store.stats().unwrap().donors, 1);
}

#[tokio::test]
async fn identical_submissions_create_two_records() {
    let store = SqliteStore::open_in_memory().unwrap();

    for _ in 0..2 {
        let mut form = FormState::<DonorForm>::new();
        fill_donor(&mut form);
        assert!(form.submit(&store).await.is_submitted());
    }

    assert_eq!(store.stats().unwrap().donors, 2);
}

#[tokio::test]
async fn reset_restores_initial_values() {
    let mut form = FormState::<DonorForm>::new();
    fill_donor(&mut form);
    form.set_field("age", "12").unwrap();
    let store = SqliteStore::open_in_memory().unwrap();
    form.submit(&store).await;
    assert!(!form.errors().is_empty());

    form.reset();

    assert_eq!(form.values(), &DonorForm::default());
    assert!(form.errors().is_empty());
    for field in DonorForm::FIELDS {
        assert_eq!(form.value(field), Some(""));
    }
}

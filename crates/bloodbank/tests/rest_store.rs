//! The REST collaborator against a local stand-in for the hosted data API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

use bloodbank::forms::{DonorForm, FormState, RequestForm, SubmitOutcome};
use bloodbank::store::RestStore;
use bloodbank::{Error, SubmissionStore};

#[derive(Debug, Clone, Default)]
struct Captured {
    rows: Arc<Mutex<Vec<(String, HeaderMap, Value)>>>,
}

async fn insert(
    State(captured): State<Captured>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(row): Json<Value>,
) -> StatusCode {
    captured.rows.lock().unwrap().push((table, headers, row));
    StatusCode::CREATED
}

async fn start(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn fake_data_api() -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/rest/v1/:table", post(insert))
        .with_state(captured.clone());
    (start(app).await, captured)
}

fn store(url: &str, key: &str) -> RestStore {
    RestStore::new(url, key, Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn donor_insert_posts_row_with_key_headers() {
    let (url, captured) = fake_data_api().await;
    let store = store(&url, "anon-key");

    let mut form = FormState::from_values(DonorForm {
        full_name: "Ada Obi".to_string(),
        age: "30".to_string(),
        gender: "Female".to_string(),
        blood_type: "O-".to_string(),
        contact_number: "0801234567".to_string(),
        email: "ada@example.com".to_string(),
        address: "12 Marina Road".to_string(),
        medical_history: "   ".to_string(),
    });
    assert!(form.submit(&store).await.is_submitted());

    let rows = captured.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    let (table, headers, row) = &rows[0];
    assert_eq!(table, "donors");
    assert_eq!(headers["apikey"], "anon-key");
    assert_eq!(headers["authorization"], "Bearer anon-key");
    assert_eq!(headers["prefer"], "return=minimal");
    assert_eq!(row["full_name"], "Ada Obi");
    assert_eq!(row["age"], 30);
    assert_eq!(row["blood_type"], "O-");
    assert!(row.as_object().unwrap().contains_key("medical_history"));
    assert!(row["medical_history"].is_null());
}

#[tokio::test]
async fn request_insert_goes_to_blood_requests() {
    let (url, captured) = fake_data_api().await;
    let store = store(&url, "anon-key");

    let mut form = FormState::from_values(RequestForm {
        name: "Tunde Bello".to_string(),
        contact_number: "0809999999".to_string(),
        blood_type: "A+".to_string(),
        hospital_name: "Lagos General".to_string(),
        patient_name: "Kemi Bello".to_string(),
        ..RequestForm::default()
    });
    assert!(form.submit(&store).await.is_submitted());

    let rows = captured.rows.lock().unwrap();
    let (table, _, row) = &rows[0];
    assert_eq!(table, "blood_requests");
    assert_eq!(row["quantity"], 1);
    assert_eq!(row["urgency"], "Normal");
    assert!(row["patient_condition"].is_null());
}

#[tokio::test]
async fn rejected_insert_reports_status_and_keeps_form() {
    let app = Router::new().route(
        "/rest/v1/:table",
        post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
    );
    let url = start(app).await;
    let store = store(&url, "wrong-key");

    let record_error = {
        let form = RequestForm {
            name: "Tunde Bello".to_string(),
            contact_number: "0809999999".to_string(),
            blood_type: "A+".to_string(),
            hospital_name: "Lagos General".to_string(),
            patient_name: "Kemi Bello".to_string(),
            ..RequestForm::default()
        };
        let mut state = FormState::from_values(form.clone());
        let outcome = state.submit(&store).await;
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(state.values(), &form);

        let record = bloodbank::forms::Form::validate_record(&form).unwrap();
        store.insert_request(&record).await.unwrap_err()
    };

    match record_error {
        Error::Rejected {
            table,
            status,
            body,
        } => {
            assert_eq!(table, "blood_requests");
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_api_fails_submission() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let store = store(&format!("http://{addr}"), "anon-key");

    let mut state = FormState::<RequestForm>::new();
    for (field, value) in [
        ("name", "Tunde Bello"),
        ("contact_number", "0809999999"),
        ("blood_type", "B+"),
        ("hospital_name", "Lagos General"),
        ("patient_name", "Kemi Bello"),
    ] {
        state.set_field(field, value).unwrap();
    }

    let outcome = state.submit(&store).await;
    let SubmitOutcome::Failed(notice) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(notice.title, "Error");
    assert_eq!(state.value("name"), Some("Tunde Bello"));
}

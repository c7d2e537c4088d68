//! HTTP surface: page descriptors and form submission endpoints.
//!
//! Every page is served as a JSON descriptor carrying what a client needs to
//! render it. Form posts run the same submit flow as the CLI and map the
//! outcome to a status code:
//!
//! | Outcome     | Status | Body                              |
//! |-------------|--------|-----------------------------------|
//! | stored      | 201    | success notice                    |
//! | invalid     | 422    | `{ "errors": { field: message } }`|
//! | insert fail | 502    | failure notice                    |

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::blood::{BloodType, Gender, Urgency};
use crate::error::{Error, Result};
use crate::forms::{DonorForm, FieldErrors, Form, FormState, RequestForm, SubmitOutcome};
use crate::inventory::{inventory, stock_cards, InventoryFilter, StockStatus};
use crate::pages::Page;
use crate::store::SubmissionStore;

#[derive(Clone)]
struct AppState {
    store: Arc<dyn SubmissionStore>,
}

/// Raw inventory query parameters.
#[derive(Debug, Default, Deserialize)]
struct InventoryQuery {
    blood_type: Option<String>,
    status: Option<String>,
    search: Option<String>,
}

/// Build the application router around `store`.
pub fn router(store: Arc<dyn SubmissionStore>) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/donate", get(donate_page).post(submit_donor))
        .route("/request", get(request_page).post(submit_request))
        .route("/inventory", get(inventory_page))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

/// Bind `addr` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns [`Error::Bind`] if the address cannot be bound, or an I/O error
/// if the server fails while running.
pub async fn serve(addr: SocketAddr, store: Arc<dyn SubmissionStore>) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| Error::Bind { addr, source })?;
    info!(addr = %listener.local_addr()?, backend = store.name(), "Listening");

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

fn navigation() -> Vec<Value> {
    Page::NAVIGABLE
        .iter()
        .map(|page| json!({ "title": page.title(), "path": page.path() }))
        .collect()
}

fn descriptor(page: Page, body: Value) -> Value {
    let mut value = json!({
        "page": page,
        "title": page.title(),
        "path": page.path(),
        "navigation": navigation(),
    });
    if let (Some(target), Value::Object(extra)) = (value.as_object_mut(), body) {
        target.extend(extra);
    }
    value
}

fn home_descriptor() -> Value {
    let cards: Vec<Value> = stock_cards()
        .iter()
        .map(|card| {
            json!({
                "blood_type": card.blood_type,
                "units": card.units,
                "max_units": card.max_units,
                "percentage": card.percentage(),
                "level": card.level(),
                "message": card.level().message(),
            })
        })
        .collect();
    descriptor(Page::Home, json!({ "stock_cards": cards }))
}

fn form_descriptor<F: Form + serde::Serialize>(page: Page, options: Value) -> Value {
    descriptor(
        page,
        json!({
            "form": F::NAME,
            "fields": F::FIELDS,
            "initial": F::default(),
            "options": options,
        }),
    )
}

fn inventory_descriptor(query: &InventoryQuery) -> Response {
    let filter = match InventoryFilter::from_input(
        query.blood_type.as_deref(),
        query.status.as_deref(),
        query.search.as_deref(),
    ) {
        Ok(filter) => filter,
        Err(err) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": err.to_string() })))
                .into_response()
        }
    };

    let mut blood_types = vec!["all"];
    blood_types.extend(BloodType::labels());
    let mut statuses = vec!["all"];
    statuses.extend(StockStatus::ALL.iter().map(|s| s.label()));

    let items = filter.apply(&inventory());
    Json(descriptor(
        Page::Inventory,
        json!({
            "filter": {
                "blood_type": filter.blood_type,
                "status": filter.status,
                "search": filter.search,
            },
            "options": { "blood_type": blood_types, "status": statuses },
            "count": items.len(),
            "items": items,
        }),
    ))
    .into_response()
}

fn not_found(uri: &Uri) -> Response {
    let body = json!({
        "page": Page::NotFound,
        "title": Page::NotFound.title(),
        "path": uri.path(),
        "message": "Oops! Page not found",
        "home": Page::Home.path(),
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

async fn home_page() -> Json<Value> {
    Json(home_descriptor())
}

async fn donate_page() -> Json<Value> {
    Json(form_descriptor::<DonorForm>(
        Page::Donate,
        json!({
            "gender": Gender::ALL.iter().map(|g| g.label()).collect::<Vec<_>>(),
            "blood_type": BloodType::labels(),
        }),
    ))
}

async fn request_page() -> Json<Value> {
    Json(form_descriptor::<RequestForm>(
        Page::Request,
        json!({
            "blood_type": BloodType::labels(),
            "urgency": Urgency::ALL.iter().map(|u| u.label()).collect::<Vec<_>>(),
        }),
    ))
}

async fn inventory_page(Query(query): Query<InventoryQuery>) -> Response {
    inventory_descriptor(&query)
}

async fn submit_donor(State(state): State<AppState>, Json(values): Json<DonorForm>) -> Response {
    submit_form(state.store.as_ref(), values).await
}

async fn submit_request(
    State(state): State<AppState>,
    Json(values): Json<RequestForm>,
) -> Response {
    submit_form(state.store.as_ref(), values).await
}

async fn submit_form<F: Form>(store: &dyn SubmissionStore, values: F) -> Response {
    let mut form = FormState::from_values(values);
    match form.submit(store).await {
        SubmitOutcome::Submitted(notice) => (StatusCode::CREATED, Json(notice)).into_response(),
        SubmitOutcome::Rejected(violations) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": FieldErrors::from(&violations) })),
        )
            .into_response(),
        SubmitOutcome::Failed(notice) => (StatusCode::BAD_GATEWAY, Json(notice)).into_response(),
    }
}

/// Unrouted paths. A trailing-slash spelling of a page still renders it.
///
/// The query string is only read for the inventory page, so a malformed
/// query on any other path still gets the not-found page.
async fn fallback(method: Method, uri: Uri) -> Response {
    if method != Method::GET {
        return not_found(&uri);
    }
    match Page::resolve(uri.path()) {
        Page::Home => Json(home_descriptor()).into_response(),
        Page::Donate => donate_page().await.into_response(),
        Page::Request => request_page().await.into_response(),
        Page::Inventory => match Query::<InventoryQuery>::try_from_uri(&uri) {
            Ok(Query(query)) => inventory_descriptor(&query),
            Err(rejection) => rejection.into_response(),
        },
        Page::NotFound => not_found(&uri),
    }
}

//! Hosted data API submission store.
//!
//! Speaks the PostgREST insert convention used by hosted Postgres services:
//! `POST {url}/rest/v1/{table}` with a JSON row, the project key in the
//! `apikey` header and as a bearer token.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::records::{BloodRequestRecord, DonorRecord};

use super::SubmissionStore;

/// Table receiving donor registrations.
pub const DONORS_TABLE: &str = "donors";

/// Table receiving blood requests.
pub const BLOOD_REQUESTS_TABLE: &str = "blood_requests";

/// Submission store that inserts rows through a hosted REST data API.
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for RestStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestStore")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl RestStore {
    /// Build a store for the given project URL and key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().connect_timeout(connect_timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build a store from the `[rest]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.rest.url.clone(),
            config.rest.api_key.clone(),
            config.rest_timeout(),
        )
    }

    /// Endpoint for inserts into `table`.
    #[must_use]
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    async fn insert_row<T: Serialize + Sync>(&self, table: &'static str, row: &T) -> Result<()> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(table, status = status.as_u16(), "Row inserted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(table, status = status.as_u16(), "Data API rejected insert");
        Err(Error::Rejected {
            table,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SubmissionStore for RestStore {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn insert_donor(&self, record: &DonorRecord) -> Result<()> {
        self.insert_row(DONORS_TABLE, record).await
    }

    async fn insert_request(&self, record: &BloodRequestRecord) -> Result<()> {
        self.insert_row(BLOOD_REQUESTS_TABLE, record).await
    }
}

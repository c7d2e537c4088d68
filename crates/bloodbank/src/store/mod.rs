//! The external data collaborator.
//!
//! The application performs exactly two operations against it: insert a
//! donor, insert a blood request. Both return success or an opaque error;
//! nothing is ever read back through this trait.

mod migrations;
mod rest;
mod schema;
mod sqlite;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{Backend, Config};
use crate::error::Result;
use crate::records::{BloodRequestRecord, DonorRecord};

pub use rest::{RestStore, BLOOD_REQUESTS_TABLE, DONORS_TABLE};
pub use sqlite::{SqliteStore, StoreStats};

/// Destination for validated submissions.
#[async_trait]
pub trait SubmissionStore: Send + Sync + fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Insert one donor registration.
    async fn insert_donor(&self, record: &DonorRecord) -> Result<()>;

    /// Insert one blood request.
    async fn insert_request(&self, record: &BloodRequestRecord) -> Result<()>;
}

/// A record that knows which collaborator operation inserts it.
#[async_trait]
pub trait Submission: Send + Sync {
    /// Send this record to `store`.
    async fn send_to(&self, store: &dyn SubmissionStore) -> Result<()>;
}

#[async_trait]
impl Submission for DonorRecord {
    async fn send_to(&self, store: &dyn SubmissionStore) -> Result<()> {
        store.insert_donor(self).await
    }
}

#[async_trait]
impl Submission for BloodRequestRecord {
    async fn send_to(&self, store: &dyn SubmissionStore) -> Result<()> {
        store.insert_request(self).await
    }
}

/// Open the collaborator selected by `config.storage.backend`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the HTTP client
/// cannot be built.
pub fn open_store(config: &Config) -> Result<Arc<dyn SubmissionStore>> {
    let store: Arc<dyn SubmissionStore> = match config.storage.backend {
        Backend::Sqlite => Arc::new(SqliteStore::open(config.database_path())?),
        Backend::Rest => Arc::new(RestStore::from_config(config)?),
    };
    info!(backend = store.name(), "Submission store ready");
    Ok(store)
}

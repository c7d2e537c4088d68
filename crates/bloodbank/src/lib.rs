//! `bloodbank` - Blood donation and request desk
//!
//! This library provides the validated donor and blood request forms, the
//! read-only inventory, page routing, and the collaborators that store
//! accepted submissions.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod blood;
pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod inventory;
pub mod logging;
pub mod pages;
pub mod records;
pub mod server;
pub mod store;

pub use blood::{BloodType, Gender, Urgency};
pub use config::Config;
pub use error::{Error, Result};
pub use forms::{DonorForm, FormState, RequestForm, SubmitOutcome};
pub use logging::init_logging;
pub use pages::Page;
pub use records::{BloodRequestRecord, DonorRecord};
pub use store::{open_store, SqliteStore, SubmissionStore};

//! # Ballot Common Library
//!
//! Core of the election tally service:
//! - Data model and typed operation inputs
//! - Required-field validation
//! - Candidate, party and vote repositories
//! - Vote tally aggregation
//! - Store configuration and database initialization

pub mod config;
pub mod db;
pub mod error;
pub mod store;
pub mod validate;

pub use config::{StoreConfig, VotePolicy};
pub use error::{Error, Result};
pub use store::ElectionStore;
pub use validate::{check_required, FieldValue, Record, Validation};

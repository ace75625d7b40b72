//! Database models and queries

pub mod candidates;
pub mod init;
pub mod models;
pub mod parties;
pub mod tally;
pub mod votes;

pub use init::{connect_memory, init_database};
pub use models::*;

//! HTTP API handlers for ballot-api

pub mod candidates;
pub mod health;
pub mod parties;
pub mod payload;
pub mod votes;

pub use candidates::candidate_routes;
pub use health::health_routes;
pub use parties::party_routes;
pub use payload::Payload;
pub use votes::vote_routes;

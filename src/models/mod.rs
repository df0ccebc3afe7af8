// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Item, Match};
pub use requests::RunMatchingRequest;
pub use responses::{ErrorResponse, HealthResponse, RunMatchingResponse};

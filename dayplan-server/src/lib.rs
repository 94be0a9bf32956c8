//! dayplan-server: HTTP layer for the dayplan calendar/to-do service
//!
//! Three endpoints over the store facade — a three-month window read, a
//! single-day read, and a full-day replace-on-write — plus a health probe.
//! Errors surface as JSON responses with appropriate status codes.

pub mod calendar;
pub mod error;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{build_router, run_server, ServerConfig, ServerError};
pub use state::{AppState, WritePolicy};

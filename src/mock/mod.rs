//! Mock classification service
//!
//! Implements the service contract the client talks to, backed by a keyword
//! classifier and an in-memory history:
//! - GET / - Service status
//! - POST /predict - Classify one text
//! - POST /predict-batch - Classify several texts
//! - GET /history?limit=N - Most recent predictions
//! - GET /analytics - Aggregates over the history
//! - DELETE /history - Clear the history
//! - GET /health - Health check

pub mod classifier;
mod handlers;
mod routes;
mod server;
mod state;

pub use routes::create_router;
pub use server::{serve, MockServer};
pub use state::MockState;

//! Session coordinator
//!
//! State machine that sequences the calls around each user action:
//! - Probe on construction, then refresh history/analytics
//! - Reject predictions unless the last probe succeeded
//! - Predict, store the result, then refresh in the background
//! - Translate failures into user-facing error text

mod controller;
mod messages;
mod phase;

pub use controller::{Coordinator, CoordinatorError};
pub use messages::{EMPTY_BATCH, EMPTY_TEXT};
pub use phase::Phase;

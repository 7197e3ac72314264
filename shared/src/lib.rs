//! Shared types for the Crab booking engine
//!
//! Domain models (reservations, waitlist, restaurant settings) and the
//! structured error type used across crates.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};

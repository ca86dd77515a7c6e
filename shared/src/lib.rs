//! Shared types for the forum service
//!
//! Models, unified error codes, realtime message types and small utilities
//! used by the server and its tests.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use message::RealtimeEvent;

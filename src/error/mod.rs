//! Error handling
//!
//! Defines the ingestion error taxonomy and its conversion at the public boundary.

pub mod handlers;
pub mod types;

pub use types::*;

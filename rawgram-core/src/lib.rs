//! Rawgram Core Library
//!
//! This crate provides the fundamental types and error handling shared by
//! the rawgram packet, session, and CLI crates.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::{wire, Endpoint, MacAddr};

//! # flixmap Common Library
//!
//! Shared code for the flixmap dashboard:
//! - Error types
//! - Configuration loading (CLI → TOML → compiled defaults)
//! - SSE heartbeat stream for connection status

pub mod config;
pub mod error;
pub mod sse;

pub use error::{Error, Result};

//! # udeck common library
//!
//! Shared code for the udeck tools:
//! - Common error types
//! - Data directory and configuration resolution
//! - Logging initialization
//! - Steam account detection

pub mod config;
pub mod error;
pub mod logging;
pub mod steam_user;

pub use error::{Error, Result};

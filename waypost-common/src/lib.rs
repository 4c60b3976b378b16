//! # Waypost Common Library
//!
//! Shared code for the Waypost point-of-interest catalogue:
//! - Database initialization and schema
//! - Canonical `PointOfInterest` entity model
//! - Configuration loading and database path resolution
//! - Common error types

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};

//! Shared domain types for the grades report.
//!
//! Holds the outcome categories and their counts, the course configuration,
//! grade label normalisation, CLI settings and the common error type.

pub mod config;
pub mod error;
pub mod formatting;
pub mod labels;
pub mod models;
pub mod settings;

pub use error::{GradesError, Result};

//! Data layer for the grades report.
//!
//! Discovers the per-period spreadsheets, reads their results column,
//! derives each file's identity from its path and aggregates the counts by
//! period, subject and group.

pub mod aggregator;
pub mod analysis;
pub mod extractor;
pub mod metadata;
pub mod reader;
pub mod sheet;

pub use grades_core as core;

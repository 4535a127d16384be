//! Report output: period tables, charts, LaTeX documents and the run summary.

pub mod assembler;
pub mod chart;
pub mod latex;
pub mod summary;

pub use grades_data as data;

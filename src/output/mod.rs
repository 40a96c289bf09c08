//! Output formatting
//!
//! - `json`: the run summary object and its sink
//! - `csv`: per-call results
//! - `text`: human-readable summary on the log

pub mod csv;
pub mod json;
pub mod text;

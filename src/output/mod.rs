//! Human-readable and machine-readable rendering of benchmark reports.

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::format_result;

//! Input/output helpers.
//!
//! - report text parsing (`report`)
//! - CSV/JSON exports of a finished run (`export`)

pub mod export;
pub mod report;

pub use export::*;
pub use report::parse_report;

//! Data sources.

pub mod raob;

pub use raob::{RaobClient, ReportSource};

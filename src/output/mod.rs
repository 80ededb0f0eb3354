//! Output formatting for benchmark results.
//!
//! Formatters build `String`s; callers decide where they go. Serde handles
//! the machine-readable path directly from [`Results`](crate::Results) and
//! [`Summary`](crate::Summary).

mod terminal;

pub use terminal::{format_results, format_summary, format_time_ns};

//! Use case orchestration for compguard.
//!
//! This crate provides the application layer: use cases that coordinate the settings, store,
//! engine, and render layers. It is intentionally thin and delegates heavy lifting.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod evaluate;
mod explain;
mod render;
mod report;

pub use evaluate::{EvaluateInput, EvaluateOutput, run_evaluate, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use render::render_markdown;
pub use report::{parse_report_json, serialize_report, to_renderable};

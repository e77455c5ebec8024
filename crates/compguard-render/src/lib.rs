//! Rendering utilities for CI surfaces (Markdown).

#![forbid(unsafe_code)]

mod markdown;
mod model;

pub use markdown::render_markdown;
pub use model::{RenderableData, RenderableReport, RenderableState, RenderableVerdict, RenderableViolation};

//! # joint_report – joint license-plate detection reports as PDF
//!
//! Given a monitored plate, its search window and the detections made
//! around each pass of that plate, this crate lays out and renders a
//! paginated report. The pipeline stages are:
//!
//! 1. **Load** – three JSON documents → validated [`model::Report`]
//! 2. **Layout** – flow sections through a cursor-based [`canvas::Canvas`]
//!    with a per-page letterhead ([`layout`])
//! 3. **Freeze** – the positioned boxes become a serializable
//!    [`layout_config::LayoutConfig`]
//! 4. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! A C-compatible FFI surface is exposed via the [`ffi`] module.

pub mod assets;
pub mod boilerplate;
pub mod canvas;
pub mod dates;
pub mod error;
pub mod ffi;
pub mod fonts;
pub mod labels;
pub mod layout;
pub mod layout_config;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod style;
pub mod templates;

// Re-exports for convenience
pub use assets::ReportAssets;
pub use error::{ReportError, ValidationError};
pub use labels::Language;
pub use model::Report;
pub use pipeline::{
    compute_report_layout, generate_report, generate_report_from_json, GeneratedReport,
    ReportOptions,
};

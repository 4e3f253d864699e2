//! Scoring service for the Gallerize crowd-sourced image-tagging task.
//!
//! Each answer batch a tagger submits is validated, scored against the
//! configured reward and penalty rates, and folded back into the tagger's
//! persistent trust weight and the per-image/per-concept display statistics.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

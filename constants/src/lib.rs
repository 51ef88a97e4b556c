//! Shared constants for radar profile ingestion and rendering.

pub mod file_naming;
pub mod reference_body;
pub mod render_settings;
pub mod time;

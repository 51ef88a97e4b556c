//! Data model for radar profiles.
//!
//! Sample records, the profile component the renderer reads, and the settings
//! describing where profile sets come from.

/// Profile component, existence window and set grouping.
pub mod radar_profile;

/// One parsed row of a profile's sample table.
pub mod radar_sample;

/// JSON settings naming a profile directory and its reference body.
pub mod profile_settings;

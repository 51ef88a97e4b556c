//! Resource extraction systems for render world synchronisation.
//!
//! Copies the profiles visible this frame out of the main world so the render
//! world can build per-view draws without touching main world components.

/// Radar profile extraction and per-frame batch planning.
///
/// Snapshots geometry, image, existence window and world transform for each visible profile.
pub mod radar_profiles;

//! Viewer runtime systems for playback and on-screen status.

/// On-screen status text: frame rate, simulation time and playback state.
pub mod hud;

/// Keyboard playback controls and the clock to frame hand-off.
///
/// Pauses, scales the rate, toggles profiles and adjusts the height scale.
pub mod playback_controls;

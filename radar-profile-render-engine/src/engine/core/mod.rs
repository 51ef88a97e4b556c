//! Core application setup, state and shared error types.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and the simulation clock the viewer drives profiles with.

/// Application setup and plugin configuration for the viewer.
///
/// Creates the app with the radar profile plugins, settings loading and
/// interactive systems.
pub mod app_setup;

/// Application state machine from settings loading to runtime.
pub mod app_state;

/// Error type for profile loading.
pub mod errors;

/// Simulation time conversion and the viewer's clock.
pub mod sim_time;

/// Native window configuration.
pub mod window_config;

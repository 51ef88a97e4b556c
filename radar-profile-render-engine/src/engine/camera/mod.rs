//! Viewport camera for orbiting the reference body.
//!
//! Mouse driven orbit around the body centre with multiplicative zoom that
//! never dips below the surface.

/// Viewport camera resource and controller system.
pub mod viewport_camera;

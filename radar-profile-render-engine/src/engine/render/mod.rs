//! Rendering of radar profile ribbons against the host scene.
//!
//! A shared depth capture copies each view's depth after the opaque pass;
//! the profile pipeline then draws every existing profile as a curtain that
//! hides behind terrain and fades with distance below the surface.

/// Reference counted depth capture and its fullscreen copy pass.
pub mod depth_capture;

/// Resource extraction from the main world to the render world.
pub mod extraction;

/// Per-frame host inputs shared by every profile draw.
pub mod frame;

/// Profile ribbon pipeline, uniforms and render node.
pub mod pipeline;

/// Render graph wiring for the capture and profile passes.
pub mod radar_profile_render_plugin;

/// Embedded WGSL sources.
pub mod shaders;

/// CPU rendition of the fragment stage, used to pin down shading rules.
pub mod shading;

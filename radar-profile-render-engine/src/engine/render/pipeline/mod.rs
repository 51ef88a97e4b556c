//! Render pipeline drawing radar profile ribbons.
//!
//! Each 3D view gets one pass after the depth capture:
//!
//! 1. **Extract**: visible profiles are snapshotted from the main world
//! 2. **Prepare**: vertex buffers are uploaded once, uniforms and bind groups per frame
//! 3. **Render**: `RadarProfileRenderNode` issues one triangle strip draw per existing profile
//!
//! Blending is standard alpha. The fixed function depth test is off; the
//! fragment stage discards against the captured depth instead and writes its
//! own depth so later passes composite against the ribbon's true distance.

/// Radar profile pipeline, per-frame draw preparation and render node.
pub mod radar_profile_render_pipeline;

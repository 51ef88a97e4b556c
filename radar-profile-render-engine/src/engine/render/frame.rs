use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResource;
use radar_constants::render_settings::{DEFAULT_FAR_CLIP, DEFAULT_HEIGHT_SCALE};

/// How the host depth buffer encodes distance, which decides how the
/// captured depth is turned back into a surface distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DepthEncoding {
    /// Depth stores `distance / far_clip` and ribbons write the same.
    ///
    /// Only valid for a host whose opaque passes write linear distance depth.
    /// Bevy's core 3D passes write reverse-Z, so with them the capture is
    /// misread and the ribbon depth breaks later `Greater` depth tests.
    LinearDistance,
    /// Reverse-Z projected depth, as written by the core 3D opaque passes.
    #[default]
    ReverseZ,
}

/// Host supplied inputs read by the profile renderer each frame.
#[derive(Resource, Debug, Clone, ExtractResource)]
pub struct RadarProfileFrame {
    pub sim_time: f64,
    pub scene_scale: f32,
    pub far_clip: f32,
    pub height_scale: f32,
    pub enabled: bool,
    pub depth_encoding: DepthEncoding,
}

impl Default for RadarProfileFrame {
    fn default() -> Self {
        Self {
            sim_time: 0.0,
            scene_scale: 1.0,
            far_clip: DEFAULT_FAR_CLIP,
            height_scale: DEFAULT_HEIGHT_SCALE,
            enabled: true,
            depth_encoding: DepthEncoding::default(),
        }
    }
}

impl RadarProfileFrame {
    /// Per-frame update from the host clock and scene.
    pub fn update(&mut self, sim_time: f64, scene_scale: f32) {
        self.sim_time = sim_time;
        self.scene_scale = scene_scale;
    }

    /// Show or hide every profile. Depth capture keeps running while sets exist.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_height_scale(&mut self, height_scale: f32) {
        self.height_scale = height_scale.max(0.0);
    }

    pub fn set_far_clip(&mut self, far_clip: f32) {
        self.far_clip = far_clip;
    }
}

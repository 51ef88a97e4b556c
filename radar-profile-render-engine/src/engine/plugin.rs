use crate::engine::loading::profile_set::ProfileSetPlugin;
use crate::engine::render::frame::{DepthEncoding, RadarProfileFrame};
use crate::engine::render::radar_profile_render_plugin::RadarProfileRenderPlugin;
use bevy::prelude::*;

/// Everything a host needs to show radar profiles: send `LoadProfileSet`
/// events and keep `RadarProfileFrame` updated each frame.
#[derive(Debug, Clone, Default)]
pub struct RadarProfilePlugin {
    pub depth_encoding: DepthEncoding,
}

impl Plugin for RadarProfilePlugin {
    fn build(&self, app: &mut App) {
        if self.depth_encoding == DepthEncoding::LinearDistance {
            warn!("Linear distance depth requires a host that writes linear depth");
        }
        app.add_plugins((ProfileSetPlugin, RadarProfileRenderPlugin));
        app.world_mut()
            .resource_mut::<RadarProfileFrame>()
            .depth_encoding = self.depth_encoding;
    }
}

use crate::engine::render::depth_capture::{
    DepthCaptureLabel, DepthCaptureNode, DepthCapturePipeline, DepthCaptureState,
    DepthCaptureTargets, DepthCaptureViews, enable_depth_sampling,
    prepare_depth_capture_bind_groups, prepare_depth_capture_targets,
};
use crate::engine::render::extraction::radar_profiles::{
    ExtractedRadarProfiles, extract_radar_profiles,
};
use crate::engine::render::frame::RadarProfileFrame;
use crate::engine::render::pipeline::radar_profile_render_pipeline::{
    RadarProfileBuffers, RadarProfilePipeline, RadarProfileRenderLabel, RadarProfileRenderNode,
    RadarProfileViewDraws, prepare_radar_profile_buffers, prepare_radar_profile_draws,
};
use crate::engine::render::shaders::RadarProfileShaders;
use bevy::core_pipeline::core_3d::graph::{Core3d, Node3d};
use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResourcePlugin;
use bevy::render::render_graph::{RenderGraphApp, ViewNodeRunner};
use bevy::render::render_resource::SpecializedRenderPipelines;
use bevy::render::{ExtractSchedule, Render, RenderApp, RenderSet};

/// Depth capture and profile drawing, wired into the core 3D graph between
/// the opaque and transmissive passes.
pub struct RadarProfileRenderPlugin;

impl Plugin for RadarProfileRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            ExtractResourcePlugin::<RadarProfileFrame>::default(),
            ExtractResourcePlugin::<DepthCaptureState>::default(),
        ))
        .add_systems(PostUpdate, enable_depth_sampling);

        let Some(mut shader_assets) = app.world_mut().get_resource_mut::<Assets<Shader>>() else {
            warn!("No shader assets available, radar profiles will not render");
            return;
        };
        let shaders = RadarProfileShaders::register(&mut shader_assets);

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app
            .insert_resource(shaders)
            .init_resource::<RadarProfileFrame>()
            .init_resource::<DepthCaptureState>()
            .init_resource::<DepthCaptureTargets>()
            .init_resource::<DepthCaptureViews>()
            .init_resource::<ExtractedRadarProfiles>()
            .init_resource::<RadarProfileBuffers>()
            .init_resource::<RadarProfileViewDraws>()
            .init_resource::<SpecializedRenderPipelines<DepthCapturePipeline>>()
            .init_resource::<SpecializedRenderPipelines<RadarProfilePipeline>>()
            .add_systems(ExtractSchedule, extract_radar_profiles)
            .add_systems(
                Render,
                (
                    (prepare_depth_capture_targets, prepare_radar_profile_buffers)
                        .in_set(RenderSet::PrepareResources),
                    (prepare_depth_capture_bind_groups, prepare_radar_profile_draws)
                        .chain()
                        .in_set(RenderSet::PrepareBindGroups),
                ),
            )
            .add_render_graph_node::<ViewNodeRunner<DepthCaptureNode>>(Core3d, DepthCaptureLabel)
            .add_render_graph_node::<ViewNodeRunner<RadarProfileRenderNode>>(
                Core3d,
                RadarProfileRenderLabel,
            )
            .add_render_graph_edges(
                Core3d,
                (
                    Node3d::MainOpaquePass,
                    DepthCaptureLabel,
                    RadarProfileRenderLabel,
                    Node3d::MainTransmissivePass,
                ),
            );
    }

    fn finish(&self, app: &mut App) {
        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };

        render_app
            .init_resource::<DepthCapturePipeline>()
            .init_resource::<RadarProfilePipeline>();
    }
}

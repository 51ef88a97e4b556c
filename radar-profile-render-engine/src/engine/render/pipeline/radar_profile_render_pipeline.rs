use crate::engine::mesh::ribbon_mesh::{RibbonGeometry, RibbonVertex};
use crate::engine::render::depth_capture::DepthCaptureTargets;
use crate::engine::render::extraction::radar_profiles::ExtractedRadarProfiles;
use crate::engine::render::frame::{DepthEncoding, RadarProfileFrame};
use crate::engine::render::shaders::RadarProfileShaders;
use bevy::core_pipeline::core_3d::CORE_3D_DEPTH_FORMAT;
use bevy::ecs::query::QueryItem;
use bevy::image::BevyDefault;
use bevy::prelude::*;
use bevy::render::camera::ExtractedCamera;
use bevy::render::render_asset::RenderAssets;
use bevy::render::render_graph::{NodeRunError, RenderGraphContext, RenderLabel, ViewNode};
use bevy::render::render_resource::{
    binding_types::{sampler, texture_2d, uniform_buffer_sized},
    *,
};
use bevy::render::renderer::{RenderContext, RenderDevice};
use bevy::render::texture::GpuImage;
use bevy::render::view::{ExtractedView, ViewDepthTexture, ViewTarget};
use bytemuck::{Pod, Zeroable};
use radar_constants::render_settings::{
    ALPHA_FALLOFF_DISTANCE, ALPHA_FALLOFF_MAX, ALPHA_FALLOFF_MIN, INNER_SHELL_OFFSET,
    OUTER_SHELL_OFFSET, REVEAL_FADE_SECONDS,
};
use std::collections::HashMap;

#[derive(Debug, Hash, PartialEq, Eq, Clone, RenderLabel)]
pub struct RadarProfileRenderLabel;

/// Matches `FrameUniforms` in `radar_profile.wgsl`.
#[repr(C)]
#[derive(Pod, Zeroable, Copy, Clone, Debug, PartialEq)]
pub struct FrameUniform {
    pub projection: [[f32; 4]; 4],
    pub viewport_pos: [f32; 2],
    pub height_scale: f32,
    pub far_clip: f32,
    pub shell_offsets: [f32; 2],
    pub fade_seconds: f32,
    pub alpha_falloff: f32,
    pub alpha_clamp: [f32; 2],
    _padding: [f32; 2],
}

impl FrameUniform {
    pub fn new(clip_from_view: Mat4, viewport: UVec4, frame: &RadarProfileFrame) -> Self {
        Self {
            projection: clip_from_view.to_cols_array_2d(),
            viewport_pos: [viewport.x as f32, viewport.y as f32],
            height_scale: frame.height_scale,
            far_clip: frame.far_clip,
            shell_offsets: [OUTER_SHELL_OFFSET, INNER_SHELL_OFFSET],
            fade_seconds: REVEAL_FADE_SECONDS,
            alpha_falloff: ALPHA_FALLOFF_DISTANCE,
            alpha_clamp: [ALPHA_FALLOFF_MIN, ALPHA_FALLOFF_MAX],
            _padding: [0.0; 2],
        }
    }
}

/// Matches `ProfileUniforms` in `radar_profile.wgsl`.
#[repr(C)]
#[derive(Pod, Zeroable, Copy, Clone, Debug, PartialEq)]
pub struct ProfileUniform {
    pub model_view: [[f32; 4]; 4],
    pub scene_scale: f32,
    pub radius: f32,
    pub time: f32,
    _padding: f32,
}

impl ProfileUniform {
    pub fn new(view_from_local: Mat4, scene_scale: f32, radius: f32, elapsed: f32) -> Self {
        Self {
            model_view: view_from_local.to_cols_array_2d(),
            scene_scale,
            radius,
            time: elapsed,
            _padding: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RadarProfilePipelineKey {
    pub hdr: bool,
    pub samples: u32,
    pub depth_encoding: DepthEncoding,
}

/// Shared program for every profile ribbon.
///
/// - **@group(0)**: frame uniforms and the captured depth texture, bound once per view
/// - **@group(1)**: profile uniforms and radargram texture, bound per draw
#[derive(Resource)]
pub struct RadarProfilePipeline {
    frame_layout: BindGroupLayout,
    profile_layout: BindGroupLayout,
    shader: Handle<Shader>,
}

impl FromWorld for RadarProfilePipeline {
    fn from_world(world: &mut World) -> Self {
        let render_device = world.resource::<RenderDevice>();

        let frame_layout = render_device.create_bind_group_layout(
            "radar_profile_frame_layout",
            &BindGroupLayoutEntries::sequential(
                ShaderStages::VERTEX_FRAGMENT,
                (
                    uniform_buffer_sized(false, None),
                    texture_2d(TextureSampleType::Float { filterable: false }),
                ),
            ),
        );

        let profile_layout = render_device.create_bind_group_layout(
            "radar_profile_layout",
            &BindGroupLayoutEntries::sequential(
                ShaderStages::VERTEX_FRAGMENT,
                (
                    uniform_buffer_sized(false, None),
                    texture_2d(TextureSampleType::Float { filterable: true }),
                    sampler(SamplerBindingType::Filtering),
                ),
            ),
        );

        Self {
            frame_layout,
            profile_layout,
            shader: world.resource::<RadarProfileShaders>().radar_profile.clone(),
        }
    }
}

impl SpecializedRenderPipeline for RadarProfilePipeline {
    type Key = RadarProfilePipelineKey;

    fn specialize(&self, key: Self::Key) -> RenderPipelineDescriptor {
        let mut shader_defs = Vec::new();
        if key.depth_encoding == DepthEncoding::ReverseZ {
            shader_defs.push("REVERSE_Z_DEPTH".into());
        }

        let format = if key.hdr {
            ViewTarget::TEXTURE_FORMAT_HDR
        } else {
            TextureFormat::bevy_default()
        };

        RenderPipelineDescriptor {
            label: Some("radar_profile_pipeline".into()),
            layout: vec![self.frame_layout.clone(), self.profile_layout.clone()],
            push_constant_ranges: vec![],
            vertex: VertexState {
                shader: self.shader.clone(),
                shader_defs: shader_defs.clone(),
                entry_point: "vertex".into(),
                buffers: vec![RibbonVertex::buffer_layout()],
            },
            fragment: Some(FragmentState {
                shader: self.shader.clone(),
                shader_defs,
                entry_point: "fragment".into(),
                targets: vec![Some(ColorTargetState {
                    format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: RibbonGeometry::TOPOLOGY,
                cull_mode: None,
                ..default()
            },
            // Occlusion is decided in the fragment stage against the captured
            // depth; the fixed function test would reject the custom depth.
            depth_stencil: Some(DepthStencilState {
                format: CORE_3D_DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: CompareFunction::Always,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState {
                count: key.samples,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            zero_initialize_workgroup_memory: false,
        }
    }
}

/// Vertex buffers uploaded once per profile and kept while it is extracted.
#[derive(Resource, Default)]
pub struct RadarProfileBuffers {
    buffers: HashMap<Entity, Buffer>,
}

impl RadarProfileBuffers {
    pub fn get(&self, profile: Entity) -> Option<&Buffer> {
        self.buffers.get(&profile)
    }
}

pub fn prepare_radar_profile_buffers(
    render_device: Res<RenderDevice>,
    extracted: Res<ExtractedRadarProfiles>,
    mut buffers: ResMut<RadarProfileBuffers>,
) {
    for profile in &extracted.profiles {
        if profile.geometry.is_empty() || buffers.buffers.contains_key(&profile.entity) {
            continue;
        }

        let buffer = render_device.create_buffer_with_data(&BufferInitDescriptor {
            label: Some("radar_profile_vertex_buffer"),
            contents: profile.geometry.as_bytes(),
            usage: BufferUsages::VERTEX,
        });
        buffers.buffers.insert(profile.entity, buffer);
    }

    buffers
        .buffers
        .retain(|entity, _| extracted.contains(*entity));
}

pub struct PreparedProfileDraw {
    bind_group: BindGroup,
    vertex_buffer: Buffer,
    vertex_count: u32,
}

pub struct PreparedViewProfiles {
    pipeline: CachedRenderPipelineId,
    frame_bind_group: BindGroup,
    draws: Vec<PreparedProfileDraw>,
}

/// Draws prepared for each 3D view this frame.
#[derive(Resource, Default)]
pub struct RadarProfileViewDraws {
    views: HashMap<Entity, PreparedViewProfiles>,
}

pub fn prepare_radar_profile_draws(
    render_device: Res<RenderDevice>,
    pipeline_cache: Res<PipelineCache>,
    profile_pipeline: Res<RadarProfilePipeline>,
    mut pipelines: ResMut<SpecializedRenderPipelines<RadarProfilePipeline>>,
    frame: Res<RadarProfileFrame>,
    extracted: Res<ExtractedRadarProfiles>,
    buffers: Res<RadarProfileBuffers>,
    targets: Res<DepthCaptureTargets>,
    gpu_images: Res<RenderAssets<GpuImage>>,
    mut view_draws: ResMut<RadarProfileViewDraws>,
    views: Query<(Entity, &ExtractedView, &Msaa), With<Camera3d>>,
) {
    view_draws.views.clear();
    if !frame.enabled {
        return;
    }

    let batch = extracted.batch(frame.sim_time);
    if batch.is_empty() {
        return;
    }

    for (view_entity, view, msaa) in &views {
        let Some(capture) = targets.get(view_entity) else {
            continue;
        };

        let key = RadarProfilePipelineKey {
            hdr: view.hdr,
            samples: msaa.samples(),
            depth_encoding: frame.depth_encoding,
        };
        let pipeline = pipelines.specialize(&pipeline_cache, &profile_pipeline, key);

        let frame_uniform = FrameUniform::new(view.clip_from_view, view.viewport, &frame);
        let frame_buffer = render_device.create_buffer_with_data(&BufferInitDescriptor {
            label: Some("radar_profile_frame_uniforms"),
            contents: bytemuck::bytes_of(&frame_uniform),
            usage: BufferUsages::UNIFORM,
        });
        let frame_bind_group = render_device.create_bind_group(
            "radar_profile_frame_bind_group",
            &profile_pipeline.frame_layout,
            &BindGroupEntries::sequential((frame_buffer.as_entire_binding(), &capture.view)),
        );

        let view_from_world = view.world_from_view.compute_matrix().inverse();
        let mut draws = Vec::with_capacity(batch.len());

        for entry in &batch {
            let profile = &extracted.profiles[entry.index];
            let Some(vertex_buffer) = buffers.get(profile.entity) else {
                continue;
            };
            let Some(image) = gpu_images.get(profile.image) else {
                continue;
            };

            let uniform = ProfileUniform::new(
                view_from_world * profile.world_from_local,
                frame.scene_scale,
                profile.radius,
                entry.elapsed,
            );
            let uniform_buffer = render_device.create_buffer_with_data(&BufferInitDescriptor {
                label: Some("radar_profile_uniforms"),
                contents: bytemuck::bytes_of(&uniform),
                usage: BufferUsages::UNIFORM,
            });

            let bind_group = render_device.create_bind_group(
                "radar_profile_bind_group",
                &profile_pipeline.profile_layout,
                &BindGroupEntries::sequential((
                    uniform_buffer.as_entire_binding(),
                    &image.texture_view,
                    &image.sampler,
                )),
            );

            draws.push(PreparedProfileDraw {
                bind_group,
                vertex_buffer: vertex_buffer.clone(),
                vertex_count: profile.geometry.vertex_count(),
            });
        }

        if draws.is_empty() {
            continue;
        }

        view_draws.views.insert(
            view_entity,
            PreparedViewProfiles {
                pipeline,
                frame_bind_group,
                draws,
            },
        );
    }
}

/// Draws every prepared profile for the view in one pass over the main
/// colour and depth attachments.
#[derive(Default)]
pub struct RadarProfileRenderNode;

impl ViewNode for RadarProfileRenderNode {
    type ViewQuery = (
        &'static ExtractedCamera,
        &'static ViewTarget,
        &'static ViewDepthTexture,
    );

    fn run(
        &self,
        graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        (camera, target, depth): QueryItem<Self::ViewQuery>,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let Some(prepared) = world
            .resource::<RadarProfileViewDraws>()
            .views
            .get(&graph.view_entity())
        else {
            return Ok(());
        };

        let Some(pipeline) = world
            .resource::<PipelineCache>()
            .get_render_pipeline(prepared.pipeline)
        else {
            return Ok(());
        };

        let mut render_pass = render_context.begin_tracked_render_pass(RenderPassDescriptor {
            label: Some("radar_profile_pass"),
            color_attachments: &[Some(target.get_color_attachment())],
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: depth.view(),
                depth_ops: Some(Operations {
                    load: LoadOp::Load,
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Some(viewport) = camera.viewport.as_ref() {
            render_pass.set_camera_viewport(viewport);
        }

        render_pass.set_render_pipeline(pipeline);
        render_pass.set_bind_group(0, &prepared.frame_bind_group, &[]);

        for draw in &prepared.draws {
            render_pass.set_bind_group(1, &draw.bind_group, &[]);
            render_pass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
            render_pass.draw(0..draw.vertex_count, 0..1);
        }

        Ok(())
    }
}

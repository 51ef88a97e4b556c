//! Shared depth capture for radar profile occlusion.
//!
//! After the opaque pass each 3D view copies its depth attachment into an
//! `R32Float` texture the size of its viewport. Profile ribbons read that copy
//! to decide, per fragment, whether terrain lies in front of them.
//!
//! The capture exists only while some profile set holds a
//! [`DepthCaptureHandle`]. The first `acquire` turns it on and the last
//! `release` tears the render world textures down.

use crate::engine::render::shaders::RadarProfileShaders;
use bevy::core_pipeline::fullscreen_vertex_shader::fullscreen_shader_vertex_state;
use bevy::ecs::query::QueryItem;
use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResource;
use bevy::render::render_graph::{NodeRunError, RenderGraphContext, RenderLabel, ViewNode};
use bevy::render::render_resource::{
    binding_types::{texture_depth_2d, texture_depth_2d_multisampled, uniform_buffer_sized},
    *,
};
use bevy::render::renderer::{RenderContext, RenderDevice};
use bevy::render::view::{ExtractedView, ViewDepthTexture};
use bytemuck::{Pod, Zeroable};
use std::collections::{HashMap, HashSet};

/// Proof of one live user of the depth capture. Return it with
/// [`DepthCaptureRegistry::release`].
#[must_use = "dropping a capture handle without releasing it keeps the capture alive"]
#[derive(Debug)]
pub struct DepthCaptureHandle {
    _private: (),
}

/// Reference count deciding whether the depth capture runs.
#[derive(Resource, Debug, Default)]
pub struct DepthCaptureRegistry {
    users: usize,
}

impl DepthCaptureRegistry {
    pub fn acquire(&mut self) -> DepthCaptureHandle {
        if self.users == 0 {
            info!("Creating shared radar profile depth capture");
        }
        self.users += 1;
        DepthCaptureHandle { _private: () }
    }

    pub fn release(&mut self, handle: DepthCaptureHandle) {
        let DepthCaptureHandle { _private: () } = handle;
        self.users = self.users.saturating_sub(1);
        if self.users == 0 {
            info!("Destroying shared radar profile depth capture");
        }
    }

    pub fn is_active(&self) -> bool {
        self.users > 0
    }

    pub fn user_count(&self) -> usize {
        self.users
    }
}

/// Render world mirror of [`DepthCaptureRegistry`].
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct DepthCaptureState {
    pub active: bool,
}

impl ExtractResource for DepthCaptureState {
    type Source = DepthCaptureRegistry;

    fn extract_resource(source: &Self::Source) -> Self {
        Self {
            active: source.is_active(),
        }
    }
}

/// Let the capture pass bind view depth as a texture.
pub fn enable_depth_sampling(mut cameras: Query<&mut Camera3d, Added<Camera3d>>) {
    for mut camera in &mut cameras {
        let usages =
            TextureUsages::from(camera.depth_texture_usages) | TextureUsages::TEXTURE_BINDING;
        camera.depth_texture_usages = usages.into();
    }
}

pub struct CapturedDepth {
    pub texture: Texture,
    pub view: TextureView,
    pub size: UVec2,
}

/// Per-view capture textures, sized to each view's viewport.
#[derive(Resource, Default)]
pub struct DepthCaptureTargets {
    targets: HashMap<Entity, CapturedDepth>,
}

impl DepthCaptureTargets {
    pub fn get(&self, view: Entity) -> Option<&CapturedDepth> {
        self.targets.get(&view)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

pub fn prepare_depth_capture_targets(
    state: Res<DepthCaptureState>,
    render_device: Res<RenderDevice>,
    mut targets: ResMut<DepthCaptureTargets>,
    views: Query<(Entity, &ExtractedView), With<Camera3d>>,
) {
    if !state.active {
        if !targets.targets.is_empty() {
            targets.targets.clear();
        }
        return;
    }

    let mut live = HashSet::new();
    for (entity, view) in &views {
        let size = UVec2::new(view.viewport.z, view.viewport.w);
        if size.x == 0 || size.y == 0 {
            continue;
        }
        live.insert(entity);

        if targets
            .targets
            .get(&entity)
            .is_some_and(|target| target.size == size)
        {
            continue;
        }

        let texture = render_device.create_texture(&TextureDescriptor {
            label: Some("radar_profile_depth_capture"),
            size: Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::R32Float,
            usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&TextureViewDescriptor::default());
        targets.targets.insert(
            entity,
            CapturedDepth {
                texture,
                view,
                size,
            },
        );
    }

    targets.targets.retain(|entity, _| live.contains(entity));
}

/// Matches `CaptureParams` in `depth_capture.wgsl`.
#[repr(C)]
#[derive(Pod, Zeroable, Copy, Clone, Debug, PartialEq)]
pub struct CaptureParams {
    pub viewport_origin: [u32; 2],
    _padding: [u32; 2],
}

impl CaptureParams {
    pub fn new(viewport: UVec4) -> Self {
        Self {
            viewport_origin: [viewport.x, viewport.y],
            _padding: [0; 2],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DepthCapturePipelineKey {
    pub multisampled: bool,
}

#[derive(Resource)]
pub struct DepthCapturePipeline {
    layout: BindGroupLayout,
    multisampled_layout: BindGroupLayout,
    shader: Handle<Shader>,
}

impl DepthCapturePipeline {
    fn layout(&self, key: DepthCapturePipelineKey) -> &BindGroupLayout {
        if key.multisampled {
            &self.multisampled_layout
        } else {
            &self.layout
        }
    }
}

impl FromWorld for DepthCapturePipeline {
    fn from_world(world: &mut World) -> Self {
        let render_device = world.resource::<RenderDevice>();

        let layout = render_device.create_bind_group_layout(
            "radar_depth_capture_layout",
            &BindGroupLayoutEntries::sequential(
                ShaderStages::FRAGMENT,
                (texture_depth_2d(), uniform_buffer_sized(false, None)),
            ),
        );
        let multisampled_layout = render_device.create_bind_group_layout(
            "radar_depth_capture_multisampled_layout",
            &BindGroupLayoutEntries::sequential(
                ShaderStages::FRAGMENT,
                (
                    texture_depth_2d_multisampled(),
                    uniform_buffer_sized(false, None),
                ),
            ),
        );

        Self {
            layout,
            multisampled_layout,
            shader: world.resource::<RadarProfileShaders>().depth_capture.clone(),
        }
    }
}

impl SpecializedRenderPipeline for DepthCapturePipeline {
    type Key = DepthCapturePipelineKey;

    fn specialize(&self, key: Self::Key) -> RenderPipelineDescriptor {
        let mut shader_defs = Vec::new();
        if key.multisampled {
            shader_defs.push("MULTISAMPLED".into());
        }

        RenderPipelineDescriptor {
            label: Some("radar_depth_capture_pipeline".into()),
            layout: vec![self.layout(key).clone()],
            push_constant_ranges: vec![],
            vertex: fullscreen_shader_vertex_state(),
            fragment: Some(FragmentState {
                shader: self.shader.clone(),
                shader_defs,
                entry_point: "fragment".into(),
                targets: vec![Some(ColorTargetState {
                    format: TextureFormat::R32Float,
                    blend: None,
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState::default(),
            depth_stencil: None,
            multisample: MultisampleState::default(),
            zero_initialize_workgroup_memory: false,
        }
    }
}

pub struct PreparedDepthCapture {
    pipeline: CachedRenderPipelineId,
    bind_group: BindGroup,
}

#[derive(Resource, Default)]
pub struct DepthCaptureViews {
    views: HashMap<Entity, PreparedDepthCapture>,
}

pub fn prepare_depth_capture_bind_groups(
    state: Res<DepthCaptureState>,
    render_device: Res<RenderDevice>,
    pipeline_cache: Res<PipelineCache>,
    capture_pipeline: Res<DepthCapturePipeline>,
    mut pipelines: ResMut<SpecializedRenderPipelines<DepthCapturePipeline>>,
    targets: Res<DepthCaptureTargets>,
    mut prepared: ResMut<DepthCaptureViews>,
    views: Query<(Entity, &ExtractedView, &ViewDepthTexture, &Msaa)>,
) {
    prepared.views.clear();
    if !state.active {
        return;
    }

    for (entity, view, depth, msaa) in &views {
        if targets.get(entity).is_none() {
            continue;
        }
        if !depth.texture.usage().contains(TextureUsages::TEXTURE_BINDING) {
            warn_once!("View depth is not sampleable, radar profiles will not be occluded");
            continue;
        }

        let key = DepthCapturePipelineKey {
            multisampled: msaa.samples() > 1,
        };
        let pipeline = pipelines.specialize(&pipeline_cache, &capture_pipeline, key);

        let params = render_device.create_buffer_with_data(&BufferInitDescriptor {
            label: Some("radar_depth_capture_params"),
            contents: bytemuck::bytes_of(&CaptureParams::new(view.viewport)),
            usage: BufferUsages::UNIFORM,
        });

        let bind_group = render_device.create_bind_group(
            "radar_depth_capture_bind_group",
            capture_pipeline.layout(key),
            &BindGroupEntries::sequential((depth.view(), params.as_entire_binding())),
        );

        prepared.views.insert(
            entity,
            PreparedDepthCapture {
                pipeline,
                bind_group,
            },
        );
    }
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, RenderLabel)]
pub struct DepthCaptureLabel;

/// Fullscreen pass copying the view's depth into its capture texture.
#[derive(Default)]
pub struct DepthCaptureNode;

impl ViewNode for DepthCaptureNode {
    type ViewQuery = ();

    fn run(
        &self,
        graph: &mut RenderGraphContext,
        render_context: &mut RenderContext,
        _view: QueryItem<Self::ViewQuery>,
        world: &World,
    ) -> Result<(), NodeRunError> {
        let view_entity = graph.view_entity();

        let Some(prepared) = world.resource::<DepthCaptureViews>().views.get(&view_entity) else {
            return Ok(());
        };
        let Some(target) = world.resource::<DepthCaptureTargets>().get(view_entity) else {
            return Ok(());
        };
        let Some(pipeline) = world
            .resource::<PipelineCache>()
            .get_render_pipeline(prepared.pipeline)
        else {
            return Ok(());
        };

        let mut render_pass = render_context.begin_tracked_render_pass(RenderPassDescriptor {
            label: Some("radar_depth_capture_pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: &target.view,
                resolve_target: None,
                ops: Operations::default(),
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_render_pipeline(pipeline);
        render_pass.set_bind_group(0, &prepared.bind_group, &[]);
        render_pass.draw(0..3, 0..1);

        Ok(())
    }
}

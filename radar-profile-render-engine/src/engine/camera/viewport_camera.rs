use crate::engine::render::frame::RadarProfileFrame;
use crate::engine::scene::reference_body::ReferenceBody;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;
use radar_constants::render_settings::DEFAULT_FAR_CLIP;

/// Far plane in body radii once a body is framed.
const FAR_CLIP_BODY_RADII: f32 = 100.0;

/// Orbit state around `focus_point`, in scene units.
#[derive(Resource, Debug, Clone)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub min_distance: f32,
    /// Far plane shared by the camera projection and the profile shader.
    pub far_clip: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::ZERO,
            distance: 1.0e7,
            min_distance: 1.0,
            far_clip: DEFAULT_FAR_CLIP,
            pitch: -0.4,
            yaw: 0.0,
        }
    }
}

impl ViewportCamera {
    /// Frame a body of the given radius from three radii out.
    pub fn frame_body(&mut self, radius: f32) {
        self.min_distance = radius * 1.001;
        self.distance = radius * 3.0;
        self.far_clip = radius * FAR_CLIP_BODY_RADII;
    }

    /// Farthest orbit that still keeps the whole body inside the far plane.
    pub fn max_distance(&self) -> f32 {
        (self.far_clip * 0.5).max(self.min_distance)
    }

    pub fn projection(&self) -> Projection {
        Projection::Perspective(PerspectiveProjection {
            far: self.far_clip,
            ..default()
        })
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn transform(&self) -> Transform {
        let rotation = self.rotation();
        Transform {
            translation: self.focus_point + rotation * Vec3::Z * self.distance,
            rotation,
            ..default()
        }
    }

    /// Zoom by wheel steps. Steps are proportional to the altitude above the
    /// closest allowed distance so the camera slows near the surface.
    pub fn zoom(&mut self, steps: f32) {
        let altitude = (self.distance - self.min_distance).max(self.min_distance * 1.0e-4);
        self.distance = (self.distance - steps * altitude * 0.15)
            .clamp(self.min_distance, self.max_distance());
    }
}

pub fn camera_controller(
    mut camera_query: Query<(&mut Transform, &mut Projection), With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mut frame: ResMut<RadarProfileFrame>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    bodies: Query<&ReferenceBody, Added<ReferenceBody>>,
) {
    for body in &bodies {
        viewport_camera.frame_body(body.radius as f32);
        frame.set_far_clip(viewport_camera.far_clip);
        if let Ok((_, mut projection)) = camera_query.single_mut() {
            *projection = viewport_camera.projection();
        }
    }

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Right drag orbits
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        viewport_camera.yaw += -mouse_delta.x * yaw_sens;
        viewport_camera.pitch += -mouse_delta.y * pitch_sens;
        viewport_camera.pitch = viewport_camera.pitch.clamp(-1.55, 1.55);
    }

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        viewport_camera.zoom(scroll_accum);
    }

    if let Ok((mut transform, _)) = camera_query.single_mut() {
        *transform = viewport_camera.transform();
    }
}

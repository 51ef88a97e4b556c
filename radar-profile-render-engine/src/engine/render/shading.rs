//! CPU reference of the ribbon fragment stage in `radar_profile.wgsl`.
//!
//! Mirrors the shader step for step so reveal, occlusion and compositing
//! rules can be checked without a GPU.

use crate::engine::render::frame::DepthEncoding;
use bevy::math::{Mat4, Vec3};
use radar_constants::render_settings::{
    ALPHA_FALLOFF_DISTANCE, ALPHA_FALLOFF_MAX, ALPHA_FALLOFF_MIN, ECHO_COLOUR_EXPONENTS,
    REVEAL_FADE_SECONDS,
};

/// Per-draw state shared by every fragment of one profile.
#[derive(Debug, Clone, Copy)]
pub struct ShadingContext {
    /// Simulation seconds since the profile's first sample.
    pub elapsed: f32,
    pub scene_scale: f32,
    pub far_clip: f32,
    pub clip_from_view: Mat4,
    pub encoding: DepthEncoding,
}

#[derive(Debug, Clone, Copy)]
pub struct RibbonFragment {
    /// Interpolated view space position.
    pub view_position: Vec3,
    pub local_time: f32,
    /// Radargram sample at the fragment's texcoord.
    pub echo: f32,
    /// Captured depth at the fragment's pixel.
    pub captured_depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FragmentOutcome {
    /// The sample lies in the profile's future.
    NotRevealed,
    /// Nothing opaque lies at or in front of the ribbon at this pixel.
    Occluded,
    Shaded {
        colour: [f32; 4],
        /// Depth override, written only for linear distance depth.
        depth: Option<f32>,
    },
}

/// Distance to the opaque surface along the fragment's view ray, `None`
/// when the capture holds no surface there.
pub fn surface_distance(
    encoding: DepthEncoding,
    captured_depth: f32,
    far_clip: f32,
    clip_from_view: &Mat4,
    view_position: Vec3,
) -> Option<f32> {
    match encoding {
        DepthEncoding::LinearDistance => Some(captured_depth * far_clip),
        DepthEncoding::ReverseZ => {
            if captured_depth <= 0.0 {
                return None;
            }
            let surface_view_z =
                -clip_from_view.w_axis.z / (captured_depth + clip_from_view.z_axis.z);
            Some(view_position.length() * surface_view_z / view_position.z)
        }
    }
}

/// Freshly revealed samples start white and settle on their echo value.
pub fn reveal_fade(echo: f32, elapsed: f32, local_time: f32) -> f32 {
    let t = ((elapsed - local_time) / REVEAL_FADE_SECONDS).clamp(0.0, 1.0);
    1.0 + (echo - 1.0) * t
}

pub fn echo_colour(val: f32) -> [f32; 3] {
    ECHO_COLOUR_EXPONENTS.map(|exponent| val.powf(exponent))
}

/// Opacity for a fragment `depth_below_surface` scene units behind the surface.
pub fn ribbon_alpha(depth_below_surface: f32, scene_scale: f32) -> f32 {
    1.0 - (depth_below_surface * scene_scale / ALPHA_FALLOFF_DISTANCE)
        .clamp(ALPHA_FALLOFF_MIN, ALPHA_FALLOFF_MAX)
}

pub fn shade_fragment(context: &ShadingContext, fragment: &RibbonFragment) -> FragmentOutcome {
    if fragment.local_time > context.elapsed {
        return FragmentOutcome::NotRevealed;
    }

    let sharad_distance = fragment.view_position.length();
    let Some(surface) = surface_distance(
        context.encoding,
        fragment.captured_depth,
        context.far_clip,
        &context.clip_from_view,
        fragment.view_position,
    ) else {
        return FragmentOutcome::Occluded;
    };
    if sharad_distance < surface {
        return FragmentOutcome::Occluded;
    }

    let val = reveal_fade(fragment.echo, context.elapsed, fragment.local_time);
    let [r, g, b] = echo_colour(val);
    let alpha = ribbon_alpha(sharad_distance - surface, context.scene_scale);

    let depth = match context.encoding {
        DepthEncoding::LinearDistance => Some(sharad_distance / context.far_clip),
        DepthEncoding::ReverseZ => None,
    };

    FragmentOutcome::Shaded {
        colour: [r, g, b, alpha],
        depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAR: f32 = 1000.0;

    fn linear_context(elapsed: f32) -> ShadingContext {
        ShadingContext {
            elapsed,
            scene_scale: 1.0,
            far_clip: FAR,
            clip_from_view: Mat4::IDENTITY,
            encoding: DepthEncoding::LinearDistance,
        }
    }

    /// Fragment `distance` units straight ahead with the surface at `surface`.
    fn fragment(distance: f32, surface: f32, local_time: f32) -> RibbonFragment {
        RibbonFragment {
            view_position: Vec3::new(0.0, 0.0, -distance),
            local_time,
            echo: 0.25,
            captured_depth: surface / FAR,
        }
    }

    #[test]
    fn reveal_boundary_is_inclusive() {
        let context = linear_context(10.0);
        assert!(matches!(
            shade_fragment(&context, &fragment(500.0, 400.0, 10.0)),
            FragmentOutcome::Shaded { .. }
        ));
        assert_eq!(
            shade_fragment(&context, &fragment(500.0, 400.0, 10.0 + 1e-3)),
            FragmentOutcome::NotRevealed
        );
    }

    #[test]
    fn occlusion_boundary_is_inclusive() {
        let context = linear_context(10.0);
        assert!(matches!(
            shade_fragment(&context, &fragment(500.0, 500.0, 0.0)),
            FragmentOutcome::Shaded { .. }
        ));
        assert_eq!(
            shade_fragment(&context, &fragment(499.0, 500.0, 0.0)),
            FragmentOutcome::Occluded
        );
    }

    #[test]
    fn fresh_samples_start_white_and_settle() {
        assert_eq!(reveal_fade(0.25, 5.0, 5.0), 1.0);
        assert_eq!(reveal_fade(0.25, 5.5, 5.0), 0.625);
        assert_eq!(reveal_fade(0.25, 9.0, 5.0), 0.25);
        assert_eq!(echo_colour(1.0), [1.0, 1.0, 1.0]);

        let [r, g, b] = echo_colour(0.25);
        assert!((r - 0.5).abs() < 1e-6);
        assert!((g - 0.0625).abs() < 1e-6);
        assert!(b < 1e-5);
    }

    #[test]
    fn alpha_is_clamped_between_floor_and_ceiling() {
        assert!((ribbon_alpha(0.0, 1.0) - 0.9).abs() < 1e-6);
        assert!((ribbon_alpha(15_000.0, 1.0) - 0.5).abs() < 1e-6);
        assert_eq!(ribbon_alpha(30_000.0, 1.0), 0.0);
        assert_eq!(ribbon_alpha(90_000.0, 1.0), 0.0);
        assert!((ribbon_alpha(1.5, 10_000.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn linear_mode_overrides_depth_with_distance() {
        match shade_fragment(&linear_context(10.0), &fragment(500.0, 400.0, 0.0)) {
            FragmentOutcome::Shaded { depth, colour } => {
                assert_eq!(depth, Some(0.5));
                assert!(colour[3] >= 0.0 && colour[3] <= 0.9);
            }
            other => panic!("expected shaded fragment, got {other:?}"),
        }
    }

    #[test]
    fn reverse_z_recovers_distance_along_the_view_ray() {
        let near = 0.1;
        let projection = Mat4::perspective_infinite_reverse_rh(1.0, 1.5, near);

        let on_axis = Vec3::new(0.0, 0.0, -100.0);
        let d = near / 50.0;
        let surface = surface_distance(DepthEncoding::ReverseZ, d, FAR, &projection, on_axis);
        assert!((surface.unwrap() - 50.0).abs() < 1e-3);

        let off_axis = Vec3::new(30.0, 0.0, -40.0);
        let d = near / 20.0;
        let surface = surface_distance(DepthEncoding::ReverseZ, d, FAR, &projection, off_axis);
        assert!((surface.unwrap() - 25.0).abs() < 1e-3);
    }

    #[test]
    fn reverse_z_background_hides_the_ribbon() {
        let context = ShadingContext {
            elapsed: 10.0,
            scene_scale: 1.0,
            far_clip: FAR,
            clip_from_view: Mat4::perspective_infinite_reverse_rh(1.0, 1.5, 0.1),
            encoding: DepthEncoding::ReverseZ,
        };
        let mut background = fragment(100.0, 0.0, 0.0);
        background.captured_depth = 0.0;
        assert_eq!(shade_fragment(&context, &background), FragmentOutcome::Occluded);

        let mut behind_terrain = fragment(100.0, 0.0, 0.0);
        behind_terrain.captured_depth = 0.1 / 60.0;
        assert!(matches!(
            shade_fragment(&context, &behind_terrain),
            FragmentOutcome::Shaded { depth: None, .. }
        ));
    }
}

use bevy::prelude::*;

/// Shader handles for the radar profile passes, embedded in the binary.
#[derive(Resource, Clone)]
pub struct RadarProfileShaders {
    pub depth_capture: Handle<Shader>,
    pub radar_profile: Handle<Shader>,
}

impl RadarProfileShaders {
    pub fn register(shaders: &mut Assets<Shader>) -> Self {
        Self {
            depth_capture: shaders.add(Shader::from_wgsl(
                include_str!("shaders/depth_capture.wgsl"),
                "radar_profile/depth_capture.wgsl",
            )),
            radar_profile: shaders.add(Shader::from_wgsl(
                include_str!("shaders/radar_profile.wgsl"),
                "radar_profile/radar_profile.wgsl",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use naga::valid::{Capabilities, ValidationFlags, Validator};

    const RADAR_PROFILE: &str = include_str!("shaders/radar_profile.wgsl");
    const DEPTH_CAPTURE: &str = include_str!("shaders/depth_capture.wgsl");

    const FULLSCREEN_OUTPUT: &str = "struct FullscreenVertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}";

    /// Resolve `#ifdef`/`#ifndef`/`#else`/`#endif` for the given defs and
    /// inline the fullscreen vertex output import.
    fn preprocess(source: &str, defs: &[&str]) -> String {
        let mut active = vec![true];
        let mut out = String::new();
        for line in source.lines() {
            let trimmed = line.trim();
            if let Some(def) = trimmed.strip_prefix("#ifdef ") {
                let parent = *active.last().unwrap();
                active.push(parent && defs.contains(&def.trim()));
            } else if let Some(def) = trimmed.strip_prefix("#ifndef ") {
                let parent = *active.last().unwrap();
                active.push(parent && !defs.contains(&def.trim()));
            } else if trimmed == "#else" {
                let branch = active.pop().unwrap();
                let parent = *active.last().unwrap();
                active.push(parent && !branch);
            } else if trimmed == "#endif" {
                active.pop();
            } else if trimmed.starts_with("#import") {
                out.push_str(FULLSCREEN_OUTPUT);
                out.push('\n');
            } else if *active.last().unwrap() {
                out.push_str(line);
                out.push('\n');
            }
        }
        assert_eq!(active.len(), 1, "unbalanced shader defs");
        out
    }

    fn validate(source: &str, defs: &[&str]) {
        let wgsl = preprocess(source, defs);
        let module = naga::front::wgsl::parse_str(&wgsl)
            .unwrap_or_else(|err| panic!("{defs:?}: {}", err.emit_to_string(&wgsl)));
        Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .unwrap_or_else(|err| panic!("{defs:?}: {err:?}"));
    }

    #[test]
    fn radar_profile_shader_is_valid_for_both_depth_encodings() {
        validate(RADAR_PROFILE, &[]);
        validate(RADAR_PROFILE, &["REVERSE_Z_DEPTH"]);
    }

    #[test]
    fn reverse_z_variant_leaves_fragment_depth_alone() {
        assert!(preprocess(RADAR_PROFILE, &[]).contains("frag_depth"));
        assert!(!preprocess(RADAR_PROFILE, &["REVERSE_Z_DEPTH"]).contains("frag_depth"));
    }

    #[test]
    fn depth_capture_shader_is_valid_with_and_without_msaa() {
        validate(DEPTH_CAPTURE, &[]);
        validate(DEPTH_CAPTURE, &["MULTISAMPLED"]);
    }
}

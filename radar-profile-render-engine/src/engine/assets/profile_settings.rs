use crate::engine::core::errors::{ProfileError, ProfileResult};
use bevy::prelude::*;
use radar_constants::reference_body::{DEFAULT_CENTER, DEFAULT_FRAME, get_body_radius};
use radar_constants::render_settings::DEFAULT_HEIGHT_SCALE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for one set of radar profiles, loaded from `*.profiles.json`.
#[derive(Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarProfileSettings {
    /// Directory scanned for `<name>_geom.tab` / `<name>_tiff.tif` pairs.
    pub file_path: PathBuf,
    #[serde(default = "default_center")]
    pub center_name: String,
    #[serde(default = "default_frame")]
    pub frame_name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
    /// Overrides the reference body radius table.
    #[serde(default)]
    pub radius: Option<f64>,
}

fn default_center() -> String {
    DEFAULT_CENTER.to_string()
}

fn default_frame() -> String {
    DEFAULT_FRAME.to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_height_scale() -> f32 {
    DEFAULT_HEIGHT_SCALE
}

impl RadarProfileSettings {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            center_name: default_center(),
            frame_name: default_frame(),
            enabled: default_enabled(),
            height_scale: default_height_scale(),
            radius: None,
        }
    }

    pub fn body_radius(&self) -> ProfileResult<f64> {
        self.radius
            .or_else(|| get_body_radius(&self.center_name))
            .ok_or_else(|| ProfileError::UnknownBody(self.center_name.clone()))
    }
}

use crate::engine::core::errors::{ProfileError, ProfileResult};
use bevy::prelude::*;
use radar_constants::file_naming::{
    profile_image_name, profile_name_from_table, sample_table_name,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Table and image files making up one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSource {
    pub name: String,
    pub table_path: PathBuf,
    pub image_path: PathBuf,
}

/// List every `<name>_geom.tab` in `dir` with its companion image path,
/// sorted by name. A missing directory holds no profiles.
pub fn discover_profiles(dir: &Path) -> ProfileResult<Vec<ProfileSource>> {
    if !dir.is_dir() {
        info!("No radar profile directory at {}", dir.display());
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|source| ProfileError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ProfileError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(name) = profile_name_from_table(file_name) else {
            continue;
        };

        sources.push(ProfileSource {
            name: name.to_string(),
            image_path: dir.join(profile_image_name(name)),
            table_path: dir.join(sample_table_name(name)),
        });
    }

    sources.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sources)
}

use crate::engine::assets::radar_profile::{ExistenceWindow, RadarProfile};
use crate::engine::mesh::ribbon_mesh::RibbonGeometry;
use bevy::prelude::*;
use bevy::render::Extract;
use std::sync::Arc;

/// Render world snapshot of one profile.
#[derive(Debug, Clone)]
pub struct ExtractedRadarProfile {
    /// Main world entity, stable across frames.
    pub entity: Entity,
    pub geometry: Arc<RibbonGeometry>,
    pub image: AssetId<Image>,
    pub window: ExistenceWindow,
    pub radius: f32,
    pub world_from_local: Mat4,
}

/// A profile drawn this frame and its reveal time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchEntry {
    pub index: usize,
    pub elapsed: f32,
}

#[derive(Resource, Default)]
pub struct ExtractedRadarProfiles {
    pub profiles: Vec<ExtractedRadarProfile>,
}

impl ExtractedRadarProfiles {
    /// Profiles in existence at `sim_time`, in extraction order. Elapsed time
    /// is taken in double precision before narrowing for the GPU.
    pub fn batch(&self, sim_time: f64) -> Vec<BatchEntry> {
        self.profiles
            .iter()
            .enumerate()
            .filter(|(_, profile)| profile.window.contains(sim_time))
            .map(|(index, profile)| BatchEntry {
                index,
                elapsed: profile.window.elapsed(sim_time) as f32,
            })
            .collect()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.profiles.iter().any(|profile| profile.entity == entity)
    }
}

pub fn extract_radar_profiles(
    mut extracted: ResMut<ExtractedRadarProfiles>,
    profiles: Extract<
        Query<(
            Entity,
            &RadarProfile,
            &GlobalTransform,
            &InheritedVisibility,
        )>,
    >,
) {
    extracted.profiles.clear();

    for (entity, profile, transform, visibility) in &profiles {
        if !visibility.get() {
            continue;
        }

        extracted.profiles.push(ExtractedRadarProfile {
            entity,
            geometry: profile.geometry().clone(),
            image: profile.image().id(),
            window: profile.existence(),
            radius: profile.radius() as f32,
            world_from_local: transform.compute_matrix(),
        });
    }
}

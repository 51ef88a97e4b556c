use crate::engine::mesh::ribbon_mesh::RibbonGeometry;
use bevy::prelude::*;
use std::sync::Arc;

/// Whether a profile should be drawn at a given simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileVisibility {
    /// The simulation has not reached the first sample yet.
    Pending,
    Active,
    /// Past the end of existence. Unreachable with the far-future sentinel.
    Expired,
}

/// Simulation-time interval `[start, end]` during which a profile may be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExistenceWindow {
    pub start: f64,
    pub end: f64,
}

impl ExistenceWindow {
    pub fn contains(&self, sim_time: f64) -> bool {
        self.start <= sim_time && sim_time <= self.end
    }

    pub fn visibility(&self, sim_time: f64) -> ProfileVisibility {
        if sim_time < self.start {
            ProfileVisibility::Pending
        } else if sim_time <= self.end {
            ProfileVisibility::Active
        } else {
            ProfileVisibility::Expired
        }
    }

    /// Elapsed reveal time passed to the fragment stage.
    pub fn elapsed(&self, sim_time: f64) -> f64 {
        sim_time - self.start
    }
}

/// One radar ground track registered with the scene.
///
/// Immutable after construction. The world transform comes from the entity's
/// `GlobalTransform`, normally inherited from the body it is draped over.
#[derive(Component, Debug, Clone)]
#[require(Transform, Visibility)]
pub struct RadarProfile {
    name: String,
    geometry: Arc<RibbonGeometry>,
    image: Handle<Image>,
    window: ExistenceWindow,
    radius: f64,
    sample_count: usize,
}

impl RadarProfile {
    pub fn new(
        name: impl Into<String>,
        geometry: RibbonGeometry,
        image: Handle<Image>,
        window: ExistenceWindow,
        radius: f64,
        sample_count: usize,
    ) -> Self {
        Self {
            name: name.into(),
            geometry: Arc::new(geometry),
            image,
            window,
            radius,
            sample_count,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &Arc<RibbonGeometry> {
        &self.geometry
    }

    pub fn image(&self) -> &Handle<Image> {
        &self.image
    }

    pub fn existence(&self) -> ExistenceWindow {
        self.window
    }

    /// Radius in metres of the body this profile is draped over.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn is_in_existence(&self, sim_time: f64) -> bool {
        self.window.contains(sim_time)
    }
}

/// Parent of the profiles loaded from one settings block.
#[derive(Component, Debug, Clone)]
#[require(Transform, Visibility)]
pub struct RadarProfileSet {
    pub source_dir: std::path::PathBuf,
    pub center_name: String,
    pub frame_name: String,
    pub radius: f64,
}

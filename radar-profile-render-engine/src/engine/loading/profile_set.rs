use crate::engine::assets::profile_settings::RadarProfileSettings;
use crate::engine::assets::radar_profile::{ExistenceWindow, RadarProfile, RadarProfileSet};
use crate::engine::core::errors::ProfileResult;
use crate::engine::core::sim_time::end_of_existence;
use crate::engine::loading::profile_discovery::{ProfileSource, discover_profiles};
use crate::engine::loading::profile_image::{check_image_columns, load_profile_image};
use crate::engine::loading::sample_table::load_sample_table;
use crate::engine::mesh::ribbon_mesh::RibbonGeometry;
use crate::engine::render::depth_capture::{DepthCaptureHandle, DepthCaptureRegistry};
use crate::engine::render::frame::RadarProfileFrame;
use bevy::prelude::*;
use radar_constants::time::PROFILE_PREVIEW_OFFSET_SECONDS;
use std::collections::HashMap;

/// Request to load every profile under `settings.file_path`.
#[derive(Event, Debug, Clone)]
pub struct LoadProfileSet {
    pub settings: RadarProfileSettings,
    /// Body entity whose transform places the body fixed frame in the scene.
    pub parent: Option<Entity>,
}

/// Emitted once per profile added to the scene.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ProfileRegistered {
    pub name: String,
    pub start_time: f64,
    pub end_time: f64,
    pub sample_count: usize,
    /// Time a listing should jump to when previewing this profile.
    pub preview_time: f64,
}

/// Depth capture handles held by live profile sets.
#[derive(Resource, Default)]
pub struct ProfileSetCaptures {
    handles: HashMap<Entity, DepthCaptureHandle>,
}

impl ProfileSetCaptures {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// A profile built from disk, not yet in the scene.
#[derive(Debug)]
pub struct LoadedProfile {
    pub name: String,
    pub geometry: RibbonGeometry,
    pub image: Image,
    pub window: ExistenceWindow,
    pub sample_count: usize,
}

#[derive(Debug, Default)]
pub struct LoadedProfileSet {
    pub profiles: Vec<LoadedProfile>,
    /// Profiles dropped because their table or image could not be read.
    pub failed: usize,
}

pub fn load_profile(source: &ProfileSource, end_time: f64) -> ProfileResult<LoadedProfile> {
    let table = load_sample_table(&source.table_path)?;
    let image = load_profile_image(&source.image_path)?;
    check_image_columns(&source.name, &image, table.samples.len());

    // Without samples the window collapses onto the sentinel and nothing draws.
    let start_time = table.start_time().unwrap_or(end_time);
    let geometry = RibbonGeometry::from_samples(&table.samples, start_time);

    Ok(LoadedProfile {
        name: source.name.clone(),
        geometry,
        image,
        window: ExistenceWindow {
            start: start_time,
            end: end_time,
        },
        sample_count: table.samples.len(),
    })
}

/// Load every discoverable profile. Individual failures are logged and
/// counted; only an unlistable directory fails the whole set.
pub fn load_profile_set(settings: &RadarProfileSettings) -> ProfileResult<LoadedProfileSet> {
    let end_time = end_of_existence();
    let mut set = LoadedProfileSet::default();

    for source in discover_profiles(&settings.file_path)? {
        match load_profile(&source, end_time) {
            Ok(profile) => set.profiles.push(profile),
            Err(err) => {
                error!("Skipping radar profile {}: {err}", source.name);
                set.failed += 1;
            }
        }
    }

    Ok(set)
}

/// Spawn requested profile sets. A set holds one depth capture handle while
/// it has at least one profile.
pub fn spawn_profile_sets(
    mut commands: Commands,
    mut requests: EventReader<LoadProfileSet>,
    mut registered: EventWriter<ProfileRegistered>,
    mut images: ResMut<Assets<Image>>,
    mut registry: ResMut<DepthCaptureRegistry>,
    mut captures: ResMut<ProfileSetCaptures>,
    mut frame: ResMut<RadarProfileFrame>,
) {
    for request in requests.read() {
        let settings = &request.settings;

        let radius = match settings.body_radius() {
            Ok(radius) => radius,
            Err(err) => {
                error!("Cannot load radar profiles from {}: {err}", settings.file_path.display());
                continue;
            }
        };

        let loaded = match load_profile_set(settings) {
            Ok(loaded) => loaded,
            Err(err) => {
                error!("Cannot load radar profiles: {err}");
                continue;
            }
        };

        frame.set_enabled(settings.enabled);
        frame.set_height_scale(settings.height_scale);

        let set = commands
            .spawn((
                Name::new(format!("Radar profiles {}", settings.file_path.display())),
                RadarProfileSet {
                    source_dir: settings.file_path.clone(),
                    center_name: settings.center_name.clone(),
                    frame_name: settings.frame_name.clone(),
                    radius,
                },
            ))
            .id();
        if let Some(parent) = request.parent {
            commands.entity(set).insert(ChildOf(parent));
        }

        let count = loaded.profiles.len();
        for profile in loaded.profiles {
            registered.write(ProfileRegistered {
                name: profile.name.clone(),
                start_time: profile.window.start,
                end_time: profile.window.end,
                sample_count: profile.sample_count,
                preview_time: profile.window.start + PROFILE_PREVIEW_OFFSET_SECONDS,
            });

            let image = images.add(profile.image);
            commands.spawn((
                Name::new(profile.name.clone()),
                RadarProfile::new(
                    profile.name,
                    profile.geometry,
                    image,
                    profile.window,
                    radius,
                    profile.sample_count,
                ),
                ChildOf(set),
            ));
        }

        if count > 0 {
            captures.handles.insert(set, registry.acquire());
        }

        info!(
            "Loaded {count} radar profiles from {} ({} skipped)",
            settings.file_path.display(),
            loaded.failed
        );
    }
}

/// Return a despawned set's capture handle to the registry.
pub fn release_profile_set_captures(
    mut removed: RemovedComponents<RadarProfileSet>,
    mut registry: ResMut<DepthCaptureRegistry>,
    mut captures: ResMut<ProfileSetCaptures>,
) {
    for set in removed.read() {
        if let Some(handle) = captures.handles.remove(&set) {
            registry.release(handle);
        }
    }
}

/// Main world half of profile loading: events, capture bookkeeping and the
/// systems that turn settings into profile entities.
pub struct ProfileSetPlugin;

impl Plugin for ProfileSetPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DepthCaptureRegistry>()
            .init_resource::<ProfileSetCaptures>()
            .init_resource::<RadarProfileFrame>()
            .add_event::<LoadProfileSet>()
            .add_event::<ProfileRegistered>()
            .add_systems(
                Update,
                (spawn_profile_sets, release_profile_set_captures).chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const ROW_A: &str = "1,2008-11-02T07:15:30.000, 10.0,20.0,-100.0,250000.0, 0,0,0,0";
    const ROW_B: &str = "2,2008-11-02T07:15:31.000, 10.1,20.0,-100.0,250000.0, 0,0,0,0";

    fn write_profile(dir: &Path, name: &str, rows: &[&str], with_image: bool) {
        fs::write(dir.join(format!("{name}_geom.tab")), rows.join("\n")).unwrap();
        if with_image {
            image::GrayImage::from_pixel(rows.len().max(1) as u32, 2, image::Luma([128]))
                .save(dir.join(format!("{name}_tiff.tif")))
                .unwrap();
        }
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Image>()
            .add_plugins(ProfileSetPlugin);
        app
    }

    #[test]
    fn profiles_without_images_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_profile(dir.path(), "good", &[ROW_A, ROW_B], true);
        write_profile(dir.path(), "orphan", &[ROW_A], false);

        let set = load_profile_set(&RadarProfileSettings::new(dir.path())).unwrap();
        assert_eq!(set.failed, 1);
        assert_eq!(set.profiles.len(), 1);

        let profile = &set.profiles[0];
        assert_eq!(profile.name, "good");
        assert_eq!(profile.sample_count, 2);
        assert_eq!(profile.geometry.vertex_count(), 4);
        assert!(profile.window.start < profile.window.end);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let set = load_profile_set(&RadarProfileSettings::new(dir.path())).unwrap();
        assert!(set.profiles.is_empty());
        assert_eq!(set.failed, 0);
    }

    #[test]
    fn profile_set_holds_capture_until_despawned() {
        let dir = tempfile::tempdir().unwrap();
        write_profile(dir.path(), "a", &[ROW_A, ROW_B], true);
        write_profile(dir.path(), "b", &[ROW_B], true);

        let mut app = test_app();
        app.world_mut().send_event(LoadProfileSet {
            settings: RadarProfileSettings::new(dir.path()),
            parent: None,
        });
        app.update();

        let registered: Vec<ProfileRegistered> = app
            .world()
            .resource::<Events<ProfileRegistered>>()
            .iter_current_update_events()
            .cloned()
            .collect();
        assert_eq!(registered.len(), 2);
        assert_eq!(registered[0].name, "a");
        assert_eq!(
            registered[0].preview_time,
            registered[0].start_time + PROFILE_PREVIEW_OFFSET_SECONDS
        );

        let profiles = app
            .world_mut()
            .query::<&RadarProfile>()
            .iter(app.world())
            .count();
        assert_eq!(profiles, 2);
        assert_eq!(app.world().resource::<DepthCaptureRegistry>().user_count(), 1);

        let set = app
            .world_mut()
            .query_filtered::<Entity, With<RadarProfileSet>>()
            .single(app.world())
            .unwrap();
        app.world_mut().despawn(set);
        app.update();

        assert!(!app.world().resource::<DepthCaptureRegistry>().is_active());
        assert!(app.world().resource::<ProfileSetCaptures>().is_empty());
    }

    #[test]
    fn empty_set_never_acquires_a_capture() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app();
        app.world_mut().send_event(LoadProfileSet {
            settings: RadarProfileSettings::new(dir.path()),
            parent: None,
        });
        app.update();

        assert_eq!(app.world().resource::<DepthCaptureRegistry>().user_count(), 0);
        let sets = app
            .world_mut()
            .query::<&RadarProfileSet>()
            .iter(app.world())
            .count();
        assert_eq!(sets, 1);
    }
}

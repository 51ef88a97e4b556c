use crate::engine::assets::profile_settings::RadarProfileSettings;
use crate::engine::core::app_state::AppState;
use crate::engine::loading::profile_set::LoadProfileSet;
use crate::engine::scene::reference_body::spawn_reference_body;
use bevy::asset::LoadState;
use bevy::prelude::*;

pub const SETTINGS_PATH: &str = "radar_profiles.profiles.json";

#[derive(Resource, Default)]
pub struct SettingsLoader {
    handle: Option<Handle<RadarProfileSettings>>,
}

pub fn start_loading(mut settings_loader: ResMut<SettingsLoader>, asset_server: Res<AssetServer>) {
    info!("Loading radar profile settings from {SETTINGS_PATH}");
    settings_loader.handle = Some(asset_server.load(SETTINGS_PATH));
}

/// Once settings are available, place the reference body and request its profiles.
pub fn dispatch_loaded_settings(
    mut commands: Commands,
    settings_loader: Res<SettingsLoader>,
    asset_server: Res<AssetServer>,
    settings_assets: Res<Assets<RadarProfileSettings>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut load_requests: EventWriter<LoadProfileSet>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(handle) = settings_loader.handle.as_ref() else {
        return;
    };

    if let LoadState::Failed(err) = asset_server.load_state(handle) {
        error!("Radar profile settings failed to load: {err}");
        next_state.set(AppState::Running);
        return;
    }

    let Some(settings) = settings_assets.get(handle) else {
        return;
    };

    let radius = match settings.body_radius() {
        Ok(radius) => radius,
        Err(err) => {
            error!("{err}");
            next_state.set(AppState::Running);
            return;
        }
    };

    let body = spawn_reference_body(
        &mut commands,
        &mut meshes,
        &mut materials,
        &settings.center_name,
        radius,
    );

    load_requests.write(LoadProfileSet {
        settings: settings.clone(),
        parent: Some(body),
    });

    info!("→ Settings dispatched, transitioning to Running state");
    next_state.set(AppState::Running);
}

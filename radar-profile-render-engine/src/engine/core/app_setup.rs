use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use radar_constants::file_naming::SETTINGS_EXTENSION;

use crate::engine::assets::profile_settings::RadarProfileSettings;
use crate::engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use crate::engine::core::app_state::AppState;
use crate::engine::core::sim_time::{SimulationClock, advance_simulation_clock};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::settings_loader::{
    SettingsLoader, dispatch_loaded_settings, start_loading,
};
use crate::engine::plugin::RadarProfilePlugin;
use crate::engine::systems::hud::{HudText, hud_text_update_system};
use crate::engine::systems::playback_controls::{
    playback_controls, seed_clock_from_profiles, sync_profile_frame,
};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers the profile settings as a loadable JSON asset.
        .add_plugins(JsonAssetPlugin::<RadarProfileSettings>::new(&[
            SETTINGS_EXTENSION,
        ]))
        .add_plugins(RadarProfilePlugin::default());

    app.init_resource::<SettingsLoader>()
        .init_resource::<SimulationClock>()
        .init_resource::<ViewportCamera>();

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            dispatch_loaded_settings.run_if(in_state(AppState::Loading)),
        );

    let runtime_systems = (
        seed_clock_from_profiles,
        playback_controls,
        advance_simulation_clock,
        sync_profile_frame,
    )
        .chain();

    app.add_systems(
        Update,
        (runtime_systems, camera_controller).run_if(in_state(AppState::Running)),
    )
    .add_systems(Update, hud_text_update_system);

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_viewport_camera(commands: &mut Commands, camera: &ViewportCamera) {
    commands.spawn((
        Camera3d::default(),
        // Profiles draw into the main targets directly.
        Msaa::Off,
        camera.projection(),
        camera.transform(),
    ));
}

fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("Loading radar profiles"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                HudText,
            ));
        });
}

fn setup(mut commands: Commands, camera: Res<ViewportCamera>) {
    spawn_lighting(&mut commands);
    spawn_viewport_camera(&mut commands, &camera);
    create_native_overlays(&mut commands);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

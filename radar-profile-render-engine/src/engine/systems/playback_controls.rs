use crate::engine::core::sim_time::{SimulationClock, format_sim_time};
use crate::engine::loading::profile_set::ProfileRegistered;
use crate::engine::render::frame::RadarProfileFrame;
use bevy::prelude::*;

const RATE_STEP: f64 = 10.0;
const HEIGHT_SCALE_STEP: f32 = 0.5;

/// Jump the clock to the earliest registered profile's preview time the
/// first time profiles arrive.
pub fn seed_clock_from_profiles(
    mut registered: EventReader<ProfileRegistered>,
    mut clock: ResMut<SimulationClock>,
) {
    let earliest = registered
        .read()
        .map(|profile| profile.preview_time)
        .min_by(f64::total_cmp);

    if clock.seeded {
        return;
    }
    if let Some(time) = earliest {
        clock.set_time(time);
        info!("Simulation clock moved to {}", format_sim_time(time));
    }
}

pub fn playback_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut clock: ResMut<SimulationClock>,
    mut frame: ResMut<RadarProfileFrame>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        clock.paused = !clock.paused;
    }
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        clock.scale_rate(RATE_STEP);
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        clock.scale_rate(1.0 / RATE_STEP);
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        let enabled = !frame.enabled;
        frame.set_enabled(enabled);
    }
    if keyboard.just_pressed(KeyCode::BracketRight) {
        let scale = frame.height_scale + HEIGHT_SCALE_STEP;
        frame.set_height_scale(scale);
    }
    if keyboard.just_pressed(KeyCode::BracketLeft) {
        let scale = frame.height_scale - HEIGHT_SCALE_STEP;
        frame.set_height_scale(scale);
    }
}

/// Hand the clock to the renderer. The scene is laid out in metres.
pub fn sync_profile_frame(clock: Res<SimulationClock>, mut frame: ResMut<RadarProfileFrame>) {
    frame.update(clock.time, 1.0);
}

use crate::engine::assets::radar_profile::{ProfileVisibility, RadarProfile};
use crate::engine::core::sim_time::{SimulationClock, format_sim_time};
use crate::engine::render::frame::RadarProfileFrame;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

#[derive(Component)]
pub struct HudText;

pub fn hud_line(fps: Option<f64>, clock: &SimulationClock, frame: &RadarProfileFrame) -> String {
    let fps = fps.map_or_else(|| "--".to_string(), |value| format!("{value:.1}"));
    let playback = if clock.paused { "paused" } else { "playing" };
    let profiles = if frame.enabled { "on" } else { "off" };
    format!(
        "FPS: {fps} | {} | x{} {playback} | profiles {profiles} | height x{:.1}",
        format_sim_time(clock.time),
        clock.rate,
        frame.height_scale
    )
}

const LISTED_PROFILES: usize = 3;

/// Which profiles have started revealing at `sim_time` and how many are still pending.
pub fn profile_status_line<'a>(
    profiles: impl IntoIterator<Item = &'a RadarProfile>,
    sim_time: f64,
) -> String {
    let mut active = Vec::new();
    let mut pending = 0;
    for profile in profiles {
        match profile.existence().visibility(sim_time) {
            ProfileVisibility::Active if profile.is_in_existence(sim_time) => {
                active.push(profile.name())
            }
            ProfileVisibility::Pending => pending += 1,
            _ => {}
        }
    }
    active.sort_unstable();

    let mut listed = active
        .iter()
        .take(LISTED_PROFILES)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if active.len() > LISTED_PROFILES {
        listed.push_str(&format!(" +{} more", active.len() - LISTED_PROFILES));
    }
    if listed.is_empty() {
        format!("0 active, {pending} pending")
    } else {
        format!("{} active ({listed}), {pending} pending", active.len())
    }
}

pub fn hud_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    clock: Res<SimulationClock>,
    frame: Res<RadarProfileFrame>,
    profiles: Query<&RadarProfile>,
    mut query: Query<&mut Text, With<HudText>>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed());

    for mut text in &mut query {
        text.0 = format!(
            "{}\n{}",
            hud_line(fps, &clock, &frame),
            profile_status_line(&profiles, clock.time)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::radar_profile::ExistenceWindow;
    use crate::engine::mesh::ribbon_mesh::RibbonGeometry;

    fn profile(name: &str, start: f64) -> RadarProfile {
        RadarProfile::new(
            name,
            RibbonGeometry::default(),
            Handle::default(),
            ExistenceWindow { start, end: 1.0e9 },
            3_396_190.0,
            0,
        )
    }

    #[test]
    fn status_lists_active_profiles_and_counts_pending() {
        let profiles = [
            profile("s_03", 300.0),
            profile("s_02", 100.0),
            profile("s_01", 0.0),
            profile("s_04", 150.0),
            profile("s_05", 120.0),
        ];

        assert_eq!(profile_status_line(&profiles, 50.0), "1 active (s_01), 4 pending");
        assert_eq!(
            profile_status_line(&profiles, 200.0),
            "4 active (s_01, s_02, s_04 +1 more), 1 pending"
        );
        assert_eq!(profile_status_line(&profiles, -1.0), "0 active, 5 pending");
    }

    #[test]
    fn line_reports_playback_state() {
        let clock = SimulationClock {
            paused: true,
            ..default()
        };
        let mut frame = RadarProfileFrame::default();
        frame.set_enabled(false);

        let line = hud_line(Some(59.94), &clock, &frame);
        assert!(line.starts_with("FPS: 59.9 |"));
        assert!(line.contains("paused"));
        assert!(line.contains("profiles off"));
        assert!(hud_line(None, &clock, &frame).starts_with("FPS: -- |"));
    }
}

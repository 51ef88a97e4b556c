//! Renders ground penetrating radar profiles as vertical curtains hanging
//! below a planetary surface, revealed as simulation time passes.

pub mod engine;

pub use engine::loading::profile_set::{LoadProfileSet, ProfileRegistered};
pub use engine::plugin::RadarProfilePlugin;
pub use engine::render::frame::{DepthEncoding, RadarProfileFrame};

/// Radial lift of the ribbon's outer edge above the body radius, in metres.
pub const OUTER_SHELL_OFFSET: f32 = 10_000.0;

/// Radial depth of the ribbon's inner edge below the body radius, in metres.
pub const INNER_SHELL_OFFSET: f32 = 10_100.0;

pub const DEFAULT_HEIGHT_SCALE: f32 = 1.0;

/// Seconds of simulation time over which a freshly revealed sample fades to its true colour.
pub const REVEAL_FADE_SECONDS: f32 = 1.0;

/// Distance below the visible surface (in scene units times scene scale) at which
/// ribbon opacity bottoms out.
pub const ALPHA_FALLOFF_DISTANCE: f32 = 30_000.0;
pub const ALPHA_FALLOFF_MIN: f32 = 0.1;
pub const ALPHA_FALLOFF_MAX: f32 = 1.0;

/// Per-channel exponents of the false-colour echo ramp (red, green, blue).
pub const ECHO_COLOUR_EXPONENTS: [f32; 3] = [0.5, 2.0, 10.0];

pub const DEFAULT_FAR_CLIP: f32 = 1.0e9;

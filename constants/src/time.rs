/// Calendar date (UTC) used as the end of every profile's existence window.
/// Profiles carry no real deactivation time, so this stands in for "never".
pub const END_OF_EXISTENCE_UTC: (i32, u8, u8, u8, u8, u8) = (2040, 1, 1, 0, 0, 0);

/// Offset after a profile's first sample used as its preview time in listings.
pub const PROFILE_PREVIEW_OFFSET_SECONDS: f64 = 10.0;

pub const NANOS_PER_MILLI: u32 = 1_000_000;

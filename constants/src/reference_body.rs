/// Body profiles are draped over when settings name no other.
pub const DEFAULT_CENTER: &str = "MARS";
pub const DEFAULT_FRAME: &str = "IAU_Mars";

pub struct BodyInfo {
    pub name: &'static str,
    /// Equatorial radius in metres.
    pub radius: f64,
}

pub const BODY_MAP: &[BodyInfo] = &[
    BodyInfo {
        name: "MERCURY",
        radius: 2_440_530.0,
    },
    BodyInfo {
        name: "VENUS",
        radius: 6_051_800.0,
    },
    BodyInfo {
        name: "EARTH",
        radius: 6_378_137.0,
    },
    BodyInfo {
        name: "MOON",
        radius: 1_737_400.0,
    },
    BodyInfo {
        name: "MARS",
        radius: 3_396_190.0,
    },
];

pub fn get_body_radius(name: &str) -> Option<f64> {
    BODY_MAP
        .iter()
        .find(|b| b.name.eq_ignore_ascii_case(name))
        .map(|b| b.radius)
}

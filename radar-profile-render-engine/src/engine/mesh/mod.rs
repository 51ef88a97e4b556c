//! Ribbon geometry for radar profile rendering.
//!
//! Provides the packed vertex layout consumed by the radar profile pipeline.

/// Triangle-strip ribbon built from a profile's geodetic samples.
///
/// Positions are unit directions; shell radii are resolved in the vertex shader.
pub mod ribbon_mesh;

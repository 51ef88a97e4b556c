//! Loading of radar profile sets from disk.
//!
//! Discovers table/image pairs, parses sample tables, decodes radargrams and
//! turns the result into profile entities holding a shared depth capture.

/// Directory scan pairing `_geom.tab` tables with `_tiff.tif` images.
pub mod profile_discovery;

/// Radargram decoding into single channel textures.
pub mod profile_image;

/// Profile set assembly, registration events and capture bookkeeping.
pub mod profile_set;

/// Line-oriented sample table parser.
pub mod sample_table;

/// JSON settings asset loading for the viewer.
///
/// Places the reference body and requests its profiles once settings arrive.
pub mod settings_loader;

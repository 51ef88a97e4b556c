//! Scene content the profiles are draped over.

/// Opaque reference body sphere, the parent of its profile sets.
pub mod reference_body;

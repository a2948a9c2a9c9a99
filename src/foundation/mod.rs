/// Canvas, colours and kurbo geometry.
pub mod core;
/// Error type.
pub mod error;
/// Remapping, clamping and fixed-point helpers.
pub mod math;
/// Seeded scene RNG.
pub mod rng;

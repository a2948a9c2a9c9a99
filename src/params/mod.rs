/// Per-system controls and limits.
pub mod controls;
/// Colour palettes.
pub mod palette;
/// Named presets.
pub mod preset;
/// Background parameter set.
pub mod visual;

/// Box blur.
pub mod blur;
/// Source-over compositing.
pub mod composite;
/// Per-layer pixelate and blur.
pub mod fx;

/// Engine configuration.
pub mod config;
pub mod replay;
/// The render context.
pub mod visualizer;

/// Free-hand strokes.
pub mod draw;
/// Image fragments.
pub mod fragment;
/// Helper images and glitches.
pub mod helper;

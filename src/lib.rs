//! dreamviz is a layered procedural "dream" visualizer rendered entirely on the CPU.
//!
//! A [`Visualizer`] owns a stack of offscreen layers and composes, every frame:
//!
//! - a parametric background drawn by one of ten [`Preset`]s
//! - image fragments cut from the scene image that drift along noise paths
//! - glitching helper images taken from a [`ReferencePool`]
//! - free-hand strokes and floating mood text
//!
//! Scenes are captured into [`SceneState`] records, archived in a [`KvStore`] and replayed
//! deterministically from their seeds.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Image decoding, the reference pool and the background loader.
pub mod assets;
pub mod background;
/// Pixel effects: source-over, box blur and the per-layer FX pass.
pub mod effects;
/// The [`Visualizer`] render context, its config and scene replay.
pub mod engine;
/// Shared primitives: geometry, colours, errors, math and the scene RNG.
pub mod foundation;
/// Seedable coherent noise.
pub mod noise;
/// Parameter sets: visual params, palette, presets and controls.
pub mod params;
/// Fragment, helper and free-hand particle systems.
pub mod particles;
/// Offscreen layers, painting, compositing and frames.
pub mod render;
/// Persisted scene records, the archive store and thumbnails.
pub mod scene;
/// Mood text layout and drawing.
pub mod text;

pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgb8, Vec2};
pub use crate::foundation::error::{DreamError, DreamResult};

pub use crate::assets::image::SourceImage;
pub use crate::assets::loader::LoadSource;
pub use crate::assets::pool::ReferencePool;
pub use crate::engine::config::EngineConfig;
pub use crate::engine::visualizer::Visualizer;
pub use crate::params::palette::Palette;
pub use crate::params::preset::Preset;
pub use crate::params::visual::VisualParams;
pub use crate::render::frame::Frame;
pub use crate::scene::archive::{DirKv, KvStore, MemoryKv};
pub use crate::scene::state::SceneState;

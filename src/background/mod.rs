//! Parametric background patterns.
//!
//! Each preset is a pure function of the clamped parameter set, the palette, the shared noise
//! field and the time base; it emits a [`DisplayList`] that the painter rasterizes as a full
//! overwrite of the background layer.

mod bands;
mod blocks;
mod burst;
mod fields;
mod lines;
mod shared;

pub use shared::GenCtx;

use crate::foundation::core::{Affine, Canvas, Rgb8};
use crate::noise::field::NoiseField;
use crate::params::palette::Palette;
use crate::params::preset::Preset;
use crate::params::visual::VisualParams;
use crate::render::display_list::DisplayList;

/// Render one frame of `preset`.
pub fn render(
    canvas: Canvas,
    preset: Preset,
    params: &VisualParams,
    palette: &Palette,
    noise: &NoiseField,
    t_base: f64,
) -> DisplayList {
    let ctx = GenCtx::new(canvas, params, palette, noise, t_base);

    let (base, transform) = match preset {
        // Calm paints its lines on a cleared layer and ignores the global transform.
        Preset::Calm => (None, Affine::IDENTITY),
        _ => (Some(palette.base()), ctx.global_transform()),
    };

    let ops = match preset {
        Preset::Calm => lines::calm(&ctx),
        Preset::Ribbons => bands::ribbons(&ctx),
        Preset::Pixels => fields::pixels(&ctx),
        Preset::Bars => bands::bars(&ctx),
        Preset::Cloud => fields::cloud(&ctx),
        Preset::Blocks => blocks::blocks(&ctx),
        Preset::Flow => bands::flow(&ctx),
        Preset::Blob => fields::blob(&ctx),
        Preset::Burst => burst::burst(&ctx),
        Preset::Halftone => fields::halftone(&ctx),
    };

    let mut list = DisplayList::new(base).with_transform(transform);
    list.ops = ops;
    list
}

/// Background before any preset has been chosen: a solid fill.
pub fn solid(color: Rgb8) -> DisplayList {
    DisplayList::new(Some(color))
}

#[cfg(test)]
#[path = "../../tests/unit/background/mod.rs"]
mod tests;

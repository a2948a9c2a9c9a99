use std::path::PathBuf;
use std::time::Duration;

use crate::assets::image::SourceImage;
use crate::assets::loader::{ImageLoader, LoadSource};
use crate::assets::pool::ReferencePool;
use crate::background;
use crate::effects::composite::over_in_place;
use crate::effects::fx::apply_layer_fx;
use crate::engine::config::EngineConfig;
use crate::foundation::core::{Canvas, Point, Rgb8};
use crate::foundation::error::{DreamError, DreamResult};
use crate::foundation::math::trunc_count;
use crate::foundation::rng::SceneRng;
use crate::noise::field::NoiseField;
use crate::params::controls::{
    FragmentControls, FxParams, ImageControls, PerfLimits, SelectionSize,
};
use crate::params::palette::Palette;
use crate::params::preset::Preset;
use crate::params::visual::VisualParams;
use crate::particles::draw::Sketch;
use crate::particles::fragment::FragmentSystem;
use crate::particles::helper::{HelperImage, HelperSystem};
use crate::render::compositor::{SelectionCursor, Zoom, present, stack_layers};
use crate::render::frame::Frame;
use crate::render::layer::Layer;
use crate::render::painter::{Painter, render_display_list};
use crate::scene::state::{Answers, QUESTION_IDS};
use crate::text::mood::{MOOD_INTENSITY_DEFAULT, MoodText};

/// Time base advance per frame at `timeSpeed == 1`.
pub const T_BASE_STEP: f64 = 0.8;
/// `tBase` wraps at this period.
pub const T_BASE_PERIOD: f64 = 1.0e7;
/// Accepted `timeSpeed` range.
pub const TIME_SPEED_MAX: f64 = 10.0;
/// Images taken by [`Visualizer::load_random_set`].
pub const RANDOM_SET_SIZE: usize = 4;

/// `t` folded into `[0, T_BASE_PERIOD)`; non-finite values restart at 0.
pub fn wrap_t_base(t: f64) -> f64 {
    if t.is_finite() {
        t.rem_euclid(T_BASE_PERIOD)
    } else {
        0.0
    }
}

/// The eight offscreen layers plus the presentation target.
pub struct LayerSet {
    /// Preset pattern or solid fill.
    pub background: Layer,
    /// Fragments and free-hand strokes before FX.
    pub fragments_raw: Layer,
    /// Helpers before FX.
    pub helpers_raw: Layer,
    /// Fragments after FX.
    pub fragments_fx: Layer,
    /// Helpers after FX.
    pub helpers_fx: Layer,
    /// Stacked layers before zoom.
    pub composite: Layer,
    /// Free-hand strokes of the current frame.
    pub user_draw: Layer,
    /// Mood text sprites.
    pub mood_text: Layer,
    /// Last presented frame.
    pub presented: Layer,
}

impl LayerSet {
    /// Blank layers for `canvas`.
    pub fn new(canvas: Canvas) -> DreamResult<Self> {
        Ok(Self {
            background: Layer::new(canvas)?,
            fragments_raw: Layer::new(canvas)?,
            helpers_raw: Layer::new(canvas)?,
            fragments_fx: Layer::new(canvas)?,
            helpers_fx: Layer::new(canvas)?,
            composite: Layer::new(canvas)?,
            user_draw: Layer::new(canvas)?,
            mood_text: Layer::new(canvas)?,
            presented: Layer::new(canvas)?,
        })
    }
}

/// Render context threading every subsystem through each frame.
///
/// One instance owns the layers, the particle populations, the parameter sets, the scene RNG and
/// noise field, and the async image loader. [`Visualizer::frame`] advances the animation by one
/// step and returns the presented frame.
pub struct Visualizer {
    pub(super) canvas: Canvas,
    pub(super) perf: PerfLimits,
    pub(super) rng: SceneRng,
    pub(super) noise: NoiseField,
    pub(super) pool: ReferencePool,
    pub(super) loader: ImageLoader,
    pub(super) layers: LayerSet,

    pub(super) scene_image: Option<SourceImage>,
    pub(super) fragments: FragmentSystem,
    pub(super) helpers: HelperSystem,
    pub(super) sketch: Sketch,
    pub(super) mood: MoodText,

    pub(super) answers: Answers,
    pub(super) step: usize,
    pub(super) bg_color: Rgb8,
    pub(super) dream_color: Option<String>,
    pub(super) visual_params: VisualParams,
    pub(super) palette: Palette,
    pub(super) frag_controls: FragmentControls,
    pub(super) image_controls: ImageControls,
    pub(super) fx: FxParams,

    pub(super) selection: SelectionSize,
    pub(super) pointer: Option<Point>,
    pub(super) zoom: Zoom,
    pub(super) t_base: f64,
    pub(super) time_speed: f64,
    pub(super) frame_count: u64,

    pub(super) overlay_active: bool,
    pub(super) manip_active: bool,
    pub(super) drawing: bool,
    pub(super) replay: bool,
}

impl Visualizer {
    /// Fresh build-mode engine from `config`, the reference pool and optional font bytes.
    pub fn new(
        config: &EngineConfig,
        pool: ReferencePool,
        font: Option<Vec<u8>>,
    ) -> DreamResult<Self> {
        config.validate()?;
        let canvas = config.canvas()?;
        let mut mood = MoodText::default();
        if let Some(bytes) = font {
            if let Err(err) = mood.set_font(bytes) {
                tracing::warn!(error = %err, "mood font rejected");
            }
        }
        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            pool = pool.len(),
            "visualizer created"
        );
        Ok(Self {
            canvas,
            perf: config.perf,
            rng: SceneRng::new(config.seed),
            noise: NoiseField::new(config.seed as u32),
            pool,
            loader: ImageLoader::new(),
            layers: LayerSet::new(canvas)?,
            scene_image: None,
            fragments: FragmentSystem::default(),
            helpers: HelperSystem::default(),
            sketch: Sketch::new(config.perf.max_draw_particles),
            mood,
            answers: Answers::default(),
            step: 0,
            bg_color: Rgb8::BLACK,
            dream_color: None,
            visual_params: VisualParams::default(),
            palette: Palette::default(),
            frag_controls: FragmentControls::default(),
            image_controls: ImageControls::default(),
            fx: FxParams::default(),
            selection: SelectionSize::default(),
            pointer: None,
            zoom: Zoom::default(),
            t_base: 0.0,
            time_speed: 1.0,
            frame_count: 0,
            overlay_active: false,
            manip_active: false,
            drawing: false,
            replay: false,
        })
    }

    // ---- frame loop ----

    /// Advance one frame and return the presented pixels.
    #[tracing::instrument(level = "debug", skip(self), fields(frame = self.frame_count + 1))]
    pub fn frame(&mut self) -> DreamResult<Frame> {
        self.poll_loads();
        self.frame_count += 1;
        self.zoom.step();
        self.t_base = wrap_t_base(self.t_base + T_BASE_STEP * self.time_speed);

        self.paint_background();
        self.paint_particles()?;

        let fx = self.fx.clamped();
        apply_layer_fx(
            &self.layers.fragments_raw,
            &mut self.layers.fragments_fx,
            fx.frag_pixel,
            fx.frag_blur,
        )?;
        apply_layer_fx(
            &self.layers.helpers_raw,
            &mut self.layers.helpers_fx,
            fx.helper_pixel,
            fx.helper_blur,
        )?;

        self.paint_mood_text();

        let l = &mut self.layers;
        stack_layers(
            &mut l.composite,
            &[&l.background, &l.fragments_fx, &l.helpers_fx, &l.mood_text],
        )?;

        let cursor = if self.is_build_mode() {
            self.pointer.map(|at| SelectionCursor {
                at,
                size: self.selection.get(),
            })
        } else {
            None
        };
        present(&self.layers.composite, &mut self.layers.presented, self.zoom.factor, cursor)
    }

    /// Render `n` frames, returning the last one.
    pub fn run_frames(&mut self, n: u64) -> DreamResult<Frame> {
        let mut last = None;
        for _ in 0..n.max(1) {
            last = Some(self.frame()?);
        }
        last.ok_or_else(|| DreamError::render("no frame rendered"))
    }

    fn paint_background(&mut self) {
        let list = match self.preset() {
            Some(preset) => background::render(
                self.canvas,
                preset,
                &self.visual_params,
                &self.palette,
                &self.noise,
                self.t_base,
            ),
            None => background::solid(self.bg_color),
        };
        render_display_list(&list, &mut self.layers.background);
    }

    fn paint_particles(&mut self) -> DreamResult<()> {
        self.layers.fragments_raw.clear();
        self.layers.helpers_raw.clear();
        if !self.manip_active {
            return Ok(());
        }
        let Some(image) = self.scene_image.as_ref() else {
            return Ok(());
        };

        let canvas = self.canvas;
        let frag = self.frag_controls.clamped();
        let img_ctrl = self.image_controls.clamped();

        self.fragments
            .auto_spawn(&mut self.rng, image, canvas, &frag, &self.perf);
        self.helpers.update(
            &mut self.rng,
            canvas,
            &frag,
            &img_ctrl,
            self.time_speed,
            &self.noise,
        );
        self.fragments
            .update(canvas, &frag, self.time_speed, &self.noise);

        let mut painter = Painter::for_layer(&self.layers.fragments_raw);
        self.fragments.draw(&mut painter, frag.size);
        painter.finish(&mut self.layers.fragments_raw);

        let mut painter = Painter::for_layer(&self.layers.helpers_raw);
        self.helpers
            .draw(&mut painter, &mut self.rng, &img_ctrl, &self.noise);
        painter.finish(&mut self.layers.helpers_raw);

        self.layers.user_draw.clear();
        let mut painter = Painter::for_layer(&self.layers.user_draw);
        self.sketch.step(&mut painter, self.frame_count, &self.noise);
        painter.finish(&mut self.layers.user_draw);
        over_in_place(
            self.layers.fragments_raw.data_mut(),
            self.layers.user_draw.data(),
            1.0,
        )
    }

    fn paint_mood_text(&mut self) {
        self.layers.mood_text.clear();
        if !self.overlay_active {
            return;
        }
        let mut painter = Painter::for_layer(&self.layers.mood_text);
        if self.mood.draw(&mut painter, self.canvas, self.t_base) {
            painter.finish(&mut self.layers.mood_text);
        }
    }

    // ---- image loading ----

    /// Apply a finished load of the newest generation, if any.
    pub fn poll_loads(&mut self) {
        if let Some(images) = self.loader.poll() {
            self.apply_loaded(images);
        }
    }

    /// Block until the pending load finishes (or `timeout` passes) and apply it.
    pub fn wait_for_loads(&mut self, timeout: Duration) -> bool {
        match self.loader.wait(timeout) {
            Some(images) => {
                let applied = !images.is_empty();
                self.apply_loaded(images);
                applied
            }
            None => false,
        }
    }

    /// Decode `paths` off-thread; the first image becomes the scene image, the rest helpers.
    pub fn load_images(&mut self, paths: Vec<PathBuf>) -> u64 {
        self.loader
            .request(paths.into_iter().map(LoadSource::Path).collect())
    }

    /// Decode in-memory images off-thread; same assignment as [`Visualizer::load_images`].
    pub fn load_image_bytes(&mut self, sources: Vec<LoadSource>) -> u64 {
        self.loader.request(sources)
    }

    fn apply_loaded(&mut self, images: Vec<SourceImage>) {
        let mut images = images.into_iter();
        let Some(scene) = images.next() else {
            tracing::warn!("image set produced no decodable images");
            return;
        };
        self.helpers.clear();
        self.set_scene_image(scene);
        for img in images {
            let helper = match self.pool.index_of_image(&img) {
                Some(index) => {
                    let name = self.pool.name(index).map(str::to_owned);
                    HelperImage::new(&mut self.rng, img, self.canvas).with_pool_entry(index, name)
                }
                None => HelperImage::new(&mut self.rng, img, self.canvas),
            };
            self.helpers.push(helper);
        }
        tracing::debug!(helpers = self.helpers.len(), "image set applied");
    }

    /// Make `image` the scene image and reseed the fragment population from it.
    pub fn set_scene_image(&mut self, image: SourceImage) {
        self.scene_image = Some(image);
        self.manip_active = true;
        self.fragments.clear();
        if let Some(image) = self.scene_image.as_ref() {
            self.fragments.seed_initial(
                &mut self.rng,
                image,
                self.canvas,
                &self.frag_controls.clamped(),
            );
        }
    }

    /// Scene image plus up to three helpers from a shuffled pool. `false` when the pool is empty.
    pub fn load_random_set(&mut self) -> bool {
        let order = self.pool.shuffled(&mut self.rng);
        let Some(&first) = order.first() else {
            return false;
        };
        let Some(scene) = self.pool.get(first).cloned() else {
            return false;
        };
        self.loader.invalidate();
        self.helpers.clear();
        self.set_scene_image(scene);
        for &index in order.iter().take(RANDOM_SET_SIZE).skip(1) {
            let Some(img) = self.pool.get(index).cloned() else {
                continue;
            };
            let name = self.pool.name(index).map(str::to_owned);
            let helper =
                HelperImage::new(&mut self.rng, img, self.canvas).with_pool_entry(index, name);
            self.helpers.push(helper);
        }
        true
    }

    // ---- population controls ----

    /// Resize the helper population (`1..=8`); no-op without a scene image.
    pub fn adjust_helper_count(&mut self, target: f64) {
        if self.scene_image.is_none() {
            return;
        }
        self.helpers
            .adjust_count(target, &mut self.rng, &self.pool, self.canvas);
    }

    /// Resize the fragment population (`0..=20`); no-op without a scene image.
    pub fn adjust_fragment_count(&mut self, target: f64) {
        let Some(image) = self.scene_image.as_ref() else {
            return;
        };
        if !self.manip_active {
            return;
        }
        let target = trunc_count(target);
        self.fragments
            .adjust_count(target, &mut self.rng, image, self.canvas);
    }

    /// Cut a fragment at `at` with `size`; no-op without a scene image or off canvas.
    pub fn spawn_fragment_at(&mut self, at: Point, size: f64) -> bool {
        if !self.manip_active {
            return false;
        }
        let Some(image) = self.scene_image.as_ref() else {
            return false;
        };
        self.fragments
            .spawn_at(&mut self.rng, image, self.canvas, at, size)
    }

    // ---- input ----

    /// Track the pointer for the selection cursor.
    pub fn pointer_moved(&mut self, at: Point) {
        self.pointer = Some(at);
    }

    /// Spawn a fragment of the selection size at the pointer. Blocked while replaying.
    pub fn click(&mut self, at: Point) -> bool {
        self.pointer = Some(at);
        if self.replay {
            return false;
        }
        let size = self.selection.get();
        self.spawn_fragment_at(at, size)
    }

    /// Free-hand stroke segment; only while drawing is on.
    pub fn drag(&mut self, from: Point, to: Point) {
        self.pointer = Some(to);
        if !self.drawing {
            return;
        }
        self.sketch
            .drag(&mut self.rng, from, to, self.frame_count, &self.noise);
    }

    /// Scroll input: shrink or grow the selection square.
    pub fn wheel(&mut self, delta: f64) {
        self.selection.wheel(delta);
    }

    /// Toggle the presentation zoom target.
    pub fn toggle_zoom(&mut self) {
        self.zoom.toggle();
    }

    /// Turn free-hand drawing on or off.
    pub fn set_drawing(&mut self, on: bool) {
        self.drawing = on;
    }

    // ---- question flow ----

    /// Record an answer and move to the next question.
    ///
    /// `visual` also applies the named preset. The image question needs a scene image first.
    pub fn answer(&mut self, id: &str, value: serde_json::Value) -> DreamResult<()> {
        match id {
            "image" if self.scene_image.is_none() => {
                return Err(DreamError::validation("load images before continuing"));
            }
            "visual" => {
                let name = value.as_str().unwrap_or_default().to_owned();
                self.select_preset(&name);
            }
            "ownerName" => {
                let name = value.as_str().map(str::trim).unwrap_or_default();
                if name.is_empty() {
                    return Err(DreamError::validation("owner name must not be empty"));
                }
                self.answers.owner_name = Some(name.to_owned());
            }
            "time" => self.answers.time = value.as_str().map(str::to_owned),
            other => {
                self.answers.extra.insert(other.to_owned(), value);
            }
        }
        self.step = (self.step + 1).min(QUESTION_IDS.len());
        Ok(())
    }

    /// Choose a preset by name (unknown names fall back to Calm) and apply its profile.
    pub fn select_preset(&mut self, name: &str) -> Preset {
        let preset = Preset::parse(name);
        preset.apply(&mut self.visual_params);
        self.answers.visual = Some(preset.name().to_owned());
        self.overlay_active = true;
        preset
    }

    /// Skip all remaining questions and switch the full visualizer on.
    pub fn finish_questions(&mut self) {
        self.step = QUESTION_IDS.len();
        self.overlay_active = true;
        self.manip_active = true;
    }

    /// The question currently asked, if any remain.
    pub fn current_question(&self) -> Option<&'static str> {
        QUESTION_IDS.get(self.step).copied()
    }

    /// Set the mood text and rebuild its sprites.
    pub fn set_mood_text(&mut self, text: &str) {
        self.mood.set_text(text);
        self.answers.mood_text = Some(text.to_owned());
        self.mood.rebuild(&mut self.rng, self.canvas);
    }

    /// Set the mood intensity (clamped) and rebuild its sprites.
    pub fn set_mood_intensity(&mut self, v: i64) {
        self.mood.set_intensity(v);
        self.answers.mood_intensity = Some(self.mood.intensity());
        self.mood.rebuild(&mut self.rng, self.canvas);
    }

    // ---- palette ----

    /// Append a white palette entry.
    pub fn add_palette_color(&mut self) {
        self.palette.add();
    }

    /// `false` when removing would empty the palette.
    pub fn remove_palette_color(&mut self, index: usize) -> bool {
        self.palette.remove(index)
    }

    /// Replace a palette entry; `false` when out of range.
    pub fn edit_palette_color(&mut self, index: usize, hex: &str) -> bool {
        self.palette.edit(index, hex)
    }

    // ---- lifecycle ----

    /// Recreate every layer for `canvas` and rebuild what depends on its size.
    pub fn resize(&mut self, canvas: Canvas) -> DreamResult<()> {
        self.layers = LayerSet::new(canvas)?;
        self.canvas = canvas;
        if let Some(image) = self.scene_image.as_ref() {
            self.helpers.rebuild(&mut self.rng, canvas);
            if !self.replay {
                self.fragments.clear();
                self.manip_active = true;
                self.fragments.seed_initial(
                    &mut self.rng,
                    image,
                    canvas,
                    &self.frag_controls.clamped(),
                );
            }
        }
        self.mood.rebuild(&mut self.rng, canvas);
        tracing::debug!(width = canvas.width, height = canvas.height, "visualizer resized");
        Ok(())
    }

    /// Back to a fresh build session: answers, particles and scene image cleared, Calm applied.
    pub fn reset(&mut self) {
        self.loader.invalidate();
        self.step = 0;
        self.answers = Answers::default();
        self.t_base = 0.0;
        self.time_speed = 1.0;
        self.zoom = Zoom::default();
        self.manip_active = false;
        self.overlay_active = false;
        self.drawing = false;
        self.replay = false;
        self.mood.set_text("");
        self.mood.set_intensity(MOOD_INTENSITY_DEFAULT);
        self.mood.rebuild(&mut self.rng, self.canvas);
        self.bg_color = Rgb8::BLACK;
        self.dream_color = None;
        self.sketch.clear();
        self.layers.user_draw.clear();
        self.fragments.clear();
        self.helpers.clear();
        self.scene_image = None;
        self.frag_controls = FragmentControls::default();
        self.image_controls = ImageControls::default();
        self.fx = FxParams::default();
        self.selection = SelectionSize::default();
        Preset::Calm.apply(&mut self.visual_params);
    }

    // ---- accessors ----

    /// Current canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Animation time base.
    pub fn t_base(&self) -> f64 {
        self.t_base
    }

    /// Animation speed multiplier.
    pub fn time_speed(&self) -> f64 {
        self.time_speed
    }

    /// Clamped to `[0, TIME_SPEED_MAX]`; non-finite values are ignored.
    pub fn set_time_speed(&mut self, v: f64) {
        if v.is_finite() {
            self.time_speed = v.clamp(0.0, TIME_SPEED_MAX);
        }
    }

    /// Solid background shown before a preset is chosen.
    pub fn set_bg_color(&mut self, color: Rgb8) {
        self.bg_color = color;
    }

    /// Answers given so far.
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Index of the current question.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Preset driving the background, once one has been chosen.
    pub fn preset(&self) -> Option<Preset> {
        self.answers.visual.as_deref().map(Preset::parse)
    }

    /// Scene still being built: no scene image yet or questions remaining.
    pub fn is_build_mode(&self) -> bool {
        self.scene_image.is_none() || self.step < QUESTION_IDS.len()
    }

    /// `true` after [`Visualizer::restore`].
    pub fn is_replay(&self) -> bool {
        self.replay
    }

    /// Current scene image.
    pub fn scene_image(&self) -> Option<&SourceImage> {
        self.scene_image.as_ref()
    }

    /// Fragment population.
    pub fn fragments(&self) -> &FragmentSystem {
        &self.fragments
    }

    /// Helper population.
    pub fn helpers(&self) -> &HelperSystem {
        &self.helpers
    }

    /// Free-hand particles.
    pub fn sketch(&self) -> &Sketch {
        &self.sketch
    }

    /// Mood text state.
    pub fn mood(&self) -> &MoodText {
        &self.mood
    }

    /// Reference pool.
    pub fn pool(&self) -> &ReferencePool {
        &self.pool
    }

    /// Offscreen layers.
    pub fn layers(&self) -> &LayerSet {
        &self.layers
    }

    /// Background parameters.
    pub fn visual_params(&self) -> &VisualParams {
        &self.visual_params
    }

    /// Background parameters, for editing.
    pub fn visual_params_mut(&mut self) -> &mut VisualParams {
        &mut self.visual_params
    }

    /// Current palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Fragment controls, for editing.
    pub fn fragment_controls_mut(&mut self) -> &mut FragmentControls {
        &mut self.frag_controls
    }

    /// Helper image controls, for editing.
    pub fn image_controls_mut(&mut self) -> &mut ImageControls {
        &mut self.image_controls
    }

    /// Per-layer FX, for editing.
    pub fn fx_params_mut(&mut self) -> &mut FxParams {
        &mut self.fx
    }

    /// Side of the selection square.
    pub fn selection_size(&self) -> f64 {
        self.selection.get()
    }

    /// Presentation zoom state.
    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    /// Restart both the RNG and the noise field from `seed`.
    pub(super) fn reseed(&mut self, seed: u32) {
        self.rng.reseed(u64::from(seed));
        self.noise.reseed(seed);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/visualizer.rs"]
mod tests;

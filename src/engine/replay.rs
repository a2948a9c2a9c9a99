//! Scene capture and replay.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::assets::image::SourceImage;
use crate::engine::visualizer::{TIME_SPEED_MAX, Visualizer, wrap_t_base};
use crate::foundation::core::{Point, Rgb8};
use crate::foundation::error::DreamResult;
use crate::params::controls::{PerfLimits, VisControls};
use crate::params::palette::Palette;
use crate::params::preset::Preset;
use crate::particles::helper::HelperImage;
use crate::render::frame::Frame;
use crate::scene::archive::{KvStore, save_record};
use crate::scene::state::{QUESTION_IDS, SCHEMA_VERSION, SceneState};
use crate::scene::thumbnail::{decode_data_uri, export_file_name, thumbnail_data_uri, write_png};
use crate::text::mood::{MOOD_INTENSITY_DEFAULT, clamp_intensity};

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl Visualizer {
    /// Snapshot every control plus the particle layout into a fresh record.
    ///
    /// Draws the id suffix and three seeds from the scene RNG, so capturing advances it.
    pub fn capture(&mut self) -> SceneState {
        let refs = self.helpers.refs();
        let created_at = now_millis();
        let suffix = self.rng.below(100_000.0).floor() as u64;

        let mut state = SceneState::new(format!("dream_{created_at}_{suffix}"));
        state.schema_version = SCHEMA_VERSION;
        state.created_at = Some(created_at);
        state.answers = self.answers.clone();
        state.bg_color = Some(self.bg_color.into());
        state.dream_color = self.dream_color.clone();
        state.time_speed = Some(self.time_speed);
        state.step = Some(self.step as u32);
        state.mood_text = Some(self.mood.text().to_owned());
        state.mood_intensity = Some(self.mood.intensity());
        state.t_base = Some(self.t_base);
        state.visual_params = Some(self.visual_params);
        state.visual_palette = Some(self.palette.hex().to_vec());
        state.vis_controls = Some(VisControls {
            fragments: self.frag_controls,
        });
        state.image_controls = Some(self.image_controls);
        state.fx_params = Some(self.fx);
        state.fragments_data = self.fragments.records();
        state.helper_indexes = refs.iter().map(|r| r.index).collect();
        state.helper_names = refs.into_iter().map(|r| r.name).collect();
        state.helper_seed = Some(self.rng.next_seed());
        state.fragment_seed = Some(self.rng.next_seed());
        state.mood_seed = Some(self.rng.next_seed());
        state
    }

    /// Rebuild the scene described by `state`.
    ///
    /// `scene_image` takes precedence over the record's thumbnail. Without either, the background
    /// and mood text still render and the particle systems stay empty.
    #[tracing::instrument(skip_all, fields(id = %state.id))]
    pub fn restore(&mut self, state: &SceneState, scene_image: Option<SourceImage>) {
        self.loader.invalidate();
        self.replay = true;

        self.answers = state.answers.clone();
        self.bg_color = state.bg_color.map_or(Rgb8::BLACK, Rgb8::from);
        self.dream_color = state.dream_color.clone();
        self.time_speed = state
            .time_speed
            .filter(|v| v.is_finite() && *v != 0.0)
            .map_or(1.0, |v| v.clamp(0.0, TIME_SPEED_MAX));
        self.t_base = state.t_base.map_or(0.0, wrap_t_base);

        let helper_seed = state.helper_seed.unwrap_or_else(|| self.rng.next_seed());
        let fragment_seed = state.fragment_seed.unwrap_or_else(|| self.rng.next_seed());
        let mood_seed = state.mood_seed.unwrap_or_else(|| self.rng.next_seed());

        match state.visual_params {
            Some(params) => self.visual_params = params,
            None => {
                if let Some(visual) = self.answers.visual.as_deref() {
                    Preset::parse(visual).apply(&mut self.visual_params);
                }
            }
        }
        if let Some(colors) = state.visual_palette.clone().filter(|c| !c.is_empty()) {
            match Palette::try_from(colors) {
                Ok(palette) => self.palette = palette,
                Err(err) => tracing::warn!(error = %err, "archived palette rejected"),
            }
        }
        if let Some(vis) = state.vis_controls {
            self.frag_controls = vis.fragments;
        }
        if let Some(ctrl) = state.image_controls {
            self.image_controls = ctrl;
        }
        if let Some(fx) = state.fx_params {
            self.fx = fx;
        }

        self.step = QUESTION_IDS.len();
        self.overlay_active = true;
        self.manip_active = true;
        self.drawing = false;
        self.sketch.clear();
        self.layers.user_draw.clear();

        self.mood.set_text(state.effective_mood_text());
        self.mood
            .set_intensity(clamp_intensity(state.effective_mood_intensity().unwrap_or(MOOD_INTENSITY_DEFAULT)));
        self.reseed(mood_seed);
        self.mood.rebuild(&mut self.rng, self.canvas);

        let image = scene_image.or_else(|| {
            let uri = state.thumbnail.as_deref()?;
            match decode_data_uri(uri) {
                Ok(img) => Some(img),
                Err(err) => {
                    tracing::warn!(error = %err, "thumbnail could not be decoded");
                    None
                }
            }
        });

        self.fragments.clear();
        self.helpers.clear();
        let Some(image) = image else {
            self.scene_image = None;
            self.manip_active = false;
            tracing::debug!("restored without a scene image");
            return;
        };

        self.reseed(fragment_seed);
        for rec in &state.fragments_data {
            self.fragments.spawn_at(
                &mut self.rng,
                &image,
                self.canvas,
                Point::new(rec.x, rec.y),
                rec.size,
            );
        }
        self.scene_image = Some(image);

        self.reseed(helper_seed);
        for (name, index) in state.helper_refs() {
            let resolved = name
                .and_then(|n| self.pool.by_name(n))
                .or_else(|| {
                    let i = usize::try_from(index).ok()?;
                    self.pool.get(i).map(|img| (i, img))
                })
                .map(|(i, img)| (i, img.clone()));
            let Some((i, img)) = resolved else {
                continue;
            };
            let name = self.pool.name(i).map(str::to_owned);
            let helper = HelperImage::new(&mut self.rng, img, self.canvas).with_pool_entry(i, name);
            self.helpers.push(helper);
        }
        tracing::debug!(
            fragments = self.fragments.len(),
            helpers = self.helpers.len(),
            "dream restored"
        );
    }

    /// Capture the scene with a thumbnail of the last presented frame and append it to `store`.
    ///
    /// Replays are only re-saved when `force` is set. A failing store is logged and yields `None`.
    pub fn save_to_archive(
        &mut self,
        store: &mut dyn KvStore,
        force: bool,
    ) -> DreamResult<Option<SceneState>> {
        if self.replay && !force {
            return Ok(None);
        }
        let frame = self.layers.presented.to_frame();
        let Some(thumbnail) = thumbnail_data_uri(&frame)? else {
            return Ok(None);
        };
        let mut state = self.capture();
        state.thumbnail = Some(thumbnail);
        match save_record(store, &state) {
            Ok(count) => {
                tracing::info!(id = %state.id, records = count, "dream archived");
                Ok(Some(state))
            }
            Err(err) => {
                tracing::warn!(error = %err, "archive write failed");
                Ok(None)
            }
        }
    }

    /// PNG file name for the current frame.
    pub fn export_file_name(&self) -> String {
        format!("{}.png", export_file_name(&self.answers, self.frame_count))
    }

    /// Write `frame` into `dir` under [`Visualizer::export_file_name`].
    pub fn save_frame_png(&self, frame: &Frame, dir: &Path) -> DreamResult<PathBuf> {
        let path = dir.join(self.export_file_name());
        write_png(frame, &path)?;
        Ok(path)
    }

    /// Replace the soft caps; shrinking the draw cap drops the oldest strokes.
    pub fn set_perf_limits(&mut self, perf: PerfLimits) {
        self.perf = perf;
        self.sketch.set_max(perf.max_draw_particles);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/replay.rs"]
mod tests;

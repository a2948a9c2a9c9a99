use std::collections::BTreeMap;

use crate::foundation::core::Rgb8;
use crate::params::controls::{FxParams, ImageControls, VisControls};
use crate::params::visual::VisualParams;
use crate::particles::fragment::FragmentRecord;

/// Schema version written by this crate. Records without one are version 1.
pub const SCHEMA_VERSION: u32 = 2;
/// Version assumed for records without `schemaVersion`.
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

/// Question ids of the build flow, in order.
pub const QUESTION_IDS: [&str; 5] = ["ownerName", "image", "imgctrl", "visual", "fx"];

fn legacy_version() -> u32 {
    LEGACY_SCHEMA_VERSION
}

/// Answers collected by the question flow. Unknown answers are kept verbatim.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Answers {
    /// Name typed for the owner question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    /// Chosen preset name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual: Option<String>,
    /// Free mood text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_text: Option<String>,
    /// Mood intensity, clamped on use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_intensity: Option<i64>,
    /// Free time-of-day tag, used in export names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Answers to any other question, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Answers {
    /// Whether question `id` has an answer.
    pub fn is_answered(&self, id: &str) -> bool {
        match id {
            "ownerName" => self.owner_name.is_some(),
            "visual" => self.visual.is_some(),
            other => self.extra.contains_key(other),
        }
    }
}

/// Persisted `{r, g, b}` colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BgColor {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl From<BgColor> for Rgb8 {
    fn from(c: BgColor) -> Self {
        Rgb8 {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

impl From<Rgb8> for BgColor {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

/// One archived dream: everything needed to rebuild the scene, plus a thumbnail.
///
/// Every field but `id` is optional on read.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneState {
    /// Record schema version.
    #[serde(default = "legacy_version")]
    pub schema_version: u32,
    /// Unique id, `dream_<millis>_<n>`.
    pub id: String,
    /// Capture time in Unix milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<u64>,
    /// Question answers.
    #[serde(default)]
    pub answers: Answers,
    /// Solid background used before a preset is chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<BgColor>,
    /// Free colour tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dream_color: Option<String>,
    /// Animation speed multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_speed: Option<f64>,
    /// Question index at capture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    /// Mood text at capture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_text: Option<String>,
    /// Mood intensity at capture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_intensity: Option<i64>,
    /// Time base at capture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_base: Option<f64>,
    /// Background parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_params: Option<VisualParams>,
    /// Palette hex strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_palette: Option<Vec<String>>,
    /// Fragment controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vis_controls: Option<VisControls>,
    /// Helper image controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_controls: Option<ImageControls>,
    /// Per-layer FX.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx_params: Option<FxParams>,
    /// Fragment layout to replay.
    #[serde(default)]
    pub fragments_data: Vec<FragmentRecord>,
    /// Helper pool slots, `-1` outside the pool.
    #[serde(default)]
    pub helper_indexes: Vec<i64>,
    /// Helper pool names, parallel to `helper_indexes`.
    #[serde(default)]
    pub helper_names: Vec<Option<String>>,
    /// Seed for helper reconstruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_seed: Option<u32>,
    /// Seed for fragment reconstruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment_seed: Option<u32>,
    /// Seed for mood sprites.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_seed: Option<u32>,
    /// JPEG data URI of the captured frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl SceneState {
    /// Empty record with the current schema version.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            id: id.into(),
            created_at: None,
            answers: Answers::default(),
            bg_color: None,
            dream_color: None,
            time_speed: None,
            step: None,
            mood_text: None,
            mood_intensity: None,
            t_base: None,
            visual_params: None,
            visual_palette: None,
            vis_controls: None,
            image_controls: None,
            fx_params: None,
            fragments_data: Vec::new(),
            helper_indexes: Vec::new(),
            helper_names: Vec::new(),
            helper_seed: None,
            fragment_seed: None,
            mood_seed: None,
            thumbnail: None,
        }
    }

    /// Mood text, falling back to the answer of the same name.
    pub fn effective_mood_text(&self) -> &str {
        self.mood_text
            .as_deref()
            .or(self.answers.mood_text.as_deref())
            .unwrap_or("")
    }

    /// Mood intensity, falling back to the answer of the same name.
    pub fn effective_mood_intensity(&self) -> Option<i64> {
        self.mood_intensity.or(self.answers.mood_intensity)
    }

    /// Gallery label: owner and mood when known, else `"dream"`.
    pub fn display_name(&self) -> String {
        let owner = self.answers.owner_name.as_deref().unwrap_or("").trim();
        let mood = self.effective_mood_text().trim();
        match (owner.is_empty(), mood.is_empty()) {
            (false, false) => format!("{owner} - {mood}"),
            (false, true) => owner.to_owned(),
            (true, false) => mood.to_owned(),
            (true, true) => "dream".to_owned(),
        }
    }

    /// Helper references in replay order: stable name first, positional index second.
    pub fn helper_refs(&self) -> impl Iterator<Item = (Option<&str>, i64)> + '_ {
        self.helper_indexes.iter().enumerate().map(|(i, idx)| {
            let name = self.helper_names.get(i).and_then(|n| n.as_deref());
            (name, *idx)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/state.rs"]
mod tests;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::assets::pool::{DEFAULT_POOL_FILES, ReferencePool};
use crate::foundation::core::Canvas;
use crate::foundation::error::{DreamError, DreamResult};
use crate::params::controls::PerfLimits;

/// Environment variable overriding [`EngineConfig::archive_dir`].
pub const ARCHIVE_DIR_ENV: &str = "DREAMVIZ_ARCHIVE_DIR";

/// Engine configuration, usually loaded from a JSON file. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Seed for the scene RNG and noise field at startup.
    pub seed: u64,
    /// Target frames per second.
    pub frame_rate: f64,
    /// Soft population caps.
    pub perf: PerfLimits,
    /// Directory holding the reference pool images.
    pub pool_dir: Option<PathBuf>,
    /// Pool file names; order fixes the persisted helper indices.
    pub pool_files: Vec<String>,
    /// Font used for mood text.
    pub font_path: Option<PathBuf>,
    /// Directory of the [`DirKv`](crate::scene::archive::DirKv) archive.
    pub archive_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            seed: 0,
            frame_rate: 40.0,
            perf: PerfLimits::default(),
            pool_dir: None,
            pool_files: DEFAULT_POOL_FILES.iter().map(|s| (*s).to_owned()).collect(),
            font_path: None,
            archive_dir: PathBuf::from("dream_archive"),
        }
    }
}

impl EngineConfig {
    /// Parse and validate JSON config.
    pub fn from_reader<R: std::io::Read>(r: R) -> DreamResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| DreamError::validation(format!("parse engine config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> DreamResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DreamError::validation(format!("open engine config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject zero-sized canvases and non-positive frame rates.
    pub fn validate(&self) -> DreamResult<()> {
        self.canvas()?;
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(DreamError::validation("frameRate must be finite and > 0"));
        }
        Ok(())
    }

    /// Canvas of the configured size.
    pub fn canvas(&self) -> DreamResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Apply environment overrides.
    pub fn with_env(mut self) -> Self {
        if let Some(dir) = std::env::var_os(ARCHIVE_DIR_ENV).filter(|v| !v.is_empty()) {
            self.archive_dir = PathBuf::from(dir);
        }
        self
    }

    /// Load the reference pool; empty when no directory is configured.
    pub fn load_pool(&self) -> ReferencePool {
        match &self.pool_dir {
            Some(dir) => ReferencePool::from_dir(dir, &self.pool_files),
            None => ReferencePool::empty(),
        }
    }

    /// Font bytes for mood text, when configured and readable.
    pub fn load_font(&self) -> Option<Vec<u8>> {
        let path = self.font_path.as_ref()?;
        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "mood font unreadable");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::assets::image::SourceImage;

/// Where a requested image comes from.
#[derive(Clone, Debug)]
pub enum LoadSource {
    /// A file on disk.
    Path(PathBuf),
    /// Encoded bytes already in memory.
    Bytes {
        /// Display label, usually the original file name.
        label: Option<String>,
        /// Encoded image data.
        bytes: Vec<u8>,
    },
}

impl LoadSource {
    fn load(self) -> Option<SourceImage> {
        let result = match &self {
            LoadSource::Path(path) => SourceImage::from_path(path),
            LoadSource::Bytes { label, bytes } => {
                SourceImage::decode(bytes).map(|img| img.with_label(label.clone()))
            }
        };
        match result {
            Ok(img) => Some(img),
            Err(err) => {
                tracing::warn!(source = ?self.describe(), error = %err, "image load failed");
                None
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            LoadSource::Path(path) => path.display().to_string(),
            LoadSource::Bytes { label, bytes } => label
                .clone()
                .unwrap_or_else(|| format!("<{} bytes>", bytes.len())),
        }
    }
}

struct Completion {
    generation: u64,
    images: Vec<SourceImage>,
}

/// Decodes image sets off the frame thread.
///
/// Every request bumps a generation counter; [`ImageLoader::poll`] hands back only completions of
/// the newest generation, so a slow stale load can never overwrite a newer scene.
pub struct ImageLoader {
    generation: u64,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader {
    /// Idle loader at generation 0.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            generation: 0,
            tx,
            rx,
        }
    }

    /// Generation of the newest request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Make every in-flight request stale.
    pub fn invalidate(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Start decoding `sources` on a worker thread. Returns the request's generation.
    pub fn request(&mut self, sources: Vec<LoadSource>) -> u64 {
        let generation = self.invalidate();
        let tx = self.tx.clone();
        let spawned = std::thread::Builder::new()
            .name("dreamviz-loader".to_owned())
            .spawn(move || {
                let images: Vec<SourceImage> =
                    sources.into_iter().filter_map(LoadSource::load).collect();
                // The receiver is gone once the visualizer is dropped.
                let _ = tx.send(Completion { generation, images });
            });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed to spawn image loader thread");
        }
        tracing::debug!(generation, "image set requested");
        generation
    }

    /// Drain finished loads. Returns the newest-generation set, if it arrived and holds images.
    pub fn poll(&mut self) -> Option<Vec<SourceImage>> {
        let mut latest = None;
        while let Ok(done) = self.rx.try_recv() {
            latest = self.accept(done).or(latest);
        }
        latest
    }

    /// Block up to `timeout` for the current generation to finish.
    pub fn wait(&mut self, timeout: Duration) -> Option<Vec<SourceImage>> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(done) => {
                    let current = done.generation == self.generation;
                    if let Some(images) = self.accept(done) {
                        return Some(images);
                    }
                    if current {
                        return None;
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    fn accept(&self, done: Completion) -> Option<Vec<SourceImage>> {
        if done.generation != self.generation {
            tracing::debug!(
                stale = done.generation,
                current = self.generation,
                "discarding stale image load"
            );
            return None;
        }
        if done.images.is_empty() {
            tracing::warn!(generation = done.generation, "no image in the requested set decoded");
            return None;
        }
        Some(done.images)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;

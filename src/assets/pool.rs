use std::path::Path;

use crate::assets::image::SourceImage;
use crate::foundation::rng::SceneRng;

/// File names of the stock reference set, in slot order.
pub const DEFAULT_POOL_FILES: [&str; 20] = [
    "human2.jpg",
    "happy.jpg",
    "annoying.jpg",
    "funny.jpg",
    "random.jpg",
    "weird.jpg",
    "house.jpg",
    "dream.jpg",
    "odd.jpg",
    "forest.jpg",
    "microwave.jpg",
    "sky.jpg",
    "roof.jpg",
    "wholesome.jpg",
    "hands.jpg",
    "feet.jpg",
    "pool.jpg",
    "chair.jpg",
    "grapes.jpg",
    "bird.jpg",
];

#[derive(Clone, Debug)]
struct PoolEntry {
    name: String,
    image: Option<SourceImage>,
}

/// Order-stable set of named reference images.
///
/// A slot keeps its index even when its file failed to load, so persisted helper indices stay
/// meaningful across runs.
#[derive(Clone, Debug, Default)]
pub struct ReferencePool {
    entries: Vec<PoolEntry>,
}

impl ReferencePool {
    /// Pool without entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load `names` from `dir`. Missing or undecodable files are skipped with a warning.
    pub fn from_dir<S: AsRef<str>>(dir: &Path, names: &[S]) -> Self {
        let entries = names
            .iter()
            .map(|name| {
                let name = name.as_ref().to_owned();
                let path = dir.join(&name);
                let image = match SourceImage::from_path(&path) {
                    Ok(img) => Some(img),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "pool image unavailable");
                        None
                    }
                };
                PoolEntry { name, image }
            })
            .collect::<Vec<_>>();
        tracing::debug!(
            slots = entries.len(),
            loaded = entries.iter().filter(|e| e.image.is_some()).count(),
            "reference pool loaded"
        );
        Self { entries }
    }

    /// Pool from already decoded named images.
    pub fn from_images(images: impl IntoIterator<Item = (String, SourceImage)>) -> Self {
        Self {
            entries: images
                .into_iter()
                .map(|(name, image)| PoolEntry {
                    image: Some(image.with_label(Some(name.clone()))),
                    name,
                })
                .collect(),
        }
    }

    /// Number of slots, loaded or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` without slots.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Image in slot `index`, if loaded.
    pub fn get(&self, index: usize) -> Option<&SourceImage> {
        self.entries.get(index).and_then(|e| e.image.as_ref())
    }

    /// File name of slot `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.name.as_str())
    }

    /// Slot of the file `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Slot and image of the file `name`, if loaded.
    pub fn by_name(&self, name: &str) -> Option<(usize, &SourceImage)> {
        let index = self.index_of(name)?;
        self.get(index).map(|img| (index, img))
    }

    /// Slot of an image handle that came out of this pool.
    pub fn index_of_image(&self, image: &SourceImage) -> Option<usize> {
        self.entries.iter().position(|e| {
            e.image
                .as_ref()
                .is_some_and(|candidate| candidate.same_pixels(image))
        })
    }

    /// Indices of slots that hold an image.
    pub fn loaded(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.image.is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// A uniformly chosen loaded slot.
    pub fn random(&self, rng: &mut SceneRng) -> Option<usize> {
        let loaded = self.loaded();
        rng.index(loaded.len()).map(|i| loaded[i])
    }

    /// Loaded slots in shuffled order.
    pub fn shuffled(&self, rng: &mut SceneRng) -> Vec<usize> {
        let mut loaded = self.loaded();
        rng.shuffle(&mut loaded);
        loaded
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/pool.rs"]
mod tests;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{DreamError, DreamResult};
use crate::scene::state::SceneState;

/// Legacy archive key.
pub const ARCHIVE_KEY: &str = "dreamArchive";
/// Current archive key.
pub const ARCHIVE_KEY_V1: &str = "dreamArchiveV1";
/// Read order; every save writes all of them.
pub const ARCHIVE_KEYS: [&str; 2] = [ARCHIVE_KEY_V1, ARCHIVE_KEY];

/// String key-value storage the archive lives in.
pub trait KvStore {
    /// Value under `key`, `None` when absent.
    fn get(&self, key: &str) -> DreamResult<Option<String>>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> DreamResult<()>;
    /// Drop `key`; absent keys are not an error.
    fn remove(&mut self, key: &str) -> DreamResult<()>;
}

/// In-process store.
#[derive(Clone, Debug, Default)]
pub struct MemoryKv {
    entries: BTreeMap<String, String>,
}

impl MemoryKv {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> DreamResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> DreamResult<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DreamResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Clone, Debug)]
pub struct DirKv {
    dir: PathBuf,
}

impl DirKv {
    /// Store rooted at `dir`; the directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> DreamResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DreamError::validation(format!("invalid store key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KvStore for DirKv {
    fn get(&self, key: &str) -> DreamResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read '{}'", path.display()))
                .into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> DreamResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create store dir '{}'", self.dir.display()))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).with_context(|| format!("write '{}'", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("replace '{}'", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DreamResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove '{}'", path.display()))
                .into()),
        }
    }
}

fn read_array(store: &dyn KvStore, key: &str) -> Option<Vec<serde_json::Value>> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key, error = %err, "archive read failed");
            return None;
        }
    };
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Array(items)) => Some(items),
        Ok(_) => {
            tracing::warn!(key, "archive value is not a list");
            None
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "archive value is not valid JSON");
            None
        }
    }
}

/// Raw records from the first key holding a list, in [`ARCHIVE_KEYS`] order.
pub fn load_raw(store: &dyn KvStore) -> Vec<serde_json::Value> {
    ARCHIVE_KEYS
        .iter()
        .find_map(|key| read_array(store, key))
        .unwrap_or_default()
}

/// Decoded records; entries that do not decode are skipped.
pub fn load_archive(store: &dyn KvStore) -> Vec<SceneState> {
    load_raw(store)
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<SceneState>(v) {
            Ok(s) => Some(s),
            Err(err) => {
                tracing::warn!(error = %err, "skipping undecodable archive record");
                None
            }
        })
        .collect()
}

/// Write `records` under every archive key.
pub fn save_raw(store: &mut dyn KvStore, records: &[serde_json::Value]) -> DreamResult<()> {
    let json = serde_json::to_string(records)?;
    for key in [ARCHIVE_KEY, ARCHIVE_KEY_V1] {
        store.set(key, &json)?;
    }
    Ok(())
}

/// Append one record and rewrite the archive.
#[tracing::instrument(skip_all, fields(id = %state.id))]
pub fn save_record(store: &mut dyn KvStore, state: &SceneState) -> DreamResult<usize> {
    let mut records = load_raw(store);
    records.push(serde_json::to_value(state)?);
    save_raw(store, &records)?;
    tracing::debug!(count = records.len(), "archive saved");
    Ok(records.len())
}

/// Union of both keys (legacy key first), de-duplicated by id, written back to both.
pub fn merge_archives(store: &mut dyn KvStore) -> DreamResult<Vec<serde_json::Value>> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for key in [ARCHIVE_KEY, ARCHIVE_KEY_V1] {
        for record in read_array(store, key).unwrap_or_default() {
            let fresh = match record.get("id").and_then(serde_json::Value::as_str) {
                Some(id) => seen.insert(id.to_owned()),
                None => true,
            };
            if fresh {
                merged.push(record);
            }
        }
    }
    save_raw(store, &merged)?;
    Ok(merged)
}

/// Remove both archive keys.
pub fn clear_archive(store: &mut dyn KvStore) -> DreamResult<()> {
    for key in ARCHIVE_KEYS {
        store.remove(key)?;
    }
    Ok(())
}

/// First record with `id`, probing the current key then the legacy one.
pub fn find_dream(store: &dyn KvStore, id: &str) -> Option<SceneState> {
    load_archive(store).into_iter().find(|s| s.id == id)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/archive.rs"]
mod tests;

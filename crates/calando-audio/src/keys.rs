//! Path-to-key mapping for loaded audio files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Handle identifying an audio file registered with the engine.
///
/// Keys are allocated starting at 1, so raw value 0 never refers to a
/// real sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioKey(pub u32);

/// Bidirectional path/key table.
///
/// Game code addresses sounds by file path every frame, so `resolve`
/// keeps a one-entry memo of the last path it saw. Forgetting a key
/// frees the path for a fresh key on the next resolve.
#[derive(Debug)]
pub struct AudioKeyMap {
    by_path: HashMap<PathBuf, AudioKey>,
    by_key: HashMap<AudioKey, PathBuf>,
    last: Option<(PathBuf, AudioKey)>,
    next: u32,
}

impl AudioKeyMap {
    pub fn new() -> Self {
        Self {
            by_path: HashMap::new(),
            by_key: HashMap::new(),
            last: None,
            next: 1,
        }
    }

    /// Return the key for a path, allocating one on first sight.
    pub fn resolve(&mut self, path: &Path) -> AudioKey {
        if let Some((last_path, key)) = &self.last {
            if last_path.as_path() == path {
                return *key;
            }
        }
        if let Some(&key) = self.by_path.get(path) {
            self.last = Some((path.to_path_buf(), key));
            return key;
        }
        let key = AudioKey(self.next);
        self.next += 1;
        self.by_path.insert(path.to_path_buf(), key);
        self.by_key.insert(key, path.to_path_buf());
        self.last = Some((path.to_path_buf(), key));
        key
    }

    /// Key for an already-registered path. Never allocates.
    pub fn lookup(&self, path: &Path) -> Option<AudioKey> {
        self.by_path.get(path).copied()
    }

    /// Path registered for a key.
    pub fn path_for(&self, key: AudioKey) -> Option<&Path> {
        self.by_key.get(&key).map(PathBuf::as_path)
    }

    /// Drop the mapping for a key, returning its path.
    pub fn forget(&mut self, key: AudioKey) -> Option<PathBuf> {
        let path = self.by_key.remove(&key)?;
        self.by_path.remove(&path);
        if self.last.as_ref().is_some_and(|(_, k)| *k == key) {
            self.last = None;
        }
        Some(path)
    }

    pub fn clear(&mut self) {
        self.by_path.clear();
        self.by_key.clear();
        self.last = None;
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

impl Default for AudioKeyMap {
    fn default() -> Self {
        Self::new()
    }
}

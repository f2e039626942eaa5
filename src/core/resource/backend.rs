//=========================================================================
// Asset Backend
//=========================================================================
//
// Boundary to whatever actually decodes assets. The core only queues
// paths, pumps the backend one unit at a time and fetches opaque
// handles back.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, VecDeque};
use std::fs;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{AssetHandle, AssetKind, ResourceError, ResourceRequest};

//=== AssetBackend Trait ==================================================

pub trait AssetBackend {
    /// Queues `path`. Queuing a path already queued or loaded is a no-op.
    fn load(&mut self, path: &str, kind: AssetKind);

    /// Performs one unit of loading work. Returns `true` once the queue is drained.
    fn update(&mut self) -> Result<bool, ResourceError>;

    fn is_done(&self) -> bool;

    /// Fraction of queued work completed, in `[0, 1]`.
    fn progress(&self) -> f32;

    fn get(&self, path: &str) -> Option<AssetHandle>;

    /// Number of assets still waiting to load.
    fn queued(&self) -> usize;
}

//=== FileBackend =========================================================

/// Reads raw file bytes, one file per [`update`](AssetBackend::update).
///
/// Handles carry a `Vec<u8>` payload; nothing is decoded.
#[derive(Debug, Default)]
pub struct FileBackend {
    pending: VecDeque<ResourceRequest>,
    loaded: HashMap<String, AssetHandle>,
    total: usize,
}

impl FileBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of assets loaded so far.
    pub fn loaded(&self) -> usize {
        self.loaded.len()
    }
}

impl AssetBackend for FileBackend {
    fn load(&mut self, path: &str, kind: AssetKind) {
        if self.loaded.contains_key(path) || self.pending.iter().any(|req| req.path == path) {
            trace!("Asset '{}' already queued", path);
            return;
        }

        self.pending.push_back(ResourceRequest::new(path, kind));
        self.total += 1;
    }

    fn update(&mut self) -> Result<bool, ResourceError> {
        let Some(request) = self.pending.pop_front() else {
            return Ok(true);
        };

        let bytes = fs::read(&request.path).map_err(|err| ResourceError::LoadFailed {
            path: request.path.clone(),
            reason: err.to_string(),
        })?;

        debug!("Loaded {} '{}' ({} bytes)", request.kind, request.path, bytes.len());
        let handle = AssetHandle::new(request.path.as_str(), request.kind, bytes);
        self.loaded.insert(request.path, handle);

        Ok(self.pending.is_empty())
    }

    fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        (self.total - self.pending.len()) as f32 / self.total as f32
    }

    fn get(&self, path: &str) -> Option<AssetHandle> {
        self.loaded.get(path).cloned()
    }

    fn queued(&self) -> usize {
        self.pending.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::path::Path;

    fn path_str(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn loads_one_file_per_update() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        fs::write(&a, [1u8, 2]).unwrap();
        fs::write(&b, [3u8]).unwrap();

        let mut backend = FileBackend::new();
        backend.load(&path_str(&a), AssetKind::Data);
        backend.load(&path_str(&b), AssetKind::Data);
        assert_eq!(backend.queued(), 2);
        assert_relative_eq!(backend.progress(), 0.0);

        assert!(!backend.update().unwrap());
        assert_relative_eq!(backend.progress(), 0.5);

        assert!(backend.update().unwrap());
        assert!(backend.is_done());
        assert_relative_eq!(backend.progress(), 1.0);

        let handle = backend.get(&path_str(&a)).unwrap();
        assert_eq!(handle.payload::<Vec<u8>>(), Some(&vec![1, 2]));
    }

    #[test]
    fn repeated_paths_are_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        fs::write(&a, b"x").unwrap();

        let mut backend = FileBackend::new();
        backend.load(&path_str(&a), AssetKind::Texture);
        backend.load(&path_str(&a), AssetKind::Texture);
        assert_eq!(backend.queued(), 1);

        backend.update().unwrap();
        backend.load(&path_str(&a), AssetKind::Texture);
        assert_eq!(backend.queued(), 0);
        assert_eq!(backend.loaded(), 1);
    }

    #[test]
    fn unreadable_file_reports_load_failure() {
        let mut backend = FileBackend::new();
        backend.load("/definitely/not/here.png", AssetKind::Texture);

        let err = backend.update().unwrap_err();
        assert!(matches!(err, ResourceError::LoadFailed { .. }));
    }

    #[test]
    fn update_on_empty_queue_is_done() {
        let mut backend = FileBackend::new();
        assert!(backend.update().unwrap());
        assert!(backend.get("missing").is_none());
    }
}

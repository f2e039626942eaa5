//=========================================================================
// Resource Loader
//=========================================================================
//
// Drives an `AssetBackend` through one loading session:
//
//   enqueue(requests) → poll_once() … poll_once() == true → get(path)
//
// `progress()` never decreases within a session and is 0 before anything
// has been enqueued.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{AssetBackend, AssetHandle, AssetRef, FileBackend, ResourceError, ResourceRequest};
use crate::core::object::Sprite;

//=== ResourceLoader ======================================================

pub struct ResourceLoader {
    backend: Box<dyn AssetBackend>,
    enqueued: usize,
    progress: f32,
    finished: bool,
}

impl ResourceLoader {
    pub fn new(backend: Box<dyn AssetBackend>) -> Self {
        Self {
            backend,
            enqueued: 0,
            progress: 0.0,
            finished: false,
        }
    }

    //--- Loading ----------------------------------------------------------

    /// Hands every request to the backend and opens a loading session.
    pub fn enqueue(&mut self, requests: &[ResourceRequest]) {
        if requests.is_empty() {
            return;
        }

        if self.finished {
            self.finished = false;
            self.progress = 0.0;
        }

        for request in requests {
            self.backend.load(&request.path, request.kind);
        }
        self.enqueued += requests.len();
        debug!("Enqueued {} resource requests", requests.len());
    }

    /// Advances loading by one unit. Returns `true` once everything is loaded.
    ///
    /// Calling it after completion, or before anything was enqueued, does
    /// nothing and returns `true`.
    pub fn poll_once(&mut self) -> Result<bool, ResourceError> {
        if self.finished || self.enqueued == 0 {
            return Ok(true);
        }

        let done = self.backend.update()?;
        self.progress = self.progress.max(self.backend.progress().clamp(0.0, 1.0));

        if done {
            self.finished = true;
            self.progress = 1.0;
        }
        Ok(done)
    }

    /// Busy-polls until the session completes, logging progress as it moves.
    pub fn finish_loading(&mut self) -> Result<(), ResourceError> {
        info!("Queued {} assets to load", self.backend.queued());

        let mut last = self.progress;
        while !self.poll_once()? {
            if self.progress > last {
                info!("Loading: {:.0}%", self.progress * 100.0);
                last = self.progress;
            }
        }

        info!("Finished loading {} assets", self.enqueued);
        Ok(())
    }

    //--- State ------------------------------------------------------------

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Requests handed to the backend over the loader's lifetime.
    pub fn enqueued(&self) -> usize {
        self.enqueued
    }

    //--- Access -----------------------------------------------------------

    pub fn get(&self, path: &str) -> Option<AssetHandle> {
        self.backend.get(path)
    }

    /// Handle for a declared asset, by its resolved path.
    pub fn asset(&self, asset: &AssetRef) -> Result<AssetHandle, ResourceError> {
        self.backend
            .get(asset.path())
            .ok_or_else(|| ResourceError::NotLoaded(asset.path().to_owned()))
    }

    /// Single-frame sprite named after the asset's reference.
    pub fn sprite(&self, asset: &AssetRef) -> Result<Sprite, ResourceError> {
        self.asset(asset)
            .map(|handle| Sprite::new(asset.reference(), handle))
    }

    pub fn backend(&self) -> &dyn AssetBackend {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn AssetBackend {
        self.backend.as_mut()
    }
}

impl Default for ResourceLoader {
    fn default() -> Self {
        Self::new(Box::new(FileBackend::new()))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Resource Pipeline
//=========================================================================
//
// Declarative asset discovery and progressive loading.
//
// Architecture:
//   AssetRef (static, per type) ─┐
//                                ├─ AssetManifest (explicit registry)
//   DeclaresAssets (trait) ──────┘
//          ↓
//   ResourceScanner::discover → Vec<ResourceRequest>   (all-or-nothing)
//          ↓
//   ResourceLoader::enqueue → AssetBackend::load
//   ResourceLoader::poll_once → AssetBackend::update   (one unit of work)
//          ↓
//   AssetHandle (opaque, shared)
//
//=========================================================================

//=== Module Declarations =================================================

mod backend;
mod loader;
mod manifest;
mod scanner;

//=== Public API ==========================================================

pub use backend::{AssetBackend, FileBackend};
pub use loader::ResourceLoader;
pub use manifest::{AssetManifest, AssetRef, DeclaresAssets, ManifestEntry};
pub use scanner::ResourceScanner;

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

//=== AssetKind ===========================================================

/// Backend type tag of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Texture,
    Sound,
    Music,
    Font,
    Data,
}

impl AssetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Texture => "texture",
            Self::Sound => "sound",
            Self::Music => "music",
            Self::Font => "font",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=== ResourceRequest =====================================================

/// One validated reference awaiting a backend load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRequest {
    pub path: String,
    pub kind: AssetKind,
}

impl ResourceRequest {
    pub fn new(path: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

//=== AssetHandle =========================================================

/// Opaque, cheaply clonable handle to a loaded asset.
///
/// The payload is whatever the backend produced; the core never looks
/// inside it.
#[derive(Clone)]
pub struct AssetHandle {
    path: Arc<str>,
    kind: AssetKind,
    payload: Arc<dyn Any + Send + Sync>,
}

impl AssetHandle {
    pub fn new<T>(path: impl Into<Arc<str>>, kind: AssetKind, payload: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            path: path.into(),
            kind,
            payload: Arc::new(payload),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Backend payload as `T`, if that is what was loaded.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetHandle")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

//=== ResourceError =======================================================

/// Errors raised while discovering or loading resources.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("resource path is a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    #[error("failed to load '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("resource '{0}' has not been loaded")]
    NotLoaded(String),
}

impl ResourceError {
    /// Whether this error means a reference pointed at nothing usable on disk.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::IsDirectory(_))
    }
}

//=========================================================================
// Resource Scanner
//=========================================================================
//
// Validates declared references against the filesystem and turns them
// into load requests.
//
// Discovery is all-or-nothing: every reference is checked before any is
// resolved, so a failing pass leaves no resolved paths and yields no
// requests.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};

use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use super::{AssetManifest, ResourceError, ResourceRequest};

//=== ResourceScanner =====================================================

#[derive(Debug, Clone)]
pub struct ResourceScanner {
    asset_root: PathBuf,
    namespace: String,
}

impl ResourceScanner {
    /// Scanner resolving references against `asset_root`.
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            namespace: String::new(),
        }
    }

    /// Restricts discovery to owners under `namespace`.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Validates every reference in the namespace and returns one request
    /// per reference, in manifest order.
    ///
    /// Duplicate references are not merged; the backend dedupes.
    pub fn discover(&self, manifest: &AssetManifest) -> Result<Vec<ResourceRequest>, ResourceError> {
        let mut validated = Vec::new();

        for entry in manifest.in_namespace(&self.namespace) {
            let target = self.asset_root.join(entry.asset.reference());
            check_target(&target).map_err(|err| {
                error!("Asset '{}' of {}: {}", entry.asset.reference(), entry.owner, err);
                err
            })?;
            validated.push((entry.asset, target));
        }

        let requests = validated
            .into_iter()
            .map(|(asset, target)| {
                let path = target.to_string_lossy().into_owned();
                asset.resolve(path.clone());
                debug!("Discovered {} '{}'", asset.kind(), path);
                ResourceRequest::new(path, asset.kind())
            })
            .collect::<Vec<_>>();

        info!(
            "Discovered {} resource references under '{}'",
            requests.len(),
            if self.namespace.is_empty() { "*" } else { self.namespace.as_str() }
        );
        Ok(requests)
    }
}

fn check_target(target: &Path) -> Result<(), ResourceError> {
    if target.is_dir() {
        return Err(ResourceError::IsDirectory(target.to_path_buf()));
    }
    if !target.exists() {
        return Err(ResourceError::NotFound(target.to_path_buf()));
    }
    Ok(())
}

//=========================================================================
// Unit Tests
//=========================================================================

//=========================================================================
// Boot Errors
//=========================================================================
//
// The only conditions that terminate the application. Each maps to a
// fixed process status code.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::config::ConfigError;
use crate::core::resource::ResourceError;

//=== Status Codes ========================================================

pub const EXIT_NO_DEFAULT_SCENE: i32 = -1;
pub const EXIT_RESOURCE_LOAD_FAILURE: i32 = -2;
pub const EXIT_RESOURCE_NOT_FOUND: i32 = -3;

//=== BootError ===========================================================

#[derive(Debug, Error)]
pub enum BootError {
    #[error("no default scene: no scene was registered")]
    NoDefaultScene,

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl BootError {
    /// Process exit status for this error.
    pub fn status_code(&self) -> i32 {
        match self {
            Self::NoDefaultScene => EXIT_NO_DEFAULT_SCENE,
            Self::Resource(err) if err.is_not_found() => EXIT_RESOURCE_NOT_FOUND,
            Self::Resource(_) | Self::Config(_) => EXIT_RESOURCE_LOAD_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_distinct() {
        assert_eq!(BootError::NoDefaultScene.status_code(), -1);

        let missing = BootError::from(ResourceError::NotFound("a.png".into()));
        assert_eq!(missing.status_code(), -3);

        let folder = BootError::from(ResourceError::IsDirectory("sprites".into()));
        assert_eq!(folder.status_code(), -3);

        let broken = BootError::from(ResourceError::LoadFailed {
            path: "a.png".into(),
            reason: "truncated".into(),
        });
        assert_eq!(broken.status_code(), -2);

        let config = BootError::from(ConfigError::Invalid("target_fps must be positive".into()));
        assert_eq!(config.status_code(), -2);
    }
}

/*

    Errors raised while fitting, loading scenes and
    writing render outputs.

    Malformed config values never show up here, those
    are recovered in config.rs by falling back to defaults.

    @date: Oct, 2026
*/

use std::path::PathBuf;
use thiserror::Error;

pub type BakeResult<T> = Result<T, BakeError>;

#[derive(Debug, Error)]
pub enum BakeError {
    /// No visible mesh contributed a bounding box
    #[error("no mesh bounds found, nothing to fit")]
    EmptyInput,

    /// Combined bounds have no XY extent at all
    #[error("combined bounds are degenerate (zero extent on both X and Y)")]
    DegenerateBounds,

    #[error("no camera found in the scene")]
    NoCameraFound,

    #[error("scene file {path:?} could not be loaded: {reason}")]
    SceneLoad { path: PathBuf, reason: String },

    #[error("mesh '{mesh}' is invalid: {reason}")]
    InvalidMesh { mesh: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("failed to write image: {0}")]
    ImageWrite(#[from] png::EncodingError),
}

impl BakeError {
    pub fn scene_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::SceneLoad { path: path.into(), reason: reason.to_string() }
    }

    pub fn invalid_mesh(mesh: &str, reason: impl ToString) -> Self {
        Self::InvalidMesh { mesh: mesh.to_string(), reason: reason.to_string() }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BakeError::EmptyInput;
        assert!(format!("{err}").contains("no mesh bounds"));

        let err = BakeError::scene_load("scenes/crate.json", "missing Scene");
        let msg = format!("{err}");
        assert!(msg.contains("crate.json"));
        assert!(msg.contains("missing Scene"));

        let err = BakeError::invalid_mesh("lid", "face index 9 out of range");
        assert!(format!("{err}").contains("lid"));
    }
}

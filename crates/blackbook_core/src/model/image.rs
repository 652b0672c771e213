//! Image metadata and character tags.
//!
//! Binary storage is outside core; an image is its filename and caption.

use crate::model::resource::{NestedResource, ResourceId};
use crate::model::universe::UniverseId;
use crate::model::{normalize_required, ValidationError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub id: ResourceId,
    pub universe_id: UniverseId,
    pub filename: String,
    pub caption: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl NestedResource for Image {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn universe_id(&self) -> UniverseId {
        self.universe_id
    }
}

/// Link between an image and a character shown in it.
///
/// `universe_id` is derived from the image; it is not stored on the tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageTag {
    pub id: ResourceId,
    pub image_id: ResourceId,
    pub character_id: ResourceId,
    pub universe_id: UniverseId,
    pub created_at: i64,
}

impl NestedResource for ImageTag {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn universe_id(&self) -> UniverseId {
        self.universe_id
    }
}

/// Validates a filename: required, and a bare name without path components.
pub fn normalize_filename(value: &str) -> Result<String, ValidationError> {
    let filename = normalize_required("Filename", value)?;
    if filename.contains(['/', '\\']) || filename == "." || filename == ".." {
        return Err(ValidationError::new(
            "Filename must not contain path separators",
        ));
    }
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::normalize_filename;

    #[test]
    fn filename_rejects_path_components() {
        assert_eq!(normalize_filename(" map.png ").unwrap(), "map.png");
        assert!(normalize_filename("../etc/passwd").is_err());
        assert!(normalize_filename("maps\\shire.png").is_err());
        assert!(normalize_filename("..").is_err());
    }
}

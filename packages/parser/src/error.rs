use thiserror::Error;

pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors raised when patching an annotation's metadata envelope.
///
/// Parsing itself never fails; malformed envelopes degrade to plain content.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Annotation at {pos} has no metadata separator")]
    MissingSeparator { pos: usize },

    #[error("Annotation at {pos} carries no metadata")]
    MissingMetadata { pos: usize },

    #[error("Cannot serialize metadata: {0}")]
    Json(#[from] serde_json::Error),
}

impl MetadataError {
    pub fn missing_separator(pos: usize) -> Self {
        Self::MissingSeparator { pos }
    }

    pub fn missing_metadata(pos: usize) -> Self {
        Self::MissingMetadata { pos }
    }
}

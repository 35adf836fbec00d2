//! Error types for the editor

use crate::edits::EditError;
use crate::mutations::MutationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    #[error("Document is not file-backed")]
    NotFileBacked,

    #[error("Document is read-only in viewing mode")]
    ReadOnly,

    #[error("No author name configured")]
    MissingAuthor,
}

//! # Document Handle
//!
//! A Document is one marked-up text plus its parsed ranges. Documents can be:
//! - **Memory-backed**: temporary, for tests and piped input
//! - **File-backed**: single-user editing with disk persistence
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Parse → Plan → Apply → Re-parse → Save
//!   ↓      ↓       ↓      ↓        ↓         ↓
//! File  ranges  batch   text    ranges     File
//! ```
//!
//! The text is the only state. Ranges are re-derived after every applied
//! batch and never patched in place.

use crate::edits::EditBatch;
use crate::mutations::{Mutation, MutationContext, MutationPlan};
use crate::threads::{build_threads, CommentThread};
use crate::EditorError;
use critic_parser::{parse, AnnotationRange};
use std::path::{Path, PathBuf};

/// Editable marked-up document
#[derive(Debug)]
pub struct Document {
    /// Path to source file (if any)
    pub path: PathBuf,

    /// Current version number (increments on each applied batch)
    pub version: u64,

    /// Backing storage strategy
    storage: DocumentStorage,

    /// Ranges parsed from the current text
    ranges: Vec<AnnotationRange>,
}

/// Storage backend for document
#[derive(Debug)]
pub enum DocumentStorage {
    /// In-memory only (for testing, temp docs)
    Memory { source: String },

    /// File-backed (single-user editing)
    File { source: String, dirty: bool },
}

/// Outcome of applying one batch
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    pub version: u64,
    /// Cursor position requested by the batch
    pub selection: Option<usize>,
    /// Id of an annotation the mutation created
    pub created_id: Option<String>,
}

impl Document {
    /// Create document from source text (memory-backed)
    pub fn from_source(path: PathBuf, source: String) -> Self {
        let ranges = parse(&source);
        Self {
            path,
            version: 0,
            storage: DocumentStorage::Memory { source },
            ranges,
        }
    }

    /// Load document from file (file-backed)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref().to_path_buf();
        let source = std::fs::read_to_string(&path)?;
        let ranges = parse(&source);

        tracing::debug!(path = %path.display(), ranges = ranges.len(), "Loaded document");

        Ok(Self {
            path,
            version: 0,
            storage: DocumentStorage::File {
                source,
                dirty: false,
            },
            ranges,
        })
    }

    /// Get source text
    pub fn source(&self) -> &str {
        match &self.storage {
            DocumentStorage::Memory { source } | DocumentStorage::File { source, .. } => source,
        }
    }

    pub fn ranges(&self) -> &[AnnotationRange] {
        &self.ranges
    }

    pub fn threads(&self) -> Vec<CommentThread> {
        build_threads(&self.ranges)
    }

    /// Snapshot for planning a mutation as `author`
    pub fn context<'a>(&'a self, author: &'a str) -> MutationContext<'a> {
        MutationContext {
            source: self.source(),
            ranges: &self.ranges,
            author,
        }
    }

    /// Plan `mutation` against the current text without applying it
    pub fn plan(&self, mutation: &Mutation, author: &str) -> Result<MutationPlan, EditorError> {
        Ok(mutation.plan(&self.context(author))?)
    }

    /// Plan and apply `mutation` as one batch
    pub fn apply_mutation(&mut self, mutation: &Mutation, author: &str) -> Result<MutationResult, EditorError> {
        let plan = self.plan(mutation, author)?;
        let mut result = self.apply(&plan.batch)?;
        result.created_id = plan.created_id;
        Ok(result)
    }

    /// Apply a batch, all or nothing
    ///
    /// An empty batch leaves the version untouched.
    pub fn apply(&mut self, batch: &EditBatch) -> Result<MutationResult, EditorError> {
        if batch.is_empty() {
            return Ok(MutationResult {
                version: self.version,
                selection: batch.selection,
                created_id: None,
            });
        }

        let next = batch.apply(self.source())?;
        self.ranges = parse(&next);
        self.version += 1;

        match &mut self.storage {
            DocumentStorage::Memory { source } => *source = next,
            DocumentStorage::File { source, dirty } => {
                *source = next;
                *dirty = true;
            }
        }

        tracing::debug!(
            label = %batch.label,
            edits = batch.len(),
            version = self.version,
            "Applied edit batch"
        );

        Ok(MutationResult {
            version: self.version,
            selection: batch.selection,
            created_id: None,
        })
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            DocumentStorage::Memory { .. } => false,
        }
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        match &mut self.storage {
            DocumentStorage::File { source, dirty } => {
                std::fs::write(&self.path, source.as_bytes())?;
                *dirty = false;
                Ok(())
            }
            DocumentStorage::Memory { .. } => Err(EditorError::NotFileBacked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutations::SuggestionTarget;
    use critic_parser::TextEdit;

    fn memory(source: &str) -> Document {
        Document::from_source(PathBuf::from("test.md"), source.to_string())
    }

    #[test]
    fn test_create_memory_document() {
        let doc = memory("Hello {++world++} there");
        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
        assert_eq!(doc.ranges().len(), 1);
    }

    #[test]
    fn test_apply_reparses_and_bumps_version() {
        let mut doc = memory("Hello {++world++} there");
        let mutation = Mutation::AcceptSuggestion {
            target: SuggestionTarget::At(8),
        };
        let result = doc.apply_mutation(&mutation, "Bo").unwrap();
        assert_eq!(result.version, 1);
        assert_eq!(doc.source(), "Hello world there");
        assert!(doc.ranges().is_empty());
    }

    #[test]
    fn test_failed_batch_changes_nothing() {
        let mut doc = memory("abc");
        let batch = EditBatch::single("input", TextEdit::delete(1, 10));
        assert!(matches!(doc.apply(&batch), Err(EditorError::Edit(_))));
        assert_eq!(doc.source(), "abc");
        assert_eq!(doc.version, 0);
    }

    #[test]
    fn test_empty_batch_keeps_version() {
        let mut doc = memory("no markup");
        let result = doc.apply_mutation(&Mutation::AcceptAll, "Bo").unwrap();
        assert_eq!(result.version, 0);
    }

    #[test]
    fn test_memory_document_cannot_save() {
        let mut doc = memory("x");
        assert!(matches!(doc.save(), Err(EditorError::NotFileBacked)));
    }
}

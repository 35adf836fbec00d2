//! # Edit Batches
//!
//! Every mutation leaves the core as one [`EditBatch`]: a labelled list of
//! text replacements that a host applies as a single undoable step.
//!
//! Edits apply in vector order, each against the text left by the previous
//! one. Mutations emit them highest offset first, so every offset stays valid
//! against the pre-edit text; the suggesting interceptor emits them lowest
//! offset first with the running shift already folded in.

use critic_parser::TextEdit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LABEL_ACCEPT: &str = "critic.accept";
pub const LABEL_ACCEPT_ALL: &str = "critic.accept-all";
pub const LABEL_REJECT: &str = "critic.reject";
pub const LABEL_REJECT_ALL: &str = "critic.reject-all";
pub const LABEL_COMMENT: &str = "critic.comment";
pub const LABEL_COMMENT_SAVE: &str = "critic.comment.save";
pub const LABEL_COMMENT_CANCEL: &str = "critic.comment.cancel";
pub const LABEL_COMMENT_REPLY: &str = "critic.comment.reply";
pub const LABEL_RESOLVE: &str = "critic.comment.resolve";
pub const LABEL_REOPEN: &str = "critic.comment.reopen";
pub const LABEL_RESOLVE_ALL: &str = "critic.comment.resolve-all";
pub const LABEL_STRIP_ACCEPT: &str = "critic.strip-accept";
pub const LABEL_STRIP_REJECT: &str = "critic.strip-reject";
pub const LABEL_SUGGEST: &str = "critic.suggest";
pub const LABEL_INPUT: &str = "input";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Edit {from}..{to} is inverted")]
    Inverted { from: usize, to: usize },

    #[error("Edit {from}..{to} exceeds text length {len}")]
    OutOfBounds { from: usize, to: usize, len: usize },

    #[error("Edit position {pos} is not on a character boundary")]
    NotCharBoundary { pos: usize },
}

/// A labelled, atomic group of text replacements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditBatch {
    /// User-event label for the host's history
    pub label: String,

    pub edits: Vec<TextEdit>,

    /// Cursor position after the batch, if the batch wants to move it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<usize>,
}

impl EditBatch {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            edits: Vec::new(),
            selection: None,
        }
    }

    pub fn single(label: impl Into<String>, edit: TextEdit) -> Self {
        Self::new(label).with_edit(edit)
    }

    pub fn with_edit(mut self, edit: TextEdit) -> Self {
        self.edits.push(edit);
        self
    }

    pub fn with_selection(mut self, pos: usize) -> Self {
        self.selection = Some(pos);
        self
    }

    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Apply every edit to `text`, all or nothing
    pub fn apply(&self, text: &str) -> Result<String, EditError> {
        let mut out = text.to_string();
        for edit in &self.edits {
            check(&out, edit)?;
            out.replace_range(edit.from..edit.to, &edit.insert);
        }
        Ok(out)
    }
}

fn check(text: &str, edit: &TextEdit) -> Result<(), EditError> {
    if edit.from > edit.to {
        return Err(EditError::Inverted {
            from: edit.from,
            to: edit.to,
        });
    }
    if edit.to > text.len() {
        return Err(EditError::OutOfBounds {
            from: edit.from,
            to: edit.to,
            len: text.len(),
        });
    }
    for pos in [edit.from, edit.to] {
        if !text.is_char_boundary(pos) {
            return Err(EditError::NotCharBoundary { pos });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_edits_use_original_offsets() {
        let batch = EditBatch::new(LABEL_ACCEPT_ALL)
            .with_edit(TextEdit::new(8, 11, "Z"))
            .with_edit(TextEdit::new(0, 3, "X"));
        assert_eq!(batch.apply("aaa bbb ccc").unwrap(), "X bbb Z");
    }

    #[test]
    fn test_out_of_bounds_leaves_text_alone() {
        let batch = EditBatch::single(LABEL_ACCEPT, TextEdit::new(2, 40, ""));
        assert_eq!(
            batch.apply("short"),
            Err(EditError::OutOfBounds { from: 2, to: 40, len: 5 })
        );
    }

    #[test]
    fn test_char_boundary_is_enforced() {
        let batch = EditBatch::single(LABEL_ACCEPT, TextEdit::insert(2, "x"));
        assert_eq!(batch.apply("é").unwrap(), "éx");
        let batch = EditBatch::single(LABEL_ACCEPT, TextEdit::insert(1, "x"));
        assert_eq!(batch.apply("é"), Err(EditError::NotCharBoundary { pos: 1 }));
    }

    #[test]
    fn test_empty_batch_is_identity() {
        let batch = EditBatch::new(LABEL_STRIP_ACCEPT);
        assert!(batch.is_empty());
        assert_eq!(batch.apply("same").unwrap(), "same");
    }
}

//! # Edit Session Management
//!
//! One [`EditSession`] per open document: the document, who is editing it,
//! and the session state (mode and focused thread) that decorations and
//! mutations read.
//!
//! Modes gate what a session may do:
//! - **Editing**: raw text edits and every mutation
//! - **Suggesting**: text edits are wrapped by the interceptor; needs an author
//! - **Viewing**: read-only

use crate::clipboard::{copy_selection, cut_selection};
use crate::decorations::{decorate, Decoration};
use crate::document::{Document, MutationResult};
use crate::edits::{EditBatch, LABEL_INPUT};
use crate::gutter::{build_gutter_markers, GutterMarker};
use crate::mutations::Mutation;
use crate::suggesting::{intercept, EditOrigin, Interception};
use crate::threads::find_thread_id_at;
use crate::EditorError;
use critic_parser::TextEdit;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    Editing,
    Suggesting,
    Viewing,
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EditorMode::Editing => "editing",
            EditorMode::Suggesting => "suggesting",
            EditorMode::Viewing => "viewing",
        })
    }
}

impl std::str::FromStr for EditorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "editing" => Ok(EditorMode::Editing),
            "suggesting" => Ok(EditorMode::Suggesting),
            "viewing" => Ok(EditorMode::Viewing),
            other => Err(format!(
                "unknown mode '{}': use editing, suggesting or viewing",
                other
            )),
        }
    }
}

/// Per-document view state read by the projector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub mode: EditorMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focused_thread_id: Option<String>,
}

impl SessionState {
    pub fn new(mode: EditorMode) -> Self {
        Self {
            mode,
            focused_thread_id: None,
        }
    }

    pub fn focus(&mut self, id: impl Into<String>) {
        self.focused_thread_id = Some(id.into());
    }

    pub fn clear_focus(&mut self) {
        self.focused_thread_id = None;
    }
}

/// Single edit session
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    /// Name written into new annotations
    pub author: String,

    /// Document being edited
    pub document: Document,

    pub state: SessionState,

    /// Sanitize copied and cut text
    pub clipboard_cleanup: bool,
}

impl EditSession {
    /// Create new edit session in Editing mode
    pub fn new(id: impl Into<String>, author: impl Into<String>, document: Document) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            document,
            state: SessionState::default(),
            clipboard_cleanup: true,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.state.mode
    }

    /// Switch mode; Suggesting is refused without an author
    pub fn set_mode(&mut self, mode: EditorMode) -> Result<(), EditorError> {
        if mode == EditorMode::Suggesting {
            self.require_author()?;
        }
        tracing::debug!(session = %self.id, from = %self.state.mode, to = %mode, "Mode change");
        self.state.mode = mode;
        Ok(())
    }

    fn require_author(&self) -> Result<&str, EditorError> {
        let author = self.author.trim();
        if author.is_empty() {
            return Err(EditorError::MissingAuthor);
        }
        Ok(author)
    }

    fn require_writable(&self) -> Result<(), EditorError> {
        if self.state.mode == EditorMode::Viewing {
            return Err(EditorError::ReadOnly);
        }
        Ok(())
    }

    /// Plan and apply a mutation, then update focus
    pub fn apply_mutation(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        self.require_writable()?;

        let author = match &mutation {
            Mutation::AddComment { .. } | Mutation::AddReply { .. } => self.require_author()?.to_string(),
            _ => self.author.clone(),
        };

        let result = self.document.apply_mutation(&mutation, &author)?;

        match &mutation {
            Mutation::AddComment { .. } => {
                if let Some(id) = &result.created_id {
                    self.state.focus(id.clone());
                }
            }
            Mutation::AddReply { parent_id, .. } => self.state.focus(parent_id.clone()),
            Mutation::CancelEmptyComment { .. } => self.state.clear_focus(),
            _ => {}
        }

        Ok(result)
    }

    /// Commit user text edits given in pre-edit coordinates
    ///
    /// In Suggesting mode the interceptor may replace them with wrapped
    /// suggestions.
    pub fn type_edits(&mut self, edits: &[TextEdit], origin: EditOrigin) -> Result<MutationResult, EditorError> {
        self.require_writable()?;

        if self.state.mode == EditorMode::Suggesting {
            let author = self.require_author()?.to_string();
            let interception = intercept(
                self.document.source(),
                self.document.ranges(),
                edits,
                origin,
                &author,
            )?;
            if let Interception::Rewrite(batch) = interception {
                return self.document.apply(&batch);
            }
        }

        self.document.apply(&raw_batch(edits))
    }

    /// Clipboard text for `[from, to)`
    pub fn copy(&self, from: usize, to: usize) -> Result<String, EditorError> {
        Ok(copy_selection(self.document.source(), from, to, self.clipboard_cleanup)?)
    }

    /// Clipboard text for `[from, to)`, then delete the selection
    pub fn cut(&mut self, from: usize, to: usize) -> Result<(String, MutationResult), EditorError> {
        self.require_writable()?;
        let (text, deletion) = cut_selection(self.document.source(), from, to, self.clipboard_cleanup)?;
        let result = self.type_edits(&[deletion], EditOrigin::Delete)?;
        Ok((text, result))
    }

    /// Focus the thread under `pos`, or clear focus
    pub fn focus_at(&mut self, pos: usize) -> Option<&str> {
        match find_thread_id_at(self.document.ranges(), pos) {
            Some(id) => self.state.focus(id),
            None => self.state.clear_focus(),
        }
        self.state.focused_thread_id.as_deref()
    }

    pub fn decorations(&self) -> Vec<Decoration> {
        decorate(self.document.ranges(), &self.state)
    }

    pub fn gutter(&self) -> Vec<GutterMarker> {
        build_gutter_markers(self.document.source(), self.document.ranges(), self.state.mode)
    }
}

/// Pre-edit edits as one sequential batch, highest offset first
fn raw_batch(edits: &[TextEdit]) -> EditBatch {
    let mut sorted = edits.to_vec();
    sorted.sort_by(|a, b| b.from.cmp(&a.from));
    EditBatch {
        label: LABEL_INPUT.to_string(),
        edits: sorted,
        selection: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn session(source: &str, author: &str) -> EditSession {
        let doc = Document::from_source(PathBuf::from("test.md"), source.to_string());
        EditSession::new("client-1", author, doc)
    }

    #[test]
    fn test_session_creation() {
        let session = session("text", "Bo");
        assert_eq!(session.id, "client-1");
        assert_eq!(session.mode(), EditorMode::Editing);
        assert!(session.state.focused_thread_id.is_none());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("viewing".parse::<EditorMode>(), Ok(EditorMode::Viewing));
        assert!("reading".parse::<EditorMode>().is_err());
        assert_eq!(EditorMode::Suggesting.to_string(), "suggesting");
    }

    #[test]
    fn test_suggesting_needs_author() {
        let mut s = session("text", "  ");
        assert!(matches!(s.set_mode(EditorMode::Suggesting), Err(EditorError::MissingAuthor)));
        assert_eq!(s.mode(), EditorMode::Editing);
    }

    #[test]
    fn test_viewing_is_read_only() {
        let mut s = session("Hello {++world++}", "Bo");
        s.set_mode(EditorMode::Viewing).unwrap();
        assert!(matches!(s.apply_mutation(Mutation::AcceptAll), Err(EditorError::ReadOnly)));
        assert!(matches!(
            s.type_edits(&[TextEdit::insert(0, "x")], EditOrigin::Input),
            Err(EditorError::ReadOnly)
        ));
        assert_eq!(s.copy(0, s.document.source().len()).unwrap(), "Hello world");
    }

    #[test]
    fn test_editing_applies_raw_edits() {
        let mut s = session("ab cd", "Bo");
        let edits = [TextEdit::insert(0, "X"), TextEdit::delete(3, 5)];
        s.type_edits(&edits, EditOrigin::Input).unwrap();
        assert_eq!(s.document.source(), "Xab ");
    }

    #[test]
    fn test_suggesting_wraps_edits() {
        let mut s = session("ab", "Bo");
        s.set_mode(EditorMode::Suggesting).unwrap();
        let result = s.type_edits(&[TextEdit::insert(2, "c")], EditOrigin::Input).unwrap();
        let ranges = s.document.ranges();
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].author(), Some("Bo"));
        assert_eq!(result.selection, Some(s.document.source().len() - 3));
    }

    #[test]
    fn test_add_comment_focuses_and_cancel_clears() {
        let mut s = session("pick me", "Bo");
        let result = s.apply_mutation(Mutation::AddComment { from: 0, to: 4 }).unwrap();
        let id = result.created_id.unwrap();
        assert_eq!(s.state.focused_thread_id.as_deref(), Some(id.as_str()));

        s.apply_mutation(Mutation::CancelEmptyComment { id }).unwrap();
        assert_eq!(s.document.source(), "pick me");
        assert!(s.state.focused_thread_id.is_none());
    }

    #[test]
    fn test_add_comment_needs_author() {
        let mut s = session("pick me", "");
        assert!(matches!(
            s.apply_mutation(Mutation::AddComment { from: 0, to: 4 }),
            Err(EditorError::MissingAuthor)
        ));
    }

    #[test]
    fn test_cut_in_suggesting_mode_leaves_deletion() {
        let mut s = session("keep {++x++} drop", "Bo");
        s.set_mode(EditorMode::Suggesting).unwrap();
        let len = s.document.source().len();
        let (text, _) = s.cut(5, len).unwrap();
        assert_eq!(text, "x drop");
        let ranges = s.document.ranges();
        assert!(ranges.iter().any(|r| r.content == "{++x++} drop"));
    }

    #[test]
    fn test_focus_at() {
        let mut s = session(r#"{==a==}{>>{"id":"c1","author":"Bo","time":1}@@x<<} tail"#, "Bo");
        assert_eq!(s.focus_at(2), Some("c1"));
        assert_eq!(s.focus_at(s.document.source().len()), None);
    }
}

//! # Editing Pipeline
//!
//! Coordinates the full cycle: Plan → Apply → Re-parse → Re-decorate
//!
//! The Pipeline owns a session and hands the host everything it redraws after
//! a change: decorations for the text, gutter markers and the thread list.

use crate::decorations::Decoration;
use crate::gutter::GutterMarker;
use crate::session::EditSession;
use crate::suggesting::EditOrigin;
use crate::threads::CommentThread;
use crate::{EditorError, Mutation, MutationResult};
use critic_parser::TextEdit;

/// Manages the full edit → render pipeline
pub struct Pipeline {
    session: EditSession,
}

impl Pipeline {
    pub fn new(session: EditSession) -> Self {
        Self { session }
    }

    /// Apply mutation and recompute derived views
    pub fn apply_mutation(&mut self, mutation: Mutation) -> Result<PipelineResult, EditorError> {
        let result = self.session.apply_mutation(mutation)?;
        Ok(self.render(result))
    }

    /// Commit user edits (intercepted in Suggesting mode) and recompute
    pub fn type_edits(&mut self, edits: &[TextEdit], origin: EditOrigin) -> Result<PipelineResult, EditorError> {
        let result = self.session.type_edits(edits, origin)?;
        Ok(self.render(result))
    }

    /// Recompute derived views without a change
    ///
    /// Used for the initial render and after mode or focus changes.
    pub fn refresh(&self) -> PipelineResult {
        self.render(MutationResult {
            version: self.session.document.version,
            selection: None,
            created_id: None,
        })
    }

    fn render(&self, result: MutationResult) -> PipelineResult {
        PipelineResult {
            version: result.version,
            selection: result.selection,
            created_id: result.created_id,
            decorations: self.session.decorations(),
            gutter: self.session.gutter(),
            threads: self.session.document.threads(),
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }

    pub fn into_session(self) -> EditSession {
        self.session
    }
}

/// Result of pipeline execution
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// New version number
    pub version: u64,

    pub selection: Option<usize>,

    pub created_id: Option<String>,

    pub decorations: Vec<Decoration>,

    pub gutter: Vec<GutterMarker>,

    pub threads: Vec<CommentThread>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EditorMode;
    use crate::Document;
    use std::path::PathBuf;

    fn pipeline(source: &str) -> Pipeline {
        let doc = Document::from_source(PathBuf::from("test.md"), source.to_string());
        Pipeline::new(EditSession::new("client-1", "Bo", doc))
    }

    #[test]
    fn test_initial_refresh() {
        let p = pipeline(r#"{==a==}{>>{"id":"c1","author":"Bo","time":1}@@x<<}"#);
        let result = p.refresh();
        assert_eq!(result.version, 0);
        assert_eq!(result.threads.len(), 1);
        assert_eq!(result.gutter.len(), 1);
        assert!(!result.decorations.is_empty());
    }

    #[test]
    fn test_mutation_updates_views() {
        let mut p = pipeline("pick me");
        let result = p.apply_mutation(Mutation::AddComment { from: 0, to: 4 }).unwrap();
        assert_eq!(result.version, 1);
        assert_eq!(result.threads.len(), 1);
        assert_eq!(result.created_id.as_deref(), Some(result.threads[0].id.as_str()));
    }

    #[test]
    fn test_viewing_refresh_has_no_gutter() {
        let mut p = pipeline(r#"{++{"id":"s1","author":"Bo","time":1}@@a++}"#);
        p.session_mut().set_mode(EditorMode::Viewing).unwrap();
        let result = p.refresh();
        assert!(result.gutter.is_empty());
        assert_eq!(result.decorations.len(), 1);
    }
}

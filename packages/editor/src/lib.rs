//! # Critic Editor
//!
//! Review engine over marked-up text.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: text → ranges                       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: ranges → threads, decorations       │
//! │  - Mutations planned as one edit batch      │
//! │  - Suggesting-mode edit interceptor         │
//! │  - Clipboard sanitizer, reading view        │
//! │  - Document / session / pipeline            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ host: applies batches, draws decorations    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Text is the source of truth**: ranges, threads and decorations are derived
//! 2. **One gesture, one batch**: every mutation is a single atomic edit list
//! 3. **Fail-soft rendering, fail-closed mutation**
//!
//! ## Usage
//!
//! ```rust,ignore
//! use critic_editor::{Document, EditSession, Mutation, SuggestionTarget};
//!
//! let doc = Document::load("notes.md")?;
//! let mut session = EditSession::new("cli", "Bo", doc);
//!
//! session.apply_mutation(Mutation::AcceptSuggestion {
//!     target: SuggestionTarget::Id("a1".into()),
//! })?;
//!
//! session.document.save()?;
//! ```

pub mod clipboard;
pub mod decorations;
mod document;
pub mod edits;
mod errors;
pub mod gutter;
pub mod mutations;
mod pipeline;
pub mod reading_view;
mod session;
pub mod suggesting;
pub mod threads;

pub use clipboard::{contains_markup, copy_selection, cut_selection, strip_markup_text};
pub use decorations::{
    build_editing_decorations, build_viewing_decorations, decorate, render_viewing, Decoration,
    DecorationError, MarkStyle,
};
pub use document::{Document, DocumentStorage, MutationResult};
pub use edits::{EditBatch, EditError};
pub use errors::EditorError;
pub use gutter::{build_gutter_markers, GutterKind, GutterMarker};
pub use mutations::{
    accept_all, accept_suggestion, add_comment, add_reply, cancel_empty_comment, find_by_id,
    find_suggestion_at, reject_all, reject_suggestion, reopen_comment, resolve_all_comments,
    resolve_comment, save_comment_text, strip_all_markup, Mutation, MutationContext,
    MutationError, MutationPlan, StripMode, SuggestionTarget,
};
pub use pipeline::{Pipeline, PipelineResult};
pub use reading_view::render_html;
pub use session::{EditSession, EditorMode, SessionState};
pub use suggesting::{intercept, EditOrigin, Interception};
pub use threads::{
    build_threads, filter_threads, find_anchor, find_thread_id_at, relative_time, CommentThread,
    ThreadFilter, ThreadKind,
};

// Re-export parser types for convenience
pub use critic_parser::{parse, AnnotationKind, AnnotationRange, Metadata, Status, TextEdit};

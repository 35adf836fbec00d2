//! # Suggesting-Mode Interceptor
//!
//! Pre-commit hook that turns raw user edits into tracked suggestions:
//!
//! ```text
//! insert "x"          →  {++<meta>@@x++}
//! delete "y"          →  {--<meta>@@y--}
//! replace "y" by "x"  →  {~~<meta>@@y~>x~~}
//! ```
//!
//! Typing inside your own addition, deleting inside it, or deleting from
//! inside your own deletion is left alone so consecutive keystrokes grow one
//! suggestion instead of stacking new ones.
//!
//! Incoming edits use pre-transaction coordinates, sorted and disjoint. The
//! rewritten batch is sequential: each edit already carries the shift caused
//! by the ones before it.

use crate::edits::{EditBatch, LABEL_SUGGEST};
use crate::mutations::MutationError;
use critic_parser::serializer::{addition_with, deletion_with, substitution_with};
use critic_parser::{content_offsets, AnnotationKind, AnnotationRange, Metadata, TextEdit};
use serde::{Deserialize, Serialize};

/// Where a text change came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOrigin {
    Input,
    Paste,
    Delete,
    Move,
    /// Not a user gesture; never intercepted
    Programmatic,
}

impl EditOrigin {
    pub fn is_user(self) -> bool {
        !matches!(self, EditOrigin::Programmatic)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Interception {
    /// Commit the original edits unchanged
    PassThrough,
    /// Commit this batch instead of the original edits
    Rewrite(EditBatch),
}

pub fn intercept(
    source: &str,
    ranges: &[AnnotationRange],
    edits: &[TextEdit],
    origin: EditOrigin,
    author: &str,
) -> Result<Interception, MutationError> {
    intercept_with(source, ranges, edits, origin, || Metadata::new(author))
}

/// [`intercept`] with a metadata source, one call per wrapped edit
///
/// Every wrapped edit is attributed to the author of the metadata `mint`
/// returns.
pub fn intercept_with(
    source: &str,
    ranges: &[AnnotationRange],
    edits: &[TextEdit],
    origin: EditOrigin,
    mut mint: impl FnMut() -> Metadata,
) -> Result<Interception, MutationError> {
    if !origin.is_user() || edits.is_empty() {
        return Ok(Interception::PassThrough);
    }

    let mut batch = EditBatch::new(LABEL_SUGGEST);
    let mut shift: isize = 0;

    for edit in edits {
        let deleted = source.get(edit.from..edit.to).ok_or(MutationError::InvalidSelection {
            from: edit.from,
            to: edit.to,
            len: source.len(),
        })?;
        let inserted = edit.insert.as_str();
        let has_insertion = !inserted.is_empty();
        let has_deletion = !deleted.is_empty();

        if !has_insertion && !has_deletion {
            continue;
        }

        let meta = mint();

        // One own-span hit releases the whole transaction, wrapped edits
        // before it included.
        if passes_through(ranges, edit, has_insertion, has_deletion, &meta.author) {
            tracing::trace!(from = edit.from, to = edit.to, "Edit extends own suggestion");
            return Ok(Interception::PassThrough);
        }

        let (wrapped, cursor_in_wrapped) = if has_insertion && has_deletion {
            let s = substitution_with(&meta, deleted, inserted)?;
            let cursor = s.len() - AnnotationKind::Substitution.close_delimiter().len();
            (s, cursor)
        } else if has_insertion {
            let s = addition_with(&meta, inserted)?;
            let cursor = s.len() - AnnotationKind::Addition.close_delimiter().len();
            (s, cursor)
        } else {
            let s = deletion_with(&meta, deleted)?;
            let cursor = s.len();
            (s, cursor)
        };

        let from = shifted(edit.from, shift);
        let to = shifted(edit.to, shift);
        shift += wrapped.len() as isize - (edit.to - edit.from) as isize;

        batch.selection = Some(from + cursor_in_wrapped);
        batch.push(TextEdit::new(from, to, wrapped));
    }

    if batch.is_empty() {
        return Ok(Interception::PassThrough);
    }

    tracing::debug!(edits = batch.len(), "Wrapped edits as suggestions");
    Ok(Interception::Rewrite(batch))
}

fn shifted(pos: usize, shift: isize) -> usize {
    pos.saturating_add_signed(shift)
}

fn passes_through(
    ranges: &[AnnotationRange],
    edit: &TextEdit,
    has_insertion: bool,
    has_deletion: bool,
    author: &str,
) -> bool {
    if has_insertion && !has_deletion {
        return own_span_at(ranges, AnnotationKind::Addition, edit.from, author).is_some();
    }

    if has_deletion && !has_insertion {
        if let Some((start, end)) = own_span_at(ranges, AnnotationKind::Addition, edit.from, author) {
            if edit.from >= start && edit.to <= end {
                return true;
            }
        }
        return own_span_at(ranges, AnnotationKind::Deletion, edit.from, author).is_some();
    }

    false
}

/// Content span of the first `kind` range by `author` containing `pos`,
/// edges included
fn own_span_at(
    ranges: &[AnnotationRange],
    kind: AnnotationKind,
    pos: usize,
    author: &str,
) -> Option<(usize, usize)> {
    ranges
        .iter()
        .filter(|r| r.kind == kind && r.author() == Some(author))
        .map(content_offsets)
        .find(|o| o.contains(pos))
        .map(|o| (o.start(), o.end()))
}

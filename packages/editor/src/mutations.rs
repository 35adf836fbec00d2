//! # Annotation Mutations
//!
//! Semantic operations on review markup. Every operation reads one snapshot of
//! the parsed ranges and returns one [`EditBatch`]; nothing here touches the
//! document text directly.
//!
//! ## Semantics
//!
//! ### Suggestions
//! - proposed → accepted | rejected, both terminal
//! - The whole markup span is replaced by the winning text
//!
//! ### Threads
//! - open ⇄ resolved, reversible
//! - Only the metadata envelope is rewritten, never the visible text
//!
//! ### Bulk operations
//! - Edits are emitted highest offset first
//! - A range overlapping an earlier one is skipped; the outer span wins
//!
//! Operations are fail-closed: a lookup that misses returns an error and no
//! edits.

use crate::edits::{
    EditBatch, LABEL_ACCEPT, LABEL_ACCEPT_ALL, LABEL_COMMENT, LABEL_COMMENT_CANCEL,
    LABEL_COMMENT_REPLY, LABEL_COMMENT_SAVE, LABEL_REJECT, LABEL_REJECT_ALL, LABEL_REOPEN,
    LABEL_RESOLVE, LABEL_RESOLVE_ALL, LABEL_STRIP_ACCEPT, LABEL_STRIP_REJECT,
};
use crate::threads::find_anchor;
use critic_parser::serializer::comment_with;
use critic_parser::{
    content_offsets, create_highlight, update_metadata_in_range, AnnotationKind, AnnotationRange,
    Metadata, MetadataError, Status, TextEdit,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripMode {
    #[default]
    Accept,
    Reject,
}

impl std::str::FromStr for StripMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(StripMode::Accept),
            "reject" => Ok(StripMode::Reject),
            other => Err(format!("unknown strip mode '{}': use accept or reject", other)),
        }
    }
}

/// How a single-suggestion operation finds its range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionTarget {
    Id(String),
    /// Cursor position; the first suggestion whose span touches it
    At(usize),
}

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    AcceptSuggestion { target: SuggestionTarget },
    RejectSuggestion { target: SuggestionTarget },
    AcceptAll,
    RejectAll,
    ResolveComment { id: String },
    ReopenComment { id: String },
    ResolveAll,
    /// Wrap `[from, to)` in a highlight plus an empty comment, or insert a bare
    /// comment when the selection is empty
    AddComment { from: usize, to: usize },
    SaveCommentText { id: String, text: String },
    CancelEmptyComment { id: String },
    AddReply { parent_id: String, text: String },
    StripAll { mode: StripMode },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("No annotation with id {0}")]
    RangeNotFound(String),

    #[error("No thread with id {0}")]
    ThreadNotFound(String),

    #[error("{0} is not a suggestion")]
    NotASuggestion(AnnotationKind),

    #[error("Annotation has no metadata")]
    MissingMetadata,

    #[error("No suggestion at position {0}")]
    NoSuggestionAtPosition(usize),

    #[error("Selection {from}..{to} is not valid for a document of length {len}")]
    InvalidSelection { from: usize, to: usize, len: usize },

    #[error("Metadata error: {0}")]
    Metadata(String),
}

impl From<MetadataError> for MutationError {
    fn from(e: MetadataError) -> Self {
        match e {
            MetadataError::MissingSeparator { .. } | MetadataError::MissingMetadata { .. } => {
                MutationError::MissingMetadata
            }
            MetadataError::Json(e) => MutationError::Metadata(e.to_string()),
        }
    }
}

/// One consistent snapshot the mutation is planned against
#[derive(Debug, Clone, Copy)]
pub struct MutationContext<'a> {
    pub source: &'a str,
    pub ranges: &'a [AnnotationRange],
    pub author: &'a str,
}

/// Planned edits plus the id of any annotation the mutation created
#[derive(Debug, Clone, PartialEq)]
pub struct MutationPlan {
    pub batch: EditBatch,
    pub created_id: Option<String>,
}

impl From<EditBatch> for MutationPlan {
    fn from(batch: EditBatch) -> Self {
        Self {
            batch,
            created_id: None,
        }
    }
}

impl Mutation {
    /// Plan the mutation against `ctx` without applying it
    pub fn plan(&self, ctx: &MutationContext<'_>) -> Result<MutationPlan, MutationError> {
        let ranges = ctx.ranges;

        let plan: MutationPlan = match self {
            Mutation::AcceptSuggestion { target } => {
                accept_suggestion(resolve_target(ranges, target)?)?.into()
            }
            Mutation::RejectSuggestion { target } => {
                reject_suggestion(resolve_target(ranges, target)?)?.into()
            }
            Mutation::AcceptAll => accept_all(ranges).into(),
            Mutation::RejectAll => reject_all(ranges).into(),
            Mutation::ResolveComment { id } => resolve_comment(ranges, id)?.into(),
            Mutation::ReopenComment { id } => reopen_comment(ranges, id)?.into(),
            Mutation::ResolveAll => resolve_all_comments(ranges)?.into(),
            Mutation::AddComment { from, to } => {
                let (batch, id) = add_comment(ctx.source, *from, *to, ctx.author)?;
                MutationPlan {
                    batch,
                    created_id: Some(id),
                }
            }
            Mutation::SaveCommentText { id, text } => save_comment_text(ranges, id, text)?.into(),
            Mutation::CancelEmptyComment { id } => cancel_empty_comment(ranges, id)?.into(),
            Mutation::AddReply { parent_id, text } => {
                let (batch, id) = add_reply(ranges, parent_id, text, ctx.author)?;
                MutationPlan {
                    batch,
                    created_id: Some(id),
                }
            }
            Mutation::StripAll { mode } => strip_all_markup(ranges, *mode).into(),
        };

        tracing::debug!(
            label = %plan.batch.label,
            edits = plan.batch.len(),
            "Planned mutation"
        );
        Ok(plan)
    }
}

fn resolve_target<'a>(
    ranges: &'a [AnnotationRange],
    target: &SuggestionTarget,
) -> Result<&'a AnnotationRange, MutationError> {
    match target {
        SuggestionTarget::Id(id) => ranges
            .iter()
            .find(|r| r.is_suggestion() && r.id() == Some(id.as_str()))
            .ok_or_else(|| MutationError::RangeNotFound(id.clone())),
        SuggestionTarget::At(pos) => {
            find_suggestion_at(ranges, *pos).ok_or(MutationError::NoSuggestionAtPosition(*pos))
        }
    }
}

/// First suggestion whose `[from, to]` contains `pos`
pub fn find_suggestion_at(ranges: &[AnnotationRange], pos: usize) -> Option<&AnnotationRange> {
    ranges.iter().find(|r| r.is_suggestion() && r.touches(pos))
}

/// First range carrying metadata id `id`
pub fn find_by_id<'a>(ranges: &'a [AnnotationRange], id: &str) -> Option<&'a AnnotationRange> {
    ranges.iter().find(|r| r.id() == Some(id))
}

/// Text a suggestion leaves behind once accepted or rejected
fn resolved_text(range: &AnnotationRange, accept: bool) -> Result<String, MutationError> {
    let text = match (range.kind, accept) {
        (AnnotationKind::Addition, true) | (AnnotationKind::Deletion, false) => range.content.clone(),
        (AnnotationKind::Addition, false) | (AnnotationKind::Deletion, true) => String::new(),
        (AnnotationKind::Substitution, true) => range.new_content.clone().unwrap_or_default(),
        (AnnotationKind::Substitution, false) => range.old_content.clone().unwrap_or_default(),
        (kind, _) => return Err(MutationError::NotASuggestion(kind)),
    };
    Ok(text)
}

pub fn accept_suggestion(range: &AnnotationRange) -> Result<EditBatch, MutationError> {
    let text = resolved_text(range, true)?;
    Ok(EditBatch::single(LABEL_ACCEPT, TextEdit::new(range.from, range.to, text)))
}

pub fn reject_suggestion(range: &AnnotationRange) -> Result<EditBatch, MutationError> {
    let text = resolved_text(range, false)?;
    Ok(EditBatch::single(LABEL_REJECT, TextEdit::new(range.from, range.to, text)))
}

pub fn accept_all(ranges: &[AnnotationRange]) -> EditBatch {
    bulk_resolve(ranges, true, LABEL_ACCEPT_ALL)
}

pub fn reject_all(ranges: &[AnnotationRange]) -> EditBatch {
    bulk_resolve(ranges, false, LABEL_REJECT_ALL)
}

fn bulk_resolve(ranges: &[AnnotationRange], accept: bool, label: &str) -> EditBatch {
    let suggestions: Vec<&AnnotationRange> = ranges.iter().filter(|r| r.is_suggestion()).collect();

    let mut batch = EditBatch::new(label);
    for range in descending(outermost(suggestions)) {
        // Suggestions only, so resolved_text cannot fail here
        if let Ok(text) = resolved_text(range, accept) {
            batch.push(TextEdit::new(range.from, range.to, text));
        }
    }
    batch
}

/// Drop ranges that start inside an earlier kept range
///
/// Input order does not matter; the result is in ascending `from` order with
/// the widest range kept at each start.
fn outermost(mut ranges: Vec<&AnnotationRange>) -> Vec<&AnnotationRange> {
    ranges.sort_by(|a, b| a.from.cmp(&b.from).then(b.to.cmp(&a.to)));

    let mut kept: Vec<&AnnotationRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match kept.last() {
            Some(last) if range.from < last.to => {
                tracing::warn!(
                    kind = %range.kind,
                    from = range.from,
                    "Skipping range overlapping {}..{}",
                    last.from,
                    last.to
                );
            }
            _ => kept.push(range),
        }
    }
    kept
}

fn descending(mut ranges: Vec<&AnnotationRange>) -> Vec<&AnnotationRange> {
    ranges.sort_by(|a, b| b.from.cmp(&a.from));
    ranges
}

/// Root comment or suggestion carrying `id`; replies are never resolved alone
fn find_thread_root<'a>(
    ranges: &'a [AnnotationRange],
    id: &str,
) -> Option<&'a AnnotationRange> {
    ranges
        .iter()
        .find(|r| r.id() == Some(id) && (r.is_root_comment() || r.is_suggestion()))
}

pub fn resolve_comment(ranges: &[AnnotationRange], id: &str) -> Result<EditBatch, MutationError> {
    set_status(ranges, id, Status::Resolved, LABEL_RESOLVE)
}

pub fn reopen_comment(ranges: &[AnnotationRange], id: &str) -> Result<EditBatch, MutationError> {
    set_status(ranges, id, Status::Open, LABEL_REOPEN)
}

fn set_status(
    ranges: &[AnnotationRange],
    id: &str,
    status: Status,
    label: &str,
) -> Result<EditBatch, MutationError> {
    let range = find_thread_root(ranges, id).ok_or_else(|| MutationError::RangeNotFound(id.to_string()))?;
    let edit = update_metadata_in_range(range, |meta| meta.status = Some(status))?;
    Ok(EditBatch::single(label, edit))
}

/// Resolve every open root comment in one batch
pub fn resolve_all_comments(ranges: &[AnnotationRange]) -> Result<EditBatch, MutationError> {
    let open: Vec<&AnnotationRange> = ranges
        .iter()
        .filter(|r| r.is_root_comment() && r.status() == Status::Open)
        .collect();

    let mut batch = EditBatch::new(LABEL_RESOLVE_ALL);
    for range in descending(outermost(open)) {
        batch.push(update_metadata_in_range(range, |meta| {
            meta.status = Some(Status::Resolved)
        })?);
    }
    Ok(batch)
}

/// Returns the batch and the new comment's id
pub fn add_comment(
    source: &str,
    from: usize,
    to: usize,
    author: &str,
) -> Result<(EditBatch, String), MutationError> {
    add_comment_with(source, from, to, Metadata::new(author))
}

/// [`add_comment`] with caller-supplied metadata
///
/// The cursor lands inside the new comment, ready for typing.
pub fn add_comment_with(
    source: &str,
    from: usize,
    to: usize,
    meta: Metadata,
) -> Result<(EditBatch, String), MutationError> {
    let selected = source
        .get(from..to)
        .ok_or(MutationError::InvalidSelection {
            from,
            to,
            len: source.len(),
        })?;

    let comment = comment_with(&meta, "")?;
    let close_len = AnnotationKind::Comment.close_delimiter().len();

    let insert = if selected.is_empty() {
        comment
    } else {
        format!("{}{}", create_highlight(selected), comment)
    };
    let cursor = from + insert.len() - close_len;

    let batch = EditBatch::single(LABEL_COMMENT, TextEdit::new(from, to, insert)).with_selection(cursor);
    Ok((batch, meta.id))
}

fn find_comment<'a>(ranges: &'a [AnnotationRange], id: &str) -> Result<&'a AnnotationRange, MutationError> {
    ranges
        .iter()
        .find(|r| r.kind == AnnotationKind::Comment && r.id() == Some(id))
        .ok_or_else(|| MutationError::RangeNotFound(id.to_string()))
}

/// Replace a comment's visible text, keeping its envelope
pub fn save_comment_text(
    ranges: &[AnnotationRange],
    id: &str,
    text: &str,
) -> Result<EditBatch, MutationError> {
    let comment = find_comment(ranges, id)?;
    let offsets = content_offsets(comment);
    let batch = EditBatch::single(
        LABEL_COMMENT_SAVE,
        TextEdit::new(offsets.start(), offsets.end(), text),
    )
    .with_selection(offsets.start() + text.len());
    Ok(batch)
}

/// Remove a comment and un-highlight its anchor
///
/// The comment's text is not checked; callers decide when it counts as empty.
pub fn cancel_empty_comment(ranges: &[AnnotationRange], id: &str) -> Result<EditBatch, MutationError> {
    let comment = find_comment(ranges, id)?;

    let edit = match find_anchor(ranges, comment) {
        Some(anchor) => TextEdit::new(anchor.from, comment.to, anchor.content.clone()),
        None => TextEdit::delete(comment.from, comment.to),
    };
    let cursor = edit.from + edit.insert.len();
    Ok(EditBatch::single(LABEL_COMMENT_CANCEL, edit).with_selection(cursor))
}

/// Returns the batch and the new reply's id
pub fn add_reply(
    ranges: &[AnnotationRange],
    parent_id: &str,
    text: &str,
    author: &str,
) -> Result<(EditBatch, String), MutationError> {
    add_reply_with(ranges, parent_id, text, Metadata::new(author))
}

/// Insert a reply right after the thread's last range
///
/// `meta.reply_to` is overwritten with `parent_id`.
pub fn add_reply_with(
    ranges: &[AnnotationRange],
    parent_id: &str,
    text: &str,
    meta: Metadata,
) -> Result<(EditBatch, String), MutationError> {
    if find_thread_root(ranges, parent_id).is_none() {
        return Err(MutationError::ThreadNotFound(parent_id.to_string()));
    }

    let insert_at = ranges
        .iter()
        .filter(|r| r.id() == Some(parent_id) || r.reply_to() == Some(parent_id))
        .map(|r| r.to)
        .max()
        .ok_or_else(|| MutationError::ThreadNotFound(parent_id.to_string()))?;

    let meta = meta.reply_to(parent_id);
    let reply = comment_with(&meta, text)?;
    let cursor = insert_at + reply.len();

    let batch = EditBatch::single(LABEL_COMMENT_REPLY, TextEdit::insert(insert_at, reply))
        .with_selection(cursor);
    Ok((batch, meta.id))
}

/// Resolve every range to plain text
///
/// Suggestions follow `mode`; highlights keep their text and comments vanish
/// either way.
pub fn strip_all_markup(ranges: &[AnnotationRange], mode: StripMode) -> EditBatch {
    let accept = mode == StripMode::Accept;
    let label = if accept { LABEL_STRIP_ACCEPT } else { LABEL_STRIP_REJECT };

    let mut batch = EditBatch::new(label);
    for range in descending(outermost(ranges.iter().collect())) {
        let text = match range.kind {
            AnnotationKind::Highlight => range.content.clone(),
            AnnotationKind::Comment => String::new(),
            _ => match resolved_text(range, accept) {
                Ok(text) => text,
                Err(_) => continue,
            },
        };
        batch.push(TextEdit::new(range.from, range.to, text));
    }
    batch
}

//! # Decoration Projector
//!
//! Maps `(ranges, mode, focused thread)` to abstract rendering instructions.
//! A host adapter turns them into real widgets and styles.
//!
//! - **Viewing** renders the original text: additions and comments vanish,
//!   deletions and substitutions show the pre-edit text, highlights lose their
//!   markers. Overlapping instructions are merged, the one reaching further wins.
//! - **Editing / Suggesting** keep the markup in place, hide delimiters and
//!   envelopes, and style only the visible content.
//!
//! The projector never fails outward. Bad offsets yield an empty set.

use crate::session::{EditorMode, SessionState};
use crate::threads::anchor_pairs;
use critic_parser::{
    content_offsets, prefix_region, suffix_region, AnnotationKind, AnnotationRange,
    ContentOffsets, Status,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkStyle {
    Addition,
    AdditionFocused,
    Deletion,
    DeletionFocused,
    Highlight,
    HighlightFocused,
    HighlightResolved,
}

impl MarkStyle {
    /// CSS class list a DOM host would use
    pub fn class_name(self) -> &'static str {
        match self {
            MarkStyle::Addition => "critic-addition",
            MarkStyle::AdditionFocused => "critic-addition critic-suggestion-focused",
            MarkStyle::Deletion => "critic-deletion",
            MarkStyle::DeletionFocused => "critic-deletion critic-suggestion-focused",
            MarkStyle::Highlight => "critic-highlight",
            MarkStyle::HighlightFocused => "critic-highlight-focused",
            MarkStyle::HighlightResolved => "critic-highlight-resolved",
        }
    }

    fn focused(self, focused: bool) -> Self {
        match (self, focused) {
            (MarkStyle::Addition, true) => MarkStyle::AdditionFocused,
            (MarkStyle::Deletion, true) => MarkStyle::DeletionFocused,
            (style, _) => style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Decoration {
    /// Remove `[from, to)` from view
    Hide { from: usize, to: usize },
    /// Show `text` instead of `[from, to)`
    Replace { from: usize, to: usize, text: String },
    /// Style `[from, to)`
    Mark { from: usize, to: usize, style: MarkStyle },
    /// Zero-width comment indicator; activating it focuses `thread_id`
    Indicator { at: usize, thread_id: String, resolved: bool },
}

impl Decoration {
    pub fn from(&self) -> usize {
        match *self {
            Decoration::Hide { from, .. }
            | Decoration::Replace { from, .. }
            | Decoration::Mark { from, .. } => from,
            Decoration::Indicator { at, .. } => at,
        }
    }

    pub fn to(&self) -> usize {
        match *self {
            Decoration::Hide { to, .. }
            | Decoration::Replace { to, .. }
            | Decoration::Mark { to, .. } => to,
            Decoration::Indicator { at, .. } => at,
        }
    }

    fn set_to(&mut self, new_to: usize) {
        match self {
            Decoration::Hide { to, .. }
            | Decoration::Replace { to, .. }
            | Decoration::Mark { to, .. } => *to = new_to,
            Decoration::Indicator { .. } => {}
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecorationError {
    #[error("{kind} at {from}..{to} has content offsets {start}..{end} outside its span")]
    OffsetOutOfRange {
        kind: AnnotationKind,
        from: usize,
        to: usize,
        start: usize,
        end: usize,
    },
}

/// Decorations for the session's current mode. Never fails.
pub fn decorate(ranges: &[AnnotationRange], state: &SessionState) -> Vec<Decoration> {
    let result = match state.mode {
        EditorMode::Viewing => Ok(build_viewing_decorations(ranges)),
        EditorMode::Editing | EditorMode::Suggesting => {
            build_editing_decorations(ranges, state.focused_thread_id.as_deref())
        }
    };

    match result {
        Ok(decorations) => decorations,
        Err(e) => {
            tracing::error!(error = %e, mode = ?state.mode, "Decoration failed, rendering without decorations");
            Vec::new()
        }
    }
}

pub fn build_viewing_decorations(ranges: &[AnnotationRange]) -> Vec<Decoration> {
    let mut decs: Vec<Decoration> = ranges
        .iter()
        .map(|r| {
            let (from, to) = (r.from, r.to);
            match r.kind {
                AnnotationKind::Addition | AnnotationKind::Comment => Decoration::Hide { from, to },
                AnnotationKind::Deletion | AnnotationKind::Highlight => Decoration::Replace {
                    from,
                    to,
                    text: r.content.clone(),
                },
                AnnotationKind::Substitution => Decoration::Replace {
                    from,
                    to,
                    text: r.old_content.clone().unwrap_or_default(),
                },
            }
        })
        .collect();

    decs.sort_by_key(|d| (d.from(), d.to()));

    let mut merged: Vec<Decoration> = Vec::with_capacity(decs.len());
    for d in decs {
        match merged.last_mut() {
            Some(last) if d.from() < last.to() => {
                // Overlap: the instruction reaching further takes over, keeping
                // the earlier start
                if d.to() > last.to() {
                    let from = last.from();
                    *last = d;
                    set_from(last, from);
                }
            }
            _ => merged.push(d),
        }
    }
    merged
}

fn set_from(d: &mut Decoration, new_from: usize) {
    match d {
        Decoration::Hide { from, .. }
        | Decoration::Replace { from, .. }
        | Decoration::Mark { from, .. } => *from = new_from,
        Decoration::Indicator { at, .. } => *at = new_from,
    }
}

/// Inline projection for Editing and Suggesting
///
/// Overlapping ranges are projected independently; no overlap resolution
/// happens here.
pub fn build_editing_decorations(
    ranges: &[AnnotationRange],
    focused_id: Option<&str>,
) -> Result<Vec<Decoration>, DecorationError> {
    let mut decs = Vec::new();

    // highlight index -> anchored root comment index
    let anchors: HashMap<usize, usize> = anchor_pairs(ranges).into_iter().collect();
    let anchored_comments: std::collections::HashSet<usize> = anchors.values().copied().collect();

    for (i, range) in ranges.iter().enumerate() {
        let is_focused = range.id().is_some() && range.id() == focused_id;

        match range.kind {
            AnnotationKind::Addition | AnnotationKind::Deletion => {
                let (start, end) = checked_content(range)?;
                let base = if range.kind == AnnotationKind::Addition {
                    MarkStyle::Addition
                } else {
                    MarkStyle::Deletion
                };
                mark_content(&mut decs, range, start, end, base.focused(is_focused));
            }

            AnnotationKind::Substitution => {
                let (old_start, old_end, arrow_end, new_start, new_end) =
                    match content_offsets(range) {
                        ContentOffsets::Substitution {
                            old_start,
                            old_end,
                            arrow_end,
                            new_start,
                            new_end,
                        } => (old_start, old_end, arrow_end, new_start, new_end),
                        ContentOffsets::Content { .. } => continue,
                    };
                check_span(range, old_start, new_end)?;
                hide(&mut decs, range.from, old_start);
                mark(&mut decs, old_start, old_end, MarkStyle::Deletion.focused(is_focused));
                hide(&mut decs, old_end, arrow_end);
                mark(&mut decs, new_start, new_end, MarkStyle::Addition.focused(is_focused));
                hide(&mut decs, new_end, range.to);
            }

            AnnotationKind::Highlight => {
                let (start, end) = checked_content(range)?;
                let style = match anchors.get(&i).map(|&ci| &ranges[ci]) {
                    Some(comment) if comment.id().is_some() && comment.id() == focused_id => {
                        MarkStyle::HighlightFocused
                    }
                    Some(comment) if comment.status() == Status::Resolved => {
                        MarkStyle::HighlightResolved
                    }
                    _ => MarkStyle::Highlight,
                };
                mark_content(&mut decs, range, start, end, style);
            }

            AnnotationKind::Comment => {
                if range.is_root_comment() && !anchored_comments.contains(&i) {
                    if let Some(id) = range.id() {
                        decs.push(Decoration::Indicator {
                            at: range.from,
                            thread_id: id.to_string(),
                            resolved: range.status() == Status::Resolved,
                        });
                    }
                }
                hide(&mut decs, range.from, range.to);
            }
        }
    }

    Ok(decs)
}

fn checked_content(range: &AnnotationRange) -> Result<(usize, usize), DecorationError> {
    let offsets = content_offsets(range);
    check_span(range, offsets.start(), offsets.end())?;
    Ok((offsets.start(), offsets.end()))
}

fn check_span(range: &AnnotationRange, start: usize, end: usize) -> Result<(), DecorationError> {
    if start < range.from || end > range.to || start > end {
        return Err(DecorationError::OffsetOutOfRange {
            kind: range.kind,
            from: range.from,
            to: range.to,
            start,
            end,
        });
    }
    Ok(())
}

/// Hide both delimiters (and the envelope) around a styled content span
fn mark_content(
    out: &mut Vec<Decoration>,
    range: &AnnotationRange,
    start: usize,
    end: usize,
    style: MarkStyle,
) {
    let (open_from, open_to) = prefix_region(range);
    hide(out, open_from, open_to);
    mark(out, start, end, style);
    let (close_from, close_to) = suffix_region(range);
    hide(out, close_from, close_to);
}

fn hide(out: &mut Vec<Decoration>, from: usize, to: usize) {
    if from < to {
        out.push(Decoration::Hide { from, to });
    }
}

fn mark(out: &mut Vec<Decoration>, from: usize, to: usize, style: MarkStyle) {
    if from < to {
        out.push(Decoration::Mark { from, to, style });
    }
}

/// Render text through viewing decorations (hide and replace only)
///
/// Expects the merged, non-overlapping output of
/// [`build_viewing_decorations`]; anything out of order or out of bounds is
/// skipped.
pub fn render_viewing(text: &str, decorations: &[Decoration]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for d in decorations {
        let (from, to) = (d.from(), d.to());
        if from < last || text.get(last..from).is_none() || text.get(from..to).is_none() {
            continue;
        }
        match d {
            Decoration::Hide { .. } => {}
            Decoration::Replace { text: replacement, .. } => {
                out.push_str(&text[last..from]);
                out.push_str(replacement);
                last = to;
                continue;
            }
            Decoration::Mark { .. } | Decoration::Indicator { .. } => continue,
        }
        out.push_str(&text[last..from]);
        last = to;
    }

    out.push_str(&text[last..]);
    out
}

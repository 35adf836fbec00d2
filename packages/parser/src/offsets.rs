//! Absolute offsets of the parts inside a parsed range.
//!
//! Computed fresh for every use: a range's offsets are only valid against the
//! text it was parsed from.

use crate::ast::{AnnotationKind, AnnotationRange};

/// Length of `~>`
pub const ARROW_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOffsets {
    /// Addition, deletion, comment, highlight
    Content {
        content_start: usize,
        content_end: usize,
    },
    Substitution {
        old_start: usize,
        old_end: usize,
        arrow_end: usize,
        new_start: usize,
        new_end: usize,
    },
}

impl ContentOffsets {
    /// Start of the first visible character
    pub fn start(&self) -> usize {
        match *self {
            ContentOffsets::Content { content_start, .. } => content_start,
            ContentOffsets::Substitution { old_start, .. } => old_start,
        }
    }

    /// End of the last visible character
    pub fn end(&self) -> usize {
        match *self {
            ContentOffsets::Content { content_end, .. } => content_end,
            ContentOffsets::Substitution { new_end, .. } => new_end,
        }
    }

    /// Whether `pos` lies in the visible content, edges included
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start() && pos <= self.end()
    }
}

/// Byte length of the accepted `JSON@@` envelope, 0 when metadata did not decode
fn envelope_len(range: &AnnotationRange) -> usize {
    if range.metadata.is_none() {
        return 0;
    }
    let visible = match range.kind {
        AnnotationKind::Substitution => range.old_content.as_deref().unwrap_or_default(),
        _ => range.content.as_str(),
    };
    range.raw_content.len().saturating_sub(visible.len())
}

pub fn content_offsets(range: &AnnotationRange) -> ContentOffsets {
    let start = range.from + range.kind.open_delimiter().len() + envelope_len(range);

    if range.kind == AnnotationKind::Substitution {
        let old_len = range.old_content.as_deref().map(str::len).unwrap_or(0);
        let new_len = range.new_content.as_deref().map(str::len).unwrap_or(0);
        let old_end = start + old_len;
        let arrow_end = old_end + ARROW_LEN;
        return ContentOffsets::Substitution {
            old_start: start,
            old_end,
            arrow_end,
            new_start: arrow_end,
            new_end: arrow_end + new_len,
        };
    }

    ContentOffsets::Content {
        content_start: start,
        content_end: start + range.content.len(),
    }
}

/// `[from, to)` of the opening delimiter plus metadata prefix
pub fn prefix_region(range: &AnnotationRange) -> (usize, usize) {
    (range.from, content_offsets(range).start())
}

/// `[from, to)` of the closing delimiter
pub fn suffix_region(range: &AnnotationRange) -> (usize, usize) {
    (content_offsets(range).end(), range.to)
}

/// `[from, to)` of just the `JSON@@` envelope, if the range has one
pub fn metadata_region(range: &AnnotationRange) -> Option<(usize, usize)> {
    let len = envelope_len(range);
    if len == 0 {
        return None;
    }
    let start = range.from + range.kind.open_delimiter().len();
    Some((start, start + len))
}

//! Per-line gutter markers.
//!
//! One marker per line at most: a root comment (placed at its anchor when it
//! has one) beats any suggestion on the same line.

use crate::session::EditorMode;
use crate::threads::anchor_pairs;
use critic_parser::{AnnotationRange, Status};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GutterKind {
    Comment { id: String, resolved: bool },
    Suggestion { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GutterMarker {
    /// Byte offset of the start of the marked line
    pub line_start: usize,
    pub kind: GutterKind,
}

impl GutterMarker {
    /// Thread focused when the marker is activated
    pub fn thread_id(&self) -> &str {
        match &self.kind {
            GutterKind::Comment { id, .. } | GutterKind::Suggestion { id } => id,
        }
    }
}

/// Byte offset of the start of the line containing `pos`
pub fn line_start(text: &str, pos: usize) -> usize {
    let pos = pos.min(text.len());
    text.as_bytes()[..pos]
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|i| i + 1)
        .unwrap_or(0)
}

/// Markers sorted by line
pub fn build_gutter_markers(
    text: &str,
    ranges: &[AnnotationRange],
    mode: EditorMode,
) -> Vec<GutterMarker> {
    if mode == EditorMode::Viewing {
        return Vec::new();
    }

    // root comment index -> anchor start
    let anchor_start: HashMap<usize, usize> = anchor_pairs(ranges)
        .into_iter()
        .map(|(hi, ci)| (ci, ranges[hi].from))
        .collect();

    let mut lines: BTreeMap<usize, GutterKind> = BTreeMap::new();

    for (i, r) in ranges.iter().enumerate() {
        if !r.is_root_comment() {
            continue;
        }
        let Some(id) = r.id() else { continue };
        let pos = anchor_start.get(&i).copied().unwrap_or(r.from);
        lines.insert(
            line_start(text, pos),
            GutterKind::Comment {
                id: id.to_string(),
                resolved: r.status() == Status::Resolved,
            },
        );
    }

    for r in ranges.iter().filter(|r| r.is_suggestion()) {
        let Some(id) = r.id() else { continue };
        lines
            .entry(line_start(text, r.from))
            .or_insert_with(|| GutterKind::Suggestion { id: id.to_string() });
    }

    lines
        .into_iter()
        .map(|(line_start, kind)| GutterMarker { line_start, kind })
        .collect()
}

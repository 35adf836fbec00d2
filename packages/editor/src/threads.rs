//! # Thread Builder
//!
//! Groups the flat range list into comment and suggestion threads.
//!
//! - A root comment is a comment with metadata and no `replyTo`.
//! - A root suggestion is an addition, deletion or substitution with metadata.
//! - A reply is a comment whose `replyTo` names a root id.
//! - An anchor is a highlight whose `to` equals a root comment's `from`.
//!
//! Threads are derived data: rebuild them whenever the ranges change.

use critic_parser::{AnnotationKind, AnnotationRange, Status};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadKind {
    Comment,
    Suggestion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentThread {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<AnnotationRange>,
    pub root: AnnotationRange,
    /// Oldest first
    pub replies: Vec<AnnotationRange>,
    pub kind: ThreadKind,
    pub status: Status,
}

impl CommentThread {
    /// Document position the thread is listed at
    pub fn position(&self) -> usize {
        self.anchor.as_ref().map(|a| a.from).unwrap_or(self.root.from)
    }

    pub fn is_resolved(&self) -> bool {
        self.status == Status::Resolved
    }
}

/// Highlight anchoring `comment`, if any
///
/// Adjacency only: the highlight must end exactly where the comment starts.
pub fn find_anchor<'a>(
    ranges: &'a [AnnotationRange],
    comment: &AnnotationRange,
) -> Option<&'a AnnotationRange> {
    if !comment.is_root_comment() {
        return None;
    }
    ranges
        .iter()
        .find(|h| h.kind == AnnotationKind::Highlight && h.to == comment.from)
}

/// Index pairs `(highlight, root comment)` for every anchored comment
pub fn anchor_pairs(ranges: &[AnnotationRange]) -> Vec<(usize, usize)> {
    let mut highlight_by_end: HashMap<usize, usize> = HashMap::new();
    for (i, r) in ranges.iter().enumerate() {
        if r.kind == AnnotationKind::Highlight {
            highlight_by_end.entry(r.to).or_insert(i);
        }
    }

    ranges
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_root_comment())
        .filter_map(|(ci, c)| highlight_by_end.get(&c.from).map(|&hi| (hi, ci)))
        .collect()
}

pub fn build_threads(ranges: &[AnnotationRange]) -> Vec<CommentThread> {
    let mut replies_by_parent: HashMap<&str, Vec<&AnnotationRange>> = HashMap::new();
    for r in ranges.iter().filter(|r| r.is_reply()) {
        if let Some(parent) = r.reply_to() {
            replies_by_parent.entry(parent).or_default().push(r);
        }
    }
    for replies in replies_by_parent.values_mut() {
        replies.sort_by_key(|r| r.time());
    }

    let replies_for = |id: &str| -> Vec<AnnotationRange> {
        replies_by_parent
            .get(id)
            .map(|rs| rs.iter().map(|r| (*r).clone()).collect())
            .unwrap_or_default()
    };

    let mut threads = Vec::new();

    for root in ranges.iter().filter(|r| r.is_root_comment()) {
        let Some(id) = root.id() else { continue };
        threads.push(CommentThread {
            id: id.to_string(),
            anchor: find_anchor(ranges, root).cloned(),
            root: root.clone(),
            replies: replies_for(id),
            kind: ThreadKind::Comment,
            status: root.status(),
        });
    }

    for root in ranges.iter().filter(|r| r.is_suggestion()) {
        let Some(id) = root.id() else { continue };
        threads.push(CommentThread {
            id: id.to_string(),
            anchor: None,
            root: root.clone(),
            replies: replies_for(id),
            kind: ThreadKind::Suggestion,
            status: root.status(),
        });
    }

    threads.sort_by_key(CommentThread::position);
    threads
}

/// Id of the thread under `pos`: an anchor highlight followed by its root
/// comment, or a suggestion with metadata
pub fn find_thread_id_at(ranges: &[AnnotationRange], pos: usize) -> Option<&str> {
    for (i, r) in ranges.iter().enumerate() {
        if r.kind == AnnotationKind::Highlight && r.touches(pos) {
            if let Some(next) = ranges.get(i + 1) {
                if next.from == r.to && next.is_root_comment() {
                    return next.id();
                }
            }
        }
        if r.is_suggestion() && r.touches(pos) {
            if let Some(id) = r.id() {
                return Some(id);
            }
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadFilter {
    #[default]
    All,
    Open,
    Resolved,
}

impl std::str::FromStr for ThreadFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ThreadFilter::All),
            "open" => Ok(ThreadFilter::Open),
            "resolved" => Ok(ThreadFilter::Resolved),
            other => Err(format!("unknown filter '{}': use all, open or resolved", other)),
        }
    }
}

/// Filter threads by status and a case-insensitive search query
pub fn filter_threads<'a>(
    threads: &'a [CommentThread],
    filter: ThreadFilter,
    query: &str,
) -> Vec<&'a CommentThread> {
    let q = query.trim().to_lowercase();

    threads
        .iter()
        .filter(|t| match filter {
            ThreadFilter::All => true,
            ThreadFilter::Open => t.status == Status::Open,
            ThreadFilter::Resolved => t.status == Status::Resolved,
        })
        .filter(|t| q.is_empty() || thread_matches(t, &q))
        .collect()
}

fn thread_matches(thread: &CommentThread, q: &str) -> bool {
    let hit = |s: Option<&str>| s.is_some_and(|s| s.to_lowercase().contains(q));

    let root = &thread.root;
    hit(Some(root.content.as_str()))
        || hit(root.author())
        || hit(thread.anchor.as_ref().map(|a| a.content.as_str()))
        || hit(root.old_content.as_deref())
        || hit(root.new_content.as_deref())
        || thread
            .replies
            .iter()
            .any(|r| hit(Some(r.content.as_str())) || hit(r.author()))
}

/// Short human label for a unix timestamp relative to `now`
pub fn relative_time(timestamp: i64, now: i64) -> String {
    let diff = now - timestamp;
    if diff < 60 {
        return "just now".to_string();
    }
    if diff < 3_600 {
        return format!("{}m ago", diff / 60);
    }
    if diff < 86_400 {
        return format!("{}h ago", diff / 3_600);
    }
    if diff < 604_800 {
        return format!("{}d ago", diff / 86_400);
    }
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

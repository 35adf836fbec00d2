use serde::{Deserialize, Serialize};
use std::fmt;

/// The five markup forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Addition,
    Deletion,
    Substitution,
    Comment,
    Highlight,
}

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 5] = [
        AnnotationKind::Addition,
        AnnotationKind::Deletion,
        AnnotationKind::Substitution,
        AnnotationKind::Comment,
        AnnotationKind::Highlight,
    ];

    pub fn open_delimiter(self) -> &'static str {
        match self {
            AnnotationKind::Addition => "{++",
            AnnotationKind::Deletion => "{--",
            AnnotationKind::Substitution => "{~~",
            AnnotationKind::Comment => "{>>",
            AnnotationKind::Highlight => "{==",
        }
    }

    pub fn close_delimiter(self) -> &'static str {
        match self {
            AnnotationKind::Addition => "++}",
            AnnotationKind::Deletion => "--}",
            AnnotationKind::Substitution => "~~}",
            AnnotationKind::Comment => "<<}",
            AnnotationKind::Highlight => "==}",
        }
    }

    /// Additions, deletions and substitutions are suggestions
    pub fn is_suggestion(self) -> bool {
        matches!(
            self,
            AnnotationKind::Addition | AnnotationKind::Deletion | AnnotationKind::Substitution
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationKind::Addition => "addition",
            AnnotationKind::Deletion => "deletion",
            AnnotationKind::Substitution => "substitution",
            AnnotationKind::Comment => "comment",
            AnnotationKind::Highlight => "highlight",
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thread status. A missing status means open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Open,
    Resolved,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Open => f.write_str("open"),
            Status::Resolved => f.write_str("resolved"),
        }
    }
}

/// Metadata envelope embedded at the start of an annotation payload
///
/// Keys that this crate does not know about are kept in `extra` so that a
/// metadata patch never drops information written by another tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub id: String,
    pub author: String,
    /// Unix seconds
    #[serde(default)]
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One parsed markup instance
///
/// Ranges are rebuilt from scratch on every parse; nothing but the embedded
/// `id` links a range to the one from a previous parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRange {
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub from: usize,
    pub to: usize,
    /// Payload as it appears between the delimiters, metadata prefix included.
    /// For substitutions this is the old half only.
    pub raw_content: String,
    /// Payload without the metadata prefix. For substitutions this is the whole
    /// matched markup, delimiters included.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl AnnotationRange {
    pub fn id(&self) -> Option<&str> {
        self.metadata.as_ref().map(|m| m.id.as_str())
    }

    pub fn author(&self) -> Option<&str> {
        self.metadata.as_ref().map(|m| m.author.as_str())
    }

    pub fn time(&self) -> i64 {
        self.metadata.as_ref().map(|m| m.time).unwrap_or(0)
    }

    pub fn reply_to(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.reply_to.as_deref())
    }

    pub fn status(&self) -> Status {
        self.metadata
            .as_ref()
            .and_then(|m| m.status)
            .unwrap_or_default()
    }

    pub fn is_suggestion(&self) -> bool {
        self.kind.is_suggestion()
    }

    /// Comment with metadata and no `replyTo`
    pub fn is_root_comment(&self) -> bool {
        self.kind == AnnotationKind::Comment
            && self.metadata.as_ref().is_some_and(|m| m.reply_to.is_none())
    }

    pub fn is_reply(&self) -> bool {
        self.kind == AnnotationKind::Comment && self.reply_to().is_some()
    }

    /// Whether `pos` lies within `[from, to]` (both ends inclusive)
    pub fn touches(&self, pos: usize) -> bool {
        pos >= self.from && pos <= self.to
    }

    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// A single text replacement: `[from, to)` becomes `insert`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl TextEdit {
    pub fn new(from: usize, to: usize, insert: impl Into<String>) -> Self {
        Self {
            from,
            to,
            insert: insert.into(),
        }
    }

    pub fn insert(at: usize, insert: impl Into<String>) -> Self {
        Self::new(at, at, insert)
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self::new(from, to, String::new())
    }
}

//! Metadata envelope codec
//!
//! A payload may start with `<json>@@`. The first `@@` ends the envelope; if
//! the JSON before it does not parse, the whole payload is plain content.

use crate::ast::{AnnotationRange, Metadata, TextEdit};
use crate::error::{MetadataError, MetadataResult};
use crate::id_generator::generate_id;
use crate::offsets::metadata_region;
use std::time::{SystemTime, UNIX_EPOCH};

pub const METADATA_SEPARATOR: &str = "@@";

/// Result of splitting a payload into envelope and content
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<'a> {
    pub metadata: Option<Metadata>,
    pub content: &'a str,
}

impl Metadata {
    /// Fresh metadata for a new annotation by `author`, stamped now
    pub fn new(author: impl Into<String>) -> Self {
        Self::with_time(generate_id(), author, unix_now())
    }

    pub fn with_time(id: impl Into<String>, author: impl Into<String>, time: i64) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            time,
            status: None,
            reply_to: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn reply_to(mut self, parent_id: impl Into<String>) -> Self {
        self.reply_to = Some(parent_id.into());
        self
    }
}

/// Serialize metadata into its `JSON@@` prefix form
///
/// `@` only ever occurs inside JSON strings, so it is written as `\u0040`
/// and the separator can never appear inside the envelope.
pub fn encode(meta: &Metadata) -> MetadataResult<String> {
    let json = serde_json::to_string(meta)?;
    let mut out = json.replace('@', "\\u0040");
    out.push_str(METADATA_SEPARATOR);
    Ok(out)
}

/// Split a raw payload into metadata and content. Never fails.
pub fn decode(raw: &str) -> Decoded<'_> {
    let Some(sep) = raw.find(METADATA_SEPARATOR) else {
        return Decoded {
            metadata: None,
            content: raw,
        };
    };

    match serde_json::from_str::<Metadata>(&raw[..sep]) {
        Ok(metadata) => Decoded {
            metadata: Some(metadata),
            content: &raw[sep + METADATA_SEPARATOR.len()..],
        },
        Err(e) => {
            tracing::trace!(error = %e, "Metadata envelope did not parse, treating as content");
            Decoded {
                metadata: None,
                content: raw,
            }
        }
    }
}

/// Byte length of the `JSON@@` prefix of a raw payload, or 0 without one
///
/// A separator whose envelope does not decode is content, not a prefix.
pub fn prefix_len(raw: &str) -> usize {
    raw.len() - decode(raw).content.len()
}

/// Build the edit that rewrites only the envelope of `range`
///
/// The envelope is re-serialized from the range's parsed metadata after
/// `patch` runs on a copy of it; the visible content is never touched.
pub fn update_metadata_in_range(
    range: &AnnotationRange,
    patch: impl FnOnce(&mut Metadata),
) -> MetadataResult<TextEdit> {
    let mut meta = match &range.metadata {
        Some(meta) => meta.clone(),
        None if range.raw_content.contains(METADATA_SEPARATOR) => {
            return Err(MetadataError::missing_metadata(range.from))
        }
        None => return Err(MetadataError::missing_separator(range.from)),
    };
    let (start, end) =
        metadata_region(range).ok_or_else(|| MetadataError::missing_metadata(range.from))?;

    patch(&mut meta);

    Ok(TextEdit::new(start, end, encode(&meta)?))
}

/// Current time in unix seconds
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

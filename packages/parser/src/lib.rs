//! # Critic Parser
//!
//! Grammar, metadata codec and offset model for inline review markup:
//!
//! ```text
//! {++<meta>@@text++}        addition
//! {--<meta>@@text--}        deletion
//! {~~<meta>@@old~>new~~}    substitution
//! {>><meta>@@text<<}        comment (reply when meta.replyTo is set)
//! {==text==}                highlight
//! ```
//!
//! The document text is the only state. [`parse`] rebuilds every
//! [`AnnotationRange`] from scratch and never fails.

pub mod ast;
pub mod error;
pub mod id_generator;
pub mod metadata;
pub mod offsets;
pub mod parser;
pub mod serializer;

pub use ast::{AnnotationKind, AnnotationRange, Metadata, Status, TextEdit};
pub use error::{MetadataError, MetadataResult};
pub use id_generator::generate_id;
pub use metadata::{decode, encode, update_metadata_in_range, METADATA_SEPARATOR};
pub use offsets::{content_offsets, prefix_region, suffix_region, ContentOffsets};
pub use parser::{parse, pattern, Parser};
pub use serializer::{
    create_addition, create_comment, create_deletion, create_highlight, create_substitution,
    markup_text, Serializer,
};

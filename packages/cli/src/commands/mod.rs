pub mod annotate;
pub mod inspect;
pub mod output;
pub mod review;
pub mod source;

pub use annotate::{comment, reply, CommentArgs, ReplyArgs};
pub use inspect::{parse, threads, ThreadsArgs};
pub use output::{clean, render, view};
pub use review::{accept, reject, reopen, resolve, resolve_all, strip, StripArgs, SuggestionArgs, ThreadArgs};
pub use source::{Context, DocumentArgs};

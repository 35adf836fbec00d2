//! Clipboard sanitizer.
//!
//! Copy and cut hand out the resolved text of a selection: substitutions
//! become their new half, additions and highlights their text, deletions and
//! comments disappear. Envelopes are dropped everywhere.

use crate::mutations::MutationError;
use critic_parser::{decode, pattern, AnnotationKind, TextEdit};
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn delimiter() -> &'static Regex {
    static DELIMITER: OnceLock<Regex> = OnceLock::new();
    DELIMITER.get_or_init(|| Regex::new(r"\{(?:\+\+|--|~~|>>|==)").expect("delimiter pattern is valid"))
}

/// Whether `text` contains any opening delimiter
pub fn contains_markup(text: &str) -> bool {
    delimiter().is_match(text)
}

/// Strip every markup form down to its resolved text
pub fn strip_markup_text(text: &str) -> String {
    if !contains_markup(text) {
        return text.to_string();
    }

    // Substitutions first: their `~>` would otherwise leak into the result
    let text = pattern(AnnotationKind::Substitution).replace_all(text, |caps: &Captures| {
        caps.get(2).map(|m| m.as_str()).unwrap_or_default().to_string()
    });
    let text = pattern(AnnotationKind::Addition).replace_all(&text, keep_content);
    let text = pattern(AnnotationKind::Deletion).replace_all(&text, "");
    let text = pattern(AnnotationKind::Comment).replace_all(&text, "");
    let text = pattern(AnnotationKind::Highlight).replace_all(&text, keep_content);
    text.into_owned()
}

fn keep_content(caps: &Captures) -> String {
    let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    decode(raw).content.to_string()
}

fn selection(source: &str, from: usize, to: usize) -> Result<&str, MutationError> {
    source.get(from..to).ok_or(MutationError::InvalidSelection {
        from,
        to,
        len: source.len(),
    })
}

/// Clipboard text for copying `[from, to)`
pub fn copy_selection(source: &str, from: usize, to: usize, cleanup: bool) -> Result<String, MutationError> {
    let text = selection(source, from, to)?;
    if cleanup {
        Ok(strip_markup_text(text))
    } else {
        Ok(text.to_string())
    }
}

/// Clipboard text for cutting `[from, to)` plus the deletion to commit
///
/// The deletion is a plain user edit; in Suggesting mode it still has to go
/// through the interceptor.
pub fn cut_selection(
    source: &str,
    from: usize,
    to: usize,
    cleanup: bool,
) -> Result<(String, TextEdit), MutationError> {
    let text = copy_selection(source, from, to, cleanup)?;
    Ok((text, TextEdit::delete(from, to)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_all_forms() {
        let text = concat!(
            r#"A{++{"id":"a","author":"Bo","time":1}@@ new++} "#,
            "B{-- old--} ",
            r#"{~~{"id":"s","author":"Bo","time":1}@@cat~>dog~~} "#,
            "{==lit==}{>>note<<}.",
        );
        assert_eq!(strip_markup_text(text), "A new B dog lit.");
    }

    #[test]
    fn test_envelopes_stay_per_annotation() {
        // An `@@` in a later annotation must not swallow plain text
        let text = r#"{++plain++} middle {++{"id":"a","author":"Bo","time":1}@@tail++}"#;
        assert_eq!(strip_markup_text(text), "plain middle tail");
    }

    #[test]
    fn test_fast_path() {
        assert!(!contains_markup("just {braces} and ++ signs"));
        assert_eq!(strip_markup_text("no markup"), "no markup");
    }

    #[test]
    fn test_copy_and_cut() {
        let src = "x{++y++}z";
        assert_eq!(copy_selection(src, 0, src.len(), true).unwrap(), "xyz");
        assert_eq!(copy_selection(src, 0, src.len(), false).unwrap(), src);

        let (text, edit) = cut_selection(src, 1, 8, true).unwrap();
        assert_eq!(text, "y");
        assert_eq!(edit, TextEdit::delete(1, 8));

        assert!(copy_selection(src, 4, 99, true).is_err());
    }
}

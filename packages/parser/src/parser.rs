use crate::ast::{AnnotationKind, AnnotationRange};
use crate::metadata::decode;
use regex::Regex;
use std::sync::OnceLock;

/// Lazy, multiline pattern for each markup form
pub fn pattern(kind: AnnotationKind) -> &'static Regex {
    static PATTERNS: OnceLock<[Regex; 5]> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            r"(?s)\{\+\+(.*?)\+\+\}",
            r"(?s)\{--(.*?)--\}",
            r"(?s)\{~~(.*?)~>(.*?)~~\}",
            r"(?s)\{>>(.*?)<<\}",
            r"(?s)\{==(.*?)==\}",
        ]
        .map(|p| Regex::new(p).expect("markup patterns are valid"))
    });

    match kind {
        AnnotationKind::Addition => &patterns[0],
        AnnotationKind::Deletion => &patterns[1],
        AnnotationKind::Substitution => &patterns[2],
        AnnotationKind::Comment => &patterns[3],
        AnnotationKind::Highlight => &patterns[4],
    }
}

/// Markup parser over a whole document
///
/// Each form is scanned independently, so matches of different forms may
/// overlap. No nesting or overlap validation happens here.
pub struct Parser<'a> {
    source: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn parse(&self) -> Vec<AnnotationRange> {
        let mut ranges = Vec::new();

        for kind in AnnotationKind::ALL {
            self.collect(kind, &mut ranges);
        }

        // Stable: ties keep the per-form order above
        ranges.sort_by_key(|r| r.from);

        tracing::debug!(ranges = ranges.len(), bytes = self.source.len(), "Parsed markup");
        ranges
    }

    fn collect(&self, kind: AnnotationKind, out: &mut Vec<AnnotationRange>) {
        for caps in pattern(kind).captures_iter(self.source) {
            let Some(whole) = caps.get(0) else { continue };
            let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

            let range = if kind == AnnotationKind::Substitution {
                let raw_new = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                // The envelope lives on the old half only
                let decoded = decode(raw);
                AnnotationRange {
                    kind,
                    from: whole.start(),
                    to: whole.end(),
                    raw_content: raw.to_string(),
                    content: whole.as_str().to_string(),
                    old_content: Some(decoded.content.to_string()),
                    new_content: Some(raw_new.to_string()),
                    metadata: decoded.metadata,
                }
            } else {
                let decoded = decode(raw);
                AnnotationRange {
                    kind,
                    from: whole.start(),
                    to: whole.end(),
                    raw_content: raw.to_string(),
                    content: decoded.content.to_string(),
                    old_content: None,
                    new_content: None,
                    metadata: decoded.metadata,
                }
            };

            out.push(range);
        }
    }
}

/// Parse all markup in `source`, sorted by start offset
pub fn parse(source: &str) -> Vec<AnnotationRange> {
    Parser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_addition() {
        let ranges = parse("Hello {++world++} there");
        assert_eq!(ranges.len(), 1);
        let r = &ranges[0];
        assert_eq!(r.kind, AnnotationKind::Addition);
        assert_eq!(r.from, 6);
        assert_eq!(r.to, 17);
        assert_eq!(r.content, "world");
        assert_eq!(r.raw_content, "world");
        assert!(r.metadata.is_none());
    }

    #[test]
    fn test_parse_substitution_with_metadata() {
        let src = r#"{~~{"id":"a1","author":"Bo","time":1}@@old~>new~~}"#;
        let ranges = parse(src);
        assert_eq!(ranges.len(), 1);
        let r = &ranges[0];
        assert_eq!(r.kind, AnnotationKind::Substitution);
        assert_eq!(r.old_content.as_deref(), Some("old"));
        assert_eq!(r.new_content.as_deref(), Some("new"));
        assert_eq!(r.content, src);
        assert_eq!(r.raw_content, r#"{"id":"a1","author":"Bo","time":1}@@old"#);
        assert_eq!(r.author(), Some("Bo"));
    }

    #[test]
    fn test_parse_sorted_across_forms() {
        let ranges = parse("{==a==} {--b--} {++c++} {>>d<<}");
        let kinds: Vec<_> = ranges.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AnnotationKind::Highlight,
                AnnotationKind::Deletion,
                AnnotationKind::Addition,
                AnnotationKind::Comment,
            ]
        );
    }

    #[test]
    fn test_parse_multiline_payload() {
        let ranges = parse("{++line one\nline two++}");
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].content, "line one\nline two");
    }

    #[test]
    fn test_parse_lazy_matching() {
        let ranges = parse("{++a++} and {++b++}");
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].content, "a");
        assert_eq!(ranges[1].content, "b");
    }

    #[test]
    fn test_unterminated_markup_is_inert() {
        assert!(parse("{++never closed").is_empty());
        assert!(parse("{~~old without arrow~~}").is_empty());
    }

    #[test]
    fn test_malformed_metadata_degrades() {
        let ranges = parse("{>>{broken@@text<<}");
        assert_eq!(ranges.len(), 1);
        assert!(ranges[0].metadata.is_none());
        assert_eq!(ranges[0].content, "{broken@@text");
    }

    #[test]
    fn test_overlapping_forms_both_reported() {
        let ranges = parse("{==x {++y++} z==}");
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].kind, AnnotationKind::Highlight);
        assert_eq!(ranges[1].kind, AnnotationKind::Addition);
    }

    #[test]
    fn test_offsets_are_bytes() {
        let ranges = parse("héllo {++wörld++}");
        assert_eq!(ranges[0].from, "héllo ".len());
        assert_eq!(ranges[0].content, "wörld");
    }
}

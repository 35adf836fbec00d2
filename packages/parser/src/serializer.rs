use crate::ast::{AnnotationKind, AnnotationRange, Metadata};
use crate::error::MetadataResult;
use crate::metadata::encode;

/// Builds markup strings for new annotations
///
/// Every suggestion and comment gets its own metadata envelope. Highlights
/// never carry one.
pub struct Serializer {
    author: String,
}

impl Serializer {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn addition(&self, text: &str) -> MetadataResult<String> {
        addition_with(&Metadata::new(&self.author), text)
    }

    pub fn deletion(&self, text: &str) -> MetadataResult<String> {
        deletion_with(&Metadata::new(&self.author), text)
    }

    pub fn substitution(&self, old_text: &str, new_text: &str) -> MetadataResult<String> {
        substitution_with(&Metadata::new(&self.author), old_text, new_text)
    }

    pub fn comment(&self, text: &str, reply_to: Option<&str>) -> MetadataResult<String> {
        let mut meta = Metadata::new(&self.author);
        meta.reply_to = reply_to.map(str::to_string);
        comment_with(&meta, text)
    }
}

pub fn create_addition(text: &str, author: &str) -> MetadataResult<String> {
    Serializer::new(author).addition(text)
}

pub fn create_deletion(text: &str, author: &str) -> MetadataResult<String> {
    Serializer::new(author).deletion(text)
}

pub fn create_substitution(old_text: &str, new_text: &str, author: &str) -> MetadataResult<String> {
    Serializer::new(author).substitution(old_text, new_text)
}

pub fn create_comment(text: &str, author: &str, reply_to: Option<&str>) -> MetadataResult<String> {
    Serializer::new(author).comment(text, reply_to)
}

pub fn create_highlight(text: &str) -> String {
    wrap(AnnotationKind::Highlight, text)
}

pub fn addition_with(meta: &Metadata, text: &str) -> MetadataResult<String> {
    Ok(wrap(AnnotationKind::Addition, &format!("{}{}", encode(meta)?, text)))
}

pub fn deletion_with(meta: &Metadata, text: &str) -> MetadataResult<String> {
    Ok(wrap(AnnotationKind::Deletion, &format!("{}{}", encode(meta)?, text)))
}

pub fn substitution_with(meta: &Metadata, old_text: &str, new_text: &str) -> MetadataResult<String> {
    Ok(wrap(
        AnnotationKind::Substitution,
        &format!("{}{}~>{}", encode(meta)?, old_text, new_text),
    ))
}

pub fn comment_with(meta: &Metadata, text: &str) -> MetadataResult<String> {
    Ok(wrap(AnnotationKind::Comment, &format!("{}{}", encode(meta)?, text)))
}

fn wrap(kind: AnnotationKind, payload: &str) -> String {
    let mut out = String::with_capacity(payload.len() + 6);
    out.push_str(kind.open_delimiter());
    out.push_str(payload);
    out.push_str(kind.close_delimiter());
    out
}

/// Rebuild the exact source text a parsed range was matched from
pub fn markup_text(range: &AnnotationRange) -> String {
    match range.kind {
        AnnotationKind::Substitution => wrap(
            range.kind,
            &format!(
                "{}~>{}",
                range.raw_content,
                range.new_content.as_deref().unwrap_or_default()
            ),
        ),
        kind => wrap(kind, &range.raw_content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_builders_parse_back() {
        let s = Serializer::new("Bo");
        let text = format!(
            "{} {} {} {} {}",
            s.addition("add").unwrap(),
            s.deletion("del").unwrap(),
            s.substitution("old", "new").unwrap(),
            s.comment("note", Some("c1")).unwrap(),
            create_highlight("mark"),
        );

        let ranges = parse(&text);
        assert_eq!(ranges.len(), 5);
        assert_eq!(ranges[0].content, "add");
        assert_eq!(ranges[1].content, "del");
        assert_eq!(ranges[2].old_content.as_deref(), Some("old"));
        assert_eq!(ranges[2].new_content.as_deref(), Some("new"));
        assert_eq!(ranges[3].reply_to(), Some("c1"));
        assert_eq!(ranges[4].content, "mark");
        assert!(ranges[4].metadata.is_none());

        for r in &ranges[..4] {
            assert_eq!(r.author(), Some("Bo"));
        }
    }

    #[test]
    fn test_fixed_metadata() {
        let meta = Metadata::with_time("c1", "Bo", 5);
        assert_eq!(
            comment_with(&meta, "").unwrap(),
            r#"{>>{"id":"c1","author":"Bo","time":5}@@<<}"#
        );
    }

    #[test]
    fn test_markup_text_reproduces_source() {
        let src = r#"a {~~{"id":"a1","author":"Bo","time":1}@@x~>y~~} b {==c==}{>>d<<}"#;
        for r in parse(src) {
            assert_eq!(markup_text(&r), &src[r.from..r.to]);
        }
    }
}

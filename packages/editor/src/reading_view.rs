//! Reading-view HTML.
//!
//! Renders a document with its markup turned into inline HTML elements. Plain
//! text between annotations is escaped; metadata envelopes are dropped.

use critic_parser::{parse, AnnotationKind, AnnotationRange};

const COMMENT_BUBBLE: &str = "&#x1F4AC;";

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render `text` as reading-view HTML
pub fn render_html(text: &str) -> String {
    let ranges = parse(text);
    if ranges.is_empty() {
        return escape_html(text);
    }

    let mut out = String::with_capacity(text.len() + ranges.len() * 32);
    let mut last = 0;

    for range in &ranges {
        // Overlapping input: the earlier range wins
        if range.from < last {
            continue;
        }
        out.push_str(&escape_html(&text[last..range.from]));
        render_range(range, &mut out);
        last = range.to;
    }

    out.push_str(&escape_html(&text[last..]));
    out
}

fn render_range(range: &AnnotationRange, out: &mut String) {
    match range.kind {
        AnnotationKind::Addition => ins(&range.content, out),
        AnnotationKind::Deletion => del(&range.content, out),
        AnnotationKind::Substitution => {
            del(range.old_content.as_deref().unwrap_or_default(), out);
            ins(range.new_content.as_deref().unwrap_or_default(), out);
        }
        AnnotationKind::Highlight => {
            out.push_str(r#"<mark class="critic-highlight">"#);
            out.push_str(&escape_html(&range.content));
            out.push_str("</mark>");
        }
        AnnotationKind::Comment => {
            out.push_str(r#"<span class="critic-reading-comment" title=""#);
            out.push_str(&escape_html(&range.content));
            out.push_str(r#"">"#);
            out.push_str(COMMENT_BUBBLE);
            out.push_str("</span>");
        }
    }
}

fn ins(text: &str, out: &mut String) {
    out.push_str(r#"<ins class="critic-addition">"#);
    out.push_str(&escape_html(text));
    out.push_str("</ins>");
}

fn del(text: &str, out: &mut String) {
    out.push_str(r#"<del class="critic-deletion">"#);
    out.push_str(&escape_html(text));
    out.push_str("</del>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_all_forms() {
        let text = concat!(
            "a {++b++} ",
            r#"{--{"id":"d","author":"Bo","time":1}@@c--} "#,
            "{~~d~>e~~} {==f==}",
            r#"{>>{"id":"c","author":"Bo","time":1}@@say "hi"<<}"#,
        );
        assert_eq!(
            render_html(text),
            concat!(
                r#"a <ins class="critic-addition">b</ins> "#,
                r#"<del class="critic-deletion">c</del> "#,
                r#"<del class="critic-deletion">d</del><ins class="critic-addition">e</ins> "#,
                r#"<mark class="critic-highlight">f</mark>"#,
                r#"<span class="critic-reading-comment" title="say &quot;hi&quot;">&#x1F4AC;</span>"#,
            )
        );
    }

    #[test]
    fn test_plain_text_is_escaped() {
        assert_eq!(render_html("1 < 2 & 3"), "1 &lt; 2 &amp; 3");
        assert_eq!(render_html("<b>{++x++}"), r#"&lt;b&gt;<ins class="critic-addition">x</ins>"#);
    }
}

use critic_parser::{markup_text, parse, AnnotationKind};

fn reconstruct(source: &str) -> String {
    let mut out = String::new();
    let mut last = 0;
    for r in parse(source) {
        out.push_str(&source[last..r.from]);
        out.push_str(&markup_text(&r));
        last = r.to;
    }
    out.push_str(&source[last..]);
    out
}

#[test]
fn test_round_trip_mixed_document() {
    let source = r#"# Draft

The {++quick ++}brown fox {--really --}jumps over the
{~~{"id":"s1","author":"Bo","time":3}@@lazy~>sleepy~~} dog.

{==Important==}{>>{"id":"c1","author":"Al","time":4}@@Is it?<<}{>>{"id":"r1","author":"Bo","time":6,"replyTo":"c1"}@@Yes.<<}
"#;
    assert_eq!(reconstruct(source), source);
}

#[test]
fn test_round_trip_legacy_and_malformed() {
    let source = "{++legacy++} {>>{bad json}@@hm<<} {~~a~>b~~} {==x==}";
    assert_eq!(reconstruct(source), source);
}

#[test]
fn test_round_trip_unicode() {
    let source = "Grüße {++schöne++} Welt {--alte--} 🚀";
    assert_eq!(reconstruct(source), source);
}

#[test]
fn test_round_trip_no_markup() {
    let source = "nothing to see { here } ++ -- ~~";
    assert!(parse(source).is_empty());
    assert_eq!(reconstruct(source), source);
}

#[test]
fn test_every_range_is_non_empty() {
    let source = "{++++} {----} {~~~>~~} {>><<} {====}";
    let ranges = parse(source);
    assert_eq!(ranges.len(), 5);
    for r in &ranges {
        assert!(r.from < r.to, "{:?} should span text", r.kind);
    }
    assert_eq!(ranges[2].kind, AnnotationKind::Substitution);
    assert_eq!(ranges[2].old_content.as_deref(), Some(""));
    assert_eq!(ranges[2].new_content.as_deref(), Some(""));
}

//! Integration tests for editor crate

use critic_editor::{
    build_threads, parse, strip_all_markup, Document, EditOrigin, EditSession, EditorError,
    EditorMode, Mutation, Pipeline, StripMode, SuggestionTarget, TextEdit,
};
use std::path::PathBuf;

fn memory(source: &str) -> Document {
    Document::from_source(PathBuf::from("notes.md"), source.to_string())
}

#[test]
fn test_scenario_plain_addition() {
    let source = "Hello {++world++} there";
    let ranges = parse(source);
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].content, "world");
    assert!(ranges[0].metadata.is_none());

    let mut doc = memory(source);
    doc.apply_mutation(&Mutation::AcceptSuggestion { target: SuggestionTarget::At(8) }, "Bo")
        .unwrap();
    assert_eq!(doc.source(), "Hello world there");

    let mut doc = memory(source);
    doc.apply_mutation(&Mutation::RejectSuggestion { target: SuggestionTarget::At(8) }, "Bo")
        .unwrap();
    assert_eq!(doc.source(), "Hello  there");
}

#[test]
fn test_scenario_substitution_with_metadata() {
    let source = r#"{~~{"id":"a1","author":"Bo","time":1}@@old~>new~~}"#;
    let ranges = parse(source);
    assert_eq!(ranges[0].old_content.as_deref(), Some("old"));
    assert_eq!(ranges[0].new_content.as_deref(), Some("new"));
    assert_eq!(ranges[0].author(), Some("Bo"));

    let by_id = || SuggestionTarget::Id("a1".into());

    let mut doc = memory(source);
    doc.apply_mutation(&Mutation::AcceptSuggestion { target: by_id() }, "Bo").unwrap();
    assert_eq!(doc.source(), "new");

    let mut doc = memory(source);
    doc.apply_mutation(&Mutation::RejectSuggestion { target: by_id() }, "Bo").unwrap();
    assert_eq!(doc.source(), "old");
}

#[test]
fn test_scenario_save_comment_text() {
    let source = r#"{==pick me==}{>>{"id":"c1","author":"Bo","time":5}@@<<}"#;
    let mut doc = memory(source);
    doc.apply_mutation(
        &Mutation::SaveCommentText { id: "c1".into(), text: "nice!".into() },
        "Bo",
    )
    .unwrap();

    assert_eq!(
        doc.source(),
        r#"{==pick me==}{>>{"id":"c1","author":"Bo","time":5}@@nice!<<}"#
    );

    let threads = build_threads(doc.ranges());
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].anchor.as_ref().map(|a| a.content.as_str()), Some("pick me"));
    assert_eq!(threads[0].root.content, "nice!");
}

#[test]
fn test_scenario_consecutive_typing_grows_one_addition() {
    let mut session = EditSession::new("client-1", "Bo", memory("Hello "));
    session.set_mode(EditorMode::Suggesting).unwrap();

    let mut cursor = session.document.source().len();
    for c in ["w", "o", "r", "l", "d"] {
        let result = session.type_edits(&[TextEdit::insert(cursor, c)], EditOrigin::Input).unwrap();
        cursor = result.selection.unwrap_or(cursor + c.len());
    }

    let ranges = session.document.ranges();
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].content, "world");
    assert_eq!(ranges[0].author(), Some("Bo"));
}

#[test]
fn test_scenario_strip_accept_all_kinds() {
    let source = concat!(
        "Start {++added ++}",
        r#"{--{"id":"d1","author":"Bo","time":1}@@removed --}"#,
        "{~~cat~>dog~~} ",
        "{==marked==}",
        r#"{>>{"id":"c1","author":"Bo","time":2}@@note<<}"#,
        " end",
    );
    let batch = strip_all_markup(&parse(source), StripMode::Accept);
    let out = batch.apply(source).unwrap();
    assert_eq!(out, "Start added dog marked end");
    assert!(parse(&out).is_empty());

    let rejected = strip_all_markup(&parse(source), StripMode::Reject).apply(source).unwrap();
    assert_eq!(rejected, "Start removed cat marked end");
}

#[test]
fn test_document_lifecycle_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.md");
    std::fs::write(&path, r#"Intro {++{"id":"a1","author":"Al","time":1}@@new ++}text"#).unwrap();

    let mut doc = Document::load(&path).unwrap();
    assert_eq!(doc.version, 0);
    assert!(!doc.is_dirty());

    doc.apply_mutation(&Mutation::AcceptAll, "Bo").unwrap();
    assert!(doc.is_dirty());
    doc.save().unwrap();
    assert!(!doc.is_dirty());

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Intro new text");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Document::load(dir.path().join("absent.md"));
    assert!(matches!(result, Err(EditorError::Io(_))));
}

#[test]
fn test_review_round_trip_through_pipeline() {
    let session = EditSession::new("client-1", "Bo", memory("The budget is fine."));
    let mut pipeline = Pipeline::new(session);

    let added = pipeline.apply_mutation(Mutation::AddComment { from: 4, to: 10 }).unwrap();
    let id = added.created_id.clone().unwrap();
    assert_eq!(added.threads.len(), 1);
    assert_eq!(
        pipeline.session().state.focused_thread_id.as_deref(),
        Some(id.as_str())
    );

    pipeline
        .apply_mutation(Mutation::SaveCommentText { id: id.clone(), text: "Check this".into() })
        .unwrap();
    pipeline
        .apply_mutation(Mutation::AddReply { parent_id: id.clone(), text: "Done".into() })
        .unwrap();
    let resolved = pipeline
        .apply_mutation(Mutation::ResolveComment { id: id.clone() })
        .unwrap();

    let thread = &resolved.threads[0];
    assert!(thread.is_resolved());
    assert_eq!(thread.replies.len(), 1);
    assert_eq!(thread.replies[0].content, "Done");

    let clean = pipeline
        .apply_mutation(Mutation::StripAll { mode: StripMode::Accept })
        .unwrap();
    assert!(clean.threads.is_empty());
    assert_eq!(pipeline.session().document.source(), "The budget is fine.");
}

use super::source::{Context, DocumentArgs};
use anyhow::Result;
use critic_editor::{render_html, render_viewing, strip_markup_text, EditorMode};

/// Print the document as Viewing mode shows it
pub fn view(args: DocumentArgs, ctx: &Context) -> Result<()> {
    let doc = args.open()?;
    let mut viewing = ctx.clone();
    viewing.mode = EditorMode::Viewing;
    let session = viewing.session(doc)?;

    // Viewing decorations are pure hide/replace, so they render straight to text
    let decorations = session.decorations();
    tracing::debug!(decorations = decorations.len(), "Rendering viewing mode");
    print!("{}", render_viewing(session.document.source(), &decorations));
    Ok(())
}

/// Print reading-view HTML
pub fn render(args: DocumentArgs) -> Result<()> {
    let doc = args.open()?;
    println!("{}", render_html(doc.source()));
    Ok(())
}

/// Print the document with all markup resolved the way a clipboard copy is
pub fn clean(args: DocumentArgs) -> Result<()> {
    let doc = args.open()?;
    print!("{}", strip_markup_text(doc.source()));
    Ok(())
}

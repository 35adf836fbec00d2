use super::source::{Context, DocumentArgs};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use critic_editor::Mutation;

#[derive(Args, Debug)]
pub struct CommentArgs {
    #[command(flatten)]
    pub doc: DocumentArgs,

    /// Start of the commented selection (byte offset)
    #[arg(long)]
    pub from: usize,

    /// End of the selection; defaults to --from for a bare comment
    #[arg(long)]
    pub to: Option<usize>,

    /// Comment text
    #[arg(long, default_value = "")]
    pub text: String,
}

#[derive(Args, Debug)]
pub struct ReplyArgs {
    #[command(flatten)]
    pub doc: DocumentArgs,

    /// Id of the thread to reply to
    #[arg(long)]
    pub id: String,

    /// Reply text
    #[arg(long)]
    pub text: String,
}

/// Add a comment, then fill in its text as a second step
pub fn comment(args: CommentArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.session(args.doc.open()?)?;

    let to = args.to.unwrap_or(args.from);
    let result = session.apply_mutation(Mutation::AddComment { from: args.from, to })?;
    let id = result
        .created_id
        .ok_or_else(|| anyhow::anyhow!("Comment was not created"))?;

    if !args.text.is_empty() {
        session.apply_mutation(Mutation::SaveCommentText {
            id: id.clone(),
            text: args.text,
        })?;
    }

    eprintln!("{} Added comment {}", "✓".green(), id.bold());
    args.doc.finish(&mut session.document)
}

pub fn reply(args: ReplyArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.session(args.doc.open()?)?;

    let result = session.apply_mutation(Mutation::AddReply {
        parent_id: args.id.clone(),
        text: args.text,
    })?;

    if let Some(id) = result.created_id {
        eprintln!("{} Replied to {} as {}", "✓".green(), args.id.bold(), id.bold());
    }
    args.doc.finish(&mut session.document)
}

use super::source::{apply_mutation, Context, DocumentArgs};
use anyhow::Result;
use clap::Args;
use critic_editor::{Mutation, StripMode, SuggestionTarget};

#[derive(Args, Debug)]
pub struct SuggestionArgs {
    #[command(flatten)]
    pub doc: DocumentArgs,

    /// Suggestion id; without --id or --at every suggestion is affected
    #[arg(long)]
    pub id: Option<String>,

    /// Byte offset inside the suggestion
    #[arg(long, conflicts_with = "id")]
    pub at: Option<usize>,
}

impl SuggestionArgs {
    fn target(&self) -> Option<SuggestionTarget> {
        match (&self.id, self.at) {
            (Some(id), _) => Some(SuggestionTarget::Id(id.clone())),
            (None, Some(pos)) => Some(SuggestionTarget::At(pos)),
            (None, None) => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct ThreadArgs {
    #[command(flatten)]
    pub doc: DocumentArgs,

    /// Thread id
    #[arg(long)]
    pub id: String,
}

#[derive(Args, Debug)]
pub struct StripArgs {
    #[command(flatten)]
    pub doc: DocumentArgs,

    /// Resolve suggestions by accepting or rejecting them
    #[arg(long, default_value = "accept")]
    pub mode: StripMode,
}

pub fn accept(args: SuggestionArgs, ctx: &Context) -> Result<()> {
    let mutation = match args.target() {
        Some(target) => Mutation::AcceptSuggestion { target },
        None => Mutation::AcceptAll,
    };
    apply_mutation(&args.doc, ctx, mutation)?;
    Ok(())
}

pub fn reject(args: SuggestionArgs, ctx: &Context) -> Result<()> {
    let mutation = match args.target() {
        Some(target) => Mutation::RejectSuggestion { target },
        None => Mutation::RejectAll,
    };
    apply_mutation(&args.doc, ctx, mutation)?;
    Ok(())
}

pub fn resolve(args: ThreadArgs, ctx: &Context) -> Result<()> {
    apply_mutation(&args.doc, ctx, Mutation::ResolveComment { id: args.id })?;
    Ok(())
}

pub fn reopen(args: ThreadArgs, ctx: &Context) -> Result<()> {
    apply_mutation(&args.doc, ctx, Mutation::ReopenComment { id: args.id })?;
    Ok(())
}

pub fn resolve_all(args: DocumentArgs, ctx: &Context) -> Result<()> {
    apply_mutation(&args, ctx, Mutation::ResolveAll)?;
    Ok(())
}

pub fn strip(args: StripArgs, ctx: &Context) -> Result<()> {
    apply_mutation(&args.doc, ctx, Mutation::StripAll { mode: args.mode })?;
    Ok(())
}

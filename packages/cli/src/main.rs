mod commands;
mod config;
mod error;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    CommentArgs, Context, DocumentArgs, ReplyArgs, StripArgs, SuggestionArgs, ThreadArgs,
    ThreadsArgs,
};
use config::Config;
use critic_editor::EditorMode;
use tracing_subscriber::EnvFilter;

/// Critic - review markup for plain text documents
#[derive(Parser, Debug)]
#[command(name = "critic")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Author name for new annotations (overrides config)
    #[arg(long)]
    author: Option<String>,

    /// Editor mode (editing, suggesting, viewing; overrides config)
    #[arg(long)]
    mode: Option<EditorMode>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print parsed annotations as JSON
    Parse(DocumentArgs),

    /// List comment and suggestion threads
    Threads(ThreadsArgs),

    /// Accept one suggestion, or all of them
    Accept(SuggestionArgs),

    /// Reject one suggestion, or all of them
    Reject(SuggestionArgs),

    /// Mark a thread resolved
    Resolve(ThreadArgs),

    /// Mark a thread open again
    Reopen(ThreadArgs),

    /// Resolve every open comment thread
    ResolveAll(DocumentArgs),

    /// Remove all markup, accepting or rejecting suggestions
    Strip(StripArgs),

    /// Print the document as Viewing mode shows it
    View(DocumentArgs),

    /// Print reading-view HTML
    Render(DocumentArgs),

    /// Print the document with markup resolved for the clipboard
    Clean(DocumentArgs),

    /// Add a comment on a selection
    Comment(CommentArgs),

    /// Reply to a thread
    Reply(ReplyArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd)?;
    let ctx = Context::new(config, cli.author, cli.mode);

    tracing::debug!(author = %ctx.author, mode = %ctx.mode, "Starting");

    match cli.command {
        Command::Parse(args) => commands::parse(args),
        Command::Threads(args) => commands::threads(args),
        Command::Accept(args) => commands::accept(args, &ctx),
        Command::Reject(args) => commands::reject(args, &ctx),
        Command::Resolve(args) => commands::resolve(args, &ctx),
        Command::Reopen(args) => commands::reopen(args, &ctx),
        Command::ResolveAll(args) => commands::resolve_all(args, &ctx),
        Command::Strip(args) => commands::strip(args, &ctx),
        Command::View(args) => commands::view(args, &ctx),
        Command::Render(args) => commands::render(args),
        Command::Clean(args) => commands::clean(args),
        Command::Comment(args) => commands::comment(args, &ctx),
        Command::Reply(args) => commands::reply(args, &ctx),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "critic", "--author", "Bo", "--mode", "suggesting", "strip", "doc.md", "--mode", "reject",
        ])
        .unwrap();
        assert_eq!(cli.author.as_deref(), Some("Bo"));
        assert_eq!(cli.mode, Some(EditorMode::Suggesting));
        let Command::Strip(args) = cli.command else { panic!("expected strip") };
        assert_eq!(args.mode, critic_editor::StripMode::Reject);
    }

    #[test]
    fn test_accept_id_conflicts_with_at() {
        let result = Cli::try_parse_from(["critic", "accept", "doc.md", "--id", "a1", "--at", "4"]);
        assert!(result.is_err());
    }
}

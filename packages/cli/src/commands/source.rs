use crate::config::Config;
use crate::error::CliError;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use critic_editor::{Document, EditSession, EditorMode, Mutation, MutationResult};
use std::io::Read;
use std::path::PathBuf;

const STDIN_MARKER: &str = "-";

#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
    /// Marked-up file, or `-` to read stdin
    pub input: PathBuf,

    /// Rewrite the file in place instead of printing the result
    #[arg(short, long)]
    pub write: bool,
}

impl DocumentArgs {
    pub fn is_stdin(&self) -> bool {
        self.input.as_os_str() == STDIN_MARKER
    }

    pub fn open(&self) -> Result<Document> {
        if !self.is_stdin() {
            return Ok(Document::load(&self.input)?);
        }
        if self.write {
            return Err(CliError::WriteToStdin.into());
        }

        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(Document::from_source(PathBuf::from("<stdin>"), source))
    }

    /// Save or print the document after a change
    pub fn finish(&self, doc: &mut Document) -> Result<()> {
        if self.write {
            doc.save()?;
            eprintln!("{} {} (v{})", "✓".green(), doc.path.display(), doc.version);
        } else {
            print!("{}", doc.source());
        }
        Ok(())
    }
}

/// Settings shared by every subcommand: config merged with global flags
#[derive(Debug, Clone)]
pub struct Context {
    pub author: String,
    pub mode: EditorMode,
    pub clipboard_cleanup: bool,
}

impl Context {
    pub fn new(config: Config, author: Option<String>, mode: Option<EditorMode>) -> Self {
        Self {
            author: author.unwrap_or(config.author_name),
            mode: mode.unwrap_or(config.default_mode),
            clipboard_cleanup: config.clipboard_cleanup,
        }
    }

    pub fn session(&self, doc: Document) -> Result<EditSession> {
        let mut session = EditSession::new("cli", self.author.clone(), doc);
        session.clipboard_cleanup = self.clipboard_cleanup;
        session.set_mode(self.mode)?;
        Ok(session)
    }
}

/// Open, apply one mutation, then save or print
pub fn apply_mutation(args: &DocumentArgs, ctx: &Context, mutation: Mutation) -> Result<MutationResult> {
    let doc = args.open()?;
    let mut session = ctx.session(doc)?;

    tracing::debug!(?mutation, mode = %session.mode(), "Applying mutation");
    let result = session.apply_mutation(mutation)?;

    if result.version == 0 {
        eprintln!("{} Nothing to change", "•".yellow());
    }
    args.finish(&mut session.document)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_flags_override_config() {
        let config = Config {
            author_name: "Bo".into(),
            default_mode: EditorMode::Suggesting,
            clipboard_cleanup: false,
        };
        let ctx = Context::new(config.clone(), Some("Al".into()), None);
        assert_eq!(ctx.author, "Al");
        assert_eq!(ctx.mode, EditorMode::Suggesting);

        let ctx = Context::new(config, None, Some(EditorMode::Viewing));
        assert_eq!(ctx.author, "Bo");
        assert_eq!(ctx.mode, EditorMode::Viewing);
        assert!(!ctx.clipboard_cleanup);
    }

    #[test]
    fn test_suggesting_without_author_is_refused() {
        let ctx = Context::new(Config::default(), None, Some(EditorMode::Suggesting));
        let doc = Document::from_source(PathBuf::from("t.md"), "x".into());
        assert!(ctx.session(doc).is_err());
    }

    #[test]
    fn test_write_to_stdin_is_refused() {
        let args = DocumentArgs {
            input: PathBuf::from("-"),
            write: true,
        };
        assert!(args.open().is_err());
    }

    #[test]
    fn test_apply_and_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "Hello {++world++} there").unwrap();

        let args = DocumentArgs { input: path.clone(), write: true };
        let ctx = Context::new(Config::default(), Some("Bo".into()), None);
        let result = apply_mutation(&args, &ctx, Mutation::AcceptAll).unwrap();

        assert_eq!(result.version, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello world there");
    }
}

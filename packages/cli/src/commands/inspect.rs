use super::source::DocumentArgs;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use critic_editor::{filter_threads, relative_time, CommentThread, ThreadFilter, ThreadKind};

#[derive(Args, Debug)]
pub struct ThreadsArgs {
    #[command(flatten)]
    pub doc: DocumentArgs,

    /// Which threads to list (all, open, resolved)
    #[arg(short, long, default_value = "all")]
    pub filter: ThreadFilter,

    /// Case-insensitive text to search for
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Print every parsed range as JSON
pub fn parse(args: DocumentArgs) -> Result<()> {
    let doc = args.open()?;
    let json = serde_json::to_string_pretty(doc.ranges())?;
    println!("{}", json);
    Ok(())
}

pub fn threads(args: ThreadsArgs) -> Result<()> {
    let doc = args.doc.open()?;
    let all = doc.threads();
    let threads = filter_threads(&all, args.filter, &args.query);

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&threads)?);
        return Ok(());
    }

    if threads.is_empty() {
        println!("{} No threads", "•".yellow());
        return Ok(());
    }

    let now = chrono::Utc::now().timestamp();
    for thread in &threads {
        print_thread(thread, now);
    }

    println!();
    println!(
        "   {} of {} threads, {} resolved",
        threads.len(),
        all.len(),
        all.iter().filter(|t| t.is_resolved()).count()
    );
    Ok(())
}

fn print_thread(thread: &CommentThread, now: i64) {
    let root = &thread.root;
    let status = if thread.is_resolved() {
        "resolved".dimmed()
    } else {
        "open".green()
    };
    let kind = match thread.kind {
        ThreadKind::Comment => "comment".blue().bold(),
        ThreadKind::Suggestion => root.kind.as_str().magenta().bold(),
    };

    println!(
        "{} {} [{}] {} {}",
        thread.id.bold(),
        kind,
        status,
        root.author().unwrap_or("?"),
        relative_time(root.time(), now).dimmed()
    );

    if let Some(anchor) = &thread.anchor {
        println!("   {} {}", "on".dimmed(), quote(&anchor.content));
    }

    match thread.kind {
        ThreadKind::Comment => println!("   {}", root.content),
        ThreadKind::Suggestion => match (&root.old_content, &root.new_content) {
            (Some(old), Some(new)) => println!("   {} → {}", old.red(), new.green()),
            _ => println!("   {}", root.content),
        },
    }

    for reply in &thread.replies {
        println!(
            "   {} {} {}: {}",
            "↳".dimmed(),
            reply.author().unwrap_or("?"),
            relative_time(reply.time(), now).dimmed(),
            reply.content
        );
    }
}

fn quote(s: &str) -> String {
    const MAX: usize = 60;
    let line = s.lines().next().unwrap_or_default();
    match line.char_indices().nth(MAX) {
        Some((cut, _)) => format!("\"{}…\"", &line[..cut]),
        None if line.len() < s.len() => format!("\"{}…\"", line),
        None => format!("\"{}\"", line),
    }
}

// FolioChat terminal front end.
// Reads visitor questions from stdin and prints the assistant's replies.

use anyhow::Result;
use clap::Parser;
use foliochat_core::actors::messages::TurnEvent;
use foliochat_core::actors::supervisor::SupervisorHandle;
use foliochat_core::config::AppConfig;
use foliochat_core::models::{PortfolioProfile, QuickReply};
use foliochat_core::{reveal, telemetry};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "foliochat")]
#[command(about = "Chat with a portfolio assistant in the terminal")]
struct Args {
    /// Reply mode: `scripted` (local templates) or `remote` (completion service)
    #[arg(long)]
    mode: Option<String>,

    /// Portfolio profile JSON; the built-in sample is used otherwise
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Completion model identifier
    #[arg(long)]
    model: Option<String>,

    /// Delay between revealed words, 0 prints replies at once
    #[arg(long)]
    reveal_delay_ms: Option<u64>,
}

fn apply_args(config: &mut AppConfig, args: Args) -> Result<()> {
    if let Some(mode) = args.mode {
        config.mode = mode.parse()?;
    }
    if let Some(profile) = args.profile {
        config.profile_path = Some(profile);
    }
    if let Some(model) = args.model {
        config.completion.model = model;
    }
    if let Some(ms) = args.reveal_delay_ms {
        config.reveal_delay = Duration::from_millis(ms);
    }
    config.validate()?;
    Ok(())
}

fn flush() {
    let _ = std::io::stdout().flush();
}

fn print_quick_replies(quick_replies: &[QuickReply]) {
    for (i, reply) in quick_replies.iter().enumerate() {
        println!("  [{}] {}", i + 1, reply.label);
    }
    print!("> ");
    flush();
}

/// Renders supervisor events. Revealed words are printed as they arrive.
async fn render_events(mut events: mpsc::Receiver<TurnEvent>) {
    let mut shown = 0usize;
    while let Some(event) = events.recv().await {
        match event {
            TurnEvent::UserTurn { .. } => {}
            TurnEvent::Pending { .. } => {
                shown = 0;
                print!("\nassistant: ");
                flush();
            }
            TurnEvent::Token { partial, .. } => {
                let text = partial.trim_end_matches(reveal::CURSOR);
                if let Some(rest) = text.get(shown..) {
                    print!("{}", rest);
                    flush();
                }
                shown = text.len();
            }
            TurnEvent::Completed {
                content,
                quick_replies,
                ..
            } => {
                println!("{}\n", content.get(shown..).unwrap_or_default());
                print_quick_replies(&quick_replies);
            }
        }
    }
}

/// A number picks the matching quick reply; anything else is sent as typed.
fn resolve_input(line: &str, quick_replies: &[QuickReply]) -> String {
    line.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| quick_replies.get(i))
        .map(|q| q.value.clone())
        .unwrap_or_else(|| line.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config = AppConfig::from_env()?;
    apply_args(&mut config, args)?;
    telemetry::init_tracing(config.log_format)?;

    let profile = PortfolioProfile::load_or_default(config.profile_path.as_deref())?;
    info!(name = %profile.name, mode = ?config.mode, "Starting FolioChat");

    let (event_tx, event_rx) = mpsc::channel(256);
    let supervisor = SupervisorHandle::new(&config, profile, Some(event_tx));
    let renderer = tokio::spawn(render_events(event_rx));

    let welcome = supervisor.transcript().await?;
    let mut quick_replies = Vec::new();
    if let Some(turn) = welcome.last() {
        println!("assistant: {}\n", turn.content);
        quick_replies = turn.quick_replies.clone();
    }
    println!("(type a question, a number to pick an option, /reset or /quit)");
    print_quick_replies(&quick_replies);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {
                print!("> ");
                flush();
            }
            "/quit" | "/exit" => break,
            "/reset" => {
                let turn = supervisor.reset().await?;
                println!("\nassistant: {}\n", turn.content);
                quick_replies = turn.quick_replies;
                print_quick_replies(&quick_replies);
            }
            _ => {
                let input = resolve_input(line, &quick_replies);
                match supervisor.send_message(input).await {
                    Ok(turn) => quick_replies = turn.quick_replies,
                    Err(e) => {
                        error!("Turn failed: {}", e);
                        println!("\n(something went wrong: {})", e);
                        print!("> ");
                        flush();
                    }
                }
            }
        }
    }

    supervisor.shutdown().await?;
    drop(supervisor);
    let _ = renderer.await;
    println!();
    Ok(())
}

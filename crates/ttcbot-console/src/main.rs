use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use ttcbot_core::config::BotConfig;
use ttcbot_core::secret::SecretService;
use ttcbot_interaction::{ChatParams, ChatSessions, GeminiClient};
use ttcbot_transit::TransitClient;

mod commands;
mod secrets;
mod surface;

use commands::CommandDispatcher;
use secrets::FileSecretService;

/// Readline helper: tab-completes slash commands and shows the rest of a
/// partially typed one as an inline hint. Free text (browser control
/// words, chat input) is left alone.
#[derive(Clone)]
struct ConsoleHelper {
    commands: Vec<String>,
}

impl ConsoleHelper {
    /// Registered commands whose name extends the typed prefix.
    fn completions<'a>(&'a self, typed: &'a str) -> impl Iterator<Item = &'a String> {
        self.commands
            .iter()
            .filter(move |cmd| cmd.starts_with(typed))
    }
}

impl Helper for ConsoleHelper {}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        if !typed.starts_with('/') {
            return Ok((0, vec![]));
        }

        let candidates = self
            .completions(typed)
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for ConsoleHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let typed = &line[..pos];
        // Only hint while the command name itself is being typed.
        if !typed.starts_with('/') || typed.contains(' ') {
            return None;
        }
        self.completions(typed)
            .next()
            .and_then(|cmd| cmd.strip_prefix(typed))
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }
}

impl Highlighter for ConsoleHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.cyan().bold().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        line.starts_with('/')
    }
}

impl Validator for ConsoleHelper {}

#[derive(Parser)]
#[command(name = "ttcbot")]
#[command(about = "Tbilisi transit bot - console front end", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "ttcbot_core=debug"
    #[arg(long, default_value = "warn")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log)),
        )
        .init();

    // ===== Backend Initialization =====
    let config_path = match cli.config {
        Some(path) => path,
        None => BotConfig::default_path()?,
    };
    let config = BotConfig::load_or_create(&config_path)?;

    let secret_service = FileSecretService::new(FileSecretService::default_path()?);
    let secrets = secret_service.load_secrets().await?;

    let transit = Arc::new(TransitClient::new(
        &config.transit_base_url,
        &config.stats_url,
        secrets.transit_api_key.unwrap_or_default(),
        &config.locale,
    ));

    let chats = secrets.gemini_api_key.map(|key| {
        let agent = Arc::new(GeminiClient::new(key, &config.llm_model));
        let params = ChatParams {
            model: config.llm_model.clone(),
            ..ChatParams::default()
        };
        Arc::new(ChatSessions::new(agent, params))
    });
    if chats.is_none() {
        println!(
            "{}",
            "no Gemini key found - AI commands are disabled".yellow()
        );
    }

    let idle_timeout = Duration::from_secs(config.browser_idle_secs);
    let mut dispatcher = CommandDispatcher::new(transit, chats, idle_timeout);

    // ===== REPL Setup =====
    let helper = ConsoleHelper {
        commands: dispatcher.command_names(),
    };
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== ttcbot console ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/help' for commands, 'next'/'prev'/'search'/'select' inside a view, or 'quit' to exit."
            .bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if let Err(err) = dispatcher.handle(trimmed).await {
                    eprintln!("{}", err.user_message().red());
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

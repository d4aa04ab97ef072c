//! Command dispatch for the console front end.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use tracing::info;
use ttcbot_core::browser::{
    BrowserAction, BrowserHandle, BrowserSession, DetailSource, ResultSet, spawn_browser,
};
use ttcbot_core::command::CommandRegistry;
use ttcbot_core::uptime::UptimeTracker;
use ttcbot_core::{BotError, Result};
use ttcbot_interaction::{ChatSessions, UserId};
use ttcbot_transit::{
    RouteStopsDetail, StopArrivalsDetail, TransitClient, format, resolve_stop_code,
};

use crate::surface::ConsoleSurface;

const HISTORY_PER_PAGE: usize = 5;

/// Owns the live pieces of the session and routes every input line.
pub struct CommandDispatcher {
    transit: Arc<TransitClient>,
    chats: Option<Arc<ChatSessions>>,
    registry: CommandRegistry,
    uptime: UptimeTracker,
    surface: Arc<ConsoleSurface>,
    idle_timeout: Duration,
    active: Option<BrowserHandle>,
    user: UserId,
    user_name: String,
}

impl CommandDispatcher {
    pub fn new(
        transit: Arc<TransitClient>,
        chats: Option<Arc<ChatSessions>>,
        idle_timeout: Duration,
    ) -> Self {
        let mut registry = CommandRegistry::new();
        registry.register("buses", "Browse all bus routes");
        registry.register("stops", "Browse all stops");
        registry.register("bus", "Browse the stops of one route: /bus <number>");
        registry.register(
            "stopinfo",
            "Upcoming arrivals at a stop: /stopinfo <code or name>",
        );
        registry.register("stats", "Passenger statistics by transport type");
        registry.register("uptime", "How long the bot has been running");
        registry.register("ping", "Check that the bot is alive");
        registry.register("help", "List the available commands");
        registry.register("ask", "Ask the AI assistant: /ask <question>");
        registry.register("history", "Your AI conversation history: /history [page]");
        registry.register("clearhistory", "Forget your AI conversation");
        registry.register("model", "Switch the AI model: /model <name>");
        registry.register("system", "Set the AI system prompt: /system <prompt>");
        registry.register("resetsystem", "Restore the default AI system prompt");
        registry.register("params", "Tune the AI: /params [temperature] [max_tokens]");
        registry.register("config", "Show your AI configuration");

        let user_name = std::env::var("USER").unwrap_or_else(|_| "console".to_string());

        Self {
            transit,
            chats,
            registry,
            uptime: UptimeTracker::start(),
            surface: Arc::new(ConsoleSurface),
            idle_timeout,
            active: None,
            user: UserId::new("console"),
            user_name,
        }
    }

    /// Command names, for readline completion.
    pub fn command_names(&self) -> Vec<String> {
        self.registry
            .all()
            .iter()
            .map(|spec| format!("/{}", spec.name))
            .collect()
    }

    /// Handles one input line. Errors bubble up to the REPL, which renders
    /// them with [`BotError::user_message`].
    pub async fn handle(&mut self, line: &str) -> Result<()> {
        if let Some(rest) = line.strip_prefix('/') {
            let (name, args) = match rest.split_once(' ') {
                Some((name, args)) => (name, args.trim()),
                None => (rest, ""),
            };
            return self.handle_command(name, args).await;
        }
        self.handle_control_word(line).await
    }

    async fn handle_command(&mut self, name: &str, args: &str) -> Result<()> {
        match name {
            "buses" => self.browse_routes().await,
            "stops" => self.browse_stops().await,
            "bus" => self.browse_route_stops(args).await,
            "stopinfo" => self.show_arrivals(args).await,
            "stats" => self.show_stats().await,
            "uptime" => {
                println!("{}", self.uptime.report().bright_blue());
                Ok(())
            }
            "ping" => {
                println!("{}", "Pong! 🏓".bright_green());
                Ok(())
            }
            "help" => {
                println!("{}", self.registry.help_text().bright_blue());
                Ok(())
            }
            "ask" => self.ask(args).await,
            "history" => self.show_history(args).await,
            "clearhistory" => {
                self.chats()?.clear_history(&self.user).await?;
                println!("{}", "conversation history cleared".bright_green());
                Ok(())
            }
            "model" => {
                self.chats()?.set_model(&self.user, args).await?;
                println!("{}", format!("model switched to {args}").bright_green());
                Ok(())
            }
            "system" => {
                if args.is_empty() {
                    return Err(BotError::invalid_param("usage: /system <prompt>"));
                }
                self.chats()?.set_system_prompt(&self.user, args).await?;
                println!("{}", "system prompt updated, conversation reset".bright_green());
                Ok(())
            }
            "resetsystem" => {
                self.chats()?.reset_system_prompt(&self.user).await?;
                println!("{}", "system prompt restored to default".bright_green());
                Ok(())
            }
            "params" => self.set_params(args).await,
            "config" => {
                let text = self.chats()?.describe_params(&self.user).await;
                println!("{}", text.bright_blue());
                Ok(())
            }
            other => {
                println!("{}", format!("unknown command: /{other}").bright_black());
                Ok(())
            }
        }
    }

    async fn handle_control_word(&mut self, line: &str) -> Result<()> {
        let action = if line == "next" {
            BrowserAction::Next
        } else if line == "prev" {
            BrowserAction::Prev
        } else if line == "reset" {
            BrowserAction::Reset
        } else if let Some(query) = line.strip_prefix("search ") {
            BrowserAction::Filter(query.trim().to_string())
        } else if let Some(row) = line.strip_prefix("select ") {
            BrowserAction::Select(row.trim().to_string())
        } else {
            println!(
                "{}",
                "unknown input - commands start with '/', see /help".bright_black()
            );
            return Ok(());
        };

        let Some(handle) = &self.active else {
            println!("{}", "no open view - run /buses or /stops first".yellow());
            return Ok(());
        };
        handle.activate(action).await
    }

    fn chats(&self) -> Result<&Arc<ChatSessions>> {
        self.chats
            .as_ref()
            .ok_or_else(|| BotError::invalid_param("AI is not configured - set GEMINI_API_KEY"))
    }

    fn open_browser(&mut self, title: &str, records: ResultSet, detail: Arc<dyn DetailSource>) {
        let (session, _initial) = BrowserSession::open(title, records);
        let handle = spawn_browser(session, self.surface.clone(), detail, self.idle_timeout);
        info!(browser = %handle.id(), title, "opened browser");
        self.active = Some(handle);
    }

    async fn browse_routes(&mut self) -> Result<()> {
        let routes = self.transit.routes().await?;
        let records: ResultSet = format::route_records(&routes).into_iter().collect();
        let detail = Arc::new(RouteStopsDetail::new(self.transit.clone()));
        self.open_browser("🚌 Bus Routes", records, detail);
        Ok(())
    }

    async fn browse_stops(&mut self) -> Result<()> {
        let stops = self.transit.stops().await?;
        let records: ResultSet = format::stop_records(&stops).into_iter().collect();
        let detail = Arc::new(StopArrivalsDetail::new(self.transit.clone()));
        self.open_browser("🛑 Stops", records, detail);
        Ok(())
    }

    async fn browse_route_stops(&mut self, number: &str) -> Result<()> {
        if number.is_empty() {
            return Err(BotError::invalid_param("usage: /bus <number>"));
        }
        let routes = self.transit.routes().await?;
        let route = routes
            .iter()
            .find(|route| route.short_name == number)
            .ok_or_else(|| BotError::not_found("route", number))?;

        let stops = self.transit.route_stops(&route.id).await?;
        let records: ResultSet = format::stop_records(&stops).into_iter().collect();
        let detail = Arc::new(StopArrivalsDetail::new(self.transit.clone()));
        let title = format!("🚌 Route {} - {}", route.short_name, route.long_name);
        self.open_browser(&title, records, detail);
        Ok(())
    }

    async fn show_arrivals(&self, query: &str) -> Result<()> {
        if query.is_empty() {
            return Err(BotError::invalid_param("usage: /stopinfo <code or name>"));
        }
        // Users type either the code or the stop name; the detail
        // endpoints only take codes.
        let stops = self.transit.stops().await?;
        let code = resolve_stop_code(&stops, query)
            .ok_or_else(|| BotError::not_found("stop", query))?
            .to_string();

        let info = self.transit.stop_info(&code).await?;
        let arrivals = self.transit.arrivals(&code).await?;
        let name = info.name.as_deref().unwrap_or("Unknown");
        println!(
            "{}",
            format::arrival_board(&code, name, &arrivals).bright_blue()
        );
        Ok(())
    }

    async fn show_stats(&self) -> Result<()> {
        let stats = self.transit.passenger_stats().await?;
        println!("{}", format::stats_block(&stats).bright_blue());
        Ok(())
    }

    async fn ask(&self, question: &str) -> Result<()> {
        if question.is_empty() {
            return Err(BotError::invalid_param("usage: /ask <question>"));
        }
        let answer = self
            .chats()?
            .ask(&self.user, &self.user_name, question)
            .await?;
        for line in answer.lines() {
            println!("{}", line.bright_blue());
        }
        Ok(())
    }

    async fn show_history(&self, args: &str) -> Result<()> {
        let page = if args.is_empty() {
            1
        } else {
            args.parse::<usize>()
                .map_err(|_| BotError::invalid_param("page must be a number"))?
        };
        let text = self
            .chats()?
            .history_page(&self.user, page, HISTORY_PER_PAGE)
            .await?;
        println!("{}", text.bright_blue());
        Ok(())
    }

    async fn set_params(&self, args: &str) -> Result<()> {
        let mut parts = args.split_whitespace();
        let temperature = parts
            .next()
            .map(|raw| {
                raw.parse::<f32>()
                    .map_err(|_| BotError::invalid_param("temperature must be a number"))
            })
            .transpose()?;
        let max_tokens = parts
            .next()
            .map(|raw| {
                raw.parse::<u32>()
                    .map_err(|_| BotError::invalid_param("max_tokens must be a whole number"))
            })
            .transpose()?;

        let report = self
            .chats()?
            .set_params(&self.user, temperature, max_tokens)
            .await?;
        println!("{}", report.bright_green());
        Ok(())
    }
}

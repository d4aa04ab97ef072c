//! Command registry.
//!
//! The front end registers every slash command here once; `/help` renders
//! its listing from the registry instead of hard-coding command names.

/// Name and description of one registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
}

/// Registry of the commands the bot exposes.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command. Duplicate names are a programming error and
    /// replace the earlier entry.
    pub fn register(&mut self, name: &'static str, description: &'static str) {
        self.commands.retain(|c| c.name != name);
        self.commands.push(CommandSpec { name, description });
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// All commands in registration order.
    pub fn all(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// The `/help` listing, one command per line.
    pub fn help_text(&self) -> String {
        let mut lines = vec!["Available commands:".to_string()];
        for spec in &self.commands {
            lines.push(format!("/{} - {}", spec.name, spec.description));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_registered_commands() {
        let mut registry = CommandRegistry::new();
        registry.register("buses", "List all bus routes");
        registry.register("uptime", "Show bot uptime");

        let help = registry.help_text();
        assert!(help.contains("/buses - List all bus routes"));
        assert!(help.contains("/uptime - Show bot uptime"));
    }

    #[test]
    fn reregistering_replaces_the_description() {
        let mut registry = CommandRegistry::new();
        registry.register("ping", "old");
        registry.register("ping", "Latency check");

        assert_eq!(registry.all().len(), 1);
        assert_eq!(registry.get("ping").unwrap().description, "Latency check");
    }
}

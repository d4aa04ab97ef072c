//! Terminal rendering of browser pages.

use async_trait::async_trait;
use colored::Colorize;
use ttcbot_core::Result;
use ttcbot_core::browser::{ControlFlags, MessageSurface, RenderedPage};

/// Prints browser pages to stdout.
///
/// A terminal cannot edit a message in place the way a chat client does,
/// so each `edit` prints the page again under a separator.
pub struct ConsoleSurface;

impl ConsoleSurface {
    fn control_hints(controls: &ControlFlags) -> String {
        let mut hints = Vec::new();
        if controls.prev {
            hints.push("prev");
        }
        if controls.next {
            hints.push("next");
        }
        if controls.filter {
            hints.push("search <text>");
        }
        if controls.reset {
            hints.push("reset");
        }
        hints.push("select <row>");
        hints.join(" | ")
    }
}

#[async_trait]
impl MessageSurface for ConsoleSurface {
    async fn edit(&self, page: &RenderedPage) -> Result<()> {
        println!();
        println!("{}", page.title.bright_magenta().bold());
        for line in &page.lines {
            println!("{}", line.bright_blue());
        }
        println!("{}", page.footer.bright_black());
        if page.expired {
            println!("{}", "(view expired)".yellow());
        } else {
            println!("{}", Self::control_hints(&page.controls).bright_black());
        }
        Ok(())
    }

    async fn ephemeral(&self, text: &str) -> Result<()> {
        for line in text.lines() {
            println!("{}", line.yellow());
        }
        Ok(())
    }
}

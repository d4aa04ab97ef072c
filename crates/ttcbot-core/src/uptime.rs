//! Process uptime tracking.

use chrono::{DateTime, Duration, Utc};

/// Tracks how long the bot process has been running.
#[derive(Debug, Clone)]
pub struct UptimeTracker {
    started_at: DateTime<Utc>,
}

impl UptimeTracker {
    /// Starts tracking from now.
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Multi-line report with current time, uptime, and start time.
    pub fn report(&self) -> String {
        let now = Utc::now();
        format!(
            "Local time: {}\nCurrent uptime: {}\nStart time: {}",
            now.format("%Y-%m-%d %H:%M:%S"),
            format_uptime(now - self.started_at),
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

/// Renders a duration as `XdYhZmWs`.
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    format!("{days}d {hours}h {minutes}m {seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_component_breakdown() {
        let elapsed = Duration::days(2) + Duration::hours(3) + Duration::minutes(4) + Duration::seconds(5);
        assert_eq!(format_uptime(elapsed), "2d 3h 4m 5s");
    }

    #[test]
    fn zero_and_negative_clamp_to_zero() {
        assert_eq!(format_uptime(Duration::zero()), "0d 0h 0m 0s");
        assert_eq!(format_uptime(Duration::seconds(-5)), "0d 0h 0m 0s");
    }

    #[test]
    fn report_mentions_uptime_and_start_time() {
        let tracker = UptimeTracker::start();
        let report = tracker.report();
        assert!(report.contains("Current uptime:"));
        assert!(report.contains("Start time:"));
    }
}

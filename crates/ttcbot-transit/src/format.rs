//! Chat rendering of transit data.
//!
//! One function per surfaced view, all pure, so the exact strings users
//! see are pinned by tests.

use ttcbot_core::browser::DisplayRecord;

use crate::model::{Arrival, PassengerStats, Route, Stop};

/// `🚌 101 - Station Square - Airport`
pub fn route_line(route: &Route) -> String {
    format!("🚌 {} - {}", route.short_name, route.long_name)
}

/// `🛑 1000 - Rustaveli`; `None` for rows without a code.
pub fn stop_line(stop: &Stop) -> Option<String> {
    let code = stop.code.as_deref()?;
    Some(format!("🛑 {code} - {}", stop.name))
}

/// Browser records for the route listing; selection id is the route id.
pub fn route_records(routes: &[Route]) -> Vec<DisplayRecord> {
    routes
        .iter()
        .map(|r| DisplayRecord::new(r.id.clone(), route_line(r)))
        .collect()
}

/// Browser records for a stop listing; selection id is the stop code.
/// Rows without a code cannot be selected and are dropped.
pub fn stop_records(stops: &[Stop]) -> Vec<DisplayRecord> {
    stops
        .iter()
        .filter_map(|s| {
            let line = stop_line(s)?;
            Some(DisplayRecord::new(s.code.clone()?, line))
        })
        .collect()
}

fn mode_emoji(mode: Option<&str>) -> &'static str {
    match mode {
        Some("METRO") => "🚇",
        Some("MINIBUS") => "🚐",
        _ => "🚌",
    }
}

/// `🚌 37 → Airport: 4წთ`, with `მოდის` for a vehicle that is due.
pub fn arrival_line(arrival: &Arrival) -> String {
    let route = arrival.short_name.as_deref().unwrap_or("N/A");
    let headsign = arrival.headsign.as_deref().unwrap_or("N/A");
    let eta = match arrival.minutes() {
        Some(minutes) if minutes > 0 => format!("{minutes}წთ"),
        _ => "მოდის".to_string(),
    };
    format!(
        "{} {route} → {headsign}: {eta}",
        mode_emoji(arrival.vehicle_mode.as_deref())
    )
}

/// Full arrival board for a stop. Arrivals are expected pre-sorted by the
/// client; an empty board is a distinct state, not an error.
pub fn arrival_board(code: &str, name: &str, arrivals: &[Arrival]) -> String {
    let mut lines = vec![format!("🏁 Stop #{code} - {name}")];
    if arrivals.is_empty() {
        lines.push("no upcoming arrivals".to_string());
    } else {
        lines.extend(arrivals.iter().map(arrival_line));
    }
    lines.join("\n")
}

/// Stop sequence summary shown when a route is selected in the browser.
pub fn route_stops_summary(stops: &[Stop]) -> String {
    let listed: Vec<String> = stops.iter().filter_map(stop_line).collect();
    let mut lines = vec![format!("🚌 Route stops ({}):", listed.len())];
    lines.extend(listed);
    lines.join("\n")
}

/// Passenger statistics block with per-type shares and the total.
pub fn stats_block(stats: &PassengerStats) -> String {
    let total: u64 = stats.transactions_by_transport_types.values().sum();
    if total == 0 {
        return "📊 Passenger Statistics:\nno transactions recorded".to_string();
    }

    let mut entries: Vec<(&String, &u64)> = stats
        .transactions_by_transport_types
        .iter()
        .filter(|(_, count)| **count > 0)
        .collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut lines = vec!["📊 Passenger Statistics:".to_string()];
    for (transport, count) in entries {
        let percentage = (*count as f64 / total as f64) * 100.0;
        lines.push(format!(
            "🔸 {transport}: {} ({percentage:.1}%)",
            group_thousands(*count)
        ));
    }
    lines.push(String::new());
    lines.push(format!("👥 Total Passengers: {}", group_thousands(total)));
    lines.join("\n")
}

/// `1234567` -> `1,234,567`
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn arrival(mode: &str, route: &str, minutes: Option<i64>) -> Arrival {
        Arrival {
            short_name: Some(route.to_string()),
            headsign: Some("Center".to_string()),
            vehicle_mode: Some(mode.to_string()),
            realtime_arrival_minutes: minutes,
            scheduled_arrival_minutes: None,
        }
    }

    #[test]
    fn route_and_stop_lines() {
        let route = Route {
            id: "1:101".into(),
            short_name: "101".into(),
            long_name: "Station Square - Airport".into(),
        };
        assert_eq!(route_line(&route), "🚌 101 - Station Square - Airport");

        let stop = Stop {
            code: Some("1000".into()),
            name: "Rustaveli".into(),
        };
        assert_eq!(stop_line(&stop), Some("🛑 1000 - Rustaveli".into()));
        assert_eq!(
            stop_line(&Stop {
                code: None,
                name: "ghost".into()
            }),
            None
        );
    }

    #[test]
    fn stop_records_drop_codeless_rows() {
        let stops = vec![
            Stop {
                code: Some("1".into()),
                name: "A".into(),
            },
            Stop {
                code: None,
                name: "B".into(),
            },
        ];
        let records = stop_records(&stops);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn arrival_line_uses_mode_emoji_and_due_text() {
        assert_eq!(
            arrival_line(&arrival("METRO", "M2", Some(4))),
            "🚇 M2 → Center: 4წთ"
        );
        assert_eq!(
            arrival_line(&arrival("MINIBUS", "450", Some(0))),
            "🚐 450 → Center: მოდის"
        );
        assert_eq!(
            arrival_line(&arrival("BUS", "37", None)),
            "🚌 37 → Center: მოდის"
        );
    }

    #[test]
    fn arrival_board_handles_the_empty_state() {
        let board = arrival_board("1000", "Rustaveli", &[]);
        assert!(board.starts_with("🏁 Stop #1000 - Rustaveli"));
        assert!(board.contains("no upcoming arrivals"));
    }

    #[test]
    fn stats_block_sorts_desc_and_reports_shares() {
        let stats = PassengerStats {
            transactions_by_transport_types: HashMap::from([
                ("BUS".to_string(), 750_000_u64),
                ("METRO".to_string(), 250_000_u64),
                ("CABLEWAY".to_string(), 0_u64),
            ]),
        };
        let block = stats_block(&stats);
        let bus = block.find("BUS").unwrap();
        let metro = block.find("METRO").unwrap();
        assert!(bus < metro, "larger share listed first");
        assert!(block.contains("🔸 BUS: 750,000 (75.0%)"));
        assert!(!block.contains("CABLEWAY"), "zero rows are omitted");
        assert!(block.contains("👥 Total Passengers: 1,000,000"));
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(5), "5");
        assert_eq!(group_thousands(1_234), "1,234");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}

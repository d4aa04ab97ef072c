//! Wire models for the transit gateway.
//!
//! Fields mirror the JSON the gateway returns; anything the upstream is
//! known to omit for some rows is optional here so one sparse record never
//! poisons a whole listing.

use std::collections::HashMap;

use serde::Deserialize;

/// One bus route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub short_name: String,
    #[serde(default)]
    pub long_name: String,
}

/// One stop. The gateway returns some auxiliary rows without a code;
/// those are dropped before display.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
}

impl Stop {
    /// Whether `query` names this stop, either by code or by full name.
    pub fn matches(&self, query: &str) -> bool {
        self.code.as_deref() == Some(query) || self.name == query
    }
}

/// Resolves user input to a stop code against the full stop listing.
///
/// Users type either the numeric code or the stop name; the gateway's
/// detail endpoints only accept codes. Stops the gateway publishes
/// without a code cannot be resolved even by name.
pub fn resolve_stop_code<'a>(stops: &'a [Stop], query: &str) -> Option<&'a str> {
    stops
        .iter()
        .find(|stop| stop.matches(query))
        .and_then(|stop| stop.code.as_deref())
}

/// Detail record for a single stop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDetail {
    #[serde(default)]
    pub name: Option<String>,
}

/// One upcoming arrival at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrival {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub headsign: Option<String>,
    #[serde(default)]
    pub vehicle_mode: Option<String>,
    #[serde(default)]
    pub realtime_arrival_minutes: Option<i64>,
    #[serde(default)]
    pub scheduled_arrival_minutes: Option<i64>,
}

impl Arrival {
    /// Minutes until arrival, preferring the realtime estimate.
    pub fn minutes(&self) -> Option<i64> {
        self.realtime_arrival_minutes
            .or(self.scheduled_arrival_minutes)
    }

    /// Sort key: soonest first, unknown ETAs last.
    pub fn sort_key(&self) -> i64 {
        self.realtime_arrival_minutes.unwrap_or(i64::MAX)
    }
}

/// City-wide passenger statistics.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerStats {
    pub transactions_by_transport_types: HashMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_deserializes_from_gateway_json() {
        let raw = r#"{"id": "1:101", "shortName": "101", "longName": "Station Square - Airport"}"#;
        let route: Route = serde_json::from_str(raw).unwrap();
        assert_eq!(route.id, "1:101");
        assert_eq!(route.short_name, "101");
        assert_eq!(route.long_name, "Station Square - Airport");
    }

    #[test]
    fn stop_without_code_deserializes() {
        let raw = r#"{"name": "Rustaveli"}"#;
        let stop: Stop = serde_json::from_str(raw).unwrap();
        assert_eq!(stop.code, None);
        assert_eq!(stop.name, "Rustaveli");
    }

    #[test]
    fn arrival_prefers_realtime_minutes() {
        let raw = r#"{
            "shortName": "37",
            "headsign": "Airport",
            "vehicleMode": "BUS",
            "realtimeArrivalMinutes": 4,
            "scheduledArrivalMinutes": 6
        }"#;
        let arrival: Arrival = serde_json::from_str(raw).unwrap();
        assert_eq!(arrival.minutes(), Some(4));

        let scheduled_only: Arrival =
            serde_json::from_str(r#"{"scheduledArrivalMinutes": 9}"#).unwrap();
        assert_eq!(scheduled_only.minutes(), Some(9));
        assert_eq!(scheduled_only.sort_key(), i64::MAX);
    }

    #[test]
    fn stop_code_resolves_from_code_or_name() {
        let stops = vec![
            Stop {
                code: Some("1000".into()),
                name: "Rustaveli".into(),
            },
            Stop {
                code: None,
                name: "Ghost Stop".into(),
            },
        ];

        assert_eq!(resolve_stop_code(&stops, "1000"), Some("1000"));
        assert_eq!(resolve_stop_code(&stops, "Rustaveli"), Some("1000"));
        assert_eq!(resolve_stop_code(&stops, "Vake Park"), None);
        // A codeless stop cannot back a detail lookup, even by name.
        assert_eq!(resolve_stop_code(&stops, "Ghost Stop"), None);
    }

    #[test]
    fn stats_map_deserializes() {
        let raw = r#"{"transactionsByTransportTypes": {"BUS": 120, "METRO": 80}}"#;
        let stats: PassengerStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.transactions_by_transport_types["BUS"], 120);
    }
}

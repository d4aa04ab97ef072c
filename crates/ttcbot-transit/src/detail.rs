//! Detail sources wired into the browser's SELECT step.
//!
//! Selecting a row triggers a fresh fetch against the gateway; the result
//! is rendered as an ephemeral detail view and never touches the paging
//! state of the browser that triggered it.

use std::sync::Arc;

use async_trait::async_trait;
use ttcbot_core::Result;
use ttcbot_core::browser::DetailSource;

use crate::client::TransitClient;
use crate::format::{arrival_board, route_stops_summary};

/// Detail view for a stop listing: the live arrival board.
pub struct StopArrivalsDetail {
    client: Arc<TransitClient>,
}

impl StopArrivalsDetail {
    pub fn new(client: Arc<TransitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DetailSource for StopArrivalsDetail {
    async fn fetch_detail(&self, row_id: &str) -> Result<String> {
        let info = self.client.stop_info(row_id).await?;
        let arrivals = self.client.arrivals(row_id).await?;
        let name = info.name.unwrap_or_else(|| "Unknown".to_string());
        Ok(arrival_board(row_id, &name, &arrivals))
    }
}

/// Detail view for a route listing: the route's stop sequence.
pub struct RouteStopsDetail {
    client: Arc<TransitClient>,
}

impl RouteStopsDetail {
    pub fn new(client: Arc<TransitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DetailSource for RouteStopsDetail {
    async fn fetch_detail(&self, row_id: &str) -> Result<String> {
        let stops = self.client.route_stops(row_id).await?;
        Ok(route_stops_summary(&stops))
    }
}

//! Transit gateway integration.
//!
//! Typed reqwest client for the municipal transit API, display formatting
//! for every surfaced view, and the detail sources that back the browser's
//! row-selection step.

pub mod client;
pub mod detail;
pub mod format;
pub mod model;

pub use client::TransitClient;
pub use detail::{RouteStopsDetail, StopArrivalsDetail};
pub use model::{Arrival, PassengerStats, Route, Stop, StopDetail, resolve_stop_code};

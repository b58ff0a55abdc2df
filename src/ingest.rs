//! CSV ingestion of candidate route tables.
//!
//! Accepts a local file or raw bytes fetched over HTTP; the required column
//! set is checked against the header row before any record is parsed.

use anyhow::Result;
use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::RaterError;
use crate::shipment::CandidateRoute;

/// Columns every route table must carry.
const REQUIRED_FIELDS: &[&str] = &[
    "shipment_id",
    "origin",
    "destination",
    "transport_mode",
    "distance_km",
    "weather_condition",
    "customs_delay_h",
    "cost_usd",
];

/// Parses candidate routes from CSV bytes.
///
/// Negative customs delays occasionally appear in upstream data; they are
/// clamped to zero here, at the boundary, so the scoring core never sees
/// them.
///
/// # Errors
///
/// [`RaterError::SchemaError`] if a required column is absent; any
/// malformed record fails the whole load.
pub fn routes_from_csv(bytes: &[u8]) -> Result<Vec<CandidateRoute>> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(bytes);

    let headers = reader.headers()?.clone();
    for field in REQUIRED_FIELDS {
        if !headers.iter().any(|h| h == *field) {
            return Err(RaterError::SchemaError(field.to_string()).into());
        }
    }

    let mut routes = Vec::new();
    for record in reader.deserialize() {
        let mut route: CandidateRoute = record?;
        if route.customs_delay_h < 0.0 {
            warn!(
                shipment_id = route.shipment_id,
                customs_delay_h = route.customs_delay_h,
                "Negative customs delay clamped to zero"
            );
            route.customs_delay_h = 0.0;
        }
        routes.push(route);
    }

    debug!(routes = routes.len(), "Route table ingested");
    Ok(routes)
}

/// Reads candidate routes from a CSV file on disk.
pub fn routes_from_file(path: &str) -> Result<Vec<CandidateRoute>> {
    let bytes = std::fs::read(path)?;
    routes_from_csv(&bytes)
}

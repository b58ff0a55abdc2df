//! Output formatting and persistence for selected routes.
//!
//! Supports pretty-printing, JSON serialization, CSV export, and the
//! map-data JSON the presentation layer draws route lines from.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::locations::{color_for_mode, coordinates_for};
use crate::shipment::SelectedRoute;
use csv::Writer;

/// Logs selected routes using Rust's debug pretty-print format.
pub fn print_pretty(routes: &[SelectedRoute]) {
    debug!("{:#?}", routes);
}

/// Logs selected routes as pretty-printed JSON.
pub fn print_json(routes: &[SelectedRoute]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(routes)?);
    Ok(())
}

/// Writes the winning routes as a CSV table at `path`, one row per
/// shipment, replacing any previous export.
pub fn write_records(path: &str, routes: &[SelectedRoute]) -> Result<()> {
    debug!(path, rows = routes.len(), "Writing selected routes CSV");

    let mut writer = Writer::from_path(path)?;
    for route in routes {
        writer.serialize(route)?;
    }
    writer.flush()?;

    Ok(())
}

/// One renderable route line: endpoints resolved to coordinates, plus the
/// metrics shown in the line tooltip.
#[derive(Debug, Serialize)]
pub struct MapRoute {
    pub shipment_id: u32,
    pub origin: String,
    pub origin_coords: [f64; 2],
    pub destination: String,
    pub destination_coords: [f64; 2],
    pub transport_mode: String,
    pub color: String,
    pub predicted_time_h: f64,
    pub cost_usd: f64,
    pub customs_delay_h: f64,
    pub score: f64,
}

/// Map payload for one selection run.
#[derive(Debug, Serialize)]
pub struct MapData {
    pub generated_at: DateTime<Utc>,
    pub routes: Vec<MapRoute>,
}

impl MapData {
    pub fn from_selected(routes: &[SelectedRoute]) -> Self {
        let routes = routes
            .iter()
            .map(|r| MapRoute {
                shipment_id: r.shipment_id,
                origin: r.origin.clone(),
                origin_coords: coordinates_for(&r.origin),
                destination: r.destination.clone(),
                destination_coords: coordinates_for(&r.destination),
                transport_mode: r.transport_mode.clone(),
                color: color_for_mode(&r.transport_mode).to_string(),
                predicted_time_h: r.predicted_time_h,
                cost_usd: r.cost_usd,
                customs_delay_h: r.customs_delay_h,
                score: r.score,
            })
            .collect();

        MapData {
            generated_at: Utc::now(),
            routes,
        }
    }
}

/// Writes the map-data JSON for `routes` at `path`.
pub fn write_map_data(path: &str, routes: &[SelectedRoute]) -> Result<()> {
    let map_data = MapData::from_selected(routes);
    std::fs::write(path, serde_json::to_string_pretty(&map_data)?)?;
    debug!(path, routes = map_data.routes.len(), "Wrote map data");
    Ok(())
}

//! Core record types for shipments, candidate routes, and scoring weights.

use serde::{Deserialize, Serialize};

use crate::error::RaterError;

/// Tolerance for the "weights sum to 1" precondition on the selector.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// One raw candidate route for a shipment, as produced by simulation or
/// ingestion. Several candidates share a `shipment_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    pub shipment_id: u32,
    pub origin: String,
    pub destination: String,
    pub transport_mode: String,
    pub distance_km: f64,
    pub weather_condition: String,
    pub customs_delay_h: f64,
    pub cost_usd: f64,
}

/// A candidate route after feature building and model inference.
///
/// Carries the raw fields plus the derived ones the presentation layer
/// shows alongside the prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRoute {
    pub shipment_id: u32,
    pub origin: String,
    pub destination: String,
    pub transport_mode: String,
    pub distance_km: f64,
    pub weather_condition: String,
    pub risk_level: u8,
    pub base_transit_time_h: f64,
    pub customs_delay_h: f64,
    pub cost_usd: f64,
    pub predicted_time_h: f64,
}

/// The winning route for one shipment, with its composite score attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedRoute {
    pub shipment_id: u32,
    pub origin: String,
    pub destination: String,
    pub transport_mode: String,
    pub distance_km: f64,
    pub weather_condition: String,
    pub risk_level: u8,
    pub customs_delay_h: f64,
    pub cost_usd: f64,
    pub predicted_time_h: f64,
    pub score: f64,
}

impl SelectedRoute {
    pub fn from_enriched(route: &EnrichedRoute, score: f64) -> Self {
        SelectedRoute {
            shipment_id: route.shipment_id,
            origin: route.origin.clone(),
            destination: route.destination.clone(),
            transport_mode: route.transport_mode.clone(),
            distance_km: route.distance_km,
            weather_condition: route.weather_condition.clone(),
            risk_level: route.risk_level,
            customs_delay_h: route.customs_delay_h,
            cost_usd: route.cost_usd,
            predicted_time_h: route.predicted_time_h,
            score,
        }
    }
}

/// Relative importance of predicted time, cost, and customs risk.
///
/// The selector requires a triple that sums to 1; callers normalize first
/// via [`WeightTriple::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTriple {
    pub time: f64,
    pub cost: f64,
    pub risk: f64,
}

impl WeightTriple {
    pub fn new(time: f64, cost: f64, risk: f64) -> Self {
        WeightTriple { time, cost, risk }
    }

    pub fn sum(&self) -> f64 {
        self.time + self.cost + self.risk
    }

    /// Scales the triple so it sums to 1.
    ///
    /// A non-positive or non-finite sum (e.g. all sliders at zero) is an
    /// [`RaterError::InvalidWeights`] failure, never a silent NaN.
    pub fn normalized(&self) -> Result<WeightTriple, RaterError> {
        let total = self.sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(RaterError::InvalidWeights(format!(
                "weight sum must be positive, got {total}"
            )));
        }
        if self.time < 0.0 || self.cost < 0.0 || self.risk < 0.0 {
            return Err(RaterError::InvalidWeights(format!(
                "weights must be non-negative, got ({}, {}, {})",
                self.time, self.cost, self.risk
            )));
        }
        Ok(WeightTriple {
            time: self.time / total,
            cost: self.cost / total,
            risk: self.risk / total,
        })
    }

    /// Whether the triple satisfies the selector precondition (sums to 1
    /// within [`WEIGHT_SUM_TOLERANCE`]).
    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}

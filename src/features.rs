//! Feature building and model inference for candidate routes.
//!
//! Maps each raw route to the fixed-width vector the trained model expects,
//! invokes the model, and attaches the predicted transit time.

use tracing::debug;

use crate::error::RaterError;
use crate::model::{FeatureSchema, TransitTimeModel};
use crate::shipment::{CandidateRoute, EnrichedRoute};

/// Weather category to ordinal risk level. Unknown categories are an error,
/// not a silent zero.
static WEATHER_RISK: &[(&str, u8)] = &[
    ("no-event", 0),
    ("clear", 0),
    ("rain", 1),
    ("snow", 2),
    ("storm", 3),
];

/// Transport mode to estimated speed in km/h. Air fastest, sea slowest.
/// No entry is zero, so the transit-time division is safe by construction.
static MODE_SPEED_KMH: &[(&str, f64)] = &[("air", 800.0), ("land", 600.0), ("sea", 200.0)];

fn weather_risk(weather: &str) -> Result<u8, RaterError> {
    WEATHER_RISK
        .iter()
        .find(|(name, _)| *name == weather)
        .map(|(_, risk)| *risk)
        .ok_or_else(|| RaterError::UnknownCategory {
            field: "weather_condition",
            value: weather.to_string(),
        })
}

fn mode_speed_kmh(mode: &str) -> Result<f64, RaterError> {
    MODE_SPEED_KMH
        .iter()
        .find(|(name, _)| *name == mode)
        .map(|(_, speed)| *speed)
        .ok_or_else(|| RaterError::UnknownCategory {
            field: "transport_mode",
            value: mode.to_string(),
        })
}

/// Builds model feature vectors against a fixed schema and runs inference.
pub struct FeatureBuilder {
    schema: FeatureSchema,
}

impl FeatureBuilder {
    pub fn new(schema: FeatureSchema) -> Self {
        FeatureBuilder { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Builds the feature vector for one raw route, aligned to the schema.
    ///
    /// Numeric features are set by name; categorical fields contribute a
    /// single `field_value` one-hot column. A category with no schema column
    /// encodes as all zeros (unseen at inference time), and any schema
    /// column not produced here is zero-filled. Output order is exactly the
    /// schema's column order, since the model is order-sensitive.
    pub fn build_vector(&self, route: &CandidateRoute) -> Result<Vec<f64>, RaterError> {
        let risk = weather_risk(&route.weather_condition)?;
        let speed = mode_speed_kmh(&route.transport_mode)?;
        Ok(self.aligned_vector(route, risk, route.distance_km / speed))
    }

    fn aligned_vector(&self, route: &CandidateRoute, risk: u8, base_transit_time_h: f64) -> Vec<f64> {
        let named: Vec<(String, f64)> = vec![
            ("distance_km".to_string(), route.distance_km),
            ("customs_delay_h".to_string(), route.customs_delay_h),
            ("risk_level".to_string(), risk as f64),
            ("base_transit_time_h".to_string(), base_transit_time_h),
            (format!("origin_{}", route.origin), 1.0),
            (format!("destination_{}", route.destination), 1.0),
            (format!("transport_mode_{}", route.transport_mode), 1.0),
        ];

        self.schema
            .columns()
            .iter()
            .map(|col| {
                named
                    .iter()
                    .find(|(name, _)| name == col)
                    .map(|(_, value)| *value)
                    .unwrap_or(0.0)
            })
            .collect()
    }

    /// Enriches raw routes with derived fields and the model's predicted
    /// transit time. Pure given the routes and the schema, apart from the
    /// model call itself.
    ///
    /// # Errors
    ///
    /// [`RaterError::UnknownCategory`] if any route carries a weather or
    /// transport value outside the fixed lookups.
    pub fn enrich<M: TransitTimeModel>(
        &self,
        routes: &[CandidateRoute],
        model: &M,
    ) -> Result<Vec<EnrichedRoute>, RaterError> {
        let mut matrix = Vec::with_capacity(routes.len());
        let mut derived = Vec::with_capacity(routes.len());

        for route in routes {
            let risk = weather_risk(&route.weather_condition)?;
            let speed = mode_speed_kmh(&route.transport_mode)?;
            let base_transit_time_h = route.distance_km / speed;
            derived.push((risk, base_transit_time_h));
            matrix.push(self.aligned_vector(route, risk, base_transit_time_h));
        }

        debug!(
            rows = matrix.len(),
            width = self.schema.len(),
            "Feature matrix built, running inference"
        );
        let predictions = model.predict(&matrix);

        let enriched = routes
            .iter()
            .zip(derived)
            .zip(predictions)
            .map(|((route, (risk, base_time)), predicted)| EnrichedRoute {
                shipment_id: route.shipment_id,
                origin: route.origin.clone(),
                destination: route.destination.clone(),
                transport_mode: route.transport_mode.clone(),
                distance_km: route.distance_km,
                weather_condition: route.weather_condition.clone(),
                risk_level: risk,
                base_transit_time_h: base_time,
                customs_delay_h: route.customs_delay_h,
                cost_usd: route.cost_usd,
                predicted_time_h: predicted,
            })
            .collect();

        Ok(enriched)
    }
}

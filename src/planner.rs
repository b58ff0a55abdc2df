//! Dataset holder with a memoized selection cache.
//!
//! The presentation layer re-runs selection every time a weight slider
//! moves; results for a given (dataset, weights) pair never change, so they
//! are cached explicitly here. Loading a new dataset drops every cached
//! entry.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::error::RaterError;
use crate::features::FeatureBuilder;
use crate::model::TransitTimeModel;
use crate::selector::select_best_routes;
use crate::shipment::{CandidateRoute, EnrichedRoute, SelectedRoute, WeightTriple};

/// Cache key: dataset fingerprint plus the exact bit patterns of the
/// normalized weight triple.
type SelectionKey = (u64, [u64; 3]);

pub struct RoutePlanner {
    enriched: Vec<EnrichedRoute>,
    fingerprint: u64,
    cache: HashMap<SelectionKey, Vec<SelectedRoute>>,
}

impl RoutePlanner {
    /// Builds a planner over already-enriched routes.
    pub fn from_enriched(enriched: Vec<EnrichedRoute>) -> Self {
        let fingerprint = fingerprint_routes(&enriched);
        RoutePlanner {
            enriched,
            fingerprint,
            cache: HashMap::new(),
        }
    }

    /// Enriches `routes` through the feature builder and model, then builds
    /// the planner over the result.
    pub fn load<M: TransitTimeModel>(
        builder: &FeatureBuilder,
        routes: &[CandidateRoute],
        model: &M,
    ) -> Result<Self, RaterError> {
        let enriched = builder.enrich(routes, model)?;
        Ok(Self::from_enriched(enriched))
    }

    /// Replaces the dataset with a fresh enrichment run and clears the
    /// selection cache.
    pub fn reload<M: TransitTimeModel>(
        &mut self,
        builder: &FeatureBuilder,
        routes: &[CandidateRoute],
        model: &M,
    ) -> Result<(), RaterError> {
        let enriched = builder.enrich(routes, model)?;
        self.fingerprint = fingerprint_routes(&enriched);
        self.enriched = enriched;
        self.cache.clear();
        Ok(())
    }

    pub fn routes(&self) -> &[EnrichedRoute] {
        &self.enriched
    }

    /// Selects the best route per shipment, serving repeats of the same
    /// weight triple from the cache.
    pub fn select(&mut self, weights: &WeightTriple) -> Result<Vec<SelectedRoute>, RaterError> {
        let key = (
            self.fingerprint,
            [
                weights.time.to_bits(),
                weights.cost.to_bits(),
                weights.risk.to_bits(),
            ],
        );

        if let Some(cached) = self.cache.get(&key) {
            debug!(fingerprint = self.fingerprint, "Selection cache hit");
            return Ok(cached.clone());
        }

        let winners = select_best_routes(&self.enriched, weights)?;
        self.cache.insert(key, winners.clone());
        Ok(winners)
    }

    pub fn cached_selections(&self) -> usize {
        self.cache.len()
    }
}

fn fingerprint_routes(routes: &[EnrichedRoute]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for route in routes {
        route.shipment_id.hash(&mut hasher);
        route.origin.hash(&mut hasher);
        route.destination.hash(&mut hasher);
        route.transport_mode.hash(&mut hasher);
        route.distance_km.to_bits().hash(&mut hasher);
        route.weather_condition.hash(&mut hasher);
        route.risk_level.hash(&mut hasher);
        route.customs_delay_h.to_bits().hash(&mut hasher);
        route.cost_usd.to_bits().hash(&mut hasher);
        route.predicted_time_h.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

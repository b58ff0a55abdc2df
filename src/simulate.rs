//! Synthetic shipment generation for demo and test runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::shipment::CandidateRoute;

const ORIGINS: &[&str] = &["Mexico", "China", "India"];
const DESTINATIONS: &[&str] = &["Chile", "Germany", "Canada"];
const MODES: &[&str] = &["sea", "air", "land"];
const WEATHER: &[&str] = &["clear", "rain", "storm"];

/// Mean and standard deviation of the simulated customs delay, in hours.
const CUSTOMS_DELAY_MEAN_H: f64 = 10.0;
const CUSTOMS_DELAY_STDDEV_H: f64 = 4.0;

/// Generates `n_shipments` shipments with one candidate route per transport
/// mode, using the thread-local RNG.
pub fn simulate_shipments(n_shipments: u32) -> Vec<CandidateRoute> {
    let mut rng = StdRng::from_entropy();
    simulate_shipments_with(n_shipments, &mut rng)
}

/// Generates `n_shipments` shipments from a seed, for reproducible runs.
pub fn simulate_shipments_seeded(n_shipments: u32, seed: u64) -> Vec<CandidateRoute> {
    let mut rng = StdRng::seed_from_u64(seed);
    simulate_shipments_with(n_shipments, &mut rng)
}

fn simulate_shipments_with<R: Rng>(n_shipments: u32, rng: &mut R) -> Vec<CandidateRoute> {
    let mut routes = Vec::with_capacity(n_shipments as usize * MODES.len());

    for shipment_id in 1..=n_shipments {
        for mode in MODES {
            routes.push(CandidateRoute {
                shipment_id,
                origin: pick(rng, ORIGINS),
                destination: pick(rng, DESTINATIONS),
                transport_mode: mode.to_string(),
                distance_km: rng.gen_range(5_000..15_000) as f64,
                weather_condition: pick(rng, WEATHER),
                customs_delay_h: sample_customs_delay(rng),
                cost_usd: rng.gen_range(300..1_000) as f64,
            });
        }
    }

    info!(
        shipments = n_shipments,
        candidates = routes.len(),
        "Simulated shipment routes"
    );
    routes
}

fn pick<R: Rng>(rng: &mut R, choices: &[&str]) -> String {
    choices[rng.gen_range(0..choices.len())].to_string()
}

/// Samples a normally distributed customs delay (Box-Muller), rounded to
/// 0.1 h and clamped at zero. Negative delay is not physically meaningful,
/// so the clamp happens here at the data-source boundary.
fn sample_customs_delay<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let standard_normal = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    let delay = CUSTOMS_DELAY_MEAN_H + CUSTOMS_DELAY_STDDEV_H * standard_normal;
    (delay.max(0.0) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_candidate_per_mode_per_shipment() {
        let routes = simulate_shipments_seeded(5, 42);
        assert_eq!(routes.len(), 15);

        for shipment_id in 1..=5 {
            let modes: Vec<&str> = routes
                .iter()
                .filter(|r| r.shipment_id == shipment_id)
                .map(|r| r.transport_mode.as_str())
                .collect();
            assert_eq!(modes, vec!["sea", "air", "land"]);
        }
    }

    #[test]
    fn test_values_within_generation_bounds() {
        for route in simulate_shipments_seeded(20, 7) {
            assert!(route.distance_km >= 5_000.0 && route.distance_km < 15_000.0);
            assert!(route.cost_usd >= 300.0 && route.cost_usd < 1_000.0);
            assert!(route.customs_delay_h >= 0.0);
            assert!(ORIGINS.contains(&route.origin.as_str()));
            assert!(DESTINATIONS.contains(&route.destination.as_str()));
            assert!(WEATHER.contains(&route.weather_condition.as_str()));
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let first = simulate_shipments_seeded(4, 99);
        let second = simulate_shipments_seeded(4, 99);
        assert_eq!(first, second);
    }

    #[test]
    fn test_customs_delay_rounded_to_tenths() {
        for route in simulate_shipments_seeded(10, 3) {
            let tenths = route.customs_delay_h * 10.0;
            assert!((tenths - tenths.round()).abs() < 1e-9);
        }
    }
}

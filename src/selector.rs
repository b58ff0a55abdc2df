//! Route selection: weighted rank scoring and per-shipment winner picking.

use tracing::debug;

use crate::error::RaterError;
use crate::shipment::{EnrichedRoute, SelectedRoute, WeightTriple};

/// Assigns competition ("minimum") ranks to `values`, ascending.
///
/// Equal values share the lowest rank of their run and the next distinct
/// value resumes after the tied block: [5, 5, 7] ranks as [1, 1, 3].
pub fn min_ranks(values: &[f64]) -> Vec<usize> {
    values
        .iter()
        .map(|v| 1 + values.iter().filter(|other| *other < v).count())
        .collect()
}

/// Picks the best candidate route for every shipment in `routes`.
///
/// Candidates are grouped by `shipment_id` in order of first appearance.
/// Within a group, each metric (predicted time, cost, customs delay) is
/// ranked ascending with competition ranks; the composite score is the
/// weight-blended sum of the three ranks, and the minimum-score row wins.
/// Score ties break to the earliest row in original input order.
///
/// Emits exactly one [`SelectedRoute`] per shipment, in group order. The
/// input is read-only; no candidate is dropped or mutated.
///
/// # Errors
///
/// [`RaterError::InvalidWeights`] unless `weights` sums to 1 within
/// tolerance (normalize with [`WeightTriple::normalized`] first).
pub fn select_best_routes(
    routes: &[EnrichedRoute],
    weights: &WeightTriple,
) -> Result<Vec<SelectedRoute>, RaterError> {
    if !weights.is_normalized() {
        return Err(RaterError::InvalidWeights(format!(
            "selector requires weights summing to 1, got {}",
            weights.sum()
        )));
    }

    // Group indices by shipment_id, preserving first-appearance order.
    let mut groups: Vec<(u32, Vec<usize>)> = Vec::new();
    for (idx, route) in routes.iter().enumerate() {
        match groups.iter_mut().find(|(id, _)| *id == route.shipment_id) {
            Some((_, members)) => members.push(idx),
            None => groups.push((route.shipment_id, vec![idx])),
        }
    }

    debug!(
        candidates = routes.len(),
        shipments = groups.len(),
        "Selecting best route per shipment"
    );

    let mut winners = Vec::with_capacity(groups.len());
    for (shipment_id, members) in &groups {
        let winner = select_within_group(routes, members, weights)?;
        debug!(
            shipment_id,
            origin = %winner.origin,
            destination = %winner.destination,
            transport_mode = %winner.transport_mode,
            score = winner.score,
            "Shipment winner selected"
        );
        winners.push(winner);
    }

    Ok(winners)
}

fn select_within_group(
    routes: &[EnrichedRoute],
    members: &[usize],
    weights: &WeightTriple,
) -> Result<SelectedRoute, RaterError> {
    if members.is_empty() {
        return Err(RaterError::InternalInvariantViolation(
            "empty shipment group reached the selector",
        ));
    }

    let times: Vec<f64> = members.iter().map(|&i| routes[i].predicted_time_h).collect();
    let costs: Vec<f64> = members.iter().map(|&i| routes[i].cost_usd).collect();
    let delays: Vec<f64> = members.iter().map(|&i| routes[i].customs_delay_h).collect();

    let time_ranks = min_ranks(&times);
    let cost_ranks = min_ranks(&costs);
    let delay_ranks = min_ranks(&delays);

    let mut best: Option<(usize, f64)> = None;
    for (pos, &idx) in members.iter().enumerate() {
        let score = weights.time * time_ranks[pos] as f64
            + weights.cost * cost_ranks[pos] as f64
            + weights.risk * delay_ranks[pos] as f64;

        // Strict less-than keeps the earliest row on ties.
        let better = match best {
            Some((_, best_score)) => score < best_score,
            None => true,
        };
        if better {
            best = Some((idx, score));
        }
    }

    let (idx, score) = best.ok_or(RaterError::InternalInvariantViolation(
        "group produced no winner",
    ))?;
    Ok(SelectedRoute::from_enriched(&routes[idx], score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(shipment_id: u32, time: f64, cost: f64, delay: f64) -> EnrichedRoute {
        EnrichedRoute {
            shipment_id,
            origin: "China".to_string(),
            destination: "Chile".to_string(),
            transport_mode: "sea".to_string(),
            distance_km: 8_000.0,
            weather_condition: "clear".to_string(),
            risk_level: 0,
            base_transit_time_h: 40.0,
            customs_delay_h: delay,
            cost_usd: cost,
            predicted_time_h: time,
        }
    }

    fn unit_weights(time: f64, cost: f64, risk: f64) -> WeightTriple {
        WeightTriple::new(time, cost, risk).normalized().unwrap()
    }

    #[test]
    fn test_min_ranks_competition_style() {
        assert_eq!(min_ranks(&[5.0, 5.0, 7.0]), vec![1, 1, 3]);
        assert_eq!(min_ranks(&[500.0, 500.0, 700.0]), vec![1, 1, 3]);
        assert_eq!(min_ranks(&[3.0, 1.0, 2.0]), vec![3, 1, 2]);
        assert_eq!(min_ranks(&[4.0, 4.0, 4.0]), vec![1, 1, 1]);
    }

    #[test]
    fn test_min_ranks_empty_and_single() {
        assert!(min_ranks(&[]).is_empty());
        assert_eq!(min_ranks(&[9.9]), vec![1]);
    }

    #[test]
    fn test_pure_time_weight_picks_fastest() {
        // Scenario A: weights (1,0,0) select the time=3 candidate.
        let routes = vec![route(1, 5.0, 400.0, 2.0), route(1, 3.0, 900.0, 1.0)];
        let winners = select_best_routes(&routes, &unit_weights(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].predicted_time_h, 3.0);
    }

    #[test]
    fn test_pure_cost_weight_picks_cheapest() {
        // Scenario B: weights (0,1,0) select the cost=400 candidate.
        let routes = vec![route(1, 5.0, 400.0, 2.0), route(1, 3.0, 900.0, 1.0)];
        let winners = select_best_routes(&routes, &unit_weights(0.0, 1.0, 0.0)).unwrap();
        assert_eq!(winners[0].cost_usd, 400.0);
    }

    #[test]
    fn test_score_tie_keeps_first_input_row() {
        // Scenario C: identical metrics, identical scores.
        let mut first = route(1, 4.0, 500.0, 3.0);
        first.origin = "Mexico".to_string();
        let second = route(1, 4.0, 500.0, 3.0);
        let winners =
            select_best_routes(&[first.clone(), second], &unit_weights(0.5, 0.3, 0.2)).unwrap();
        assert_eq!(winners[0].origin, "Mexico");
    }

    #[test]
    fn test_one_winner_per_shipment_in_first_seen_order() {
        let routes = vec![
            route(7, 5.0, 500.0, 2.0),
            route(2, 4.0, 600.0, 1.0),
            route(7, 3.0, 700.0, 3.0),
            route(5, 6.0, 400.0, 2.0),
            route(2, 2.0, 800.0, 4.0),
        ];
        let winners = select_best_routes(&routes, &unit_weights(0.5, 0.3, 0.2)).unwrap();
        let ids: Vec<u32> = winners.iter().map(|w| w.shipment_id).collect();
        assert_eq!(ids, vec![7, 2, 5]);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let routes = vec![
            route(1, 5.0, 400.0, 2.0),
            route(1, 3.0, 900.0, 1.0),
            route(2, 8.0, 300.0, 5.0),
            route(2, 8.0, 300.0, 5.0),
        ];
        let weights = unit_weights(0.5, 0.3, 0.2);
        let first = select_best_routes(&routes, &weights).unwrap();
        let second = select_best_routes(&routes, &weights).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unnormalized_weights_rejected() {
        let routes = vec![route(1, 5.0, 400.0, 2.0)];
        let result = select_best_routes(&routes, &WeightTriple::new(0.5, 0.3, 0.3));
        assert!(matches!(result, Err(RaterError::InvalidWeights(_))));
    }

    #[test]
    fn test_empty_group_is_invariant_violation() {
        let routes = vec![route(1, 5.0, 400.0, 2.0)];
        let err = select_within_group(&routes, &[], &unit_weights(1.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, RaterError::InternalInvariantViolation(_)));
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let winners = select_best_routes(&[], &unit_weights(0.5, 0.3, 0.2)).unwrap();
        assert!(winners.is_empty());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let routes = vec![route(1, 5.0, 400.0, 2.0), route(1, 3.0, 900.0, 1.0)];
        let before = routes.clone();
        select_best_routes(&routes, &unit_weights(0.5, 0.3, 0.2)).unwrap();
        assert_eq!(routes, before);
    }

    #[test]
    fn test_increasing_cost_weight_never_worsens_cost_rank() {
        // Tie-free dataset: raising the cost weight must not move the winner
        // to a worse-cost-ranked candidate.
        let routes = vec![
            route(1, 2.0, 900.0, 5.0),
            route(1, 6.0, 300.0, 1.0),
            route(1, 4.0, 600.0, 3.0),
        ];
        let costs: Vec<f64> = routes.iter().map(|r| r.cost_usd).collect();
        let cost_ranks = min_ranks(&costs);

        let mut previous_rank = usize::MAX;
        for cost_weight in [0.0, 0.2, 0.5, 0.8, 1.0] {
            let weights = WeightTriple::new(1.0 - cost_weight, cost_weight, 0.0)
                .normalized()
                .unwrap();
            let winners = select_best_routes(&routes, &weights).unwrap();
            let pos = routes
                .iter()
                .position(|r| r.cost_usd == winners[0].cost_usd)
                .unwrap();
            assert!(cost_ranks[pos] <= previous_rank);
            previous_rank = cost_ranks[pos];
        }
    }
}

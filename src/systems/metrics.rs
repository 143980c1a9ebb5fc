//! Aggregate metrics pipeline. Steps run in a fixed order because each one
//! reads the results of the previous: growth feeds unemployment, which
//! feeds inflation, which feeds confidence.

use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    state::{CyclePhase, EconomyState},
};

const GDP_SMOOTHING: f64 = 0.3;
const UNEMPLOYMENT_SMOOTHING: f64 = 0.2;
const INFLATION_SMOOTHING: f64 = 0.25;

pub struct MetricsSystem;

impl MetricsSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MetricsSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MetricsSystem {
    fn name(&self) -> &str {
        "metrics"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        state: &mut EconomyState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let EconomyState {
            metrics,
            sectors,
            cycle,
            ..
        } = state;

        // GDP growth converges toward the sector-weighted target, then the
        // level compounds at the new annual rate, week by week.
        let weighted: f64 = sectors
            .values()
            .map(|sector| sector.share * sector.current_growth)
            .sum();
        let growth_target = weighted
            + (metrics.productivity - 1.0) * 0.5
            + (metrics.confidence - 50.0) / 100.0;
        metrics.gdp_growth += (growth_target - metrics.gdp_growth) * GDP_SMOOTHING;
        metrics.gdp_level *= 1.0 + metrics.gdp_growth / 52.0 / 100.0;

        let cycle_adjustment = match cycle.phase {
            CyclePhase::Recession => 0.5,
            CyclePhase::Trough => 0.2,
            CyclePhase::Expansion => -0.3,
            CyclePhase::Peak => -0.1,
        };
        let unemployment_target = (6.0 - (metrics.gdp_growth - 2.0) * 0.4 + cycle_adjustment)
            .clamp(3.0, 12.0);
        metrics.unemployment +=
            (unemployment_target - metrics.unemployment) * UNEMPLOYMENT_SMOOTHING;

        let rate_pressure = if metrics.interest_rate < 2.0 { 0.5 } else { -0.2 };
        let inflation_target = (2.0
            + ((7.0 - metrics.unemployment) * 0.3).max(0.0)
            + cycle.intensity * 0.8
            + rate_pressure
            + rng.noise(0.2))
        .max(0.0);
        metrics.inflation += (inflation_target - metrics.inflation) * INFLATION_SMOOTHING;

        // Confidence moves additively, not by smoothing.
        let mut delta = 0.0;
        if metrics.gdp_growth > 3.0 {
            delta += 2.0;
        }
        if metrics.gdp_growth < 0.0 {
            delta -= 3.0;
        }
        if metrics.unemployment < 5.0 {
            delta += 1.0;
        }
        if metrics.unemployment > 8.0 {
            delta -= 2.0;
        }
        if metrics.inflation > 4.0 {
            delta -= 2.0;
        }
        if metrics.inflation < 1.0 {
            delta -= 1.0;
        }
        delta += match cycle.phase {
            CyclePhase::Expansion => 1.0,
            CyclePhase::Recession => -2.0,
            CyclePhase::Trough => 0.5,
            CyclePhase::Peak => 0.0,
        };
        delta += rng.noise(1.0);
        metrics.confidence += delta;

        metrics.clamp_bounded();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngManager;

    fn run_once(state: &mut EconomyState, seed: u64) {
        let mut manager = RngManager::new(seed);
        let ctx = SystemContext {
            week: 1,
            scenario_name: "test",
        };
        MetricsSystem::new()
            .run(&ctx, state, &mut manager.stream("metrics"))
            .unwrap();
    }

    #[test]
    fn gdp_growth_smooths_toward_sector_weighted_target() {
        // Default sectors carry current_growth == baseline, so the target is
        // fully determined and step one has no randomness.
        let mut state = EconomyState::default();
        run_once(&mut state, 1);

        let weighted = 0.10 * 1.5 + 0.35 * 2.2 + 0.55 * 2.5;
        let target = weighted + (75.0 - 50.0) / 100.0;
        let expected = 2.1 + (target - 2.1) * 0.3;
        assert!((state.metrics.gdp_growth - expected).abs() < 1e-9);
    }

    #[test]
    fn gdp_level_compounds_weekly_at_the_new_rate() {
        let mut state = EconomyState::default();
        run_once(&mut state, 1);
        let expected = 1_000.0 * (1.0 + state.metrics.gdp_growth / 52.0 / 100.0);
        assert!((state.metrics.gdp_level - expected).abs() < 1e-9);
    }

    #[test]
    fn unemployment_follows_growth_and_phase() {
        let mut state = EconomyState::default();
        run_once(&mut state, 1);

        let g = state.metrics.gdp_growth;
        let target = (6.0 - (g - 2.0) * 0.4 - 0.3).clamp(3.0, 12.0);
        let expected = 6.0 + (target - 6.0) * 0.2;
        assert!((state.metrics.unemployment - expected).abs() < 1e-9);
    }

    #[test]
    fn inflation_lands_inside_its_noise_envelope() {
        let mut state = EconomyState::default();
        run_once(&mut state, 1);

        let u = state.metrics.unemployment;
        // interest rate 2.5 applies downward pressure
        let noiseless =
            2.0 + ((7.0 - u) * 0.3).max(0.0) + state.cycle.intensity * 0.8 - 0.2;
        let lo = 2.4 + (noiseless - 0.2 - 2.4) * 0.25;
        let hi = 2.4 + (noiseless + 0.2 - 2.4) * 0.25;
        assert!(state.metrics.inflation >= lo - 1e-9);
        assert!(state.metrics.inflation <= hi + 1e-9);
    }

    #[test]
    fn confidence_moves_additively_within_noise_band() {
        // Expansion bonus +1 is the only deterministic contribution for the
        // default metrics, so the result sits in [75, 77).
        let mut state = EconomyState::default();
        run_once(&mut state, 1);
        assert!(state.metrics.confidence >= 75.0 - 1e-9);
        assert!(state.metrics.confidence < 77.0);
    }

    #[test]
    fn bounded_metrics_stay_in_domain_under_extreme_inputs() {
        let mut state = EconomyState::default();
        state.metrics.gdp_growth = -30.0;
        state.metrics.confidence = 0.5;
        state.metrics.inflation = 0.0;
        for seed in 0..20 {
            run_once(&mut state, seed);
            assert!((3.0..=12.0).contains(&state.metrics.unemployment));
            assert!((0.0..=100.0).contains(&state.metrics.confidence));
            assert!(state.metrics.inflation >= 0.0);
        }
    }

    #[test]
    fn low_interest_rates_push_inflation_up() {
        let mut cheap = EconomyState::default();
        cheap.metrics.interest_rate = 1.0;
        let mut tight = EconomyState::default();
        tight.metrics.interest_rate = 5.0;
        run_once(&mut cheap, 42);
        run_once(&mut tight, 42);
        // Identical draws, so the 0.7-point target gap survives smoothing.
        assert!(cheap.metrics.inflation > tight.metrics.inflation);
    }
}

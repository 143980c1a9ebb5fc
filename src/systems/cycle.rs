//! Business-cycle state machine with hysteresis: phases flip on duration or
//! on metric thresholds, whichever comes first.

use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    state::{CyclePhase, EconomyState},
};

pub struct CycleSystem;

impl CycleSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CycleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for CycleSystem {
    fn name(&self) -> &str {
        "cycle"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        state: &mut EconomyState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let EconomyState { metrics, cycle, .. } = state;
        cycle.duration += 1;
        match cycle.phase {
            CyclePhase::Expansion => {
                if cycle.duration > 104 || metrics.inflation > 4.5 {
                    cycle.transition_to(CyclePhase::Peak);
                    cycle.intensity += 0.1;
                } else {
                    cycle.intensity += 0.02;
                }
            }
            CyclePhase::Peak => {
                if cycle.duration > 8 || metrics.unemployment > 7.5 {
                    cycle.transition_to(CyclePhase::Recession);
                    cycle.intensity -= 0.1;
                }
            }
            CyclePhase::Recession => {
                if cycle.duration > 52 || metrics.gdp_growth > 0.0 {
                    cycle.transition_to(CyclePhase::Trough);
                    cycle.intensity -= 0.02;
                } else {
                    cycle.intensity -= 0.03;
                }
            }
            CyclePhase::Trough => {
                if cycle.duration > 12 || metrics.confidence > 60.0 {
                    cycle.transition_to(CyclePhase::Expansion);
                    cycle.intensity += 0.05;
                }
            }
        }
        cycle.clamp_intensity();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngManager;
    use crate::state::{INTENSITY_CEILING, INTENSITY_FLOOR};

    fn advance(state: &mut EconomyState) {
        let mut manager = RngManager::new(0);
        let ctx = SystemContext {
            week: state.week + 1,
            scenario_name: "test",
        };
        CycleSystem::new()
            .run(&ctx, state, &mut manager.stream("cycle"))
            .unwrap();
    }

    #[test]
    fn expansion_drifts_up_until_inflation_forces_a_peak() {
        let mut state = EconomyState::default();
        state.metrics.inflation = 2.0;
        state.cycle.intensity = 0.5;
        advance(&mut state);
        assert_eq!(state.cycle.phase, CyclePhase::Expansion);
        assert_eq!(state.cycle.duration, 1);
        assert!((state.cycle.intensity - 0.52).abs() < 1e-12);

        state.metrics.inflation = 4.6;
        advance(&mut state);
        assert_eq!(state.cycle.phase, CyclePhase::Peak);
        assert_eq!(state.cycle.duration, 0);
        assert!((state.cycle.intensity - 0.62).abs() < 1e-12);
    }

    #[test]
    fn expansion_ages_out_after_two_years() {
        let mut state = EconomyState::default();
        state.metrics.inflation = 2.0;
        state.cycle.duration = 104;
        advance(&mut state);
        assert_eq!(state.cycle.phase, CyclePhase::Peak);
        assert_eq!(state.cycle.duration, 0);
    }

    #[test]
    fn peak_breaks_on_unemployment() {
        let mut state = EconomyState::default();
        state.cycle.transition_to(CyclePhase::Peak);
        state.cycle.intensity = 0.8;
        state.metrics.unemployment = 7.6;
        advance(&mut state);
        assert_eq!(state.cycle.phase, CyclePhase::Recession);
        assert!((state.cycle.intensity - 0.7).abs() < 1e-12);
    }

    #[test]
    fn peak_holds_below_thresholds() {
        let mut state = EconomyState::default();
        state.cycle.transition_to(CyclePhase::Peak);
        state.metrics.unemployment = 6.0;
        advance(&mut state);
        assert_eq!(state.cycle.phase, CyclePhase::Peak);
        assert_eq!(state.cycle.duration, 1);
    }

    #[test]
    fn recession_decays_intensity_then_bottoms_out() {
        let mut state = EconomyState::default();
        state.cycle.transition_to(CyclePhase::Recession);
        state.cycle.intensity = 0.5;
        state.metrics.gdp_growth = -2.0;
        advance(&mut state);
        assert_eq!(state.cycle.phase, CyclePhase::Recession);
        assert!((state.cycle.intensity - 0.47).abs() < 1e-12);

        state.metrics.gdp_growth = 0.5;
        advance(&mut state);
        assert_eq!(state.cycle.phase, CyclePhase::Trough);
        assert_eq!(state.cycle.duration, 0);
        assert!((state.cycle.intensity - 0.45).abs() < 1e-12);
    }

    #[test]
    fn trough_recovers_on_confidence_or_time() {
        let mut state = EconomyState::default();
        state.cycle.transition_to(CyclePhase::Trough);
        state.metrics.confidence = 50.0;
        advance(&mut state);
        assert_eq!(state.cycle.phase, CyclePhase::Trough);

        state.metrics.confidence = 61.0;
        advance(&mut state);
        assert_eq!(state.cycle.phase, CyclePhase::Expansion);
        assert_eq!(state.cycle.duration, 0);

        let mut aged = EconomyState::default();
        aged.cycle.transition_to(CyclePhase::Trough);
        aged.metrics.confidence = 40.0;
        aged.cycle.duration = 12;
        advance(&mut aged);
        assert_eq!(aged.cycle.phase, CyclePhase::Expansion);
    }

    #[test]
    fn intensity_stays_clamped() {
        let mut state = EconomyState::default();
        state.cycle.intensity = 0.99;
        state.metrics.inflation = 2.0;
        for _ in 0..5 {
            advance(&mut state);
        }
        assert!(state.cycle.intensity <= INTENSITY_CEILING);

        let mut low = EconomyState::default();
        low.cycle.transition_to(CyclePhase::Recession);
        low.cycle.intensity = 0.11;
        low.metrics.gdp_growth = -2.0;
        for _ in 0..5 {
            advance(&mut low);
        }
        assert!(low.cycle.intensity >= INTENSITY_FLOOR);
    }
}

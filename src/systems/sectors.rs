use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    state::EconomyState,
};

pub struct SectorSystem;

impl SectorSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SectorSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for SectorSystem {
    fn name(&self) -> &str {
        "sectors"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        state: &mut EconomyState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let EconomyState { sectors, cycle, .. } = state;
        let effect = cycle.cycle_effect();
        for sector in sectors.values_mut() {
            sector.cycle_effect = effect;
            sector.current_growth =
                sector.baseline_growth * effect + rng.noise(sector.volatility);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngManager;
    use crate::state::{CyclePhase, SectorId};

    #[test]
    fn zero_volatility_growth_is_baseline_times_cycle_effect() {
        let mut state = EconomyState::default();
        for sector in state.sectors.values_mut() {
            sector.volatility = 0.0;
        }
        state.cycle.phase = CyclePhase::Recession;
        state.cycle.intensity = 0.5;

        let mut manager = RngManager::new(3);
        let ctx = SystemContext {
            week: 1,
            scenario_name: "test",
        };
        SectorSystem::new()
            .run(&ctx, &mut state, &mut manager.stream("sectors"))
            .unwrap();

        let effect = 0.8 - 0.5 * 0.3;
        for sector in state.sectors.values() {
            assert!((sector.cycle_effect - effect).abs() < 1e-12);
            let expected = sector.baseline_growth * effect;
            assert!((sector.current_growth - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn noise_stays_within_volatility_band() {
        let mut state = EconomyState::default();
        let mut manager = RngManager::new(11);
        let ctx = SystemContext {
            week: 1,
            scenario_name: "test",
        };
        for _ in 0..100 {
            SectorSystem::new()
                .run(&ctx, &mut state, &mut manager.stream("sectors"))
                .unwrap();
            for sector in state.sectors.values() {
                let centered = sector.baseline_growth * sector.cycle_effect;
                assert!((sector.current_growth - centered).abs() <= sector.volatility);
            }
        }
    }

    #[test]
    fn sectors_draw_independent_noise() {
        let mut state = EconomyState::default();
        let mut manager = RngManager::new(17);
        let ctx = SystemContext {
            week: 1,
            scenario_name: "test",
        };
        SectorSystem::new()
            .run(&ctx, &mut state, &mut manager.stream("sectors"))
            .unwrap();
        let agriculture = &state.sectors[&SectorId::Agriculture];
        let services = &state.sectors[&SectorId::Services];
        let noise_a = agriculture.current_growth
            - agriculture.baseline_growth * agriculture.cycle_effect;
        let noise_s =
            services.current_growth - services.baseline_growth * services.cycle_effect;
        assert_ne!(noise_a, noise_s);
    }
}

use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    policy,
    rng::SystemRng,
    state::EconomyState,
};

/// Per-turn policy decay: ongoing effects land, expired policies drop off.
pub struct PolicySystem;

impl PolicySystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PolicySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PolicySystem {
    fn name(&self) -> &str {
        "policies"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        state: &mut EconomyState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        policy::advance_active(state);
        Ok(())
    }
}

use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    events::{self, Event, Severity, RANDOM_SHOCK_CHANCE},
    rng::SystemRng,
    shock::{self, ShockKind},
    state::EconomyState,
};

/// Turns continuous state into discrete narrative. Runs last so every rule
/// sees the fully updated metrics. May feed a random shock back into the
/// shock engine.
pub struct EventSystem;

impl EventSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for EventSystem {
    fn name(&self) -> &str {
        "events"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        state: &mut EconomyState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let mut fired = events::evaluate(state, rng);

        if rng.chance(RANDOM_SHOCK_CHANCE) {
            let descriptor = shock::random_descriptor(rng);
            let applied = shock::apply(state, &descriptor);
            debug!(week = ctx.week, tag = %applied.tag, "event generator rolled a shock");
            let label = applied
                .kind
                .map(|kind| kind.label())
                .unwrap_or("unexpected disruption");
            fired.push(Event::new(
                "random_shock",
                shock_severity(applied.kind),
                format!("Breaking: a {label} hits the economy."),
            ));
            state.outbox.shocks_applied.push(applied);
        }

        state.outbox.events.append(&mut fired);
        Ok(())
    }
}

fn shock_severity(kind: Option<ShockKind>) -> Severity {
    match kind {
        Some(ShockKind::TechInnovation) => Severity::Success,
        Some(ShockKind::FinancialCrisis) | Some(ShockKind::Pandemic) => Severity::Danger,
        _ => Severity::Warning,
    }
}

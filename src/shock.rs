//! Shock catalog: exogenous one-time events with no decay.

use serde::{Deserialize, Serialize};

use crate::rng::SystemRng;
use crate::state::{CyclePhase, EconomyState, MetricKey, SectorId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShockKind {
    OilPriceSpike,
    FinancialCrisis,
    TradeWar,
    Pandemic,
    SupplyChainDisruption,
    CommoditySpike,
    CurrencyFluctuation,
    TechInnovation,
    NaturalDisaster,
    GeopoliticalTension,
}

/// Weighted catalog used when the event generator rolls a random shock.
/// Systemic crises are kept rare relative to ordinary disruptions.
const RANDOM_CATALOG: [(ShockKind, u32); 10] = [
    (ShockKind::OilPriceSpike, 14),
    (ShockKind::TradeWar, 12),
    (ShockKind::SupplyChainDisruption, 14),
    (ShockKind::CommoditySpike, 12),
    (ShockKind::CurrencyFluctuation, 14),
    (ShockKind::TechInnovation, 12),
    (ShockKind::NaturalDisaster, 10),
    (ShockKind::GeopoliticalTension, 8),
    (ShockKind::FinancialCrisis, 2),
    (ShockKind::Pandemic, 2),
];

impl ShockKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "oil_price_spike" => Some(Self::OilPriceSpike),
            "financial_crisis" => Some(Self::FinancialCrisis),
            "trade_war" => Some(Self::TradeWar),
            "pandemic" => Some(Self::Pandemic),
            "supply_chain_disruption" => Some(Self::SupplyChainDisruption),
            "commodity_spike" => Some(Self::CommoditySpike),
            "currency_fluctuation" => Some(Self::CurrencyFluctuation),
            "tech_innovation" => Some(Self::TechInnovation),
            "natural_disaster" => Some(Self::NaturalDisaster),
            "geopolitical_tension" => Some(Self::GeopoliticalTension),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::OilPriceSpike => "oil_price_spike",
            Self::FinancialCrisis => "financial_crisis",
            Self::TradeWar => "trade_war",
            Self::Pandemic => "pandemic",
            Self::SupplyChainDisruption => "supply_chain_disruption",
            Self::CommoditySpike => "commodity_spike",
            Self::CurrencyFluctuation => "currency_fluctuation",
            Self::TechInnovation => "tech_innovation",
            Self::NaturalDisaster => "natural_disaster",
            Self::GeopoliticalTension => "geopolitical_tension",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OilPriceSpike => "oil price spike",
            Self::FinancialCrisis => "financial crisis",
            Self::TradeWar => "trade war",
            Self::Pandemic => "pandemic",
            Self::SupplyChainDisruption => "supply chain disruption",
            Self::CommoditySpike => "commodity price spike",
            Self::CurrencyFluctuation => "currency fluctuation",
            Self::TechInnovation => "technology breakthrough",
            Self::NaturalDisaster => "natural disaster",
            Self::GeopoliticalTension => "geopolitical tension",
        }
    }

    pub fn default_magnitude(self) -> f64 {
        match self {
            Self::CommoditySpike | Self::GeopoliticalTension => 0.8,
            Self::CurrencyFluctuation => 0.6,
            _ => 1.0,
        }
    }

    /// One-time effect, scaled linearly by `magnitude`.
    pub fn apply_effect(self, magnitude: f64, state: &mut EconomyState) {
        let m = magnitude;
        let metrics = &mut state.metrics;
        match self {
            Self::OilPriceSpike => {
                metrics.apply_delta(MetricKey::Inflation, 0.8 * m);
                metrics.apply_delta(MetricKey::GdpGrowth, -0.4 * m);
                metrics.apply_delta(MetricKey::Confidence, -5.0 * m);
                metrics.apply_delta(MetricKey::ConsumerSpending, -0.01 * m);
            }
            Self::FinancialCrisis => {
                metrics.apply_delta(MetricKey::Confidence, -20.0 * m);
                metrics.apply_delta(MetricKey::GdpGrowth, -1.5 * m);
                metrics.apply_delta(MetricKey::Investment, -0.05 * m);
                metrics.apply_delta(MetricKey::Unemployment, 1.0 * m);
                // The one shock allowed to short-circuit the cycle machine:
                // a crisis is sudden, so it skips the normal transition
                // guards and lands directly in recession.
                state.cycle.transition_to(CyclePhase::Recession);
            }
            Self::TradeWar => {
                metrics.apply_delta(MetricKey::NetExports, -0.02 * m);
                metrics.apply_delta(MetricKey::GdpGrowth, -0.5 * m);
                metrics.apply_delta(MetricKey::Confidence, -6.0 * m);
                metrics.apply_delta(MetricKey::Inflation, 0.3 * m);
            }
            Self::Pandemic => {
                metrics.apply_delta(MetricKey::GdpGrowth, -2.0 * m);
                metrics.apply_delta(MetricKey::Unemployment, 1.5 * m);
                metrics.apply_delta(MetricKey::Confidence, -15.0 * m);
                metrics.apply_delta(MetricKey::ConsumerSpending, -0.05 * m);
            }
            Self::SupplyChainDisruption => {
                metrics.apply_delta(MetricKey::Inflation, 0.6 * m);
                metrics.apply_delta(MetricKey::GdpGrowth, -0.3 * m);
                metrics.apply_delta(MetricKey::Productivity, -0.02 * m);
            }
            Self::CommoditySpike => {
                metrics.apply_delta(MetricKey::Inflation, 0.5 * m);
                metrics.apply_delta(MetricKey::ConsumerSpending, -0.01 * m);
                metrics.apply_delta(MetricKey::Confidence, -3.0 * m);
            }
            Self::CurrencyFluctuation => {
                metrics.apply_delta(MetricKey::NetExports, 0.01 * m);
                metrics.apply_delta(MetricKey::Inflation, 0.3 * m);
                metrics.apply_delta(MetricKey::Confidence, -2.0 * m);
            }
            Self::TechInnovation => {
                metrics.apply_delta(MetricKey::Productivity, 0.05 * m);
                metrics.apply_delta(MetricKey::GdpGrowth, 0.5 * m);
                metrics.apply_delta(MetricKey::Confidence, 5.0 * m);
                metrics.apply_delta(MetricKey::Investment, 0.02 * m);
            }
            Self::NaturalDisaster => {
                // The growth hit scales with how agrarian the economy is.
                let farm_share = state
                    .sectors
                    .get(&SectorId::Agriculture)
                    .map(|sector| sector.share)
                    .unwrap_or(0.0);
                metrics.apply_delta(MetricKey::GdpGrowth, -(0.3 + farm_share) * m);
                metrics.gdp_level *= 1.0 - 0.005 * m;
                metrics.apply_delta(MetricKey::Confidence, -8.0 * m);
                metrics.apply_delta(MetricKey::GovernmentSpending, 0.01 * m);
            }
            Self::GeopoliticalTension => {
                metrics.apply_delta(MetricKey::Confidence, -10.0 * m);
                metrics.apply_delta(MetricKey::Investment, -0.02 * m);
                metrics.apply_delta(MetricKey::NetExports, -0.01 * m);
            }
        }
    }
}

/// Boundary type produced by game content or the event generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShockDescriptor {
    pub kind: String,
    #[serde(default)]
    pub magnitude: Option<f64>,
}

impl ShockDescriptor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            magnitude: None,
        }
    }

    pub fn with_magnitude(kind: impl Into<String>, magnitude: f64) -> Self {
        Self {
            kind: kind.into(),
            magnitude: Some(magnitude),
        }
    }
}

/// A shock as recorded in permanent history. No further effect after
/// application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shock {
    pub kind: Option<ShockKind>,
    pub tag: String,
    pub magnitude: f64,
    pub week: u64,
}

/// Apply a shock's one-time effect and append it to the history. Unknown
/// tags are recorded with zero effect.
pub fn apply(state: &mut EconomyState, descriptor: &ShockDescriptor) -> Shock {
    let kind = ShockKind::parse(&descriptor.kind);
    let magnitude = descriptor
        .magnitude
        .or_else(|| kind.map(ShockKind::default_magnitude))
        .unwrap_or(0.0);
    if let Some(kind) = kind {
        kind.apply_effect(magnitude, state);
    }
    let shock = Shock {
        kind,
        tag: descriptor.kind.clone(),
        magnitude,
        week: state.week,
    };
    state.shock_history.push(shock.clone());
    shock
}

/// Draw a shock from the weighted catalog with a randomized magnitude.
pub fn random_descriptor(rng: &mut SystemRng<'_>) -> ShockDescriptor {
    let total: u32 = RANDOM_CATALOG.iter().map(|(_, weight)| weight).sum();
    let mut roll = (rng.uniform(0.0, total as f64)) as u32;
    let mut chosen = RANDOM_CATALOG[0].0;
    for (kind, weight) in RANDOM_CATALOG {
        if roll < weight {
            chosen = kind;
            break;
        }
        roll -= weight;
    }
    let magnitude = rng.uniform(0.4, 1.2);
    ShockDescriptor::with_magnitude(chosen.tag(), magnitude)
}

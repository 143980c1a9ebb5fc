//! Policy catalog and the active-policy decay step.
//!
//! Policies arrive as plain descriptors produced by game content. The tag is
//! parsed against the closed catalog; unrecognized tags are recorded but
//! inert, so malformed content never halts the simulation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::{EconomyState, MetricKey, SectorId};

pub const DEFAULT_DURATION_WEEKS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    FiscalStimulus,
    TaxCut,
    TaxIncrease,
    InterestRateChange,
    InfrastructureInvestment,
    EducationInvestment,
    HealthcareInvestment,
    GreenEnergyInvestment,
    TradePromotion,
    RegulationIncrease,
    RegulationDecrease,
    AgriculturalSubsidies,
    MinimumWageIncrease,
}

impl PolicyKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "fiscal_stimulus" => Some(Self::FiscalStimulus),
            "tax_cut" => Some(Self::TaxCut),
            "tax_increase" => Some(Self::TaxIncrease),
            "interest_rate_change" => Some(Self::InterestRateChange),
            "infrastructure_investment" => Some(Self::InfrastructureInvestment),
            "education_investment" => Some(Self::EducationInvestment),
            "healthcare_investment" => Some(Self::HealthcareInvestment),
            "green_energy_investment" => Some(Self::GreenEnergyInvestment),
            "trade_promotion" => Some(Self::TradePromotion),
            "regulation_increase" => Some(Self::RegulationIncrease),
            "regulation_decrease" => Some(Self::RegulationDecrease),
            "agricultural_subsidies" => Some(Self::AgriculturalSubsidies),
            "minimum_wage_increase" => Some(Self::MinimumWageIncrease),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FiscalStimulus => "fiscal stimulus",
            Self::TaxCut => "tax cut",
            Self::TaxIncrease => "tax increase",
            Self::InterestRateChange => "interest rate change",
            Self::InfrastructureInvestment => "infrastructure investment",
            Self::EducationInvestment => "education investment",
            Self::HealthcareInvestment => "healthcare investment",
            Self::GreenEnergyInvestment => "green energy investment",
            Self::TradePromotion => "trade promotion",
            Self::RegulationIncrease => "regulation increase",
            Self::RegulationDecrease => "regulation decrease",
            Self::AgriculturalSubsidies => "agricultural subsidies",
            Self::MinimumWageIncrease => "minimum wage increase",
        }
    }

    /// Magnitude used when the descriptor omits one. Units are per-kind:
    /// spending kinds are fractions of GDP, the rate change is in points.
    pub fn default_magnitude(self) -> f64 {
        match self {
            Self::FiscalStimulus => 0.02,
            Self::TaxCut => 0.02,
            Self::TaxIncrease => 0.02,
            Self::InterestRateChange => 0.5,
            Self::InfrastructureInvestment => 0.015,
            Self::EducationInvestment => 0.01,
            Self::HealthcareInvestment => 0.01,
            Self::GreenEnergyInvestment => 0.012,
            Self::TradePromotion => 0.01,
            Self::RegulationIncrease => 0.01,
            Self::RegulationDecrease => 0.01,
            Self::AgriculturalSubsidies => 0.3,
            Self::MinimumWageIncrease => 0.05,
        }
    }

    /// One-time effect applied at enactment, scaled linearly by `magnitude`.
    pub fn apply_immediate(self, magnitude: f64, state: &mut EconomyState) {
        let metrics = &mut state.metrics;
        match self {
            Self::FiscalStimulus => {
                metrics.apply_delta(MetricKey::GovernmentSpending, magnitude);
                metrics.apply_delta(MetricKey::Confidence, magnitude * 250.0);
            }
            Self::TaxCut => {
                metrics.apply_delta(MetricKey::ConsumerSpending, magnitude * 0.8);
                metrics.apply_delta(MetricKey::Confidence, magnitude * 150.0);
                metrics.apply_delta(MetricKey::GdpGrowth, magnitude * 10.0);
            }
            Self::TaxIncrease => {
                metrics.apply_delta(MetricKey::ConsumerSpending, -magnitude * 0.8);
                metrics.apply_delta(MetricKey::Confidence, -magnitude * 100.0);
                metrics.apply_delta(MetricKey::GovernmentSpending, magnitude * 0.5);
            }
            Self::InterestRateChange => {
                metrics.apply_delta(MetricKey::InterestRate, magnitude);
                metrics.apply_delta(MetricKey::Inflation, -magnitude * 0.4);
                metrics.apply_delta(MetricKey::Investment, -magnitude * 0.02);
                metrics.apply_delta(MetricKey::Confidence, -magnitude * 2.0);
            }
            Self::InfrastructureInvestment => {
                metrics.apply_delta(MetricKey::Investment, magnitude);
                metrics.apply_delta(MetricKey::GovernmentSpending, magnitude * 0.5);
                metrics.apply_delta(MetricKey::Productivity, magnitude * 0.4);
            }
            Self::EducationInvestment => {
                metrics.apply_delta(MetricKey::GovernmentSpending, magnitude * 0.5);
                metrics.apply_delta(MetricKey::Productivity, magnitude * 0.8);
            }
            Self::HealthcareInvestment => {
                metrics.apply_delta(MetricKey::GovernmentSpending, magnitude * 0.5);
                metrics.apply_delta(MetricKey::Confidence, magnitude * 200.0);
                metrics.apply_delta(MetricKey::Productivity, magnitude * 0.2);
            }
            Self::GreenEnergyInvestment => {
                metrics.apply_delta(MetricKey::Investment, magnitude * 0.8);
                metrics.apply_delta(MetricKey::Productivity, magnitude * 0.3);
                metrics.apply_delta(MetricKey::Confidence, magnitude * 100.0);
            }
            Self::TradePromotion => {
                metrics.apply_delta(MetricKey::NetExports, magnitude);
                metrics.apply_delta(MetricKey::Confidence, magnitude * 100.0);
            }
            Self::RegulationIncrease => {
                metrics.apply_delta(MetricKey::Productivity, -magnitude * 0.5);
                metrics.apply_delta(MetricKey::Confidence, -magnitude * 100.0);
                metrics.apply_delta(MetricKey::Inflation, -magnitude * 10.0);
            }
            Self::RegulationDecrease => {
                metrics.apply_delta(MetricKey::Productivity, magnitude * 0.5);
                metrics.apply_delta(MetricKey::Confidence, magnitude * 100.0);
                metrics.apply_delta(MetricKey::Investment, magnitude * 0.3);
            }
            Self::AgriculturalSubsidies => {
                metrics.apply_delta(MetricKey::GovernmentSpending, magnitude * 0.02);
                if let Some(sector) = state.sectors.get_mut(&SectorId::Agriculture) {
                    sector.baseline_growth += magnitude * 0.5;
                }
            }
            Self::MinimumWageIncrease => {
                metrics.apply_delta(MetricKey::ConsumerSpending, magnitude * 0.2);
                metrics.apply_delta(MetricKey::Inflation, magnitude * 2.0);
                metrics.apply_delta(MetricKey::Unemployment, magnitude * 4.0);
            }
        }
    }
}

/// Boundary type produced by game content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDescriptor {
    pub kind: String,
    #[serde(default)]
    pub magnitude: Option<f64>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub ongoing_effects: BTreeMap<MetricKey, f64>,
}

impl PolicyDescriptor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            magnitude: None,
            duration: None,
            ongoing_effects: BTreeMap::new(),
        }
    }
}

/// An enacted policy retained until it expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub kind: Option<PolicyKind>,
    pub tag: String,
    pub magnitude: f64,
    pub duration: u32,
    pub implemented_week: u32,
    pub ongoing_effects: BTreeMap<MetricKey, f64>,
}

/// Enact a policy: apply its one-time effect and add it to the active list.
/// Returns a copy of the recorded policy for notification.
pub fn apply(state: &mut EconomyState, descriptor: &PolicyDescriptor) -> Policy {
    let kind = PolicyKind::parse(&descriptor.kind);
    let magnitude = descriptor
        .magnitude
        .or_else(|| kind.map(PolicyKind::default_magnitude))
        .unwrap_or(0.0);
    if let Some(kind) = kind {
        kind.apply_immediate(magnitude, state);
    }
    let policy = Policy {
        kind,
        tag: descriptor.kind.clone(),
        magnitude,
        duration: descriptor.duration.unwrap_or(DEFAULT_DURATION_WEEKS),
        implemented_week: 0,
        ongoing_effects: descriptor.ongoing_effects.clone(),
    };
    state.active_policies.push(policy.clone());
    policy
}

/// Per-turn step: age every active policy, apply its ongoing deltas directly
/// to the metrics (bypassing smoothing), and drop the expired ones. Policies
/// are independent; removing one never changes how another applies.
pub fn advance_active(state: &mut EconomyState) {
    let EconomyState {
        metrics,
        active_policies,
        ..
    } = state;
    for policy in active_policies.iter_mut() {
        policy.implemented_week += 1;
        for (key, delta) in &policy.ongoing_effects {
            metrics.apply_delta(*key, *delta);
        }
    }
    active_policies.retain(|policy| policy.implemented_week < policy.duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_tag_parses_back() {
        for tag in [
            "fiscal_stimulus",
            "tax_cut",
            "tax_increase",
            "interest_rate_change",
            "infrastructure_investment",
            "education_investment",
            "healthcare_investment",
            "green_energy_investment",
            "trade_promotion",
            "regulation_increase",
            "regulation_decrease",
            "agricultural_subsidies",
            "minimum_wage_increase",
        ] {
            assert!(PolicyKind::parse(tag).is_some(), "tag {tag} should parse");
        }
        assert!(PolicyKind::parse("print_money").is_none());
    }

    #[test]
    fn fiscal_stimulus_defaults_to_exact_spending_and_confidence_boost() {
        let mut state = EconomyState::default();
        let spending_before = state.metrics.government_spending;
        let confidence_before = state.metrics.confidence;
        let policy = apply(&mut state, &PolicyDescriptor::new("fiscal_stimulus"));

        let spending_delta = state.metrics.government_spending - spending_before;
        assert!((spending_delta - 0.02).abs() < 1e-12);
        assert!((state.metrics.confidence - confidence_before - 5.0).abs() < 1e-12);
        assert_eq!(policy.duration, DEFAULT_DURATION_WEEKS);
        assert_eq!(policy.implemented_week, 0);
        assert_eq!(state.active_policies.len(), 1);
    }

    #[test]
    fn unknown_tag_is_recorded_but_inert() {
        let mut state = EconomyState::default();
        let before = state.metrics.clone();
        let policy = apply(&mut state, &PolicyDescriptor::new("print_money"));
        assert_eq!(policy.kind, None);
        assert_eq!(policy.tag, "print_money");
        assert_eq!(state.metrics, before);
        assert_eq!(state.active_policies.len(), 1);
    }

    #[test]
    fn one_week_policy_expires_after_one_step() {
        let mut state = EconomyState::default();
        let mut descriptor = PolicyDescriptor::new("trade_promotion");
        descriptor.duration = Some(1);
        apply(&mut state, &descriptor);
        assert_eq!(state.active_policies.len(), 1);
        advance_active(&mut state);
        assert!(state.active_policies.is_empty());
    }

    #[test]
    fn ongoing_effects_bypass_smoothing_and_respect_clamps() {
        let mut state = EconomyState::default();
        let mut descriptor = PolicyDescriptor::new("fiscal_stimulus");
        descriptor.duration = Some(3);
        descriptor
            .ongoing_effects
            .insert(MetricKey::GdpGrowth, 0.1);
        descriptor
            .ongoing_effects
            .insert(MetricKey::Confidence, 40.0);
        apply(&mut state, &descriptor);

        let growth_before = state.metrics.gdp_growth;
        advance_active(&mut state);
        assert!((state.metrics.gdp_growth - growth_before - 0.1).abs() < 1e-12);
        advance_active(&mut state);
        // Confidence saturates at its ceiling rather than overflowing.
        assert_eq!(state.metrics.confidence, 100.0);
        advance_active(&mut state);
        assert!(state.active_policies.is_empty());
    }

    #[test]
    fn expiry_of_one_policy_leaves_others_running() {
        let mut state = EconomyState::default();
        let mut short = PolicyDescriptor::new("tax_cut");
        short.duration = Some(1);
        let mut long = PolicyDescriptor::new("education_investment");
        long.duration = Some(5);
        long.ongoing_effects.insert(MetricKey::Productivity, 0.001);
        apply(&mut state, &short);
        apply(&mut state, &long);

        advance_active(&mut state);
        assert_eq!(state.active_policies.len(), 1);
        assert_eq!(state.active_policies[0].tag, "education_investment");
        assert_eq!(state.active_policies[0].implemented_week, 1);

        let productivity = state.metrics.productivity;
        advance_active(&mut state);
        assert!((state.metrics.productivity - productivity - 0.001).abs() < 1e-12);
    }

    #[test]
    fn agricultural_subsidies_lift_the_sector_baseline() {
        let mut state = EconomyState::default();
        let baseline = state.sectors[&SectorId::Agriculture].baseline_growth;
        apply(&mut state, &PolicyDescriptor::new("agricultural_subsidies"));
        let lifted = state.sectors[&SectorId::Agriculture].baseline_growth;
        assert!((lifted - baseline - 0.15).abs() < 1e-12);
    }
}

//! Mutable economic state owned by the engine: aggregate metrics, sectors,
//! the business-cycle state, active policies, and shock history.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::events::Event;
use crate::policy::Policy;
use crate::shock::Shock;

pub const UNEMPLOYMENT_FLOOR: f64 = 3.0;
pub const UNEMPLOYMENT_CEILING: f64 = 12.0;
pub const CONFIDENCE_FLOOR: f64 = 0.0;
pub const CONFIDENCE_CEILING: f64 = 100.0;
pub const INTENSITY_FLOOR: f64 = 0.1;
pub const INTENSITY_CEILING: f64 = 1.0;

fn default_gdp_level() -> f64 {
    1_000.0
}

fn default_gdp_growth() -> f64 {
    2.1
}

fn default_unemployment() -> f64 {
    6.0
}

fn default_inflation() -> f64 {
    2.4
}

fn default_interest_rate() -> f64 {
    2.5
}

fn default_consumer_spending() -> f64 {
    0.6
}

fn default_government_spending() -> f64 {
    0.2
}

fn default_investment() -> f64 {
    0.18
}

fn default_net_exports() -> f64 {
    0.02
}

fn default_productivity() -> f64 {
    1.0
}

fn default_confidence() -> f64 {
    75.0
}

/// Aggregate macro indicators. `unemployment` and `confidence` are clamped
/// to their domain bounds after every mutation; `inflation` never drops
/// below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default = "default_gdp_level")]
    pub gdp_level: f64,
    #[serde(default = "default_gdp_growth")]
    pub gdp_growth: f64,
    #[serde(default = "default_unemployment")]
    pub unemployment: f64,
    #[serde(default = "default_inflation")]
    pub inflation: f64,
    #[serde(default = "default_interest_rate")]
    pub interest_rate: f64,
    #[serde(default = "default_consumer_spending")]
    pub consumer_spending: f64,
    #[serde(default = "default_government_spending")]
    pub government_spending: f64,
    #[serde(default = "default_investment")]
    pub investment: f64,
    #[serde(default = "default_net_exports")]
    pub net_exports: f64,
    #[serde(default = "default_productivity")]
    pub productivity: f64,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            gdp_level: default_gdp_level(),
            gdp_growth: default_gdp_growth(),
            unemployment: default_unemployment(),
            inflation: default_inflation(),
            interest_rate: default_interest_rate(),
            consumer_spending: default_consumer_spending(),
            government_spending: default_government_spending(),
            investment: default_investment(),
            net_exports: default_net_exports(),
            productivity: default_productivity(),
            confidence: default_confidence(),
        }
    }
}

/// Addressable metric, used by policy ongoing-effect maps and shock deltas.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    GdpLevel,
    GdpGrowth,
    Unemployment,
    Inflation,
    InterestRate,
    ConsumerSpending,
    GovernmentSpending,
    Investment,
    NetExports,
    Productivity,
    Confidence,
}

impl Metrics {
    /// Direct additive mutation, bypassing smoothing. Bounded metrics stay
    /// inside their domains.
    pub fn apply_delta(&mut self, key: MetricKey, delta: f64) {
        match key {
            MetricKey::GdpLevel => self.gdp_level += delta,
            MetricKey::GdpGrowth => self.gdp_growth += delta,
            MetricKey::Unemployment => self.unemployment += delta,
            MetricKey::Inflation => self.inflation += delta,
            MetricKey::InterestRate => self.interest_rate += delta,
            MetricKey::ConsumerSpending => self.consumer_spending += delta,
            MetricKey::GovernmentSpending => self.government_spending += delta,
            MetricKey::Investment => self.investment += delta,
            MetricKey::NetExports => self.net_exports += delta,
            MetricKey::Productivity => self.productivity += delta,
            MetricKey::Confidence => self.confidence += delta,
        }
        self.clamp_bounded();
    }

    pub fn clamp_bounded(&mut self) {
        self.unemployment = self
            .unemployment
            .clamp(UNEMPLOYMENT_FLOOR, UNEMPLOYMENT_CEILING);
        self.confidence = self.confidence.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING);
        self.inflation = self.inflation.max(0.0);
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SectorId {
    Agriculture,
    Manufacturing,
    Services,
}

impl SectorId {
    pub const ALL: [SectorId; 3] = [
        SectorId::Agriculture,
        SectorId::Manufacturing,
        SectorId::Services,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SectorId::Agriculture => "agriculture",
            SectorId::Manufacturing => "manufacturing",
            SectorId::Services => "services",
        }
    }
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One economic sector. `share` and `volatility` are fixed at construction;
/// `current_growth` and `cycle_effect` are recomputed every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub share: f64,
    pub baseline_growth: f64,
    pub volatility: f64,
    pub current_growth: f64,
    pub cycle_effect: f64,
}

impl Sector {
    pub fn new(share: f64, baseline_growth: f64, volatility: f64) -> Self {
        Self {
            share,
            baseline_growth,
            volatility,
            current_growth: baseline_growth,
            cycle_effect: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Expansion,
    Peak,
    Recession,
    Trough,
}

impl CyclePhase {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "expansion" => Some(CyclePhase::Expansion),
            "peak" => Some(CyclePhase::Peak),
            "recession" => Some(CyclePhase::Recession),
            "trough" => Some(CyclePhase::Trough),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CyclePhase::Expansion => "expansion",
            CyclePhase::Peak => "peak",
            CyclePhase::Recession => "recession",
            CyclePhase::Trough => "trough",
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Business-cycle state. Phase transitions happen only in the cycle system,
/// with one documented exception: a financial-crisis shock forces an
/// immediate move to recession.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleState {
    pub phase: CyclePhase,
    pub duration: u32,
    pub intensity: f64,
}

impl Default for CycleState {
    fn default() -> Self {
        Self {
            phase: CyclePhase::Expansion,
            duration: 0,
            intensity: 0.5,
        }
    }
}

impl CycleState {
    /// Sector multiplier: a pure function of phase and intensity only.
    pub fn cycle_effect(&self) -> f64 {
        match self.phase {
            CyclePhase::Expansion => 1.0 + self.intensity * 0.2,
            CyclePhase::Peak => 1.1,
            CyclePhase::Recession => 0.8 - self.intensity * 0.3,
            CyclePhase::Trough => 0.7,
        }
    }

    /// Duration resets to zero on every phase change.
    pub fn transition_to(&mut self, phase: CyclePhase) {
        self.phase = phase;
        self.duration = 0;
    }

    pub fn clamp_intensity(&mut self) {
        self.intensity = self.intensity.clamp(INTENSITY_FLOOR, INTENSITY_CEILING);
    }
}

#[derive(Deserialize)]
struct RawCycleState {
    phase: String,
    #[serde(default)]
    duration: u32,
    #[serde(default = "default_intensity")]
    intensity: f64,
}

fn default_intensity() -> f64 {
    0.5
}

// Persisted state may carry a phase tag the engine no longer recognizes;
// recover by restarting the cycle at expansion instead of failing the load.
impl<'de> Deserialize<'de> for CycleState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawCycleState::deserialize(deserializer)?;
        let state = match CyclePhase::parse(&raw.phase) {
            Some(phase) => Self {
                phase,
                duration: raw.duration,
                intensity: raw.intensity.clamp(INTENSITY_FLOOR, INTENSITY_CEILING),
            },
            None => Self {
                phase: CyclePhase::Expansion,
                duration: 0,
                intensity: raw.intensity.clamp(INTENSITY_FLOOR, INTENSITY_CEILING),
            },
        };
        Ok(state)
    }
}

/// Per-turn outputs accumulated by the pipeline and drained by the engine
/// after the last system runs. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    pub events: Vec<Event>,
    pub shocks_applied: Vec<Shock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyState {
    pub week: u64,
    pub metrics: Metrics,
    pub sectors: BTreeMap<SectorId, Sector>,
    pub cycle: CycleState,
    pub active_policies: Vec<Policy>,
    pub shock_history: Vec<Shock>,
    #[serde(skip)]
    pub outbox: Outbox,
}

impl EconomyState {
    pub fn new(
        metrics: Metrics,
        sectors: BTreeMap<SectorId, Sector>,
        cycle: CycleState,
    ) -> Self {
        Self {
            week: 0,
            metrics,
            sectors,
            cycle,
            active_policies: Vec::new(),
            shock_history: Vec::new(),
            outbox: Outbox::default(),
        }
    }

    /// Deep, independently owned copy handed to external consumers.
    pub fn snapshot(&self) -> EconomySnapshot {
        let sectors = self
            .sectors
            .iter()
            .map(|(id, sector)| SectorSnapshot {
                id: *id,
                share: sector.share,
                baseline_growth: sector.baseline_growth,
                current_growth: sector.current_growth,
                cycle_effect: sector.cycle_effect,
            })
            .collect();
        EconomySnapshot {
            week: self.week,
            metrics: self.metrics.clone(),
            sectors,
            cycle: self.cycle.clone(),
            active_policy_count: self.active_policies.len(),
            shock_count: self.shock_history.len(),
        }
    }
}

impl Default for EconomyState {
    fn default() -> Self {
        let sectors = BTreeMap::from([
            (SectorId::Agriculture, Sector::new(0.10, 1.5, 0.8)),
            (SectorId::Manufacturing, Sector::new(0.35, 2.2, 0.6)),
            (SectorId::Services, Sector::new(0.55, 2.5, 0.4)),
        ]);
        Self::new(Metrics::default(), sectors, CycleState::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSnapshot {
    pub id: SectorId,
    pub share: f64,
    pub baseline_growth: f64,
    pub current_growth: f64,
    pub cycle_effect: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomySnapshot {
    pub week: u64,
    pub metrics: Metrics,
    pub sectors: Vec<SectorSnapshot>,
    pub cycle: CycleState,
    pub active_policy_count: usize,
    pub shock_count: usize,
}

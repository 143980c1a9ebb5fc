//! YAML scenario files: starting metrics, sectors, and cycle position.

use std::collections::BTreeMap;
use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::state::{CycleState, EconomyState, Metrics, Sector, SectorId};

fn default_snapshot_interval_weeks() -> u64 {
    0
}

fn default_volatility() -> f64 {
    0.5
}

fn default_sectors() -> Vec<SectorConfig> {
    vec![
        SectorConfig {
            id: SectorId::Agriculture,
            share: 0.10,
            baseline_growth: 1.5,
            volatility: 0.8,
        },
        SectorConfig {
            id: SectorId::Manufacturing,
            share: 0.35,
            baseline_growth: 2.2,
            volatility: 0.6,
        },
        SectorConfig {
            id: SectorId::Services,
            share: 0.55,
            baseline_growth: 2.5,
            volatility: 0.4,
        },
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub weeks: Option<u64>,
    #[serde(default = "default_snapshot_interval_weeks")]
    pub snapshot_interval_weeks: u64,
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub cycle: CycleState,
    #[serde(default = "default_sectors")]
    pub sectors: Vec<SectorConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectorConfig {
    pub id: SectorId,
    pub share: f64,
    pub baseline_growth: f64,
    #[serde(default = "default_volatility")]
    pub volatility: f64,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario must define at least one sector")]
    NoSectors,
    #[error("sector {0} defined more than once")]
    DuplicateSector(SectorId),
    #[error("sector shares sum to {0:.3}, expected 1.0")]
    BadShareSum(f64),
    #[error("sector {0} has negative volatility")]
    NegativeVolatility(SectorId),
}

impl Scenario {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.sectors.is_empty() {
            return Err(ScenarioError::NoSectors);
        }
        let mut seen = Vec::new();
        for sector in &self.sectors {
            if seen.contains(&sector.id) {
                return Err(ScenarioError::DuplicateSector(sector.id));
            }
            seen.push(sector.id);
            if sector.volatility < 0.0 {
                return Err(ScenarioError::NegativeVolatility(sector.id));
            }
        }
        let share_sum: f64 = self.sectors.iter().map(|sector| sector.share).sum();
        if (share_sum - 1.0).abs() > 1e-6 {
            return Err(ScenarioError::BadShareSum(share_sum));
        }
        Ok(())
    }

    pub fn build_state(&self) -> EconomyState {
        let sectors: BTreeMap<SectorId, Sector> = self
            .sectors
            .iter()
            .map(|config| {
                (
                    config.id,
                    Sector::new(config.share, config.baseline_growth, config.volatility),
                )
            })
            .collect();
        let mut metrics = self.metrics.clone();
        metrics.clamp_bounded();
        EconomyState::new(metrics, sectors, self.cycle.clone())
    }

    pub fn weeks(&self, override_weeks: Option<u64>) -> u64 {
        override_weeks.or(self.weeks).unwrap_or(104)
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

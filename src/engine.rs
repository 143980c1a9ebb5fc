//! The engine owns the economic state outright and advances it one turn at
//! a time. External collaborators reach it through explicit method calls
//! and receive notifications through the observer port; nothing else sees
//! the live state.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    events::Event,
    forecast::{self, Forecast},
    observer::{EconomyObserver, Notification},
    policy::{self, PolicyDescriptor},
    rng::{RngManager, SystemRng},
    shock::{self, Shock, ShockDescriptor},
    snapshot::SnapshotWriter,
    state::{EconomySnapshot, EconomyState},
    systems::{CycleSystem, EventSystem, MetricsSystem, PolicySystem, SectorSystem},
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_weeks: u64,
    pub snapshot_dir: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            scenario_name: "adhoc".to_string(),
            seed: 0,
            snapshot_interval_weeks: 0,
            snapshot_dir: PathBuf::from("snapshots"),
        }
    }
}

pub struct EngineBuilder {
    settings: EngineSettings,
    state: EconomyState,
    systems: Vec<Box<dyn System>>,
    observers: Vec<Box<dyn EconomyObserver>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            state: EconomyState::default(),
            systems: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn with_state(mut self, state: EconomyState) -> Self {
        self.state = state;
        self
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    /// The full pipeline in its fixed order: cycle, sectors, metrics,
    /// policy decay, events.
    pub fn with_default_systems(self) -> Self {
        self.with_system(CycleSystem::new())
            .with_system(SectorSystem::new())
            .with_system(MetricsSystem::new())
            .with_system(PolicySystem::new())
            .with_system(EventSystem::new())
    }

    pub fn with_observer(mut self, observer: impl EconomyObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            state: self.state,
            systems: self.systems,
            observers: self.observers,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_weeks,
            ),
            settings: self.settings,
        }
    }
}

pub struct Engine {
    settings: EngineSettings,
    state: EconomyState,
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    observers: Vec<Box<dyn EconomyObserver>>,
    snapshot_writer: SnapshotWriter,
}

impl Engine {
    /// Run one full turn of the pipeline. Completes synchronously; by the
    /// time this returns the state is fully updated and every notification
    /// for the turn has been delivered.
    pub fn advance_turn(&mut self) -> Result<TurnSummary> {
        self.state.week += 1;
        for system in &mut self.systems {
            let mut stream = self.rng.stream(system.name());
            let ctx = SystemContext {
                week: self.state.week,
                scenario_name: &self.settings.scenario_name,
            };
            system.run(&ctx, &mut self.state, &mut stream)?;
        }

        let events = std::mem::take(&mut self.state.outbox.events);
        let shocks = std::mem::take(&mut self.state.outbox.shocks_applied);
        for shock in &shocks {
            let notification = Notification::ShockApplied {
                shock: shock.clone(),
                metrics: self.state.metrics.clone(),
            };
            self.emit(&notification);
        }
        for event in &events {
            self.emit(&Notification::Event(event.clone()));
        }
        self.emit(&Notification::Update(self.state.snapshot()));

        let snapshot_path = self.snapshot_writer.maybe_write(&self.state)?;
        debug!(
            week = self.state.week,
            gdp_growth = self.state.metrics.gdp_growth,
            phase = %self.state.cycle.phase,
            "turn complete"
        );
        Ok(TurnSummary {
            week: self.state.week,
            events,
            shocks,
            snapshot_path,
        })
    }

    pub fn run(&mut self, weeks: u64) -> Result<()> {
        for _ in 0..weeks {
            self.advance_turn()?;
        }
        Ok(())
    }

    pub fn run_with_hook(
        &mut self,
        weeks: u64,
        mut hook: impl FnMut(&TurnSummary),
    ) -> Result<()> {
        for _ in 0..weeks {
            let summary = self.advance_turn()?;
            hook(&summary);
        }
        Ok(())
    }

    /// Enact a policy immediately, outside the turn pipeline.
    pub fn apply_policy(&mut self, descriptor: PolicyDescriptor) {
        let applied = policy::apply(&mut self.state, &descriptor);
        info!(tag = %applied.tag, magnitude = applied.magnitude, "policy enacted");
        let notification = Notification::PolicyApplied {
            tag: applied.tag,
            metrics: self.state.metrics.clone(),
        };
        self.emit(&notification);
    }

    /// Apply a shock immediately, outside the turn pipeline.
    pub fn apply_shock(&mut self, descriptor: ShockDescriptor) {
        let applied = shock::apply(&mut self.state, &descriptor);
        info!(tag = %applied.tag, magnitude = applied.magnitude, "shock applied");
        let notification = Notification::ShockApplied {
            shock: applied,
            metrics: self.state.metrics.clone(),
        };
        self.emit(&notification);
    }

    /// Deep-copy snapshot; later engine mutation never touches it.
    pub fn economic_state(&self) -> EconomySnapshot {
        self.state.snapshot()
    }

    /// Pure projection of the headline metrics; does not mutate anything.
    pub fn forecast(&self, weeks_ahead: u32) -> Forecast {
        forecast::project(&self.state.metrics, weeks_ahead)
    }

    pub fn week(&self) -> u64 {
        self.state.week
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    fn emit(&mut self, notification: &Notification) {
        for observer in &mut self.observers {
            observer.notify(notification);
        }
    }
}

#[derive(Debug, Clone)]
pub struct TurnSummary {
    pub week: u64,
    pub events: Vec<Event>,
    pub shocks: Vec<Shock>,
    pub snapshot_path: Option<PathBuf>,
}

pub struct SystemContext<'a> {
    pub week: u64,
    pub scenario_name: &'a str,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        state: &mut EconomyState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}

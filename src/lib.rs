pub mod engine;
pub mod events;
pub mod forecast;
pub mod observer;
pub mod policy;
pub mod rng;
pub mod scenario;
pub mod shock;
pub mod snapshot;
pub mod state;
pub mod systems;

pub use engine::{Engine, EngineBuilder, EngineSettings, TurnSummary};
pub use scenario::{Scenario, ScenarioLoader};

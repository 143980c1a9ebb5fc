//! Emit-only notification port. The engine publishes through this trait and
//! never sees the bus behind it.

use serde::Serialize;

use crate::events::Event;
use crate::shock::Shock;
use crate::state::{EconomySnapshot, Metrics};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// Full post-turn snapshot.
    Update(EconomySnapshot),
    /// A narrative event fired by the generator.
    Event(Event),
    /// A policy was enacted; carries the metrics after its immediate effect.
    PolicyApplied { tag: String, metrics: Metrics },
    /// A shock hit, whether player-issued or self-triggered.
    ShockApplied { shock: Shock, metrics: Metrics },
}

pub trait EconomyObserver {
    fn notify(&mut self, notification: &Notification);
}

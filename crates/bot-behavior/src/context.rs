use bot_agent::AgentStore;
use bot_core::Tick;
use bot_nav::{NavGraph, Router};
use bot_objective::ObjectiveTracker;

use crate::config::BotConfig;
use crate::world::WorldQuery;

/// Read-only world state passed to every bot update.
///
/// Built once per tick by the simulation and shared by all bots.  Bots
/// mutate only their own `Brain` and behavior stack.
pub struct BotContext<'a> {
    /// Current tick.
    pub tick:       Tick,
    /// Game time, seconds.
    pub now:        f32,
    /// Seconds per tick.
    pub dt:         f32,
    pub graph:      &'a NavGraph,
    pub router:     &'a dyn Router,
    pub agents:     &'a AgentStore,
    pub objectives: &'a ObjectiveTracker,
    pub world:      &'a dyn WorldQuery,
    pub config:     &'a BotConfig,
}

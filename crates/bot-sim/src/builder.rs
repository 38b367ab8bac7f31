//! Fluent builder for constructing a [`Sim`].

use bot_agent::AgentStore;
use bot_behavior::{Bot, BotConfig, BotProfile, WorldQuery};
use bot_core::{AgentId, SimConfig};
use bot_nav::{NavGraph, Router};
use bot_objective::{EventFeed, GameEvent, ObjectiveTracker};

use crate::{LocomotionSink, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<R, W, L>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, tick duration, …
/// - [`AgentStore`] — from [`bot_agent::AgentStoreBuilder`]; one bot is
///   created per body
/// - `R: Router` — the routing algorithm (e.g. [`bot_nav::AStarRouter`])
/// - `W: WorldQuery` — the host's geometry and weapon queries
/// - `L: LocomotionSink` — where commands go (e.g. [`crate::KinematicSink`])
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                          |
/// |------------------------|----------------------------------|
/// | `.graph(g)`            | `NavGraph::empty()`              |
/// | `.profiles(v)`         | `BotProfile::default()` for all  |
/// | `.bot_config(c)`       | `BotConfig::default()`           |
/// | `.setup_events(v)`     | none                             |
///
/// # Example
///
/// ```rust,ignore
/// let agents = AgentStoreBuilder::new().spawn_many(5, Team::Red, spawn).build();
/// let mut sim = SimBuilder::new(config, agents, AStarRouter::default(), world, KinematicSink::default())
///     .graph(graph)
///     .profiles(load_profiles_csv("bots.csv")?)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<R: Router, W: WorldQuery, L: LocomotionSink> {
    config:     SimConfig,
    agents:     AgentStore,
    graph:      Option<NavGraph>,
    profiles:   Option<Vec<BotProfile>>,
    bot_config: Option<BotConfig>,
    setup:      Vec<GameEvent>,
    router:     R,
    world:      W,
    sink:       L,
}

impl<R: Router, W: WorldQuery, L: LocomotionSink> SimBuilder<R, W, L> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, agents: AgentStore, router: R, world: W, sink: L) -> Self {
        Self {
            config,
            agents,
            graph:      None,
            profiles:   None,
            bot_config: None,
            setup:      Vec::new(),
            router,
            world,
            sink,
        }
    }

    /// Supply the navigation graph.
    ///
    /// If not called, an empty graph is used; bots can still fight and
    /// turn, but every path request fails and idle bots stay put.
    pub fn graph(mut self, graph: NavGraph) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Supply per-bot profiles (must be length `agent_count`).
    pub fn profiles(mut self, profiles: Vec<BotProfile>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn bot_config(mut self, config: BotConfig) -> Self {
        self.bot_config = Some(config);
        self
    }

    /// Events applied to the objective tracker before the first tick, e.g.
    /// the objectives present when the map loads.  Unlike feed events, an
    /// event the tracker rejects fails the build.
    pub fn setup_events(mut self, events: Vec<GameEvent>) -> Self {
        self.setup = events;
        self
    }

    /// Validate inputs, create one bot per body, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim<R, W, L>> {
        let agent_count = self.agents.count;
        let dt = self.config.tick_interval_secs;
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SimError::Config(format!("tick interval must be positive, got {dt}")));
        }

        // ── Validate and resolve optional inputs ──────────────────────────
        let profiles = match self.profiles {
            Some(p) => {
                if p.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      p.len(),
                        what:     "bot profiles",
                    });
                }
                p
            }
            None => vec![BotProfile::default(); agent_count],
        };

        let graph = self.graph.unwrap_or_else(NavGraph::empty);
        if graph.node_count() == 0 {
            tracing::warn!("simulation has an empty navigation graph");
        }
        let bot_config = self.bot_config.unwrap_or_default();

        let mut objectives = ObjectiveTracker::new();
        for event in &self.setup {
            objectives.apply(0.0, event)?;
        }

        // ── One bot per body ──────────────────────────────────────────────
        let bots: Vec<Bot> = profiles
            .into_iter()
            .enumerate()
            .map(|(i, profile)| Bot::new(AgentId(i as u32), profile, self.config.seed, &bot_config, dt))
            .collect();

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::Config(e.to_string()))?,
            ),
            None => None,
        };

        tracing::debug!(bots = bots.len(), nodes = graph.node_count(), "simulation built");

        Ok(Sim {
            clock:      self.config.make_clock(),
            config:     self.config,
            agents:     self.agents,
            bots,
            graph,
            router:     self.router,
            objectives,
            events:     EventFeed::new(),
            world:      self.world,
            sink:       self.sink,
            bot_config,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}

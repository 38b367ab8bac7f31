//! The `Sim` struct and its tick loop.

use bot_agent::AgentStore;
use bot_behavior::{Bot, BotCommand, BotConfig, BotContext, WorldQuery};
use bot_core::{AgentId, SimClock, SimConfig, Tick};
use bot_nav::{NavGraph, Router};
use bot_objective::{EventFeed, GameEvent, ObjectiveTracker};

use crate::observer::{StateCounts, TickSummary};
use crate::{LocomotionSink, SimObserver, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<R, W, L>` holds the match state and drives the tick loop:
///
/// 1. **Events**: drain everything due from the [`EventFeed`], apply combat
///    outcomes to bodies and objective changes to the tracker, then let
///    every bot react.
/// 2. **Decision phase** (optionally parallel with the `parallel` feature):
///    call [`Bot::update`] for every bot against one shared, read-only
///    [`BotContext`].
/// 3. **Apply phase** (sequential, ascending `AgentId` for determinism):
///    hand each living bot's command to the [`LocomotionSink`].
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: Router, W: WorldQuery, L: LocomotionSink> {
    /// Global configuration (total ticks, seed, tick duration, …).
    pub config: SimConfig,

    /// Simulation clock: the current tick and its game time.
    pub clock: SimClock,

    /// Every body in the match.  Bots read it through `BotContext`; only the
    /// event phase and the locomotion sink write to it.
    pub agents: AgentStore,

    /// One bot per agent, indexed by `AgentId`.
    pub bots: Vec<Bot>,

    pub graph: NavGraph,

    pub router: R,

    pub objectives: ObjectiveTracker,

    /// Events waiting for their tick.  The host pushes here.
    pub events: EventFeed,

    /// Line of sight, obstacle probes and weapon state.
    pub world: W,

    /// Receives commands during the apply phase.
    pub sink: L,

    pub bot_config: BotConfig,

    /// Dedicated worker pool when `config.num_threads` is set.
    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl<R: Router, W: WorldQuery, L: LocomotionSink> Sim<R, W, L> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer);
        }
        Ok(())
    }

    /// Queue `event` to take effect at `tick`.  Events for a tick that has
    /// already run are delivered on the next one.
    pub fn push_event(&mut self, tick: Tick, event: GameEvent) {
        self.events.push(tick, event);
    }

    /// Queue `event` for the upcoming tick.
    pub fn push_event_now(&mut self, event: GameEvent) {
        self.events.push(self.clock.current_tick, event);
    }

    pub fn bot(&self, agent: AgentId) -> Option<&Bot> {
        self.bots.get(agent.index())
    }

    pub fn bot_mut(&mut self, agent: AgentId) -> Option<&mut Bot> {
        self.bots.get_mut(agent.index())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let summary = self.process_tick(now, observer);
        observer.on_tick_end(now, &summary);
        if self.config.snapshot_interval_ticks > 0 && now.0 % self.config.snapshot_interval_ticks == 0 {
            observer.on_snapshot(now, &self.agents, &self.bots);
        }
        self.clock.advance();
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> TickSummary {
        let secs = self.clock.now_secs();
        let dt = self.config.tick_interval_secs;

        // ── Phase 1: ingest events ────────────────────────────────────────
        //
        // The tracker and the bodies see every event before any bot does, so
        // all bots decide against the same snapshot.
        let due = self.events.drain_due(now);
        for timed in &due {
            apply_to_bodies(&mut self.agents, &timed.event);
            if let Err(err) = self.objectives.apply(secs, &timed.event) {
                tracing::warn!(tick = %now, %err, "objective event ignored");
            }
            observer.on_event(now, &timed.event);
        }

        // Explicit field borrows so the borrow checker sees disjoint access.
        let Self {
            agents,
            bots,
            graph,
            router,
            objectives,
            world,
            sink,
            bot_config,
            #[cfg(feature = "parallel")]
            pool,
            ..
        } = self;

        let commands = {
            let ctx = BotContext {
                tick:       now,
                now:        secs,
                dt,
                graph:      &*graph,
                router:     &*router,
                agents:     &*agents,
                objectives: &*objectives,
                world:      &*world,
                config:     &*bot_config,
            };
            for timed in &due {
                for bot in bots.iter_mut() {
                    bot.on_event(&ctx, &timed.event);
                }
            }

            // ── Phase 2: decisions (produce) ──────────────────────────────
            #[cfg(not(feature = "parallel"))]
            let commands: Vec<(AgentId, BotCommand)> =
                bots.iter_mut().map(|bot| (bot.id(), bot.update(&ctx))).collect();

            #[cfg(feature = "parallel")]
            let commands: Vec<(AgentId, BotCommand)> = {
                use rayon::prelude::*;

                // `par_iter_mut` keeps index order, so commands stay sorted.
                let decide = || bots.par_iter_mut().map(|bot| (bot.id(), bot.update(&ctx))).collect::<Vec<_>>();
                match pool {
                    Some(pool) => pool.install(decide),
                    None => decide(),
                }
            };

            commands
        };

        // ── Phase 3: apply (consume) ──────────────────────────────────────
        for (agent, command) in &commands {
            if !agents.is_alive(*agent) {
                continue;
            }
            observer.on_command(now, *agent, command);
            sink.apply(*agent, command, agents, dt);
        }

        let mut states = StateCounts::default();
        let mut alive = 0;
        for bot in bots.iter().filter(|b| agents.is_alive(b.id())) {
            alive += 1;
            if let Some(tag) = bot.state() {
                *states.entry(tag).or_insert(0) += 1;
            }
        }
        tracing::trace!(tick = %now, events = due.len(), alive, "tick done");
        TickSummary { events: due.len(), alive, states }
    }
}

/// Combat outcomes reach bodies only through the feed.
fn apply_to_bodies(agents: &mut AgentStore, event: &GameEvent) {
    match *event {
        GameEvent::Damage { victim, amount, .. } if agents.contains(victim) => {
            if agents.apply_damage(victim, amount) {
                tracing::debug!(agent = %victim, "killed by damage");
            }
        }
        GameEvent::Kill { victim, .. } if agents.contains(victim) => agents.kill(victim),
        _ => {}
    }
}

//! `Bot` — one agent's decision core: a brain and its behavior stack.

use bot_core::AgentId;
use bot_objective::GameEvent;
use bot_perception::{HeardNoise, PerceptionInput};

use crate::action::{ActionNode, Query, QueryAnswer};
use crate::brain::Brain;
use crate::command::BotCommand;
use crate::config::BotConfig;
use crate::context::BotContext;
use crate::profile::{BotProfile, Disposition};
use crate::stack::BehaviorStack;
use crate::state::StateTag;
use crate::world::WorldView;

/// Morale shifts applied on combat events.
const MORALE_ON_KILL: f32 = 0.2;
const MORALE_ON_HURT: f32 = -0.05;
const MORALE_ON_TEAMMATE_LOST: f32 = -0.1;

#[derive(Clone, Debug)]
pub struct Bot {
    brain: Brain,
    stack: BehaviorStack,
}

impl Bot {
    pub fn new(me: AgentId, profile: BotProfile, seed: u64, config: &BotConfig, tick_interval_secs: f32) -> Self {
        Self {
            brain: Brain::new(me, profile, seed, config, tick_interval_secs),
            stack: BehaviorStack::new(),
        }
    }

    pub fn id(&self) -> AgentId {
        self.brain.me
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn brain_mut(&mut self) -> &mut Brain {
        &mut self.brain
    }

    pub fn stack(&self) -> &BehaviorStack {
        &self.stack
    }

    /// The current finite state, while `Behave` is active.
    pub fn state(&self) -> Option<StateTag> {
        self.stack.state_machine().map(|sm| sm.current())
    }

    pub fn query(&self, q: Query, ctx: &BotContext<'_>) -> QueryAnswer {
        self.stack.query(q, &self.brain, ctx)
    }

    // ── Tick update ───────────────────────────────────────────────────────

    /// Perceive, decide, and return this tick's command.  Dead bots stand
    /// still; a body that came back to life starts over.
    pub fn update(&mut self, ctx: &BotContext<'_>) -> BotCommand {
        let me = self.brain.me;
        let brain = &mut self.brain;
        brain.command = BotCommand::idle();
        brain.look_hint = None;
        brain.engage = false;

        if !ctx.agents.contains(me) {
            tracing::warn!(agent = %me, "bot has no body");
            return brain.command;
        }
        if !ctx.agents.is_alive(me) {
            return brain.command;
        }

        let generation = ctx.agents.generation[me.index()];
        if brain.generation.is_some_and(|g| g != generation) {
            tracing::debug!(agent = %me, generation, "respawned");
            brain.reset();
            self.stack.start(ActionNode::root(), brain, ctx);
        }
        brain.generation = Some(generation);

        let view = WorldView(ctx.world);
        let input = PerceptionInput {
            me,
            agents: ctx.agents,
            sight:  &view,
            now:    ctx.now,
            skill:  brain.profile.skill,
        };
        brain.perception.update(&ctx.config.perception, &input, &mut brain.rng);

        brain.engage = wants_to_engage(&self.stack, brain, ctx);
        self.stack.update(brain, ctx);

        if brain.command.movement.look_at.is_none() {
            brain.command.movement.look_at = brain.look_hint;
        }
        brain.command
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// React to a world event.  Events about other agents are mostly
    /// ignored; noises are offered to perception and blocked areas to the
    /// path follower.
    pub fn on_event(&mut self, ctx: &BotContext<'_>, event: &GameEvent) {
        let me = self.brain.me;
        let agents = ctx.agents;
        if !agents.contains(me) {
            return;
        }
        let brain = &mut self.brain;
        match *event {
            GameEvent::Damage { victim, attacker, from, .. } if victim == me => {
                brain.perception.on_damaged(attacker, from, ctx.now);
                brain.adjust_morale(MORALE_ON_HURT);
            }
            GameEvent::Kill { victim, killer } => {
                if killer.and_then(|k| agents.resolve(k)) == Some(me) {
                    brain.adjust_morale(MORALE_ON_KILL);
                } else if victim != me
                    && agents.contains(victim)
                    && agents.team[victim.index()] == agents.team[me.index()]
                    && agents.position[victim.index()].distance(agents.position[me.index()])
                        <= ctx.config.perception.nearby_radius
                {
                    brain.adjust_morale(MORALE_ON_TEAMMATE_LOST);
                }
            }
            GameEvent::Noise { source, position, kind } => {
                if source.and_then(|s| agents.resolve(s)) == Some(me) || !agents.is_alive(me) {
                    return;
                }
                let heard = HeardNoise { position, kind, heard_at: ctx.now, source };
                brain.perception.on_noise(&ctx.config.perception, agents.position[me.index()], heard);
            }
            GameEvent::NodeBlocked { node } => {
                if brain.mover.on_node_blocked(node) {
                    tracing::debug!(agent = %me, %node, "path runs through a blocked area");
                }
            }
            _ => {}
        }
    }
}

/// Engage the recognized enemy this tick?
fn wants_to_engage(stack: &BehaviorStack, brain: &Brain, ctx: &BotContext<'_>) -> bool {
    let Some(rec) = brain.perception.recognized_enemy() else { return false };
    if !rec.visible {
        return false;
    }
    let allowed = match brain.profile.disposition {
        Disposition::IgnoreEnemies => false,
        Disposition::SelfDefense => brain.perception.attacker.is_recent(&ctx.config.perception, ctx.now),
        Disposition::EngageAndInvestigate | Disposition::OpportunityFire => true,
    };
    allowed && stack.query(Query::ShouldAttack(rec.target), brain, ctx) != QueryAnswer::No
}

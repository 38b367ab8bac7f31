//! `Follow` — keep up with a leader (escort target, objective carrier).
//!
//! The goal leads the leader along its velocity.  Close to a stopped leader
//! the bot stands and watches where the leader looks; otherwise it matches
//! the leader's gait.  A failed path near the leader turns into a short
//! hide, further away into `Idle`.

use bot_core::geo::{dir_from_yaw, horizontal_distance};
use bot_core::{AgentHandle, Vec3};
use bot_mobility::{MoveSpeed, PathStatus};

use super::{HideRequest, Next, Transition};
use crate::brain::{Brain, Task};
use crate::config::BehaviorConfig;
use crate::context::BotContext;

/// How fast the leader is moving.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LeaderGait {
    #[default]
    Stopped,
    Walking,
    Running,
}

impl LeaderGait {
    pub fn classify(cfg: &BehaviorConfig, speed: f32) -> Self {
        if speed < cfg.leader_walk_speed {
            LeaderGait::Stopped
        } else if speed < cfg.leader_run_speed {
            LeaderGait::Walking
        } else {
            LeaderGait::Running
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FollowData {
    pub leader: Option<AgentHandle>,
    pub gait:   LeaderGait,
    /// Goal the current path was planned to.
    pub goal:   Option<Vec3>,
    /// A path was planned at least once since entry.
    pub pathed: bool,
}

impl FollowData {
    pub fn new(leader: AgentHandle) -> Self {
        Self { leader: Some(leader), ..Self::default() }
    }
}

pub fn enter(_data: &mut FollowData, brain: &mut Brain, _ctx: &BotContext<'_>) {
    brain.task = Task::Escort;
}

pub fn update(data: &mut FollowData, brain: &mut Brain, ctx: &BotContext<'_>) -> Next {
    let cfg = &ctx.config.behavior;
    let agents = ctx.agents;
    let Some(leader) = data.leader.and_then(|h| agents.resolve(h)) else {
        tracing::debug!(agent = %brain.me, "leader gone");
        return Next::Go(Transition::Idle);
    };

    let i = leader.index();
    let lead_pos = agents.position[i];
    data.gait = LeaderGait::classify(cfg, agents.speed(leader));
    let dist = horizontal_distance(brain.position(ctx), lead_pos);

    if data.gait == LeaderGait::Stopped && dist <= cfg.follow_close_range {
        brain.mover.destroy_path();
        data.goal = None;
        brain.stop();
        let eye = brain.eye(ctx);
        brain.command.movement.look_at = Some(eye + dir_from_yaw(agents.yaw[i]) * 10.0);
        return Next::Stay;
    }

    let goal = lead_pos + agents.velocity[i] * cfg.follow_lead_secs;
    let stale = data.goal.is_none_or(|g| g.distance(goal) > 1.0);
    if !brain.mover.has_path() || stale {
        let planned = if data.pathed {
            brain.repath_to(ctx, goal)
        } else {
            brain.path_to(ctx, goal).map(|()| true)
        };
        match planned {
            Ok(true) => {
                data.pathed = true;
                data.goal = Some(goal);
            }
            Ok(false) => {}
            Err(err) => {
                tracing::debug!(agent = %brain.me, %err, "cannot reach leader");
                return lost(cfg, dist);
            }
        }
    }
    if !brain.mover.has_path() {
        // Throttled with nowhere to go: wait facing the leader.
        brain.stop();
        brain.command.movement.look_at = Some(agents.eye_position(leader));
        return Next::Stay;
    }

    brain.mover.speed = match data.gait {
        LeaderGait::Running => MoveSpeed::Run,
        _ if dist > 2.0 * cfg.follow_close_range => MoveSpeed::Run,
        _ => MoveSpeed::Walk,
    };
    match brain.follow(ctx) {
        PathStatus::Progressing => Next::Stay,
        PathStatus::ReachedEnd => {
            data.goal = None;
            Next::Stay
        }
        PathStatus::Failed(why) => {
            tracing::debug!(agent = %brain.me, ?why, "lost the leader");
            lost(cfg, dist)
        }
    }
}

fn lost(cfg: &BehaviorConfig, dist: f32) -> Next {
    if dist <= cfg.follow_hide_range {
        Next::Go(Transition::Hide(HideRequest { threat: None, duration: cfg.hide_duration_secs * 0.5, retreat: false }))
    } else {
        Next::Go(Transition::Idle)
    }
}

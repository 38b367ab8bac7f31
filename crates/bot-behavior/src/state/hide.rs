//! `Hide` — get out of sight and hold there for a while.
//!
//! The spot is searched once, outward from the bot's area by travel
//! distance, for the closest hiding spot the threat's area cannot see.
//! Without a spot, or when the path there fails, the bot holds where it
//! is.  The retreat action drives the same logic in retreat mode, which
//! prefers safe routes and ignores noises.

use bot_core::{CountdownTimer, NodeId, Vec3};
use bot_mobility::{MoveSpeed, PathStatus};
use bot_nav::{find_hiding_spot, RouteMode, SpotQuery};

use super::{Next, Transition};
use crate::action::{Query, QueryAnswer};
use crate::brain::{Brain, Task};
use crate::context::BotContext;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HideRequest {
    /// Where the danger is; `None` hides from nothing in particular.
    pub threat:   Option<Vec3>,
    /// Hold time once hidden; non-positive uses the configured default.
    pub duration: f32,
    pub retreat:  bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HideData {
    pub request:  HideRequest,
    pub spot:     Option<Vec3>,
    pub searched: bool,
    pub holding:  bool,
    pub started:  f32,
    pub hold:     CountdownTimer,
    /// Noises are ignored until this runs out.
    pub grace:    CountdownTimer,
}

impl HideData {
    pub fn new(request: HideRequest) -> Self {
        Self { request, ..Self::default() }
    }
}

pub fn enter(data: &mut HideData, brain: &mut Brain, ctx: &BotContext<'_>) {
    data.started = ctx.now;
    data.grace.start(ctx.now, ctx.config.behavior.hide_grace_secs);
    brain.task = if data.request.retreat { Task::Retreat } else { Task::TakeCover };
}

/// Re-search from wherever the bot is now, unless already in place.
pub fn resume(data: &mut HideData) {
    if !data.holding {
        data.searched = false;
    }
}

pub fn update(data: &mut HideData, brain: &mut Brain, ctx: &BotContext<'_>) -> Next {
    let now = ctx.now;
    let pos = brain.position(ctx);

    if !data.searched {
        data.searched = true;
        match find_spot(ctx, pos, data.request.threat) {
            Some(spot) => {
                let mode = if data.request.retreat { RouteMode::Safest } else { brain.route_mode() };
                match brain.path_to_with(ctx, spot, mode) {
                    Ok(()) => data.spot = Some(spot),
                    Err(err) => {
                        tracing::debug!(agent = %brain.me, %err, "no path to hiding spot");
                        data.spot = None;
                    }
                }
            }
            None => data.spot = None,
        }
    }

    if !data.holding {
        let status = if data.spot.is_some() {
            brain.mover.speed = MoveSpeed::Run;
            brain.follow(ctx)
        } else {
            PathStatus::ReachedEnd
        };
        match status {
            PathStatus::Progressing => return react(data, brain, ctx),
            PathStatus::ReachedEnd => start_holding(data, brain, ctx),
            PathStatus::Failed(why) => {
                tracing::debug!(agent = %brain.me, ?why, "hiding in place");
                start_holding(data, brain, ctx);
            }
        }
    }

    brain.stop();
    brain.command.movement.crouch = true;
    brain.command.movement.look_at = data.request.threat;
    if data.hold.is_elapsed(now) {
        return Next::Done;
    }
    react(data, brain, ctx)
}

pub fn query(data: &HideData, q: Query, brain: &Brain, ctx: &BotContext<'_>) -> QueryAnswer {
    match q {
        Query::ShouldAttack(h) if data.request.retreat => {
            let close = ctx.agents.resolve(h).is_some_and(|id| {
                ctx.agents.position[id.index()].distance(brain.position(ctx))
                    <= ctx.config.behavior.carrier_self_defense_range
            });
            if close { QueryAnswer::Yes } else { QueryAnswer::No }
        }
        Query::ShouldHurry if data.request.retreat => QueryAnswer::Yes,
        _ => QueryAnswer::Abstain,
    }
}

fn start_holding(data: &mut HideData, brain: &mut Brain, ctx: &BotContext<'_>) {
    let duration = if data.request.duration > 0.0 {
        data.request.duration
    } else {
        ctx.config.behavior.hide_duration_secs
    };
    data.holding = true;
    data.hold.start(ctx.now, duration);
    brain.mover.destroy_path();
}

/// Go look at a hostile noise heard since hiding began, once the grace
/// period is over.
fn react(data: &HideData, brain: &Brain, ctx: &BotContext<'_>) -> Next {
    if data.request.retreat || !data.grace.is_elapsed(ctx.now) || !brain.profile.disposition.hunts() {
        return Next::Stay;
    }
    match brain.perception.noise.recent(&ctx.config.perception, ctx.now) {
        Some(n) if n.kind.is_hostile() && n.heard_at > data.started => Next::Go(Transition::Investigate(n.position)),
        _ => Next::Stay,
    }
}

fn find_spot(ctx: &BotContext<'_>, pos: Vec3, threat: Option<Vec3>) -> Option<Vec3> {
    let graph = ctx.graph;
    let start = graph.node_at_or_nearest(pos)?;
    let threats: Vec<NodeId> = threat.and_then(|t| graph.node_at_or_nearest(t)).into_iter().collect();
    let query = SpotQuery::new(start, pos, ctx.config.behavior.hide_search_range).hidden_from(&threats);
    find_hiding_spot(graph, &query).map(|spot| spot.pos)
}

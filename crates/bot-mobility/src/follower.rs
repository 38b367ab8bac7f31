//! `PathFollower` — per-bot path state and the steering update.
//!
//! # Tick update
//!
//! [`PathFollower::update`] runs once per tick while a path is installed:
//!
//! 1. Feed the stuck monitor; a new episode starts a wiggle/jump recovery
//!    (or aborts a ladder climb).
//! 2. If a ladder traversal is active, let it drive the body.
//! 3. Advance the cursor past every reached (or already passed) waypoint;
//!    a ladder waypoint starts a traversal.
//! 4. Check the failure conditions: fallen below the path, no waypoint
//!    reached within the progress timeout.
//! 5. Steer toward a look-ahead point, deflected by the feelers, crouching
//!    ahead of crouch areas and jumping at jump waypoints.
//!
//! Any failure destroys the path; the owning state decides what to do next.

use bot_agent::EYE_HEIGHT;
use bot_core::geo::{dir_from_yaw, flatten, horizontal_distance, left_of, yaw_towards};
use bot_core::{AgentRng, CountdownTimer, IntervalTimer, LinkId, NodeId, Vec3};
use bot_nav::{LadderMode, NavError, NavGraph, NodeFlags, Path, RouteMode, Router, Traversal, Waypoint};

use crate::body::BodyState;
use crate::command::{MoveCommand, MoveSpeed};
use crate::config::MobilityConfig;
use crate::error::{MobilityError, MobilityResult, PathFailure};
use crate::ladder::{LadderPhase, LadderStep, LadderTraversal};
use crate::stuck::StuckMonitor;

/// Height above the feet at which feelers are cast.
const FEELER_HEIGHT: f32 = 0.5;

/// Short-range obstacle test used by the feelers.  Implemented by the host.
pub trait ObstacleProbe {
    /// Distance from `from` to the first obstacle along the horizontal unit
    /// direction `dir`, if one lies within `max`.
    fn probe(&self, from: Vec3, dir: Vec3, max: f32) -> Option<f32>;
}

/// A probe that never hits anything.
#[derive(Copy, Clone, Debug, Default)]
pub struct OpenGround;

impl ObstacleProbe for OpenGround {
    fn probe(&self, _from: Vec3, _dir: Vec3, _max: f32) -> Option<f32> {
        None
    }
}

/// Shared world handles a follower needs for one tick.
pub struct MoveContext<'a> {
    pub graph:  &'a NavGraph,
    pub router: &'a dyn Router,
    pub probe:  &'a dyn ObstacleProbe,
    /// Game time, seconds.
    pub now:    f32,
}

/// Result of one [`PathFollower::update`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathStatus {
    Progressing,
    ReachedEnd,
    Failed(PathFailure),
}

enum Advance {
    End,
    Ladder(LinkId, LadderMode, Vec3),
    Steer(Waypoint),
}

/// Everything one bot knows about where it is going.
#[derive(Clone, Debug)]
pub struct PathFollower {
    path:        Option<Path>,
    mode:        RouteMode,
    /// Preferred gait; precise areas slow it to a walk.
    pub speed:   MoveSpeed,
    repath:      CountdownTimer,
    progress:    IntervalTimer,
    ladder:      Option<LadderTraversal>,
    stuck:       StuckMonitor,
    wiggle:      CountdownTimer,
    wiggle_side: f32,
    blocked:     bool,
    command:     MoveCommand,
}

impl Default for PathFollower {
    fn default() -> Self {
        Self {
            path:        None,
            mode:        RouteMode::default(),
            speed:       MoveSpeed::Run,
            repath:      CountdownTimer::default(),
            progress:    IntervalTimer::default(),
            ladder:      None,
            stuck:       StuckMonitor::new(),
            wiggle:      CountdownTimer::default(),
            wiggle_side: 1.0,
            blocked:     false,
            command:     MoveCommand::stop(),
        }
    }
}

impl PathFollower {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Planning ──────────────────────────────────────────────────────────

    /// Route from `from` to `goal` and install the resulting path.
    ///
    /// An unreachable goal still yields a path, to the closest reachable
    /// area; see [`Path::is_complete`].  Starts the repath cool-down.
    pub fn compute_path(
        &mut self,
        cfg:  &MobilityConfig,
        ctx:  &MoveContext<'_>,
        from: Vec3,
        goal: Vec3,
        mode: RouteMode,
    ) -> MobilityResult<()> {
        let graph = ctx.graph;
        let start = graph.node_at_or_nearest(from).ok_or(NavError::OffGraph(from))?;
        let end = graph.node_at_or_nearest(goal).ok_or(NavError::OffGraph(goal))?;
        let route = ctx.router.route(graph, start, end, mode)?;
        let path = Path::build(graph, &route, from, goal)?;

        tracing::debug!(
            from = %start,
            to = %end,
            waypoints = path.len(),
            complete = path.is_complete(),
            "path computed"
        );
        self.mode = mode;
        self.repath.start(ctx.now, cfg.repath_cooldown_secs);
        self.install(path, ctx.now);
        Ok(())
    }

    /// [`compute_path`](Self::compute_path), unless the cool-down since the
    /// last computation is still running.  Arriving or failing does not
    /// reset the cool-down.
    pub fn repath(
        &mut self,
        cfg:  &MobilityConfig,
        ctx:  &MoveContext<'_>,
        from: Vec3,
        goal: Vec3,
        mode: RouteMode,
    ) -> MobilityResult<()> {
        if !self.can_repath(ctx.now) {
            return Err(MobilityError::Throttled { remaining: self.repath.remaining(ctx.now) });
        }
        self.compute_path(cfg, ctx, from, goal, mode)
    }

    pub fn can_repath(&self, now: f32) -> bool {
        self.repath.is_elapsed(now)
    }

    /// Install an already-built path.
    pub fn set_path(&mut self, path: Path, now: f32) {
        self.install(path, now);
    }

    fn install(&mut self, path: Path, now: f32) {
        self.path = Some(path);
        self.ladder = None;
        self.blocked = false;
        self.stuck.reset();
        self.progress.start(now);
    }

    pub fn destroy_path(&mut self) {
        self.path = None;
        self.ladder = None;
        self.blocked = false;
        self.stuck.reset();
        self.progress.invalidate();
    }

    /// The host reports that `node` became impassable.  Returns `true` if
    /// the remaining path runs through it; the next update then fails.
    pub fn on_node_blocked(&mut self, node: NodeId) -> bool {
        let affected = self.path.as_ref().is_some_and(|p| p.contains_node(node));
        if affected {
            self.blocked = true;
        }
        affected
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    /// Goal of the installed path.
    pub fn goal(&self) -> Option<Vec3> {
        self.path.as_ref().map(Path::goal)
    }

    pub fn route_mode(&self) -> RouteMode {
        self.mode
    }

    pub fn is_on_ladder(&self) -> bool {
        self.ladder.is_some()
    }

    pub fn ladder_phase(&self) -> Option<LadderPhase> {
        self.ladder.as_ref().map(LadderTraversal::phase)
    }

    pub fn is_stuck(&self) -> bool {
        self.stuck.is_stuck()
    }

    pub fn stuck_monitor(&self) -> &StuckMonitor {
        &self.stuck
    }

    /// The command produced by the last update.
    pub fn command(&self) -> MoveCommand {
        self.command
    }

    // ── Tick update ───────────────────────────────────────────────────────

    pub fn update(
        &mut self,
        cfg:  &MobilityConfig,
        ctx:  &MoveContext<'_>,
        body: &BodyState,
        rng:  &mut AgentRng,
    ) -> PathStatus {
        let now = ctx.now;
        let pos = body.position;
        self.command = MoveCommand::stop();

        if self.path.is_none() {
            return PathStatus::Failed(PathFailure::NoPath);
        }
        if self.blocked {
            return self.fail(PathFailure::Blocked);
        }

        if self.stuck.update(cfg, now, pos) {
            if self.ladder.is_some() {
                let status = self.fail(PathFailure::LadderAborted);
                self.command.jump = true;
                return status;
            }
            if self.stuck.episodes() > cfg.max_stuck_retries {
                return self.fail(PathFailure::StuckRetriesExhausted);
            }
            self.wiggle_side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            self.wiggle.start(now, cfg.wiggle_interval_secs);
        }

        let target = loop {
            let step = self.ladder.as_mut().map(|t| match ctx.graph.ladder(t.link()) {
                Some(link) => t.update(cfg, link, body, now),
                None => LadderStep::Aborted,
            });
            match step {
                Some(LadderStep::Climbing(cmd)) => {
                    self.command = cmd;
                    return PathStatus::Progressing;
                }
                Some(LadderStep::Finished) => {
                    self.ladder = None;
                    if let Some(path) = self.path.as_mut() {
                        path.advance();
                    }
                    self.progress.start(now);
                }
                Some(LadderStep::Aborted) => {
                    let status = self.fail(PathFailure::LadderAborted);
                    self.command.jump = true;
                    return status;
                }
                None => {}
            }

            match self.advance_waypoints(cfg, ctx.graph, pos, now) {
                Advance::End => {
                    self.destroy_path();
                    return PathStatus::ReachedEnd;
                }
                Advance::Ladder(link, mode, exit) => {
                    self.ladder = Some(LadderTraversal::new(link, mode, exit, now));
                }
                Advance::Steer(w) => break w,
            }
        };

        if self.has_fallen(cfg, pos, &target) {
            return self.fail(PathFailure::Fell);
        }
        if self.progress.is_greater_than(now, cfg.progress_timeout_secs) {
            return self.fail(PathFailure::Timeout);
        }

        if self.stuck.is_stuck() {
            self.command = self.wiggle(cfg, pos, &target, now);
            return PathStatus::Progressing;
        }

        self.command = self.steer(cfg, ctx, pos, &target);
        PathStatus::Progressing
    }

    /// Move the cursor past reached waypoints and report what comes next.
    fn advance_waypoints(&mut self, cfg: &MobilityConfig, graph: &NavGraph, pos: Vec3, now: f32) -> Advance {
        let Some(path) = self.path.as_mut() else { return Advance::End };
        loop {
            let Some(w) = path.current().copied() else { return Advance::End };
            if let Some((link, mode)) = w.how.ladder() {
                return Advance::Ladder(link, mode, w.pos);
            }
            let next = path.get(path.cursor() + 1).copied();
            if is_reached(cfg, pos, &w) || is_passed(cfg, graph, pos, &w, next.as_ref()) {
                path.advance();
                self.progress.start(now);
                continue;
            }
            return Advance::Steer(w);
        }
    }

    fn has_fallen(&self, cfg: &MobilityConfig, pos: Vec3, target: &Waypoint) -> bool {
        let Some(path) = self.path.as_ref() else { return false };
        let prev_z = path
            .cursor()
            .checked_sub(1)
            .and_then(|i| path.get(i))
            .map_or(target.pos.z, |w| w.pos.z);
        pos.z < prev_z.min(target.pos.z) - cfg.fall_threshold
    }

    fn steer(&self, cfg: &MobilityConfig, ctx: &MoveContext<'_>, pos: Vec3, target: &Waypoint) -> MoveCommand {
        let graph = ctx.graph;
        let Some(path) = self.path.as_ref() else { return MoveCommand::stop() };

        let aim = look_ahead_point(cfg, graph, path, pos);
        let direction = deflect(cfg, ctx.probe, pos, flatten(aim - pos).normalize_or_zero());
        let speed = if graph.contains(target.node) && graph.flags(target.node).contains(NodeFlags::PRECISE) {
            self.speed.min(MoveSpeed::Walk)
        } else {
            self.speed
        };
        let jump = target.how == Traversal::Jump
            && horizontal_distance(pos, target.pos) <= cfg.jump_trigger_distance;

        MoveCommand {
            direction,
            speed,
            jump,
            crouch: should_crouch(cfg, graph, path, pos),
            climb: 0.0,
            look_at: Some(aim + Vec3::Z * EYE_HEIGHT),
        }
    }

    /// Stuck recovery: strafe from side to side while pressing on, jumping
    /// whenever the side changes.
    fn wiggle(&mut self, cfg: &MobilityConfig, pos: Vec3, target: &Waypoint, now: f32) -> MoveCommand {
        let mut jump = false;
        if self.wiggle.is_elapsed(now) {
            self.wiggle_side = -self.wiggle_side;
            self.wiggle.start(now, cfg.wiggle_interval_secs);
            jump = true;
        }
        let toward = flatten(target.pos - pos).normalize_or_zero();
        let direction = (toward * 0.3 + left_of(toward) * self.wiggle_side).normalize_or_zero();
        MoveCommand {
            direction,
            speed: MoveSpeed::Run,
            jump,
            crouch: false,
            climb: 0.0,
            look_at: Some(target.pos + Vec3::Z * EYE_HEIGHT),
        }
    }

    fn fail(&mut self, reason: PathFailure) -> PathStatus {
        tracing::warn!(%reason, "path following failed");
        self.destroy_path();
        self.command = MoveCommand::stop();
        PathStatus::Failed(reason)
    }
}

// ── Steering helpers ──────────────────────────────────────────────────────────

fn is_reached(cfg: &MobilityConfig, pos: Vec3, w: &Waypoint) -> bool {
    horizontal_distance(pos, w.pos) <= cfg.waypoint_radius
        && (pos.z - w.pos.z).abs() <= cfg.waypoint_height_tolerance
}

/// A plain walk waypoint counts as passed once the body is closer to the
/// following walk waypoint than the waypoint itself is.
fn is_passed(cfg: &MobilityConfig, graph: &NavGraph, pos: Vec3, w: &Waypoint, next: Option<&Waypoint>) -> bool {
    let Some(next) = next else { return false };
    w.how == Traversal::Walk
        && next.how == Traversal::Walk
        && !is_precise(graph, w.node)
        && horizontal_distance(pos, w.pos) <= cfg.look_ahead_distance
        && horizontal_distance(pos, next.pos) < horizontal_distance(w.pos, next.pos)
}

fn is_precise(graph: &NavGraph, node: NodeId) -> bool {
    graph.contains(node) && graph.flags(node).contains(NodeFlags::PRECISE)
}

/// The point `look_ahead_distance` along the remaining path, never beyond a
/// waypoint that must be hit exactly (drops, jumps, ladders, precise areas).
fn look_ahead_point(cfg: &MobilityConfig, graph: &NavGraph, path: &Path, pos: Vec3) -> Vec3 {
    let cursor = path.cursor();
    let Some(first) = path.get(cursor) else { return pos };
    if first.how != Traversal::Walk || is_precise(graph, first.node) {
        return first.pos;
    }
    let mut budget = cfg.look_ahead_distance - horizontal_distance(pos, first.pos);
    let mut prev = first.pos;
    for w in &path.waypoints()[cursor + 1..] {
        if budget <= 0.0 || w.how != Traversal::Walk || is_precise(graph, w.node) {
            break;
        }
        let seg = w.pos - prev;
        let len = seg.length();
        if len >= budget {
            return prev + seg * (budget / len);
        }
        budget -= len;
        prev = w.pos;
    }
    prev
}

/// Bend `dir` away from the side whose feeler hits first.
fn deflect(cfg: &MobilityConfig, probe: &dyn ObstacleProbe, pos: Vec3, dir: Vec3) -> Vec3 {
    if dir == Vec3::ZERO {
        return dir;
    }
    let origin = pos + Vec3::Z * FEELER_HEIGHT;
    let yaw = yaw_towards(Vec3::ZERO, dir);
    let left = probe.probe(origin, dir_from_yaw(yaw + cfg.feeler_angle_deg), cfg.feeler_length);
    let right = probe.probe(origin, dir_from_yaw(yaw - cfg.feeler_angle_deg), cfg.feeler_length);
    let side = left_of(dir) * cfg.feeler_deflection;
    let bent = match (left, right) {
        (Some(_), None) => dir - side,
        (None, Some(_)) => dir + side,
        (Some(l), Some(r)) if l < r => dir - side,
        (Some(l), Some(r)) if r < l => dir + side,
        _ => dir,
    };
    bent.normalize_or_zero()
}

/// Crouch inside a crouch area, or when one of the next waypoints within
/// `crouch_look_ahead` lies in one.
fn should_crouch(cfg: &MobilityConfig, graph: &NavGraph, path: &Path, pos: Vec3) -> bool {
    let crouch_at = |node: NodeId| graph.contains(node) && graph.flags(node).contains(NodeFlags::CROUCH);
    if graph.find_node(pos).is_some_and(crouch_at) {
        return true;
    }
    path.waypoints()[path.cursor()..]
        .iter()
        .take_while(|w| horizontal_distance(pos, w.pos) <= cfg.crouch_look_ahead)
        .any(|w| crouch_at(w.node))
}

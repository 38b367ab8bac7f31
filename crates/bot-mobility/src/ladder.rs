//! Ladder traversal sub-state machine.
//!
//! While a ladder waypoint is current, the follower hands steering to a
//! [`LadderTraversal`], which walks through five phases and overrides both
//! look and movement:
//!
//! ```text
//!   Approach ──▶ Face ──▶ Mount ──▶ Traverse ──▶ Dismount ──▶ finished
//! ```
//!
//! * **Approach** — walk to the foot (or head) of the ladder.
//! * **Face** — stand still until the view lines up with the climb direction.
//! * **Mount** — push into the ladder with climb input until attached.
//! * **Traverse** — climb until the far end is reached.
//! * **Dismount** — let go and step onto the exit waypoint.
//!
//! The whole sequence is bounded by `ladder_timeout_secs`.

use bot_agent::EYE_HEIGHT;
use bot_core::geo::{angle_diff, dir_from_yaw, horizontal_distance, normalize_angle};
use bot_core::{LinkId, Vec3};
use bot_nav::{LadderLink, LadderMode};

use crate::body::BodyState;
use crate::command::{MoveCommand, MoveSpeed};
use crate::config::MobilityConfig;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LadderPhase {
    Approach,
    Face,
    Mount,
    Traverse,
    Dismount,
}

/// Outcome of one [`LadderTraversal::update`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LadderStep {
    Climbing(MoveCommand),
    Finished,
    Aborted,
}

#[derive(Clone, Debug)]
pub struct LadderTraversal {
    link:       LinkId,
    mode:       LadderMode,
    /// Where to stand after getting off.
    exit:       Vec3,
    phase:      LadderPhase,
    started_at: f32,
}

impl LadderTraversal {
    pub fn new(link: LinkId, mode: LadderMode, exit: Vec3, now: f32) -> Self {
        tracing::trace!(%link, ?mode, "ladder traversal started");
        Self { link, mode, exit, phase: LadderPhase::Approach, started_at: now }
    }

    pub fn link(&self) -> LinkId {
        self.link
    }

    pub fn mode(&self) -> LadderMode {
        self.mode
    }

    pub fn phase(&self) -> LadderPhase {
        self.phase
    }

    pub fn update(&mut self, cfg: &MobilityConfig, ladder: &LadderLink, body: &BodyState, now: f32) -> LadderStep {
        if now - self.started_at > cfg.ladder_timeout_secs {
            tracing::warn!(link = %self.link, phase = ?self.phase, "ladder traversal timed out");
            return LadderStep::Aborted;
        }

        let (entry, far, climb, face_yaw) = match self.mode {
            LadderMode::Ascend  => (ladder.bottom, ladder.top, 1.0, ladder.climb_yaw()),
            LadderMode::Descend => (ladder.top, ladder.bottom, -1.0, normalize_angle(ladder.climb_yaw() + 180.0)),
        };
        let pos = body.position;
        let facing = pos + Vec3::Z * EYE_HEIGHT + dir_from_yaw(face_yaw) * 10.0;

        // Each arm either returns or moves to a later phase.
        loop {
            match self.phase {
                LadderPhase::Approach => {
                    if horizontal_distance(pos, entry) > cfg.ladder_mount_distance {
                        let cmd = MoveCommand::toward(pos, entry, MoveSpeed::Walk).looking_at(facing);
                        return LadderStep::Climbing(cmd);
                    }
                    self.enter(LadderPhase::Face);
                }
                LadderPhase::Face => {
                    if angle_diff(face_yaw, body.yaw).abs() > cfg.ladder_face_tolerance_deg {
                        return LadderStep::Climbing(MoveCommand::stop().looking_at(facing));
                    }
                    self.enter(LadderPhase::Mount);
                }
                LadderPhase::Mount => {
                    if !body.on_ladder {
                        let mut cmd = MoveCommand::toward(pos, entry, MoveSpeed::Walk).looking_at(facing);
                        cmd.climb = climb;
                        return LadderStep::Climbing(cmd);
                    }
                    self.enter(LadderPhase::Traverse);
                }
                LadderPhase::Traverse => {
                    let arrived = match self.mode {
                        LadderMode::Ascend  => pos.z >= far.z - cfg.ladder_end_tolerance,
                        LadderMode::Descend => pos.z <= far.z + cfg.ladder_end_tolerance,
                    };
                    if !arrived {
                        let mut cmd = MoveCommand::toward(pos, far, MoveSpeed::Walk).looking_at(facing);
                        cmd.climb = climb;
                        return LadderStep::Climbing(cmd);
                    }
                    self.enter(LadderPhase::Dismount);
                }
                LadderPhase::Dismount => {
                    if body.on_ladder || horizontal_distance(pos, self.exit) > cfg.waypoint_radius {
                        let look = self.exit + Vec3::Z * EYE_HEIGHT;
                        let cmd = MoveCommand::toward(pos, self.exit, MoveSpeed::Walk).looking_at(look);
                        return LadderStep::Climbing(cmd);
                    }
                    tracing::trace!(link = %self.link, "ladder traversal finished");
                    return LadderStep::Finished;
                }
            }
        }
    }

    fn enter(&mut self, phase: LadderPhase) {
        tracing::trace!(link = %self.link, from = ?self.phase, to = ?phase, "ladder phase");
        self.phase = phase;
    }
}

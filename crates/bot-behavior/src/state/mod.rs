//! Finite state layer run by the `Behave` action.
//!
//! Exactly one state is current.  Each state's scratch data lives in the
//! machine, one slot per state, and is reset from the transition's payload
//! on every entry, so entering a state twice with the same payload leaves
//! the same data behind.
//!
//! `Attack` is an interrupt: it may preempt any other state when the bot
//! decides to engage, and when it finishes the preempted state resumes with
//! its scratch data as it was.

pub mod attack;
pub mod capture;
pub mod carry;
pub mod follow;
pub mod hide;
pub mod idle;
pub mod investigate;
pub mod move_to;

use bot_core::{AgentHandle, ObjectiveHandle, Vec3};

use crate::action::{Query, QueryAnswer};
use crate::brain::Brain;
use crate::context::BotContext;

pub use attack::AttackData;
pub use capture::{CaptureData, HoldMode};
pub use carry::CarryData;
pub use follow::{FollowData, LeaderGait};
pub use hide::{HideData, HideRequest};
pub use idle::IdleData;
pub use investigate::InvestigateData;
pub use move_to::{MoveGoal, MoveTask, MoveToData};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateTag {
    #[default]
    Idle,
    MoveTo,
    Attack,
    Hide,
    Follow,
    InvestigateNoise,
    CaptureObjective,
    CarryObjective,
}

impl StateTag {
    pub fn as_str(self) -> &'static str {
        match self {
            StateTag::Idle => "idle",
            StateTag::MoveTo => "move_to",
            StateTag::Attack => "attack",
            StateTag::Hide => "hide",
            StateTag::Follow => "follow",
            StateTag::InvestigateNoise => "investigate_noise",
            StateTag::CaptureObjective => "capture_objective",
            StateTag::CarryObjective => "carry_objective",
        }
    }
}

/// A request to enter a state, carrying its entry parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Transition {
    Idle,
    MoveTo(MoveGoal, MoveTask),
    Attack,
    Hide(HideRequest),
    Follow(AgentHandle),
    Investigate(Vec3),
    Capture(ObjectiveHandle, HoldMode),
    Carry(ObjectiveHandle),
}

impl Transition {
    pub fn tag(&self) -> StateTag {
        match self {
            Transition::Idle => StateTag::Idle,
            Transition::MoveTo(..) => StateTag::MoveTo,
            Transition::Attack => StateTag::Attack,
            Transition::Hide(_) => StateTag::Hide,
            Transition::Follow(_) => StateTag::Follow,
            Transition::Investigate(_) => StateTag::InvestigateNoise,
            Transition::Capture(..) => StateTag::CaptureObjective,
            Transition::Carry(_) => StateTag::CarryObjective,
        }
    }
}

/// What a state's update asks of the machine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Next {
    Stay,
    Go(Transition),
    /// Finished: resume the interrupted state, or go idle.
    Done,
}

/// Per-state scratch data, one slot per state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scratch {
    pub idle:        IdleData,
    pub move_to:     MoveToData,
    pub attack:      AttackData,
    pub hide:        HideData,
    pub follow:      FollowData,
    pub investigate: InvestigateData,
    pub capture:     CaptureData,
    pub carry:       CarryData,
}

#[derive(Clone, Debug, Default)]
pub struct StateMachine {
    current:     StateTag,
    interrupted: Option<StateTag>,
    scratch:     Scratch,
    transitions: u64,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> StateTag {
        self.current
    }

    pub fn is_attacking(&self) -> bool {
        self.current == StateTag::Attack
    }

    /// The state `Attack` preempted, if any.
    pub fn interrupted(&self) -> Option<StateTag> {
        self.interrupted
    }

    pub fn scratch(&self) -> &Scratch {
        &self.scratch
    }

    /// State changes since creation.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Force `Idle`, dropping any interrupted state.
    pub fn start(&mut self, brain: &mut Brain, ctx: &BotContext<'_>) {
        self.interrupted = None;
        self.enter(Transition::Idle, brain, ctx);
    }

    pub fn update(&mut self, brain: &mut Brain, ctx: &BotContext<'_>) {
        if self.current != StateTag::Attack && brain.engage {
            self.interrupt_for_attack(brain, ctx);
        }

        let s = &mut self.scratch;
        let next = match self.current {
            StateTag::Idle => idle::update(&mut s.idle, brain, ctx),
            StateTag::MoveTo => move_to::update(&mut s.move_to, brain, ctx),
            StateTag::Attack => attack::update(&mut s.attack, brain, ctx),
            StateTag::Hide => hide::update(&mut s.hide, brain, ctx),
            StateTag::Follow => follow::update(&mut s.follow, brain, ctx),
            StateTag::InvestigateNoise => investigate::update(&mut s.investigate, brain, ctx),
            StateTag::CaptureObjective => capture::update(&mut s.capture, brain, ctx),
            StateTag::CarryObjective => carry::update(&mut s.carry, brain, ctx),
        };

        match next {
            Next::Stay => {}
            Next::Go(t) => self.switch(t, brain, ctx),
            Next::Done => self.finish(brain, ctx),
        }
    }

    /// Leave the current state and enter the one `t` names.  Any state
    /// waiting on `Attack` is discarded.
    pub fn switch(&mut self, t: Transition, brain: &mut Brain, ctx: &BotContext<'_>) {
        self.exit(brain);
        self.interrupted = None;
        self.enter(t, brain, ctx);
    }

    /// Called when the owning action is suspended.
    pub fn suspend(&mut self, brain: &mut Brain) {
        brain.mover.destroy_path();
        if self.current == StateTag::Attack {
            brain.aim.reset();
        }
    }

    /// Called when the owning action resumes; the current state re-plans.
    pub fn resume(&mut self, brain: &mut Brain) {
        self.resume_state(self.current, brain);
    }

    /// Called when the owning action ends.
    pub fn stop(&mut self, brain: &mut Brain) {
        self.exit(brain);
        self.interrupted = None;
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn query(&self, q: Query, brain: &Brain, ctx: &BotContext<'_>) -> QueryAnswer {
        let s = &self.scratch;
        match self.current {
            StateTag::Attack => attack::query(&s.attack, q, brain, ctx),
            StateTag::Hide => hide::query(&s.hide, q, brain, ctx),
            StateTag::CaptureObjective => capture::query(&s.capture, q, brain, ctx),
            StateTag::CarryObjective => carry::query(&s.carry, q, brain, ctx),
            StateTag::MoveTo => move_to::query(&s.move_to, q, brain, ctx),
            _ => QueryAnswer::Abstain,
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn enter(&mut self, t: Transition, brain: &mut Brain, ctx: &BotContext<'_>) {
        let tag = t.tag();
        let s = &mut self.scratch;
        match t {
            Transition::Idle => {
                s.idle = IdleData::default();
                idle::enter(&mut s.idle, brain, ctx);
            }
            Transition::MoveTo(goal, task) => {
                s.move_to = MoveToData::new(goal, task);
                move_to::enter(&mut s.move_to, brain, ctx);
            }
            Transition::Attack => {
                s.attack = AttackData::default();
                attack::enter(&mut s.attack, brain, ctx);
            }
            Transition::Hide(request) => {
                s.hide = HideData::new(request);
                hide::enter(&mut s.hide, brain, ctx);
            }
            Transition::Follow(leader) => {
                s.follow = FollowData::new(leader);
                follow::enter(&mut s.follow, brain, ctx);
            }
            Transition::Investigate(position) => {
                s.investigate = InvestigateData::new(position);
                investigate::enter(&mut s.investigate, brain, ctx);
            }
            Transition::Capture(objective, mode) => {
                s.capture = CaptureData::new(objective, mode);
                capture::enter(&mut s.capture, brain, ctx);
            }
            Transition::Carry(objective) => {
                s.carry = CarryData::new(objective);
                carry::enter(&mut s.carry, brain, ctx);
            }
        }
        if tag != self.current {
            tracing::debug!(agent = %brain.me, from = self.current.as_str(), to = tag.as_str(), "state change");
        }
        self.current = tag;
        self.transitions += 1;
    }

    fn exit(&mut self, brain: &mut Brain) {
        if self.current == StateTag::Attack {
            brain.aim.reset();
        }
        brain.mover.destroy_path();
    }

    fn interrupt_for_attack(&mut self, brain: &mut Brain, ctx: &BotContext<'_>) {
        brain.mover.destroy_path();
        self.interrupted = Some(self.current);
        self.enter(Transition::Attack, brain, ctx);
    }

    fn finish(&mut self, brain: &mut Brain, ctx: &BotContext<'_>) {
        self.exit(brain);
        match self.interrupted.take() {
            Some(tag) if tag != self.current => {
                tracing::debug!(agent = %brain.me, from = self.current.as_str(), to = tag.as_str(), "state resumed");
                self.current = tag;
                self.transitions += 1;
                self.resume_state(tag, brain);
            }
            _ => self.enter(Transition::Idle, brain, ctx),
        }
    }

    fn resume_state(&mut self, tag: StateTag, brain: &mut Brain) {
        let s = &mut self.scratch;
        match tag {
            StateTag::MoveTo => s.move_to.needs_path = true,
            StateTag::Hide => hide::resume(&mut s.hide),
            StateTag::Follow => {
                s.follow.goal = None;
                s.follow.pathed = false;
            }
            StateTag::InvestigateNoise => s.investigate.pathed = false,
            StateTag::CarryObjective => {
                s.carry.destination = None;
                s.carry.arrived = false;
            }
            StateTag::Idle | StateTag::Attack | StateTag::CaptureObjective => {}
        }
        brain.mover.destroy_path();
    }
}

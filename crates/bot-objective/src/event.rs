//! `EventFeed` — tick-ordered queue of world events.
//!
//! The host pushes events as they happen (possibly stamped a little in the
//! future, e.g. a delayed explosion).  Each tick the simulation drains every
//! event due at or before the current tick, in tick order and, within a
//! tick, in push order.  Each event is delivered exactly once.

use std::collections::BTreeMap;

use bot_core::{AgentHandle, AgentId, NodeId, NoiseKind, ObjectiveId, Team, Tick, Vec3};

use crate::objective::ObjectiveKind;

/// A discrete change reported by the world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    // ── Round lifecycle ───────────────────────────────────────────────────
    RoundStarted,
    RoundEnded { winner: Option<Team> },

    // ── Objectives ────────────────────────────────────────────────────────
    /// A new objective appears (or an existing slot is reused).
    ObjectiveSpawned { id: ObjectiveId, kind: ObjectiveKind, position: Vec3, owner: Team },
    /// Where `team` must bring or escort the objective to score.
    DestinationSet { id: ObjectiveId, team: Team, position: Vec3 },
    /// Capture progress in `[0, 1]` by `team`; 0 resets.
    CaptureProgress { id: ObjectiveId, team: Team, progress: f32 },
    Captured { id: ObjectiveId, team: Team },
    Locked { id: ObjectiveId, locked: bool },
    /// A carryable was taken, or an escort target was assigned.
    PickedUp { id: ObjectiveId, carrier: AgentHandle, team: Team },
    /// The objective moved (carried item or escorted agent).
    Moved { id: ObjectiveId, position: Vec3 },
    Dropped { id: ObjectiveId, position: Vec3 },
    /// A dropped carryable went back to its home position.
    Returned { id: ObjectiveId },
    Destroyed { id: ObjectiveId },

    // ── Combat ────────────────────────────────────────────────────────────
    Damage { victim: AgentId, attacker: Option<AgentHandle>, amount: f32, from: Vec3 },
    Kill { victim: AgentId, killer: Option<AgentHandle> },
    Noise { source: Option<AgentHandle>, position: Vec3, kind: NoiseKind },

    // ── Navigation ────────────────────────────────────────────────────────
    /// An area became impassable (door shut, breakable placed).  Paths
    /// through it fail on their next update.
    NodeBlocked { node: NodeId },
}

impl GameEvent {
    /// The objective this event concerns, if any.
    pub fn objective(&self) -> Option<ObjectiveId> {
        match *self {
            GameEvent::ObjectiveSpawned { id, .. }
            | GameEvent::DestinationSet { id, .. }
            | GameEvent::CaptureProgress { id, .. }
            | GameEvent::Captured { id, .. }
            | GameEvent::Locked { id, .. }
            | GameEvent::PickedUp { id, .. }
            | GameEvent::Moved { id, .. }
            | GameEvent::Dropped { id, .. }
            | GameEvent::Returned { id }
            | GameEvent::Destroyed { id } => Some(id),
            _ => None,
        }
    }
}

/// An event together with the tick it took effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedEvent {
    pub tick:  Tick,
    pub event: GameEvent,
}

/// A priority queue mapping ticks → events due at that tick.
#[derive(Default)]
pub struct EventFeed {
    inner: BTreeMap<Tick, Vec<GameEvent>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` to take effect at `tick`.
    pub fn push(&mut self, tick: Tick, event: GameEvent) {
        self.inner.entry(tick).or_default().push(event);
        self.total += 1;
    }

    /// Remove and return every event due at or before `now`, oldest first.
    pub fn drain_due(&mut self, now: Tick) -> Vec<TimedEvent> {
        let later = self.inner.split_off(&Tick(now.0.saturating_add(1)));
        let due = std::mem::replace(&mut self.inner, later);
        let mut out = Vec::new();
        for (tick, events) in due {
            self.total -= events.len();
            out.extend(events.into_iter().map(|event| TimedEvent { tick, event }));
        }
        out
    }

    /// The earliest tick with at least one queued event.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

//! `ObjectiveTracker` — the core's read model of scenario objectives.
//!
//! Objectives live in slots indexed by `ObjectiveId`.  Each slot has a
//! generation that is bumped whenever its objective is destroyed or replaced,
//! so a stale [`ObjectiveHandle`] resolves to `None` instead of silently
//! pointing at a different objective.

use bot_core::{AgentHandle, ObjectiveHandle, ObjectiveId, Team, Vec3};

use crate::event::GameEvent;
use crate::objective::{CarryState, Objective, ObjectiveKind};
use crate::{ObjectiveError, ObjectiveResult};

/// Round lifecycle as reported by the feed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundPhase {
    #[default]
    Waiting,
    Active,
    Over { winner: Option<Team> },
}

#[derive(Default)]
pub struct ObjectiveTracker {
    slots:       Vec<Option<Objective>>,
    generations: Vec<u32>,
    phase:       RoundPhase,
    round_started_at: f32,
}

impl ObjectiveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Event application ─────────────────────────────────────────────────

    /// Apply one event at game time `now`.
    ///
    /// Events that do not concern objectives or the round are ignored.  An
    /// event naming an empty slot is rejected and leaves the tracker as is.
    pub fn apply(&mut self, now: f32, event: &GameEvent) -> ObjectiveResult<()> {
        match *event {
            GameEvent::RoundStarted => {
                self.phase = RoundPhase::Active;
                self.round_started_at = now;
                tracing::debug!("round started");
            }
            GameEvent::RoundEnded { winner } => {
                self.phase = RoundPhase::Over { winner };
                tracing::debug!(?winner, "round ended");
            }
            GameEvent::ObjectiveSpawned { id, kind, position, owner } => {
                self.spawn(now, id, kind, position, owner);
            }
            GameEvent::Destroyed { id } => {
                let slot = self.slots.get_mut(id.index()).ok_or(ObjectiveError::Unknown(id))?;
                if slot.take().is_none() {
                    return Err(ObjectiveError::Unknown(id));
                }
                self.generations[id.index()] = self.generations[id.index()].wrapping_add(1);
                tracing::debug!(objective = %id, "objective destroyed");
            }
            GameEvent::DestinationSet { id, team, position } => {
                let obj = self.slot_mut(id)?;
                if let Some(i) = team.index() {
                    obj.destinations[i] = Some(position);
                }
                obj.changed_at = now;
            }
            GameEvent::CaptureProgress { id, team, progress } => {
                let obj = self.slot_mut(id)?;
                obj.progress = progress.clamp(0.0, 1.0);
                obj.capturing = if obj.progress > 0.0 { team } else { Team::Unassigned };
                obj.changed_at = now;
            }
            GameEvent::Captured { id, team } => {
                let obj = self.slot_mut(id)?;
                obj.owner = team;
                obj.progress = 0.0;
                obj.capturing = Team::Unassigned;
                obj.changed_at = now;
                tracing::debug!(objective = %id, %team, "objective captured");
            }
            GameEvent::Locked { id, locked } => {
                let obj = self.slot_mut(id)?;
                obj.locked = locked;
                obj.changed_at = now;
            }
            GameEvent::PickedUp { id, carrier, team } => {
                let obj = self.slot_mut(id)?;
                obj.carry = CarryState::Carried;
                obj.carrier = Some(carrier);
                obj.carrier_team = team;
                obj.changed_at = now;
                tracing::debug!(objective = %id, %carrier, "objective picked up");
            }
            GameEvent::Moved { id, position } => {
                self.slot_mut(id)?.position = position;
            }
            GameEvent::Dropped { id, position } => {
                let obj = self.slot_mut(id)?;
                obj.carry = CarryState::Dropped;
                obj.carrier = None;
                obj.carrier_team = Team::Unassigned;
                obj.position = position;
                obj.changed_at = now;
            }
            GameEvent::Returned { id } => {
                let obj = self.slot_mut(id)?;
                obj.carry = CarryState::AtHome;
                obj.carrier = None;
                obj.carrier_team = Team::Unassigned;
                obj.position = obj.home;
                obj.changed_at = now;
            }
            GameEvent::Damage { .. }
            | GameEvent::Kill { .. }
            | GameEvent::Noise { .. }
            | GameEvent::NodeBlocked { .. } => {}
        }
        Ok(())
    }

    fn spawn(&mut self, now: f32, id: ObjectiveId, kind: ObjectiveKind, position: Vec3, owner: Team) {
        let i = id.index();
        if i >= self.slots.len() {
            self.slots.resize_with(i + 1, || None);
            self.generations.resize(i + 1, 0);
        }
        if self.slots[i].is_some() {
            // Replacing a live objective invalidates handles to the old one.
            self.generations[i] = self.generations[i].wrapping_add(1);
        }
        let handle = ObjectiveHandle::new(id, self.generations[i]);
        self.slots[i] = Some(Objective::new(handle, kind, position, owner, now));
        tracing::debug!(objective = %handle, ?kind, %owner, "objective spawned");
    }

    fn slot_mut(&mut self, id: ObjectiveId) -> ObjectiveResult<&mut Objective> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(ObjectiveError::Unknown(id))
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Handle to the objective currently in slot `id`.
    pub fn handle(&self, id: ObjectiveId) -> Option<ObjectiveHandle> {
        self.slots.get(id.index())?.as_ref().map(|o| o.handle)
    }

    /// Resolve a handle; `None` if the objective was destroyed or replaced.
    pub fn get(&self, handle: ObjectiveHandle) -> Option<&Objective> {
        self.slots
            .get(handle.id.index())?
            .as_ref()
            .filter(|o| o.handle == handle)
    }

    pub fn is_valid(&self, handle: ObjectiveHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn owner(&self, handle: ObjectiveHandle) -> Option<Team> {
        self.get(handle).map(|o| o.owner)
    }

    pub fn carrier(&self, handle: ObjectiveHandle) -> Option<AgentHandle> {
        self.get(handle).and_then(|o| o.carrier)
    }

    pub fn is_contested(&self, handle: ObjectiveHandle) -> bool {
        self.get(handle).is_some_and(Objective::is_contested)
    }

    /// Where a member of `team` should head to advance this objective.
    ///
    /// | Kind          | Situation                        | Destination          |
    /// |---------------|----------------------------------|----------------------|
    /// | capture point | any                              | the point            |
    /// | carry item    | carried by `team`                | `team`'s destination |
    /// | carry item    | at home, dropped, or enemy-held  | the item             |
    /// | escort target | `team` owns it                   | `team`'s destination |
    /// | escort target | enemy owns it                    | the target           |
    pub fn destination_for(&self, handle: ObjectiveHandle, team: Team) -> Option<Vec3> {
        let obj = self.get(handle)?;
        let dest = match obj.kind {
            ObjectiveKind::CapturePoint => obj.position,
            ObjectiveKind::CarryItem if obj.is_carried() && obj.carrier_team == team => {
                obj.destination(team).unwrap_or(obj.position)
            }
            ObjectiveKind::CarryItem => obj.position,
            ObjectiveKind::EscortTarget if obj.owner == team => {
                obj.destination(team).unwrap_or(obj.position)
            }
            ObjectiveKind::EscortTarget => obj.position,
        };
        Some(dest)
    }

    /// `true` if an objective owned by `team` is being captured by another side.
    pub fn any_contested_against(&self, team: Team) -> bool {
        self.iter().any(|o| o.owner == team && o.is_contested())
    }

    /// Live objectives in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Objective> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_round_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    /// Seconds since the round started (0 if it has not).
    pub fn round_elapsed(&self, now: f32) -> f32 {
        match self.phase {
            RoundPhase::Waiting => 0.0,
            _ => (now - self.round_started_at).max(0.0),
        }
    }
}

//! Objective records.

use bot_core::{AgentHandle, ObjectiveHandle, Team, Vec3};

/// What kind of scenario goal an objective is.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectiveKind {
    /// A zone that teams capture by standing in it.
    CapturePoint,
    /// An item (flag, case) carried to a destination.
    CarryItem,
    /// An agent one team escorts to a destination while the other hunts it.
    EscortTarget,
}

/// Where a carryable currently is.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CarryState {
    #[default]
    AtHome,
    Carried,
    Dropped,
}

/// Snapshot of one objective as last reported by the event feed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    pub handle:   ObjectiveHandle,
    pub kind:     ObjectiveKind,
    /// Current position (follows the carrier while carried).
    pub position: Vec3,
    /// Spawn position; carryables return here.
    pub home:     Vec3,
    /// Owning side.  For carryables, the side whose item it is.
    pub owner:    Team,
    /// Side currently making capture progress, if any.
    pub capturing: Team,
    /// Capture progress in `[0, 1]`.
    pub progress: f32,
    pub locked:   bool,
    pub carry:    CarryState,
    /// Agent carrying the item, or the escort target itself.
    pub carrier:  Option<AgentHandle>,
    pub carrier_team: Team,
    /// Per-team scoring destination, indexed by `Team::index`.
    pub destinations: [Option<Vec3>; 2],
    /// Game time of the last change, in seconds.
    pub changed_at: f32,
}

impl Objective {
    pub(crate) fn new(handle: ObjectiveHandle, kind: ObjectiveKind, position: Vec3, owner: Team, now: f32) -> Self {
        Self {
            handle,
            kind,
            position,
            home: position,
            owner,
            capturing: Team::Unassigned,
            progress: 0.0,
            locked: false,
            carry: CarryState::AtHome,
            carrier: None,
            carrier_team: Team::Unassigned,
            destinations: [None, None],
            changed_at: now,
        }
    }

    /// `true` while another side is making capture progress.
    pub fn is_contested(&self) -> bool {
        self.progress > 0.0 && self.capturing.is_playing() && self.capturing != self.owner
    }

    pub fn is_carried(&self) -> bool {
        self.carry == CarryState::Carried
    }

    pub fn destination(&self, team: Team) -> Option<Vec3> {
        team.index().and_then(|i| self.destinations[i])
    }
}

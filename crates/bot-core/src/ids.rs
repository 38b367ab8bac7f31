//! Strongly typed identifiers and generational handles.
//!
//! Plain ids (`AgentId`, `NodeId`, ...) are dense indices into
//! structure-of-arrays storage and are only meaningful for the current
//! tick.  Anything a bot holds across ticks (a leader, a target, an
//! objective) is stored as a *handle*: the id plus the generation the slot
//! had when the handle was taken.  Owners bump the generation whenever the
//! slot is reused (respawn, removal), so a stale handle never resolves.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

/// Generate a generational handle over a typed id.
macro_rules! generational_handle {
    ($(#[$attr:meta])* $vis:vis struct $name:ident => $id:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name {
            pub id:         $id,
            pub generation: u32,
        }

        impl $name {
            #[inline]
            pub fn new(id: $id, generation: u32) -> Self {
                Self { id, generation }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", self.id, self.generation)
            }
        }
    };
}

typed_id! {
    /// Index of an agent body in the agent store.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a navigation-graph node (one walkable area).
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed navigation-graph edge.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Index of a vertical-traversal link (ladder).
    pub struct LinkId(u32);
}

typed_id! {
    /// Index of an objective slot in the objective tracker.
    pub struct ObjectiveId(u16);
}

generational_handle! {
    /// Cross-tick reference to an agent body.  Resolve through
    /// `AgentStore::resolve` before every use.
    pub struct AgentHandle => AgentId;
}

generational_handle! {
    /// Cross-tick reference to an objective.  Resolve through
    /// `ObjectiveTracker::get` before every use.
    pub struct ObjectiveHandle => ObjectiveId;
}

//! Fluent builder for constructing an `AgentStore`.
//!
//! # Usage
//!
//! ```rust
//! use bot_agent::AgentStoreBuilder;
//! use bot_core::{Team, Vec3};
//!
//! let store = AgentStoreBuilder::new()
//!     .spawn(Team::Red, Vec3::new(0.0, 0.0, 0.0), 0.0)
//!     .spawn(Team::Blue, Vec3::new(20.0, 0.0, 0.0), 180.0)
//!     .build();
//!
//! assert_eq!(store.count, 2);
//! assert!(store.team[0].is_enemy_of(store.team[1]));
//! ```

use bot_core::{Team, Vec3};

use crate::AgentStore;

struct Spawn {
    team: Team,
    pos:  Vec3,
    yaw:  f32,
}

/// Fluent builder for [`AgentStore`].
///
/// Agents receive sequential `AgentId`s in spawn order.  All other arrays
/// start at their defaults (alive, full health, standing still).
#[derive(Default)]
pub struct AgentStoreBuilder {
    spawns: Vec<Spawn>,
}

impl AgentStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one agent.
    pub fn spawn(mut self, team: Team, pos: Vec3, yaw: f32) -> Self {
        self.spawns.push(Spawn { team, pos, yaw });
        self
    }

    /// Queue `n` agents of `team` at `pos`.
    pub fn spawn_many(mut self, n: usize, team: Team, pos: Vec3) -> Self {
        for _ in 0..n {
            self.spawns.push(Spawn { team, pos, yaw: 0.0 });
        }
        self
    }

    pub fn len(&self) -> usize {
        self.spawns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty()
    }

    /// Construct the `AgentStore`.
    pub fn build(self) -> AgentStore {
        let mut store = AgentStore::new(self.spawns.len());
        for (i, s) in self.spawns.into_iter().enumerate() {
            store.team[i] = s.team;
            store.position[i] = s.pos;
            store.yaw[i] = s.yaw;
        }
        store
    }
}

//! Body storage: `AgentStore` (SoA data).
//!
//! Every `Vec` field has exactly `count` elements; the `AgentId` value is the
//! index into all of them:
//!
//! ```ignore
//! let pos = store.position[agent.index()];  // O(1), cache-friendly
//! ```
//!
//! # Handles
//!
//! Bots that remember another agent (a target, a leader, an attacker) hold an
//! [`AgentHandle`]: the id plus the generation it had when observed.  Every
//! death bumps the generation, so a handle taken before the death never
//! resolves again, even after the slot respawns.

use bot_core::{AgentHandle, AgentId, Team, Vec3};

/// Eye height above the feet of a standing body.
pub const EYE_HEIGHT: f32 = 1.6;

/// Eye height above the feet of a crouching body.
pub const CROUCH_EYE_HEIGHT: f32 = 1.0;

pub const MAX_HEALTH: f32 = 100.0;

/// Structure-of-Arrays storage for every body in the match.
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    // ── Kinematics ────────────────────────────────────────────────────────
    /// Feet position.
    pub position: Vec<Vec3>,
    pub velocity: Vec<Vec3>,
    /// View yaw in degrees.
    pub yaw: Vec<f32>,
    /// View pitch in degrees (positive looks up).
    pub pitch: Vec<f32>,

    // ── Status ────────────────────────────────────────────────────────────
    pub team: Vec<Team>,
    pub health: Vec<f32>,
    pub alive: Vec<bool>,
    /// Bumped on every death; see [`AgentStore::resolve`].
    pub generation: Vec<u32>,

    // ── Activity flags ────────────────────────────────────────────────────
    pub is_firing: Vec<bool>,
    pub is_reloading: Vec<bool>,
    pub is_sprinting: Vec<bool>,
    pub is_crouching: Vec<bool>,
    /// Carrying a shield or otherwise protected from the front.
    pub is_protected: Vec<bool>,
    pub on_ladder: Vec<bool>,
    pub on_ground: Vec<bool>,
}

impl AgentStore {
    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    // ── Handles ───────────────────────────────────────────────────────────

    /// A handle to `agent` as it is right now.
    #[inline]
    pub fn handle(&self, agent: AgentId) -> AgentHandle {
        AgentHandle::new(agent, self.generation[agent.index()])
    }

    /// Resolve a handle to a living agent.
    ///
    /// `None` if the id is out of range, the agent is dead, or it has died
    /// since the handle was taken.
    #[inline]
    pub fn resolve(&self, handle: AgentHandle) -> Option<AgentId> {
        let i = handle.id.index();
        (i < self.count && self.alive[i] && self.generation[i] == handle.generation).then_some(handle.id)
    }

    #[inline]
    pub fn is_valid(&self, handle: AgentHandle) -> bool {
        self.resolve(handle).is_some()
    }

    // ── Derived queries ───────────────────────────────────────────────────

    #[inline]
    pub fn is_alive(&self, agent: AgentId) -> bool {
        self.contains(agent) && self.alive[agent.index()]
    }

    /// Eye position, accounting for crouch.
    #[inline]
    pub fn eye_position(&self, agent: AgentId) -> Vec3 {
        let i = agent.index();
        let h = if self.is_crouching[i] { CROUCH_EYE_HEIGHT } else { EYE_HEIGHT };
        self.position[i] + Vec3::Z * h
    }

    /// Center of mass, used as the default aim point.
    #[inline]
    pub fn chest_position(&self, agent: AgentId) -> Vec3 {
        let i = agent.index();
        let h = if self.is_crouching[i] { CROUCH_EYE_HEIGHT } else { EYE_HEIGHT };
        self.position[i] + Vec3::Z * (h * 0.7)
    }

    /// Horizontal speed.
    #[inline]
    pub fn speed(&self, agent: AgentId) -> f32 {
        let v = self.velocity[agent.index()];
        (v.x * v.x + v.y * v.y).sqrt()
    }

    /// Health as a fraction of [`MAX_HEALTH`].
    #[inline]
    pub fn health_ratio(&self, agent: AgentId) -> f32 {
        (self.health[agent.index()] / MAX_HEALTH).clamp(0.0, 1.0)
    }

    /// Living agents within `radius` of `pos`, excluding `except`.
    pub fn nearby(&self, pos: Vec3, radius: f32, except: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        let r2 = radius * radius;
        self.agent_ids().filter(move |&a| {
            a != except && self.alive[a.index()] && self.position[a.index()].distance_squared(pos) <= r2
        })
    }

    /// Living members of `team`.
    pub fn members(&self, team: Team) -> impl Iterator<Item = AgentId> + '_ {
        self.agent_ids()
            .filter(move |&a| self.alive[a.index()] && self.team[a.index()] == team)
    }

    // ── Host-side mutation ────────────────────────────────────────────────

    /// Mark an agent dead and invalidate all handles to it.
    pub fn kill(&mut self, agent: AgentId) {
        let i = agent.index();
        if !self.alive[i] {
            return;
        }
        self.alive[i] = false;
        self.health[i] = 0.0;
        self.velocity[i] = Vec3::ZERO;
        self.is_firing[i] = false;
        self.is_sprinting[i] = false;
        self.generation[i] = self.generation[i].wrapping_add(1);
        tracing::trace!(agent = %agent, generation = self.generation[i], "body killed");
    }

    /// Bring an agent back at `pos` with full health.
    pub fn respawn(&mut self, agent: AgentId, pos: Vec3, yaw: f32) {
        let i = agent.index();
        if self.alive[i] {
            // Respawning a living body still severs old references.
            self.generation[i] = self.generation[i].wrapping_add(1);
        }
        self.alive[i] = true;
        self.health[i] = MAX_HEALTH;
        self.position[i] = pos;
        self.velocity[i] = Vec3::ZERO;
        self.yaw[i] = yaw;
        self.pitch[i] = 0.0;
        self.is_firing[i] = false;
        self.is_reloading[i] = false;
        self.is_sprinting[i] = false;
        self.is_crouching[i] = false;
        self.on_ladder[i] = false;
        self.on_ground[i] = true;
    }

    /// Subtract `amount` health; kills the agent at zero.  Returns `true` if
    /// this call killed it.
    pub fn apply_damage(&mut self, agent: AgentId, amount: f32) -> bool {
        let i = agent.index();
        if !self.alive[i] {
            return false;
        }
        self.health[i] = (self.health[i] - amount).max(0.0);
        if self.health[i] <= 0.0 {
            self.kill(agent);
            return true;
        }
        false
    }

    // ── Package-private constructor used by AgentStoreBuilder ─────────────

    pub(crate) fn new(count: usize) -> Self {
        Self {
            count,
            position:     vec![Vec3::ZERO; count],
            velocity:     vec![Vec3::ZERO; count],
            yaw:          vec![0.0; count],
            pitch:        vec![0.0; count],
            team:         vec![Team::Unassigned; count],
            health:       vec![MAX_HEALTH; count],
            alive:        vec![true; count],
            generation:   vec![0; count],
            is_firing:    vec![false; count],
            is_reloading: vec![false; count],
            is_sprinting: vec![false; count],
            is_crouching: vec![false; count],
            is_protected: vec![false; count],
            on_ladder:    vec![false; count],
            on_ground:    vec![true; count],
        }
    }
}

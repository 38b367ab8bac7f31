//! What the follower needs to know about the body it steers.

use bot_agent::AgentStore;
use bot_core::{AgentId, Vec3};

/// Kinematic snapshot of one body, taken at the start of a tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyState {
    /// Feet position.
    pub position:  Vec3,
    /// View yaw in degrees.
    pub yaw:       f32,
    pub on_ground: bool,
    pub on_ladder: bool,
}

impl BodyState {
    pub fn of(agents: &AgentStore, agent: AgentId) -> Self {
        let i = agent.index();
        Self {
            position:  agents.position[i],
            yaw:       agents.yaw[i],
            on_ground: agents.on_ground[i],
            on_ladder: agents.on_ladder[i],
        }
    }
}

//! Perception tuning.
//!
//! None of these numbers are load-bearing for correctness.  They encode only
//! "closer, slower, more exposed targets are easier to notice and hit" and
//! "better bots react faster".

/// All perception tuning constants.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerceptionConfig {
    // ── Sight ─────────────────────────────────────────────────────────────
    /// Full field-of-view cone angle, degrees.
    pub fov_degrees: f32,
    /// Nothing farther than this is ever seen.
    pub max_sight_range: f32,
    /// Radius for the nearby friend/enemy head counts.
    pub nearby_radius: f32,

    // ── Noticing ──────────────────────────────────────────────────────────
    /// Distance at which noticeability starts to fall off.
    pub notice_near_range: f32,
    /// Distance at which the distance factor bottoms out.
    pub notice_far_range: f32,
    /// Noticeability floor from distance alone, in `[0, 1]`.
    pub notice_far_factor: f32,
    /// Target speed at which the movement factor saturates.
    pub notice_speed_saturation: f32,
    /// Fraction of noticeability lost at saturation speed, in `[0, 1]`.
    pub notice_speed_penalty: f32,
    /// Noticeability multiplier for the least skilled bots.
    pub notice_min_skill_factor: f32,

    // ── Reaction ──────────────────────────────────────────────────────────
    /// Reaction queue length, in ticks.
    pub reaction_queue_capacity: usize,
    /// Reaction latency of a bot with skill 1.
    pub min_reaction_secs: f32,
    /// Reaction latency of a bot with skill 0.
    pub max_reaction_secs: f32,
    /// How long a recognized enemy is remembered after losing sight of it.
    pub lost_sight_grace_secs: f32,

    // ── Hearing & memory ──────────────────────────────────────────────────
    /// Multiplier on every noise kind's audible range.
    pub hearing_scale: f32,
    /// How long a heard noise stays interesting.
    pub noise_memory_secs: f32,
    /// How long the last attacker is remembered.
    pub attacker_memory_secs: f32,

    // ── Aim ───────────────────────────────────────────────────────────────
    /// Angular aim error (degrees) at full accuracy.
    pub min_aim_error_deg: f32,
    /// Angular aim error (degrees) at zero accuracy.
    pub max_aim_error_deg: f32,
    /// Seconds of steady aim needed for full focus.
    pub focus_time_secs: f32,
    /// Share of accuracy that comes from focus rather than skill.
    pub focus_weight: f32,
    /// Randomized error recompute interval bounds, seconds.
    pub aim_recompute_min_secs: f32,
    pub aim_recompute_max_secs: f32,
    /// Bearing change (degrees) that resets focus and recomputes at once.
    pub aim_retrack_deg: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            fov_degrees:             90.0,
            max_sight_range:         120.0,
            nearby_radius:           25.0,

            notice_near_range:       10.0,
            notice_far_range:        80.0,
            notice_far_factor:       0.1,
            notice_speed_saturation: 6.0,
            notice_speed_penalty:    0.4,
            notice_min_skill_factor: 0.4,

            reaction_queue_capacity: 16,
            min_reaction_secs:       0.1,
            max_reaction_secs:       0.5,
            lost_sight_grace_secs:   3.0,

            hearing_scale:           1.0,
            noise_memory_secs:       8.0,
            attacker_memory_secs:    5.0,

            min_aim_error_deg:       0.5,
            max_aim_error_deg:       10.0,
            focus_time_secs:         2.0,
            focus_weight:            0.5,
            aim_recompute_min_secs:  0.3,
            aim_recompute_max_secs:  0.8,
            aim_retrack_deg:         20.0,
        }
    }
}

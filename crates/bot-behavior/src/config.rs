//! Behavior tuning and the bundle of per-subsystem configs a bot reads.

use bot_mobility::MobilityConfig;
use bot_perception::PerceptionConfig;

/// Tuning for actions and states.  Durations are seconds, distances world
/// units.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorConfig {
    // ── Tactical monitor ──────────────────────────────────────────────────
    /// Below this health ratio an outnumbered bot retreats.
    pub retreat_health_ratio: f32,
    /// Retreat ends once no enemy has been recognized for this long.
    pub retreat_safe_secs:    f32,
    pub retreat_max_secs:     f32,
    pub reload_timeout_secs:  f32,

    // ── Attack ────────────────────────────────────────────────────────────
    /// Give up chasing an unseen enemy after this long.
    pub chase_secs:            f32,
    pub dodge_interval_min:    f32,
    pub dodge_interval_max:    f32,
    /// Chance per dodge decision, scaled by aggression, to crouch and hold.
    pub crouch_hold_chance:    f32,
    pub crouch_hold_secs:      f32,
    /// Fire only when the view is within this many degrees of the aim point.
    pub fire_tolerance_deg:    f32,

    // ── Hide ──────────────────────────────────────────────────────────────
    pub hide_search_range:  f32,
    pub hide_duration_secs: f32,
    /// Noises are ignored for this long after starting to hide.
    pub hide_grace_secs:    f32,

    // ── Follow ────────────────────────────────────────────────────────────
    /// The follow goal leads the leader by this much of its velocity.
    pub follow_lead_secs:   f32,
    /// Stand still when this close to a stopped leader.
    pub follow_close_range: f32,
    /// Hide instead of giving up when a path fails this close to the leader.
    pub follow_hide_range:  f32,
    /// Leader speeds separating stopped / walking / running.
    pub leader_walk_speed:  f32,
    pub leader_run_speed:   f32,

    // ── Movement goals ────────────────────────────────────────────────────
    /// Repath when a tracked goal drifts this far from the path's goal.
    pub repath_drift: f32,

    // ── Noise ─────────────────────────────────────────────────────────────
    /// Minimum time attending a noise before a nearer one can distract.
    pub investigate_attend_secs: f32,
    pub investigate_max_secs:    f32,

    // ── Objectives ────────────────────────────────────────────────────────
    /// Hold within this distance of a capture point.
    pub capture_radius:             f32,
    pub capture_look_secs:          f32,
    /// A carrier fights back only against enemies this close.
    pub carrier_self_defense_range: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            retreat_health_ratio: 0.35,
            retreat_safe_secs:    3.0,
            retreat_max_secs:     12.0,
            reload_timeout_secs:  4.0,

            chase_secs:         6.0,
            dodge_interval_min: 0.4,
            dodge_interval_max: 1.2,
            crouch_hold_chance: 0.3,
            crouch_hold_secs:   1.5,
            fire_tolerance_deg: 8.0,

            hide_search_range:  40.0,
            hide_duration_secs: 6.0,
            hide_grace_secs:    1.5,

            follow_lead_secs:   0.8,
            follow_close_range: 3.0,
            follow_hide_range:  4.0,
            leader_walk_speed:  0.5,
            leader_run_speed:   4.0,

            repath_drift: 2.0,

            investigate_attend_secs: 2.0,
            investigate_max_secs:    15.0,

            capture_radius:             3.0,
            capture_look_secs:          2.0,
            carrier_self_defense_range: 10.0,
        }
    }
}

/// Every config a bot reads during its update.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BotConfig {
    pub behavior:   BehaviorConfig,
    pub perception: PerceptionConfig,
    pub mobility:   MobilityConfig,
}

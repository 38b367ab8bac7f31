//! `MobilityConfig` — tuning for path following, ladders and stuck recovery.

/// All distances are world units, all durations seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MobilityConfig {
    // ── Steering ──────────────────────────────────────────────────────────
    /// Horizontal distance at which a waypoint counts as reached.
    pub waypoint_radius: f32,
    /// Vertical distance within which a waypoint counts as reached.
    pub waypoint_height_tolerance: f32,
    /// How far along the path the steering target may run ahead.
    pub look_ahead_distance: f32,
    /// Start jumping this far before a jump waypoint.
    pub jump_trigger_distance: f32,
    /// Crouch when a waypoint in a crouch area is this close.
    pub crouch_look_ahead: f32,

    // ── Feelers ───────────────────────────────────────────────────────────
    pub feeler_length: f32,
    /// Angle of each feeler off the travel direction.
    pub feeler_angle_deg: f32,
    /// Sideways weight added when one feeler hits.
    pub feeler_deflection: f32,

    // ── Failure ───────────────────────────────────────────────────────────
    /// Minimum time between two throttled repaths.
    pub repath_cooldown_secs: f32,
    /// Fail if no waypoint was reached for this long.
    pub progress_timeout_secs: f32,
    /// Fail when this far below the path.
    pub fall_threshold: f32,

    // ── Stuck detection ───────────────────────────────────────────────────
    /// Length of the displacement sampling window.
    pub stuck_window_secs: f32,
    /// Average speed over a full window below which the body is stuck.
    pub stuck_min_speed: f32,
    /// Displacement from the stuck origin that ends a stuck episode.
    pub stuck_reset_distance: f32,
    /// Stuck episodes tolerated on one path.
    pub max_stuck_retries: u32,
    /// How often the recovery wiggle changes side.
    pub wiggle_interval_secs: f32,

    // ── Ladders ───────────────────────────────────────────────────────────
    /// Give up on a ladder after this long.
    pub ladder_timeout_secs: f32,
    /// Horizontal distance to the ladder at which mounting starts.
    pub ladder_mount_distance: f32,
    /// View yaw tolerance before mounting.
    pub ladder_face_tolerance_deg: f32,
    /// Vertical distance from the far end at which the climb is over.
    pub ladder_end_tolerance: f32,
}

impl Default for MobilityConfig {
    fn default() -> Self {
        Self {
            waypoint_radius:           0.75,
            waypoint_height_tolerance: 1.2,
            look_ahead_distance:       3.0,
            jump_trigger_distance:     1.5,
            crouch_look_ahead:         2.0,

            feeler_length:     1.5,
            feeler_angle_deg:  30.0,
            feeler_deflection: 0.6,

            repath_cooldown_secs:  1.0,
            progress_timeout_secs: 5.0,
            fall_threshold:        3.0,

            stuck_window_secs:    1.0,
            stuck_min_speed:      0.4,
            stuck_reset_distance: 1.5,
            max_stuck_retries:    3,
            wiggle_interval_secs: 0.5,

            ladder_timeout_secs:       8.0,
            ladder_mount_distance:     0.8,
            ladder_face_tolerance_deg: 20.0,
            ladder_end_tolerance:      0.15,
        }
    }
}

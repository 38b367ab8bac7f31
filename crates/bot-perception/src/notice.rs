//! Noticeability: the per-tick chance that a visible enemy is noticed.

use crate::config::PerceptionConfig;

/// Chance in `[0, 1]` that a bot of `skill` notices a target this tick.
///
/// * `exposure` — fraction of the target's body in view, `[0, 1]`.
/// * `distance` — eye-to-target distance.
/// * `speed` — target's horizontal speed.
///
/// Closer, more exposed and slower-moving targets are easier to notice.
/// Sprinting and firing targets skip this roll entirely.
pub fn noticeability(cfg: &PerceptionConfig, exposure: f32, distance: f32, speed: f32, skill: f32) -> f32 {
    let exposure = exposure.clamp(0.0, 1.0);
    if exposure <= 0.0 {
        return 0.0;
    }

    let span = (cfg.notice_far_range - cfg.notice_near_range).max(f32::EPSILON);
    let t = ((distance - cfg.notice_near_range) / span).clamp(0.0, 1.0);
    let range_factor = 1.0 + (cfg.notice_far_factor - 1.0) * t;

    let speed_t = if cfg.notice_speed_saturation > 0.0 {
        (speed / cfg.notice_speed_saturation).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let movement_factor = (1.0 - cfg.notice_speed_penalty * speed_t).max(0.0);

    let skill = skill.clamp(0.0, 1.0);
    let skill_factor = cfg.notice_min_skill_factor + (1.0 - cfg.notice_min_skill_factor) * skill;

    (exposure * range_factor * movement_factor * skill_factor).clamp(0.0, 1.0)
}

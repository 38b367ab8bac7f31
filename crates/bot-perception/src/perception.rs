//! Per-bot perception record and its tick update.

use bot_agent::AgentStore;
use bot_core::geo::in_field_of_view;
use bot_core::{AgentHandle, AgentId, AgentRng, IntervalTimer, Vec3};

use crate::config::PerceptionConfig;
use crate::memory::{AttackerMemory, HeardNoise, NoiseMemory};
use crate::notice::noticeability;
use crate::reaction::{reaction_steps, ReactionQueue};
use crate::threat::ThreatRecord;

/// World geometry queries perception needs.  Implemented by the host.
pub trait Sight {
    /// Unobstructed straight line between two points.
    fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool;

    /// Fraction of `target`'s body visible from `eye`, in `[0, 1]`.
    fn exposure(&self, eye: Vec3, target: AgentId) -> f32 {
        let _ = (eye, target);
        1.0
    }
}

/// Everything [`Perception::update`] reads.
pub struct PerceptionInput<'a> {
    pub me:     AgentId,
    pub agents: &'a AgentStore,
    pub sight:  &'a dyn Sight,
    /// Game time, seconds.
    pub now:    f32,
    /// Bot skill in `[0, 1]`.
    pub skill:  f32,
}

/// What one bot currently knows about enemies, friends and sounds.
#[derive(Clone, Debug)]
pub struct Perception {
    queue:      ReactionQueue,
    steps:      usize,
    recognized: Option<ThreatRecord>,
    last_seen:  IntervalTimer,
    noticed:    Option<ThreatRecord>,

    friends_nearby:  usize,
    enemies_nearby:  usize,
    visible_enemies: usize,

    pub noise:    NoiseMemory,
    pub attacker: AttackerMemory,
}

impl Perception {
    pub fn new(cfg: &PerceptionConfig, skill: f32, tick_interval_secs: f32) -> Self {
        let queue = ReactionQueue::new(cfg.reaction_queue_capacity);
        let steps = reaction_steps(skill, tick_interval_secs, cfg, queue.capacity());
        Self {
            queue,
            steps,
            recognized: None,
            last_seen: IntervalTimer::default(),
            noticed: None,
            friends_nearby: 0,
            enemies_nearby: 0,
            visible_enemies: 0,
            noise: NoiseMemory::default(),
            attacker: AttackerMemory::default(),
        }
    }

    /// Ticks between noticing a threat and recognizing it.
    pub fn reaction_steps(&self) -> usize {
        self.steps
    }

    pub fn queue(&self) -> &ReactionQueue {
        &self.queue
    }

    // ── Tick update ───────────────────────────────────────────────────────

    /// Refresh head counts, push this tick's noticed threat, and resolve the
    /// recognized enemy.
    pub fn update(&mut self, cfg: &PerceptionConfig, input: &PerceptionInput<'_>, rng: &mut AgentRng) {
        let agents = input.agents;
        let me = input.me;
        let my_team = agents.team[me.index()];
        let eye = agents.eye_position(me);
        let current = self.recognized.map(|r| r.target);

        self.friends_nearby = 0;
        self.enemies_nearby = 0;
        self.visible_enemies = 0;

        let mut best: Option<(f32, ThreatRecord)> = None;
        for other in agents.agent_ids() {
            let i = other.index();
            if other == me || !agents.alive[i] {
                continue;
            }
            let chest = agents.chest_position(other);
            let dist = eye.distance(chest);
            let team = agents.team[i];
            let hostile = my_team.is_enemy_of(team);

            if dist <= cfg.nearby_radius {
                if hostile {
                    self.enemies_nearby += 1;
                } else if team == my_team {
                    self.friends_nearby += 1;
                }
            }
            if !hostile || !can_see(cfg, input, eye, other) {
                continue;
            }
            self.visible_enemies += 1;

            let handle = agents.handle(other);
            let noticed = agents.is_firing[i]
                || agents.is_sprinting[i]
                || current == Some(handle)
                || {
                    let chance = noticeability(
                        cfg,
                        input.sight.exposure(eye, other),
                        dist,
                        agents.speed(other),
                        input.skill,
                    );
                    rng.random::<f32>() < chance
                };
            if !noticed {
                continue;
            }

            let record = ThreatRecord {
                target:    handle,
                position:  agents.position[i],
                seen_at:   input.now,
                visible:   true,
                reloading: agents.is_reloading[i],
                protected: agents.is_protected[i],
                firing:    agents.is_firing[i],
            };
            let danger = record.danger(eye);
            if best.as_ref().is_none_or(|(d, _)| danger > *d) {
                best = Some((danger, record));
            }
        }

        self.noticed = best.map(|(_, r)| r);
        self.queue.push(self.noticed);

        // A record whose source has died (or respawned) since it was written
        // is never recognized.
        let delayed = self
            .queue
            .read(self.steps)
            .copied()
            .filter(|r| agents.is_valid(r.target));

        self.recognized = match delayed.or(self.recognized) {
            None => None,
            Some(mut rec) => match agents.resolve(rec.target) {
                None => None,
                Some(id) if can_see(cfg, input, eye, id) => {
                    rec.position = agents.position[id.index()];
                    rec.seen_at = input.now;
                    rec.visible = true;
                    rec.firing = agents.is_firing[id.index()];
                    rec.reloading = agents.is_reloading[id.index()];
                    self.last_seen.start(input.now);
                    Some(rec)
                }
                Some(_) => {
                    rec.visible = false;
                    if !self.last_seen.has_started() || self.last_seen.elapsed(rec.seen_at) > 0.0 {
                        self.last_seen.start(rec.seen_at);
                    }
                    // Out of sight: remember the last known position for the
                    // grace period only.
                    (!self.last_seen.is_greater_than(input.now, cfg.lost_sight_grace_secs)).then_some(rec)
                }
            },
        };

        if let Some(rec) = &self.recognized {
            tracing::trace!(agent = %me, target = %rec.target, visible = rec.visible, "recognized enemy");
        }
    }

    // ── Event hooks ───────────────────────────────────────────────────────

    /// Record a hit.  The attacker is remembered so the bot can turn to it.
    pub fn on_damaged(&mut self, attacker: Option<AgentHandle>, from: Vec3, now: f32) {
        self.attacker.record(attacker, from, now);
    }

    /// Offer a noise heard at `listener`.  Returns `true` if it was kept.
    pub fn on_noise(&mut self, cfg: &PerceptionConfig, listener: Vec3, noise: HeardNoise) -> bool {
        self.noise.hear(cfg, listener, noise)
    }

    /// Forget everything (respawn).
    pub fn reset(&mut self) {
        self.queue.clear();
        self.recognized = None;
        self.noticed = None;
        self.last_seen.invalidate();
        self.noise.forget();
        self.attacker.forget();
        self.friends_nearby = 0;
        self.enemies_nearby = 0;
        self.visible_enemies = 0;
    }

    /// Drop the recognized enemy (the owning state gave up on it).
    pub fn forget_enemy(&mut self) {
        self.recognized = None;
        self.last_seen.invalidate();
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The enemy the bot is currently reacting to.
    pub fn recognized_enemy(&self) -> Option<&ThreatRecord> {
        self.recognized.as_ref()
    }

    /// `true` if the recognized enemy is in view right now.
    pub fn is_enemy_visible(&self) -> bool {
        self.recognized.is_some_and(|r| r.visible)
    }

    pub fn last_known_position(&self) -> Option<Vec3> {
        self.recognized.map(|r| r.position)
    }

    /// Seconds since the recognized enemy was last in view.
    pub fn time_since_seen(&self, now: f32) -> f32 {
        self.last_seen.elapsed(now)
    }

    /// The raw, undelayed most dangerous threat noticed this tick.
    pub fn noticed_this_tick(&self) -> Option<&ThreatRecord> {
        self.noticed.as_ref()
    }

    pub fn friends_nearby(&self) -> usize {
        self.friends_nearby
    }

    pub fn enemies_nearby(&self) -> usize {
        self.enemies_nearby
    }

    pub fn visible_enemies(&self) -> usize {
        self.visible_enemies
    }

    /// More nearby enemies than nearby friends, counting ourselves.
    pub fn is_outnumbered(&self) -> bool {
        self.enemies_nearby > self.friends_nearby + 1
    }
}

/// Enemy `other` is within range, inside the view cone and unobstructed.
fn can_see(cfg: &PerceptionConfig, input: &PerceptionInput<'_>, eye: Vec3, other: AgentId) -> bool {
    let agents = input.agents;
    let chest = agents.chest_position(other);
    eye.distance(chest) <= cfg.max_sight_range
        && in_field_of_view(eye, agents.yaw[input.me.index()], chest, cfg.fov_degrees)
        && input.sight.line_of_sight(eye, chest)
}

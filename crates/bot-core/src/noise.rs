//! Sounds bots can hear.

/// What made a noise.  Determines how far it carries and how interesting it
/// is to a listener.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoiseKind {
    Footstep,
    Gunfire,
    Injury,
    Explosion,
    /// Door, breaking glass, objective alarm.
    World,
}

impl NoiseKind {
    /// Default audible range in world units.
    pub fn range(self) -> f32 {
        match self {
            NoiseKind::Footstep  => 12.0,
            NoiseKind::Injury    => 15.0,
            NoiseKind::World     => 25.0,
            NoiseKind::Gunfire   => 60.0,
            NoiseKind::Explosion => 80.0,
        }
    }

    /// `true` for noises that indicate combat.
    pub fn is_hostile(self) -> bool {
        matches!(self, NoiseKind::Gunfire | NoiseKind::Injury | NoiseKind::Explosion)
    }
}

//! Team affiliation shared by agents and objectives.

/// The side an agent plays for (or that owns an objective).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    /// Not yet joined, or spectating.  Never hostile to anyone.
    #[default]
    Unassigned,
    Red,
    Blue,
}

impl Team {
    /// The opposing team, if this one plays.
    #[inline]
    pub fn opponent(self) -> Option<Team> {
        match self {
            Team::Red        => Some(Team::Blue),
            Team::Blue       => Some(Team::Red),
            Team::Unassigned => None,
        }
    }

    #[inline]
    pub fn is_playing(self) -> bool {
        !matches!(self, Team::Unassigned)
    }

    /// `true` if agents of `self` should shoot agents of `other`.
    #[inline]
    pub fn is_enemy_of(self, other: Team) -> bool {
        self.is_playing() && other.is_playing() && self != other
    }

    /// Dense index for per-team arrays (`Red = 0`, `Blue = 1`).
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            Team::Red        => Some(0),
            Team::Blue       => Some(1),
            Team::Unassigned => None,
        }
    }

    /// Human-readable label, used in logs and CSV rosters.
    pub fn as_str(self) -> &'static str {
        match self {
            Team::Unassigned => "unassigned",
            Team::Red        => "red",
            Team::Blue       => "blue",
        }
    }

    /// Parse a roster label (case-insensitive).
    pub fn parse(s: &str) -> Option<Team> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red"                      => Some(Team::Red),
            "blue"                     => Some(Team::Blue),
            "unassigned" | "none" | "" => Some(Team::Unassigned),
            _                          => None,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Bot personalities and the CSV profile loader.
//!
//! # CSV format
//!
//! One row per profile.  `safe_routes` may be omitted (defaults to `false`).
//!
//! ```csv
//! name,skill,aggression,disposition,safe_routes
//! Rookie,0.2,0.3,engage,false
//! Sniper,0.9,0.2,opportunity,true
//! Medic,0.5,0.1,self_defense,true
//! ```
//!
//! **`disposition`** field:
//!
//! | Value          | Meaning                                          |
//! |----------------|--------------------------------------------------|
//! | `engage`       | `Disposition::EngageAndInvestigate`              |
//! | `opportunity`  | `Disposition::OpportunityFire`                   |
//! | `self_defense` | `Disposition::SelfDefense`                       |
//! | `ignore`       | `Disposition::IgnoreEnemies`                     |

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::BehaviorError;

/// How willing a bot is to start fights.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Disposition {
    /// Attack recognized enemies, chase them, investigate noises.
    #[default]
    EngageAndInvestigate,
    /// Shoot at enemies in view but never chase or investigate.
    OpportunityFire,
    /// Fight back only after being hurt.
    SelfDefense,
    IgnoreEnemies,
}

impl Disposition {
    pub fn parse(s: &str) -> Option<Disposition> {
        match s.trim().to_ascii_lowercase().as_str() {
            "engage" => Some(Disposition::EngageAndInvestigate),
            "opportunity" => Some(Disposition::OpportunityFire),
            "self_defense" => Some(Disposition::SelfDefense),
            "ignore" => Some(Disposition::IgnoreEnemies),
            _ => None,
        }
    }

    /// Follows unseen enemies and goes after noises.
    pub fn hunts(self) -> bool {
        self == Disposition::EngageAndInvestigate
    }
}

/// Per-bot personality.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BotProfile {
    pub name:        String,
    /// `[0, 1]`; drives reaction time, noticing and aim.
    pub skill:       f32,
    /// `[0, 1]`; raises the retreat threshold when low, favours holding
    /// ground over dodging when high.
    pub aggression:  f32,
    pub disposition: Disposition,
    /// Prefer the least exposed route over the fastest one.
    pub safe_routes: bool,
}

impl Default for BotProfile {
    fn default() -> Self {
        Self {
            name:        "Bot".to_owned(),
            skill:       0.5,
            aggression:  0.5,
            disposition: Disposition::default(),
            safe_routes: false,
        }
    }
}

impl BotProfile {
    pub fn with_skill(mut self, skill: f32) -> Self {
        self.skill = skill;
        self
    }

    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ProfileRecord {
    name:        String,
    skill:       f32,
    aggression:  f32,
    disposition: String,
    #[serde(default)]
    safe_routes: bool,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load bot profiles from a CSV file, in file order.
pub fn load_profiles_csv(path: &Path) -> Result<Vec<BotProfile>, BehaviorError> {
    let file = std::fs::File::open(path).map_err(BehaviorError::Io)?;
    load_profiles_reader(file)
}

/// Like [`load_profiles_csv`] but accepts any `Read` source.
pub fn load_profiles_reader<R: Read>(reader: R) -> Result<Vec<BotProfile>, BehaviorError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut profiles = Vec::new();

    for (row, result) in csv_reader.deserialize::<ProfileRecord>().enumerate() {
        let rec = result.map_err(|e| BehaviorError::Parse(e.to_string()))?;

        for (field, value) in [("skill", rec.skill), ("aggression", rec.aggression)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(BehaviorError::Parse(format!(
                    "row {row} ({}): {field} {value} outside [0, 1]",
                    rec.name
                )));
            }
        }
        let disposition = Disposition::parse(&rec.disposition).ok_or_else(|| {
            BehaviorError::Parse(format!(
                "row {row} ({}): unknown disposition {:?}",
                rec.name, rec.disposition
            ))
        })?;

        profiles.push(BotProfile {
            name: rec.name,
            skill: rec.skill,
            aggression: rec.aggression,
            disposition,
            safe_routes: rec.safe_routes,
        });
    }

    Ok(profiles)
}

//! Ability catalog
//!
//! Static, immutable definitions. Three abilities are drawn per match and
//! handed identically to both paddles.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::ABILITIES_PER_MATCH;
use crate::error::ConfigError;

/// Ability identifiers, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbilityKind {
    Smash,
    Shield,
    SpeedBoost,
    Teleport,
    SlowMotion,
    MultiBall,
    GiantPaddle,
    GhostBall,
    ReverseControls,
    Magnet,
    DoubleScore,
    Freeze,
    SuperSmash,
    Gravity,
    MiniPaddle,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 15] = [
        AbilityKind::Smash,
        AbilityKind::Shield,
        AbilityKind::SpeedBoost,
        AbilityKind::Teleport,
        AbilityKind::SlowMotion,
        AbilityKind::MultiBall,
        AbilityKind::GiantPaddle,
        AbilityKind::GhostBall,
        AbilityKind::ReverseControls,
        AbilityKind::Magnet,
        AbilityKind::DoubleScore,
        AbilityKind::Freeze,
        AbilityKind::SuperSmash,
        AbilityKind::Gravity,
        AbilityKind::MiniPaddle,
    ];

    /// Catalog entry for this ability
    #[inline]
    pub fn def(self) -> &'static AbilityDef {
        &CATALOG[self as usize]
    }

    /// Look up an ability by its trigger key (case-insensitive)
    pub fn from_key(key: char) -> Option<Self> {
        let key = key.to_ascii_uppercase();
        CATALOG.iter().find(|d| d.key == key).map(|d| d.kind)
    }

    pub fn is_instant(self) -> bool {
        self.def().duration_max.is_none()
    }
}

/// How an ability's effect is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityCategory {
    /// Applied once at activation
    Instant,
    /// Modifies the activating paddle
    TimedSelf,
    /// Modifies every live ball
    TimedBall,
    /// Modifies the opposing paddle
    TimedOpponent,
    /// Adds balls for a window
    Spawning,
    /// Field force around the activating paddle
    Field,
}

/// Immutable catalog entry
#[derive(Debug, Clone, Copy)]
pub struct AbilityDef {
    pub kind: AbilityKind,
    pub name: &'static str,
    pub description: &'static str,
    /// Trigger key (uppercase; space for Smash)
    pub key: char,
    /// Key label for the HUD
    pub key_label: &'static str,
    /// HUD colour (hex)
    pub color: &'static str,
    pub category: AbilityCategory,
    /// Ticks before the ability can be used again
    pub cooldown_max: u32,
    /// Ticks the effect stays active (None = instant)
    pub duration_max: Option<u32>,
}

pub static CATALOG: [AbilityDef; 15] = [
    AbilityDef {
        kind: AbilityKind::Smash,
        name: "Smash",
        description: "+50% ball speed instantly",
        key: ' ',
        key_label: "SPACE",
        color: "#ff6b6b",
        category: AbilityCategory::Instant,
        cooldown_max: 120,
        duration_max: None,
    },
    AbilityDef {
        kind: AbilityKind::Shield,
        name: "Shield",
        description: "Pure bounces with no speed gain for 1.5s",
        key: 'E',
        key_label: "E",
        color: "#64c8ff",
        category: AbilityCategory::TimedSelf,
        cooldown_max: 300,
        duration_max: Some(90),
    },
    AbilityDef {
        kind: AbilityKind::SpeedBoost,
        name: "Speed Boost",
        description: "+80% paddle speed for 2s",
        key: 'Q',
        key_label: "Q",
        color: "#ffeb3b",
        category: AbilityCategory::TimedSelf,
        cooldown_max: 240,
        duration_max: Some(120),
    },
    AbilityDef {
        kind: AbilityKind::Teleport,
        name: "Teleport",
        description: "Instant center position",
        key: 'R',
        key_label: "R",
        color: "#a855f7",
        category: AbilityCategory::Instant,
        cooldown_max: 480,
        duration_max: None,
    },
    AbilityDef {
        kind: AbilityKind::SlowMotion,
        name: "Slow Motion",
        description: "50% ball speed for 2s",
        key: 'F',
        key_label: "F",
        color: "#4ade80",
        category: AbilityCategory::TimedBall,
        cooldown_max: 600,
        duration_max: Some(120),
    },
    AbilityDef {
        kind: AbilityKind::MultiBall,
        name: "Multi-Ball",
        description: "Split into 3 balls for 3s",
        key: 'T',
        key_label: "T",
        color: "#fbbf24",
        category: AbilityCategory::Spawning,
        cooldown_max: 720,
        duration_max: Some(180),
    },
    AbilityDef {
        kind: AbilityKind::GiantPaddle,
        name: "Giant Paddle",
        description: "+50% paddle size for 4s",
        key: 'G',
        key_label: "G",
        color: "#f97316",
        category: AbilityCategory::TimedSelf,
        cooldown_max: 480,
        duration_max: Some(240),
    },
    AbilityDef {
        kind: AbilityKind::GhostBall,
        name: "Ghost Ball",
        description: "Ball invisible for 1.5s",
        key: 'V',
        key_label: "V",
        color: "#d1d5db",
        category: AbilityCategory::TimedBall,
        cooldown_max: 420,
        duration_max: Some(90),
    },
    AbilityDef {
        kind: AbilityKind::ReverseControls,
        name: "Reverse Controls",
        description: "Opponent controls reversed 3s",
        key: 'C',
        key_label: "C",
        color: "#ec4899",
        category: AbilityCategory::TimedOpponent,
        cooldown_max: 540,
        duration_max: Some(180),
    },
    AbilityDef {
        kind: AbilityKind::Magnet,
        name: "Magnet",
        description: "Ball attracted to paddle 2s",
        key: 'M',
        key_label: "M",
        color: "#8b5cf6",
        category: AbilityCategory::Field,
        cooldown_max: 450,
        duration_max: Some(120),
    },
    AbilityDef {
        kind: AbilityKind::DoubleScore,
        name: "Double Score",
        description: "Next point counts double",
        key: 'D',
        key_label: "D",
        color: "#06b6d4",
        category: AbilityCategory::Instant,
        cooldown_max: 600,
        duration_max: None,
    },
    AbilityDef {
        kind: AbilityKind::Freeze,
        name: "Freeze",
        description: "Freeze opponent for 1.5s",
        key: 'X',
        key_label: "X",
        color: "#60a5fa",
        category: AbilityCategory::TimedOpponent,
        cooldown_max: 480,
        duration_max: Some(90),
    },
    AbilityDef {
        kind: AbilityKind::SuperSmash,
        name: "Super Smash",
        description: "Double ball speed instantly",
        key: 'Z',
        key_label: "Z",
        color: "#dc2626",
        category: AbilityCategory::Instant,
        cooldown_max: 360,
        duration_max: None,
    },
    AbilityDef {
        kind: AbilityKind::Gravity,
        name: "Gravity",
        description: "Balls fall toward the floor for 3s",
        key: 'B',
        key_label: "B",
        color: "#78716c",
        category: AbilityCategory::TimedBall,
        cooldown_max: 540,
        duration_max: Some(180),
    },
    AbilityDef {
        kind: AbilityKind::MiniPaddle,
        name: "Mini Paddle",
        description: "Opponent paddle halved for 3s",
        key: 'N',
        key_label: "N",
        color: "#14b8a6",
        category: AbilityCategory::TimedOpponent,
        cooldown_max: 480,
        duration_max: Some(180),
    },
];

/// Draw the match's abilities without replacement from `pool`.
///
/// Duplicates in the pool count once.
pub fn draw_abilities<R: Rng + ?Sized>(
    pool: &[AbilityKind],
    rng: &mut R,
) -> Result<Vec<AbilityKind>, ConfigError> {
    let mut distinct: Vec<AbilityKind> = Vec::with_capacity(pool.len());
    for &kind in pool {
        if !distinct.contains(&kind) {
            distinct.push(kind);
        }
    }
    if distinct.len() < ABILITIES_PER_MATCH {
        return Err(ConfigError::AbilityPoolTooSmall {
            found: distinct.len(),
            needed: ABILITIES_PER_MATCH,
        });
    }

    distinct.shuffle(rng);
    distinct.truncate(ABILITIES_PER_MATCH);
    Ok(distinct)
}

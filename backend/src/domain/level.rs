//! Experience tiers and the lookup from total experience to a tier.
//!
//! A member's level is never stored. It is derived on read from
//! `total_experience` through a validated [`LevelTable`]: the member sits on
//! the highest tier whose threshold does not exceed their total.

use serde::Serialize;
use utoipa::ToSchema;

/// One experience tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// Ordinal tier number, starting at 1.
    pub number: u16,
    /// Display name of the tier.
    pub name: String,
    /// Minimum total experience needed to reach the tier.
    pub experience_threshold: u32,
}

impl Level {
    /// Construct a tier.
    pub fn new(number: u16, name: impl Into<String>, experience_threshold: u32) -> Self {
        Self {
            number,
            name: name.into(),
            experience_threshold,
        }
    }
}

/// Validation failures raised by [`LevelTable::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelTableError {
    #[error("level table must contain at least one tier")]
    Empty,
    #[error("the first tier must start at 0 experience, found {threshold}")]
    FirstThresholdNotZero { threshold: u32 },
    #[error("tier {number} does not raise the experience threshold")]
    ThresholdNotIncreasing { number: u16 },
    #[error("tier {number} does not follow the previous tier number")]
    NumberNotIncreasing { number: u16 },
}

/// Ordered, validated set of tiers.
///
/// # Examples
/// ```
/// use backend::domain::LevelTable;
///
/// let table = LevelTable::default();
/// assert_eq!(table.level_for(0).number, 1);
/// assert_eq!(table.experience_to_next_level(0), Some(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    base: Level,
    higher: Vec<Level>,
}

impl LevelTable {
    /// Validate tiers ordered from lowest to highest.
    pub fn try_new(levels: Vec<Level>) -> Result<Self, LevelTableError> {
        let mut tiers = levels.into_iter();
        let base = tiers.next().ok_or(LevelTableError::Empty)?;
        if base.experience_threshold != 0 {
            return Err(LevelTableError::FirstThresholdNotZero {
                threshold: base.experience_threshold,
            });
        }

        let higher: Vec<Level> = tiers.collect();
        let mut previous = &base;
        for level in &higher {
            if level.experience_threshold <= previous.experience_threshold {
                return Err(LevelTableError::ThresholdNotIncreasing {
                    number: level.number,
                });
            }
            if level.number <= previous.number {
                return Err(LevelTableError::NumberNotIncreasing {
                    number: level.number,
                });
            }
            previous = level;
        }

        Ok(Self { base, higher })
    }

    fn tiers(&self) -> impl Iterator<Item = &Level> {
        std::iter::once(&self.base).chain(self.higher.iter())
    }

    /// The highest tier whose threshold is at most `total_experience`.
    pub fn level_for(&self, total_experience: u32) -> &Level {
        self.tiers()
            .take_while(|level| level.experience_threshold <= total_experience)
            .last()
            .unwrap_or(&self.base)
    }

    /// The first tier above `total_experience`, if any.
    pub fn next_level(&self, total_experience: u32) -> Option<&Level> {
        self.tiers()
            .find(|level| level.experience_threshold > total_experience)
    }

    /// Experience still needed to reach the next tier; `None` at the top tier.
    pub fn experience_to_next_level(&self, total_experience: u32) -> Option<u32> {
        self.next_level(total_experience)
            .map(|level| level.experience_threshold - total_experience)
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            base: Level::new(1, "Newcomer", 0),
            higher: vec![
                Level::new(2, "Contributor", 100),
                Level::new(3, "Helper", 300),
                Level::new(4, "Expert", 700),
                Level::new(5, "Mentor", 1_500),
                Level::new(6, "Sage", 3_000),
            ],
        }
    }
}

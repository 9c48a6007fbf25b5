//! Skill abilities and how they are derived from card values.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// The one-time ability a committed card grants during the skill phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillAbility {
    /// Trade this card for a reserve card.
    SwapReserve,
    /// Discard this card and draw a replacement.
    Reroll,
    /// Add this card's value to a friendly lane.
    BoostLane,
    /// Spend a positive reserve card as a boost on a friendly lane.
    ReserveBoost,
}

/// What a single targeting step selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillTargetKind {
    ReserveCard,
    /// A reserve card whose reserve value is above zero.
    PositiveReserveCard,
    FriendlyLane,
}

impl SkillAbility {
    /// Ability granted by a card with the given printed value.
    ///
    /// ```
    /// use wheel_duel::skills::SkillAbility;
    ///
    /// assert_eq!(SkillAbility::derive(0), SkillAbility::SwapReserve);
    /// assert_eq!(SkillAbility::derive(2), SkillAbility::Reroll);
    /// assert_eq!(SkillAbility::derive(5), SkillAbility::BoostLane);
    /// assert_eq!(SkillAbility::derive(9), SkillAbility::ReserveBoost);
    /// ```
    #[must_use]
    pub const fn derive(value: i32) -> Self {
        match value {
            i32::MIN..=0 => SkillAbility::SwapReserve,
            1..=2 => SkillAbility::Reroll,
            3..=5 => SkillAbility::BoostLane,
            _ => SkillAbility::ReserveBoost,
        }
    }

    /// The selections an activation needs, in order.
    #[must_use]
    pub const fn targets(self) -> &'static [SkillTargetKind] {
        match self {
            SkillAbility::SwapReserve => &[SkillTargetKind::ReserveCard],
            SkillAbility::Reroll => &[],
            SkillAbility::BoostLane => &[SkillTargetKind::FriendlyLane],
            SkillAbility::ReserveBoost => &[SkillTargetKind::PositiveReserveCard, SkillTargetKind::FriendlyLane],
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SkillAbility::SwapReserve => "Swap",
            SkillAbility::Reroll => "Reroll",
            SkillAbility::BoostLane => "Boost",
            SkillAbility::ReserveBoost => "Reserve Boost",
        }
    }
}

impl std::fmt::Display for SkillAbility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ability of one card, keyed by card id so it follows the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRecord {
    pub card_id: CardId,
    pub ability: SkillAbility,
    pub uses_remaining: u8,
}

impl AbilityRecord {
    /// A fresh record with a single use.
    #[must_use]
    pub const fn new(card_id: CardId, ability: SkillAbility) -> Self {
        Self {
            card_id,
            ability,
            uses_remaining: 1,
        }
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.uses_remaining == 0
    }
}

/// One selection made while targeting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillTarget {
    Reserve(CardId),
    Lane(usize),
}

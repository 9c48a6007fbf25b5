//! Engine configuration types.
//!
//! The surrounding round layer configures the engine once per match:
//! - `Phase`: Where in the round a request is being made
//! - `EngineConfig`: Wheel geometry, hand sizes and phase limits
//!
//! Defaults reproduce the standard duel rules.

use serde::{Deserialize, Serialize};

/// Number of discrete token positions on every wheel.
pub const WHEEL_POSITIONS: u8 = 16;

/// Number of lanes (and wheels) per side.
pub const LANE_COUNT: usize = 3;

/// Round phase, as reported by the round layer.
///
/// Only `Showdown` and later count as revealed: token changes caused by
/// effects before then are previews, not commits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Cards are being drafted into lanes.
    Choose,
    /// The pre-reveal skill sub-phase.
    Skill,
    /// Committed cards are revealed and the wheels spin.
    Showdown,
    /// Wheel outcomes are being applied.
    Resolve,
    /// Between rounds; delayed effects fire here.
    RoundEnd,
}

impl Phase {
    /// Whether committed cards have been revealed and tokens persisted.
    #[must_use]
    pub const fn is_revealed(self) -> bool {
        matches!(self, Phase::Showdown | Phase::Resolve | Phase::RoundEnd)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Choose => "choose",
            Phase::Skill => "skill",
            Phase::Showdown => "showdown",
            Phase::Resolve => "resolve",
            Phase::RoundEnd => "round-end",
        };
        f.write_str(name)
    }
}

/// Match-wide engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum cards in hand after a refill.
    pub hand_limit: usize,

    /// How many leftover hand cards count toward a reserve sum.
    pub reserve_cap: usize,

    /// Rerolls each side may perform per skill phase.
    pub max_rerolls_per_side: u8,

    /// Whether the initiative holder wins otherwise tied wheels.
    pub initiative_breaks_ties: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hand_limit: 5,
            reserve_cap: 2,
            max_rerolls_per_side: 2,
            initiative_breaks_ties: false,
        }
    }
}

impl EngineConfig {
    /// Create the standard configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hand limit.
    #[must_use]
    pub fn with_hand_limit(mut self, limit: usize) -> Self {
        self.hand_limit = limit;
        self
    }

    /// Set the reserve cap.
    #[must_use]
    pub fn with_reserve_cap(mut self, cap: usize) -> Self {
        self.reserve_cap = cap;
        self
    }

    /// Set the per-side reroll limit.
    #[must_use]
    pub fn with_max_rerolls(mut self, rerolls: u8) -> Self {
        self.max_rerolls_per_side = rerolls;
        self
    }

    /// Let initiative decide ties.
    #[must_use]
    pub fn initiative_breaks_ties(mut self) -> Self {
        self.initiative_breaks_ties = true;
        self
    }
}

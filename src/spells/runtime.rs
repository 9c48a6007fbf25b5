//! Effect records produced by spell resolvers.
//!
//! `SpellRuntimeState` is the contract between what a spell decided and
//! what the effect engine performs. It holds one typed list per effect
//! kind, all empty by default, filled through explicit push methods. A
//! fresh accumulator is created for every cast.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, StatDelta};
use crate::core::Side;

/// Change a committed card's stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAdjustment {
    pub side: Side,
    pub card_id: CardId,
    pub delta: StatDelta,
}

/// Change a reserve (hand) card's stats. Applied by the round layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandAdjustment {
    pub side: Side,
    pub card_id: CardId,
    pub delta: StatDelta,
}

/// Lower a side's computed reserve total, clamped at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveDrain {
    pub side: Side,
    pub amount: i32,
}

/// Force a side to discard cards from hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandDiscard {
    pub side: Side,
    pub count: u32,
}

/// Exchange the lanes of two of a side's committed cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSwap {
    pub side: Side,
    pub first: CardId,
    pub second: CardId,
}

/// Contest initiative at the next initiative check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeChallenge {
    pub challenger: Side,
}

/// Take initiative immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeClaim {
    pub side: Side,
}

/// Move a wheel's token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelTokenAdjustment {
    pub wheel: usize,
    pub delta: i32,
}

/// Copy one card's printed stats onto another card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorCopy {
    pub target_side: Side,
    pub target: CardId,
    pub source_side: Side,
    pub source: CardId,
}

/// Add chill stacks to a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChillStack {
    pub card_id: CardId,
    pub stacks: i32,
}

/// When a delayed effect fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayedTiming {
    RoundEnd,
    NextRoundStart,
}

/// What a delayed effect does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayedKind {
    GainMana(u32),
    Draw(u32),
}

/// An effect the round layer schedules for later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedEffect {
    pub side: Side,
    pub timing: DelayedTiming,
    pub kind: DelayedKind,
    pub source: String,
}

/// Draw cards for a side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRequest {
    pub side: Side,
    pub count: u32,
}

/// Effect records accumulated while resolving one cast.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellRuntimeState {
    pub card_adjustments: Vec<CardAdjustment>,
    pub hand_adjustments: Vec<HandAdjustment>,
    pub reserve_drains: Vec<ReserveDrain>,
    pub hand_discards: Vec<HandDiscard>,
    pub position_swaps: Vec<PositionSwap>,
    pub initiative_challenges: Vec<InitiativeChallenge>,
    pub initiative_claims: Vec<InitiativeClaim>,
    pub wheel_token_adjustments: Vec<WheelTokenAdjustment>,
    pub mirror_copy_effects: Vec<MirrorCopy>,
    pub chilled_cards: Vec<ChillStack>,
    pub delayed_effects: Vec<DelayedEffect>,
    pub draw_cards: Vec<DrawRequest>,
    pub log: Vec<String>,
}

/// The payload handed to the effect engine (and to remote peers).
pub type EffectPayload = SpellRuntimeState;

impl SpellRuntimeState {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adjust_card(&mut self, side: Side, card_id: CardId, delta: StatDelta) {
        self.card_adjustments.push(CardAdjustment { side, card_id, delta });
    }

    pub fn adjust_hand_card(&mut self, side: Side, card_id: CardId, delta: StatDelta) {
        self.hand_adjustments.push(HandAdjustment { side, card_id, delta });
    }

    pub fn drain_reserve(&mut self, side: Side, amount: i32) {
        self.reserve_drains.push(ReserveDrain { side, amount });
    }

    pub fn discard_from_hand(&mut self, side: Side, count: u32) {
        self.hand_discards.push(HandDiscard { side, count });
    }

    pub fn swap_positions(&mut self, side: Side, first: CardId, second: CardId) {
        self.position_swaps.push(PositionSwap { side, first, second });
    }

    pub fn challenge_initiative(&mut self, challenger: Side) {
        self.initiative_challenges.push(InitiativeChallenge { challenger });
    }

    pub fn claim_initiative(&mut self, side: Side) {
        self.initiative_claims.push(InitiativeClaim { side });
    }

    pub fn adjust_wheel_token(&mut self, wheel: usize, delta: i32) {
        self.wheel_token_adjustments.push(WheelTokenAdjustment { wheel, delta });
    }

    pub fn mirror(&mut self, target_side: Side, target: CardId, source_side: Side, source: CardId) {
        self.mirror_copy_effects.push(MirrorCopy {
            target_side,
            target,
            source_side,
            source,
        });
    }

    pub fn chill(&mut self, card_id: CardId, stacks: i32) {
        self.chilled_cards.push(ChillStack { card_id, stacks });
    }

    pub fn delay(&mut self, side: Side, timing: DelayedTiming, kind: DelayedKind, source: impl Into<String>) {
        self.delayed_effects.push(DelayedEffect {
            side,
            timing,
            kind,
            source: source.into(),
        });
    }

    pub fn draw(&mut self, side: Side, count: u32) {
        self.draw_cards.push(DrawRequest { side, count });
    }

    pub fn log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    /// Append every record of `other` after this payload's records.
    pub fn merge(&mut self, other: SpellRuntimeState) {
        self.card_adjustments.extend(other.card_adjustments);
        self.hand_adjustments.extend(other.hand_adjustments);
        self.reserve_drains.extend(other.reserve_drains);
        self.hand_discards.extend(other.hand_discards);
        self.position_swaps.extend(other.position_swaps);
        self.initiative_challenges.extend(other.initiative_challenges);
        self.initiative_claims.extend(other.initiative_claims);
        self.wheel_token_adjustments.extend(other.wheel_token_adjustments);
        self.mirror_copy_effects.extend(other.mirror_copy_effects);
        self.chilled_cards.extend(other.chilled_cards);
        self.delayed_effects.extend(other.delayed_effects);
        self.draw_cards.extend(other.draw_cards);
        self.log.extend(other.log);
    }

    /// Whether the payload holds no effect records (log lines excluded).
    #[must_use]
    pub fn has_no_effects(&self) -> bool {
        self.card_adjustments.is_empty()
            && self.hand_adjustments.is_empty()
            && self.reserve_drains.is_empty()
            && self.hand_discards.is_empty()
            && self.position_swaps.is_empty()
            && self.initiative_challenges.is_empty()
            && self.initiative_claims.is_empty()
            && self.wheel_token_adjustments.is_empty()
            && self.mirror_copy_effects.is_empty()
            && self.chilled_cards.is_empty()
            && self.delayed_effects.is_empty()
            && self.draw_cards.is_empty()
    }
}

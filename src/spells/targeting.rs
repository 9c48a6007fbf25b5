//! Spell targeting: selections, validation and candidate enumeration.
//!
//! - `SpellSelection`: what the caster pointed at
//! - `ResolvedTarget`: a validated selection, with a snapshot of the card
//! - `validate_selection`: checks a selection against a `TargetStage`
//! - `candidates`: every selection a stage would accept

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Arcana, Card, CardTag};
use crate::core::{Board, Phase, Side, SideMap, LANE_COUNT};

use super::definition::{CardFilter, Location, SpellDefinition, StageKind, TargetStage};

/// Where a selected card sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardLocation {
    Lane(usize),
    Hand(usize),
}

/// A selection made by a caster for the current stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellSelection {
    Card { side: Side, location: CardLocation },
    Wheel(usize),
}

/// A selected card, captured at selection time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetedCard {
    pub side: Side,
    pub location: CardLocation,
    pub card: Card,
}

impl TargetedCard {
    /// The lane index, for board selections.
    #[must_use]
    pub fn lane(&self) -> Option<usize> {
        match self.location {
            CardLocation::Lane(lane) => Some(lane),
            CardLocation::Hand(_) => None,
        }
    }
}

/// One entry of a pending cast's ordered target list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedTarget {
    /// A `None` stage.
    Nothing,
    /// A `Caster` stage.
    Caster(Side),
    Card(TargetedCard),
    Wheel(usize),
    /// An optional stage the caster declined.
    Skipped,
}

impl ResolvedTarget {
    /// The selected card, if this target is one.
    #[must_use]
    pub fn as_card(&self) -> Option<&TargetedCard> {
        match self {
            ResolvedTarget::Card(card) => Some(card),
            _ => None,
        }
    }

    /// The selected wheel, if this target is one.
    #[must_use]
    pub fn as_wheel(&self) -> Option<usize> {
        match self {
            ResolvedTarget::Wheel(wheel) => Some(*wheel),
            _ => None,
        }
    }
}

/// Board state a cast is validated and resolved against.
#[derive(Clone, Copy, Debug)]
pub struct CastContext<'a> {
    pub phase: Phase,
    pub board: &'a Board,
    pub hands: &'a SideMap<Vector<Card>>,
    pub reserve_sums: SideMap<i32>,
    pub initiative: Side,
}

impl<'a> CastContext<'a> {
    /// Create a context with zero reserve sums and player initiative.
    pub fn new(phase: Phase, board: &'a Board, hands: &'a SideMap<Vector<Card>>) -> Self {
        Self {
            phase,
            board,
            hands,
            reserve_sums: SideMap::default(),
            initiative: Side::Player,
        }
    }

    /// Set reserve sums (builder pattern).
    #[must_use]
    pub fn with_reserve_sums(mut self, reserve_sums: SideMap<i32>) -> Self {
        self.reserve_sums = reserve_sums;
        self
    }

    /// Set the initiative holder (builder pattern).
    #[must_use]
    pub fn with_initiative(mut self, initiative: Side) -> Self {
        self.initiative = initiative;
        self
    }

    /// The card at a location, if any.
    #[must_use]
    pub fn card_at(&self, side: Side, location: CardLocation) -> Option<&'a Card> {
        match location {
            CardLocation::Lane(lane) => self.board[side].get(lane)?.as_ref(),
            CardLocation::Hand(index) => self.hands[side].get(index),
        }
    }

    /// Whether a card with `arcana` sits in one of the lanes or the hand of `side`.
    #[must_use]
    pub fn holds_arcana(&self, side: Side, arcana: Arcana) -> bool {
        self.board[side]
            .iter()
            .flatten()
            .chain(self.hands[side].iter())
            .any(|card| card.arcana == Some(arcana))
    }
}

/// What a resolver sees.
#[derive(Clone, Copy, Debug)]
pub struct ResolveScope<'a> {
    pub caster: Side,
    pub spell: &'a SpellDefinition,
    pub targets: &'a [ResolvedTarget],
    pub ctx: &'a CastContext<'a>,
}

impl<'a> ResolveScope<'a> {
    /// The card chosen at stage `index`, if that stage chose one.
    #[must_use]
    pub fn card(&self, index: usize) -> Option<&'a TargetedCard> {
        self.targets.get(index).and_then(ResolvedTarget::as_card)
    }

    /// Like `card`, but only while the card still sits where it was chosen.
    #[must_use]
    pub fn live_card(&self, index: usize) -> Option<&'a TargetedCard> {
        self.card(index).filter(|target| {
            self.ctx
                .card_at(target.side, target.location)
                .is_some_and(|card| card.id == target.card.id)
        })
    }

    /// The wheel chosen at stage `index`, if that stage chose one.
    #[must_use]
    pub fn wheel(&self, index: usize) -> Option<usize> {
        self.targets.get(index).and_then(ResolvedTarget::as_wheel)
    }

    /// The caster's opponent.
    #[must_use]
    pub fn opponent(&self) -> Side {
        self.caster.opponent()
    }
}

fn location_admits(location: Location, at: CardLocation) -> bool {
    matches!(
        (location, at),
        (Location::Any, _) | (Location::Board, CardLocation::Lane(_)) | (Location::Hand, CardLocation::Hand(_))
    )
}

fn validate_card(
    filter: &CardFilter,
    caster: Side,
    side: Side,
    location: CardLocation,
    previous: &[ResolvedTarget],
    ctx: &CastContext<'_>,
) -> Option<ResolvedTarget> {
    if !filter.ownership.admits(caster, side) || !location_admits(filter.location, location) {
        return None;
    }

    let card = ctx.card_at(side, location)?;

    if filter.arcana.is_some_and(|arcana| card.arcana != Some(arcana)) {
        return None;
    }
    if side != caster && card.has_tag(CardTag::Warded) {
        return None;
    }
    if previous
        .iter()
        .filter_map(ResolvedTarget::as_card)
        .any(|chosen| chosen.card.id == card.id)
    {
        return None;
    }

    if filter.adjacent_to_previous {
        let anchor = previous.last().and_then(ResolvedTarget::as_card)?;
        let (CardLocation::Lane(lane), Some(anchor_lane)) = (location, anchor.lane()) else {
            return None;
        };
        if anchor.side != side || lane.abs_diff(anchor_lane) != 1 {
            return None;
        }
    }

    Some(ResolvedTarget::Card(TargetedCard {
        side,
        location,
        card: card.clone(),
    }))
}

/// Check a selection against a stage.
///
/// Returns the resolved target when the selection is acceptable and `None`
/// when it is not. `previous` holds the targets of earlier stages.
#[must_use]
pub fn validate_selection(
    stage: &TargetStage,
    selection: &SpellSelection,
    caster: Side,
    previous: &[ResolvedTarget],
    ctx: &CastContext<'_>,
) -> Option<ResolvedTarget> {
    match (&stage.kind, selection) {
        (StageKind::Card(filter), SpellSelection::Card { side, location }) => {
            validate_card(filter, caster, *side, *location, previous, ctx)
        }
        (StageKind::Wheel, SpellSelection::Wheel(wheel)) if *wheel < LANE_COUNT => {
            Some(ResolvedTarget::Wheel(*wheel))
        }
        _ => None,
    }
}

/// Every selection `stage` would accept.
#[must_use]
pub fn candidates(
    stage: &TargetStage,
    caster: Side,
    previous: &[ResolvedTarget],
    ctx: &CastContext<'_>,
) -> Vec<SpellSelection> {
    let mut all = Vec::new();
    match stage.kind {
        StageKind::Card(_) => {
            for side in Side::BOTH {
                for lane in 0..LANE_COUNT {
                    all.push(SpellSelection::Card {
                        side,
                        location: CardLocation::Lane(lane),
                    });
                }
                for index in 0..ctx.hands[side].len() {
                    all.push(SpellSelection::Card {
                        side,
                        location: CardLocation::Hand(index),
                    });
                }
            }
        }
        StageKind::Wheel => all.extend((0..LANE_COUNT).map(SpellSelection::Wheel)),
        StageKind::None | StageKind::Caster => {}
    }

    all.retain(|selection| validate_selection(stage, selection, caster, previous, ctx).is_some());
    all
}

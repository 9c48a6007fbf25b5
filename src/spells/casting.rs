//! Stage-by-stage advancement of an in-flight cast.
//!
//! A cast is a small state machine over the spell's target stages:
//!
//! ```text
//! open ──► settle ──► Awaiting ──advance──► settle ──► ... ──► Resolved
//!                        │
//!                        └──invalid selection──► Rejected (unchanged)
//! ```
//!
//! `settle` fills automatic stages (`None`, `Caster`) without input and
//! skips optional stages that have nothing to select. Once every stage has
//! a target the spell's resolver runs against a fresh `SpellRuntimeState`.

use serde::Serialize;
use smallvec::SmallVec;

use crate::core::Side;

use super::definition::{SpellDefinition, SpellId, StageKind, TargetStage};
use super::runtime::SpellRuntimeState;
use super::targeting::{candidates, validate_selection, CastContext, ResolveScope, ResolvedTarget, SpellSelection};

/// Ordered targets of a cast. Most spells have at most three stages.
pub type TargetList = SmallVec<[ResolvedTarget; 3]>;

/// An in-flight cast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PendingSpell {
    pub side: Side,
    pub spell_id: SpellId,
    /// Index of the stage awaiting a selection.
    pub stage: usize,
    pub targets: TargetList,
    pub mana_spent: u32,
}

impl PendingSpell {
    /// Create a cast at its first stage.
    #[must_use]
    pub fn new(side: Side, spell_id: SpellId, mana_spent: u32) -> Self {
        Self {
            side,
            spell_id,
            stage: 0,
            targets: SmallVec::new(),
            mana_spent,
        }
    }

    /// The stage awaiting a selection, if any remain.
    #[must_use]
    pub fn current_stage<'s>(&self, spell: &'s SpellDefinition) -> Option<&'s TargetStage> {
        spell.stages.get(self.stage)
    }

    /// Every selection the current stage would accept.
    #[must_use]
    pub fn candidates(&self, spell: &SpellDefinition, ctx: &CastContext<'_>) -> Vec<SpellSelection> {
        self.current_stage(spell)
            .map(|stage| candidates(stage, self.side, &self.targets, ctx))
            .unwrap_or_default()
    }
}

/// A cast whose resolver has run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedCast {
    pub side: Side,
    pub spell_id: SpellId,
    pub targets: TargetList,
    pub mana_spent: u32,
    pub payload: SpellRuntimeState,
}

/// Result of feeding a cast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Advance {
    /// Waiting for a selection at `pending.stage`.
    Awaiting(PendingSpell),
    /// The selection was not acceptable; the cast is unchanged.
    Rejected(PendingSpell),
    Resolved(ResolvedCast),
}

impl Advance {
    /// The cast still in flight, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingSpell> {
        match self {
            Advance::Awaiting(pending) | Advance::Rejected(pending) => Some(pending),
            Advance::Resolved(_) => None,
        }
    }
}

/// Start a cast and settle its leading automatic stages.
#[must_use]
pub fn open(side: Side, spell: &SpellDefinition, mana_spent: u32, ctx: &CastContext<'_>) -> Advance {
    settle(PendingSpell::new(side, spell.id, mana_spent), spell, ctx)
}

/// Feed a selection to the current stage.
#[must_use]
pub fn advance(
    mut pending: PendingSpell,
    spell: &SpellDefinition,
    selection: &SpellSelection,
    ctx: &CastContext<'_>,
) -> Advance {
    let Some(stage) = pending.current_stage(spell) else {
        return settle(pending, spell, ctx);
    };

    match validate_selection(stage, selection, pending.side, &pending.targets, ctx) {
        Some(target) => {
            tracing::trace!(spell = %spell.id, stage = pending.stage, ?selection, "stage target accepted");
            pending.targets.push(target);
            pending.stage += 1;
            settle(pending, spell, ctx)
        }
        None => {
            tracing::trace!(spell = %spell.id, stage = pending.stage, ?selection, "stage target rejected");
            Advance::Rejected(pending)
        }
    }
}

/// Decline the current stage. Only optional stages can be declined.
#[must_use]
pub fn skip_stage(mut pending: PendingSpell, spell: &SpellDefinition, ctx: &CastContext<'_>) -> Advance {
    match pending.current_stage(spell) {
        Some(stage) if stage.optional => {
            pending.targets.push(ResolvedTarget::Skipped);
            pending.stage += 1;
            settle(pending, spell, ctx)
        }
        Some(_) => Advance::Rejected(pending),
        None => settle(pending, spell, ctx),
    }
}

fn settle(mut pending: PendingSpell, spell: &SpellDefinition, ctx: &CastContext<'_>) -> Advance {
    loop {
        let Some(stage) = spell.stages.get(pending.stage) else {
            return Advance::Resolved(resolve(pending, spell, ctx));
        };

        let target = match stage.kind {
            StageKind::None => ResolvedTarget::Nothing,
            StageKind::Caster => ResolvedTarget::Caster(pending.side),
            _ if stage.optional && candidates(stage, pending.side, &pending.targets, ctx).is_empty() => {
                ResolvedTarget::Skipped
            }
            _ => return Advance::Awaiting(pending),
        };

        pending.targets.push(target);
        pending.stage += 1;
    }
}

fn resolve(pending: PendingSpell, spell: &SpellDefinition, ctx: &CastContext<'_>) -> ResolvedCast {
    let mut payload = SpellRuntimeState::new();
    let scope = ResolveScope {
        caster: pending.side,
        spell,
        targets: &pending.targets,
        ctx,
    };
    (spell.resolver)(&scope, &mut payload);

    tracing::debug!(
        side = %pending.side,
        spell = %spell.id,
        targets = pending.targets.len(),
        "cast resolved"
    );

    ResolvedCast {
        side: pending.side,
        spell_id: pending.spell_id,
        targets: pending.targets,
        mana_spent: pending.mana_spent,
        payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId, StatDelta};
    use crate::core::{Board, Phase, SideMap};
    use crate::spells::definition::{CardFilter, Location, Ownership};
    use crate::spells::targeting::CardLocation;
    use im::Vector;

    fn weaken(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
        if let Some(target) = scope.live_card(1) {
            state.adjust_card(target.side, target.card.id, StatDelta::uniform(-2));
        }
        if let Some(bonus) = scope.live_card(2) {
            state.adjust_card(bonus.side, bonus.card.id, StatDelta::uniform(-1));
        }
        state.log(format!("{} targets {}", scope.spell.name, scope.targets.len()));
    }

    fn spell() -> SpellDefinition {
        SpellDefinition::new(SpellId("weaken"), "Weaken", 1, weaken)
            .with_stage(TargetStage::caster())
            .with_stage(TargetStage::card(CardFilter::new(Ownership::Enemy, Location::Board), "Pick an enemy"))
            .with_stage(
                TargetStage::card(CardFilter::new(Ownership::Enemy, Location::Board).adjacent(), "Pick a neighbour")
                    .optional(),
            )
    }

    fn board() -> Board {
        Board::from_pair(
            [Some(Card::normal(CardId(1), "p0", 4)), None, None],
            [
                Some(Card::normal(CardId(2), "e0", 5)),
                None,
                Some(Card::normal(CardId(3), "e2", 6)),
            ],
        )
    }

    fn enemy(lane: usize) -> SpellSelection {
        SpellSelection::Card {
            side: Side::Enemy,
            location: CardLocation::Lane(lane),
        }
    }

    #[test]
    fn test_open_settles_caster_stage() {
        let (board, hands) = (board(), SideMap::<Vector<Card>>::default());
        let ctx = CastContext::new(Phase::Choose, &board, &hands);

        let Advance::Awaiting(pending) = open(Side::Player, &spell(), 1, &ctx) else {
            panic!("expected a pending cast");
        };
        assert_eq!(pending.stage, 1);
        assert_eq!(pending.targets[0], ResolvedTarget::Caster(Side::Player));
        assert_eq!(pending.candidates(&spell(), &ctx), vec![enemy(0), enemy(2)]);
    }

    #[test]
    fn test_rejected_selection_leaves_cast_unchanged() {
        let (board, hands) = (board(), SideMap::<Vector<Card>>::default());
        let ctx = CastContext::new(Phase::Choose, &board, &hands);
        let pending = open(Side::Player, &spell(), 1, &ctx).pending().cloned().unwrap();

        let ally = SpellSelection::Card {
            side: Side::Player,
            location: CardLocation::Lane(0),
        };
        assert_eq!(advance(pending.clone(), &spell(), &ally, &ctx), Advance::Rejected(pending));
    }

    #[test]
    fn test_optional_stage_auto_skipped_without_candidates() {
        let (board, hands) = (board(), SideMap::<Vector<Card>>::default());
        let ctx = CastContext::new(Phase::Choose, &board, &hands);
        let pending = open(Side::Player, &spell(), 1, &ctx).pending().cloned().unwrap();

        // Lane 0's neighbour (lane 1) is empty, so the bonus stage has nothing to pick.
        let Advance::Resolved(cast) = advance(pending, &spell(), &enemy(0), &ctx) else {
            panic!("expected resolution");
        };
        assert_eq!(cast.targets[2], ResolvedTarget::Skipped);
        assert_eq!(cast.payload.card_adjustments.len(), 1);
        assert_eq!(cast.payload.log, vec!["Weaken targets 3".to_string()]);
    }

    #[test]
    fn test_explicit_skip() {
        let board = Board::from_pair(
            [None, None, None],
            [
                Some(Card::normal(CardId(2), "e0", 5)),
                Some(Card::normal(CardId(3), "e1", 6)),
                None,
            ],
        );
        let hands = SideMap::<Vector<Card>>::default();
        let ctx = CastContext::new(Phase::Choose, &board, &hands);
        let pending = open(Side::Player, &spell(), 1, &ctx).pending().cloned().unwrap();

        // A required stage cannot be skipped.
        let rejected = skip_stage(pending.clone(), &spell(), &ctx);
        assert_eq!(rejected, Advance::Rejected(pending.clone()));

        let Advance::Awaiting(bonus) = advance(pending, &spell(), &enemy(0), &ctx) else {
            panic!("expected bonus stage");
        };
        assert_eq!(bonus.candidates(&spell(), &ctx), vec![enemy(1)]);

        let Advance::Resolved(cast) = skip_stage(bonus, &spell(), &ctx) else {
            panic!("expected resolution");
        };
        assert_eq!(cast.targets[2], ResolvedTarget::Skipped);
        assert_eq!(cast.mana_spent, 1);
    }

    #[test]
    fn test_stale_target_omitted_at_resolution() {
        let (board, hands) = (board(), SideMap::<Vector<Card>>::default());
        let ctx = CastContext::new(Phase::Choose, &board, &hands);
        let mut pending = open(Side::Player, &spell(), 1, &ctx).pending().cloned().unwrap();
        let target = validate_selection(&spell().stages[1], &enemy(2), Side::Player, &pending.targets, &ctx).unwrap();
        pending.targets.push(target);
        pending.stage += 1;

        // The chosen card left the board before the cast resolved.
        let emptied = Board::from_pair([None, None, None], [None, None, None]);
        let stale = CastContext::new(Phase::Choose, &emptied, &hands);

        let Advance::Resolved(cast) = settle(pending, &spell(), &stale) else {
            panic!("expected resolution");
        };
        assert!(cast.payload.card_adjustments.is_empty());
        assert_eq!(cast.payload.log.len(), 1);
    }
}

//! Spell and target choice for non-human casters.
//!
//! A spell is worth casting when a rehearsal of it, with targets picked by
//! `choose_selection`, produces at least one effect record. Among the
//! affordable ones the CPU prefers higher `cpu_priority`, then higher cost.
//!
//! Saving: a worthwhile spell that is not affordable yet but will be
//! within the caster's remaining turns is *deferred*, whatever its
//! priority. An affordable spell cheaper than the cheapest deferred one is
//! skipped when casting it would leave the caster unable to reach the
//! deferred cost before the window closes.

use serde::{Deserialize, Serialize};

use crate::core::Side;
use crate::spells::{
    advance, compute_cost, open, Advance, CardLocation, CastContext, CastHistory, CostContext, PendingSpell,
    ResolvedCast, SpellDefinition, SpellId, SpellSelection, StageKind,
};

/// Mana outlook of one caster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuCaster {
    pub mana: u32,
    /// Mana gained at the start of each later turn.
    pub mana_per_turn: u32,
    /// Turns left after this one in which casting is still possible.
    pub turns_remaining: u32,
}

impl CpuCaster {
    #[must_use]
    pub const fn new(mana: u32) -> Self {
        Self {
            mana,
            mana_per_turn: 0,
            turns_remaining: 0,
        }
    }

    /// Set income and remaining turns (builder pattern).
    #[must_use]
    pub const fn with_income(mut self, mana_per_turn: u32, turns_remaining: u32) -> Self {
        self.mana_per_turn = mana_per_turn;
        self.turns_remaining = turns_remaining;
        self
    }

    /// Mana available on the last turn of the window if `spend` is paid now.
    #[must_use]
    pub const fn projected_after(&self, spend: u32) -> u32 {
        self.mana
            .saturating_sub(spend)
            .saturating_add(self.mana_per_turn.saturating_mul(self.turns_remaining))
    }
}

/// The spell the CPU decided to cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CpuChoice {
    pub spell_id: SpellId,
    pub cost: u32,
}

struct Evaluated<'s> {
    spell: &'s SpellDefinition,
    cost: u32,
}

/// Pick a spell for `caster_side`, or `None` when nothing is worth casting
/// now (including when mana is better saved).
#[must_use]
pub fn choose(
    caster_side: Side,
    caster: &CpuCaster,
    opponent: &CpuCaster,
    ctx: &CastContext<'_>,
    history: &CastHistory,
    spells: &[&SpellDefinition],
) -> Option<CpuChoice> {
    let cost_ctx = CostContext {
        caster: caster_side,
        phase: ctx.phase,
        history,
        caster_mana: caster.mana,
        opponent_mana: opponent.mana,
    };

    let worthwhile: Vec<Evaluated<'_>> = spells
        .iter()
        .copied()
        .filter(|spell| spell.allows(ctx.phase))
        .filter(|spell| rehearse(caster_side, spell, ctx).is_some_and(|cast| !cast.payload.has_no_effects()))
        .map(|spell| Evaluated {
            spell,
            cost: compute_cost(spell, &cost_ctx),
        })
        .collect();

    let (mut affordable, deferred): (Vec<_>, Vec<_>) =
        worthwhile.into_iter().partition(|candidate| candidate.cost <= caster.mana);
    // Cheapest spell still out of reach now but reachable within the window.
    let saving_for = deferred
        .iter()
        .filter(|candidate| caster.projected_after(0) >= candidate.cost)
        .map(|candidate| candidate.cost)
        .min();

    affordable.sort_by(|a, b| {
        b.spell
            .cpu_priority
            .cmp(&a.spell.cpu_priority)
            .then(b.cost.cmp(&a.cost))
    });

    for candidate in &affordable {
        if let Some(target) = saving_for {
            if candidate.cost < target && caster.projected_after(candidate.cost) < target {
                tracing::debug!(
                    side = %caster_side,
                    skipped = %candidate.spell.id,
                    saving_for = target,
                    "cpu saving mana"
                );
                continue;
            }
        }

        tracing::debug!(side = %caster_side, spell = %candidate.spell.id, cost = candidate.cost, "cpu casts");
        return Some(CpuChoice {
            spell_id: candidate.spell.id,
            cost: candidate.cost,
        });
    }

    None
}

/// Pick a target for the current stage of a pending cast.
///
/// Enemy cards: the highest value. Allied board cards: the lowest value.
/// Hand cards: the highest reserve value. Wheels: the one with the highest
/// committed total. Returns `None` when the stage has no candidates.
#[must_use]
pub fn choose_selection(pending: &PendingSpell, spell: &SpellDefinition, ctx: &CastContext<'_>) -> Option<SpellSelection> {
    let stage = pending.current_stage(spell)?;
    let candidates = pending.candidates(spell, ctx);

    match stage.kind {
        StageKind::Card(_) => candidates.into_iter().max_by_key(|selection| {
            let SpellSelection::Card { side, location } = *selection else {
                return i32::MIN;
            };
            let Some(card) = ctx.card_at(side, location) else {
                return i32::MIN;
            };
            match location {
                CardLocation::Hand(_) => card.reserve_value(),
                CardLocation::Lane(_) if side == pending.side => -card.value(),
                CardLocation::Lane(_) => card.value(),
            }
        }),
        StageKind::Wheel => candidates.into_iter().max_by_key(|selection| match *selection {
            SpellSelection::Wheel(wheel) => {
                crate::core::lane_value(&ctx.board.player, wheel) + crate::core::lane_value(&ctx.board.enemy, wheel)
            }
            SpellSelection::Card { .. } => i32::MIN,
        }),
        StageKind::None | StageKind::Caster => None,
    }
}

/// Run a cast to resolution with CPU-picked targets, without spending mana.
fn rehearse(side: Side, spell: &SpellDefinition, ctx: &CastContext<'_>) -> Option<ResolvedCast> {
    let mut state = open(side, spell, 0, ctx);
    loop {
        match state {
            Advance::Resolved(cast) => return Some(cast),
            Advance::Rejected(_) => return None,
            Advance::Awaiting(pending) => {
                let selection = choose_selection(&pending, spell, ctx)?;
                state = advance(pending, spell, &selection, ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardId};
    use crate::core::{Board, Phase, SideMap};
    use crate::spells::{ids, SpellCatalogue};
    use im::Vector;

    fn board() -> Board {
        Board::from_pair(
            [Some(Card::normal(CardId(1), "p0", 2)), Some(Card::normal(CardId(2), "p1", 6)), None],
            [Some(Card::normal(CardId(3), "e0", 3)), Some(Card::normal(CardId(4), "e1", 8)), None],
        )
    }

    #[test]
    fn test_projection_saturates() {
        let caster = CpuCaster::new(u32::MAX).with_income(u32::MAX, 3);
        assert_eq!(caster.projected_after(0), u32::MAX);
        assert_eq!(caster.projected_after(u32::MAX), u32::MAX);
        assert_eq!(CpuCaster::new(1).with_income(2, 3).projected_after(5), 6);
    }

    #[test]
    fn test_selection_heuristics() {
        let catalogue = SpellCatalogue::standard();
        let (board, hands) = (board(), SideMap::<Vector<Card>>::default());
        let ctx = CastContext::new(Phase::Choose, &board, &hands);

        let fireball = catalogue.get("fireball").unwrap();
        let pending = open(Side::Player, fireball, 2, &ctx).pending().cloned().unwrap();
        assert_eq!(
            choose_selection(&pending, fireball, &ctx),
            Some(SpellSelection::Card {
                side: Side::Enemy,
                location: CardLocation::Lane(1)
            })
        );

        let bolster = catalogue.get("bolster").unwrap();
        let pending = open(Side::Player, bolster, 2, &ctx).pending().cloned().unwrap();
        assert_eq!(
            choose_selection(&pending, bolster, &ctx),
            Some(SpellSelection::Card {
                side: Side::Player,
                location: CardLocation::Lane(0)
            })
        );

        let hourglass = catalogue.get("hourglass").unwrap();
        let pending = open(Side::Player, hourglass, 2, &ctx).pending().cloned().unwrap();
        assert_eq!(choose_selection(&pending, hourglass, &ctx), Some(SpellSelection::Wheel(1)));
    }

    #[test]
    fn test_useless_spells_are_ignored() {
        let catalogue = SpellCatalogue::standard();
        let (board, hands) = (board(), SideMap::<Vector<Card>>::default());
        // Usurp does nothing for the initiative holder.
        let ctx = CastContext::new(Phase::Choose, &board, &hands).with_initiative(Side::Enemy);
        let usurp = catalogue.get("usurp").unwrap();

        let choice = choose(
            Side::Enemy,
            &CpuCaster::new(10),
            &CpuCaster::new(0),
            &ctx,
            &CastHistory::new(),
            &[usurp],
        );
        assert_eq!(choice, None);
    }

    #[test]
    fn test_priority_order() {
        let catalogue = SpellCatalogue::standard();
        let (board, hands) = (board(), SideMap::<Vector<Card>>::default());
        let ctx = CastContext::new(Phase::Choose, &board, &hands);
        let spells = [catalogue.get("gambit").unwrap(), catalogue.get("bolster").unwrap()];

        let choice = choose(
            Side::Player,
            &CpuCaster::new(5),
            &CpuCaster::new(5),
            &ctx,
            &CastHistory::new(),
            &spells,
        );
        assert_eq!(
            choice,
            Some(CpuChoice {
                spell_id: ids::BOLSTER,
                cost: 2
            })
        );
    }

    #[test]
    fn test_phase_filter() {
        let catalogue = SpellCatalogue::standard();
        let (board, hands) = (board(), SideMap::<Vector<Card>>::default());
        let ctx = CastContext::new(Phase::Resolve, &board, &hands);

        let choice = choose(
            Side::Player,
            &CpuCaster::new(5),
            &CpuCaster::new(5),
            &ctx,
            &CastHistory::new(),
            &[catalogue.get("bolster").unwrap()],
        );
        assert!(choice.is_none());
    }
}

//! Mana, pending casts and streak history for both sides of a combat.

use crate::core::{Phase, Side, SideMap};

use super::casting::{self, Advance, PendingSpell, ResolvedCast};
use super::catalogue::SpellCatalogue;
use super::definition::{compute_cost, CastHistory, CostContext, SpellDefinition};
use super::error::CastError;
use super::targeting::{CastContext, SpellSelection};

/// What happened to a cast after an activation or selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CastProgress {
    /// The cast waits for a selection at `stage`.
    Awaiting { stage: usize },
    /// The selection was ignored; the cast still waits at `stage`.
    Rejected { stage: usize },
    Resolved(ResolvedCast),
}

/// Casting state of one combat.
///
/// At most one cast is pending per side. Activating a new cast while one
/// is pending cancels (and refunds) the old one first.
#[derive(Clone, Debug)]
pub struct CastSession<'c> {
    catalogue: &'c SpellCatalogue,
    mana: SideMap<u32>,
    pending: SideMap<Option<PendingSpell>>,
    history: SideMap<CastHistory>,
}

impl<'c> CastSession<'c> {
    /// Start a combat with the given mana pools.
    #[must_use]
    pub fn new(catalogue: &'c SpellCatalogue, mana: SideMap<u32>) -> Self {
        Self {
            catalogue,
            mana,
            pending: SideMap::default(),
            history: SideMap::default(),
        }
    }

    #[must_use]
    pub fn catalogue(&self) -> &'c SpellCatalogue {
        self.catalogue
    }

    #[must_use]
    pub fn mana(&self, side: Side) -> u32 {
        self.mana[side]
    }

    pub fn grant_mana(&mut self, side: Side, amount: u32) {
        self.mana[side] = self.mana[side].saturating_add(amount);
    }

    /// The cast `side` has in flight, if any.
    #[must_use]
    pub fn pending(&self, side: Side) -> Option<&PendingSpell> {
        self.pending[side].as_ref()
    }

    #[must_use]
    pub fn history(&self, side: Side) -> &CastHistory {
        &self.history[side]
    }

    /// Current price of `spell` for `side`.
    #[must_use]
    pub fn cost_of(&self, side: Side, spell: &SpellDefinition, phase: Phase) -> u32 {
        let ctx = CostContext {
            caster: side,
            phase,
            history: &self.history[side],
            caster_mana: self.mana[side],
            opponent_mana: self.mana[side.opponent()],
        };
        compute_cost(spell, &ctx)
    }

    /// Begin casting a spell.
    ///
    /// Fails without changing anything when the spell is unknown, not
    /// castable in the current phase, needs an arcana the caster does not
    /// hold, is unaffordable, or opens on a required stage nothing can
    /// satisfy. Mana refunded by cancelling a pending cast of the same side
    /// counts as available.
    pub fn activate(&mut self, side: Side, spell_id: &str, ctx: &CastContext<'_>) -> Result<CastProgress, CastError> {
        let catalogue = self.catalogue;
        let spell = catalogue
            .get(spell_id)
            .ok_or_else(|| CastError::UnknownSpell(spell_id.to_string()))?;

        if !spell.allows(ctx.phase) {
            return Err(CastError::PhaseNotAllowed {
                spell: spell.name,
                phase: ctx.phase,
            });
        }

        if let Some(arcana) = spell.required_arcana {
            if !ctx.holds_arcana(side, arcana) {
                return Err(CastError::MissingArcana {
                    spell: spell.name,
                    arcana,
                });
            }
        }

        let cost = self.cost_of(side, spell, ctx.phase);
        let refund = self.pending[side].as_ref().map_or(0, |pending| pending.mana_spent);
        let available = self.mana[side] + refund;
        if available < cost {
            return Err(CastError::InsufficientMana {
                required: cost,
                available,
            });
        }

        // Optional stages without candidates are already skipped by `open`.
        let opened = casting::open(side, spell, cost, ctx);
        if let Advance::Awaiting(pending) = &opened {
            if pending.candidates(spell, ctx).is_empty() {
                return Err(CastError::NoValidTargets { spell: spell.name });
            }
        }

        if self.pending[side].is_some() {
            self.cancel(side)?;
        }
        self.mana[side] -= cost;

        tracing::debug!(%side, spell = %spell.id, cost, "cast activated");
        Ok(self.absorb(side, opened))
    }

    /// Offer a selection to the pending cast of `side`.
    ///
    /// An unacceptable selection yields `CastProgress::Rejected`.
    pub fn select(
        &mut self,
        side: Side,
        selection: &SpellSelection,
        ctx: &CastContext<'_>,
    ) -> Result<CastProgress, CastError> {
        let (pending, spell) = self.take_pending(side)?;
        Ok(self.absorb(side, casting::advance(pending, spell, selection, ctx)))
    }

    /// Decline the current stage of the pending cast of `side`.
    ///
    /// Declining a required stage yields `CastProgress::Rejected`.
    pub fn skip(&mut self, side: Side, ctx: &CastContext<'_>) -> Result<CastProgress, CastError> {
        let (pending, spell) = self.take_pending(side)?;
        Ok(self.absorb(side, casting::skip_stage(pending, spell, ctx)))
    }

    /// Every selection the pending cast of `side` would accept.
    #[must_use]
    pub fn candidates(&self, side: Side, ctx: &CastContext<'_>) -> Vec<SpellSelection> {
        self.pending[side]
            .as_ref()
            .and_then(|pending| {
                self.catalogue
                    .get(pending.spell_id.as_str())
                    .map(|spell| pending.candidates(spell, ctx))
            })
            .unwrap_or_default()
    }

    /// Cancel the pending cast of `side`, returning the refunded mana.
    pub fn cancel(&mut self, side: Side) -> Result<u32, CastError> {
        let pending = self.pending[side].take().ok_or(CastError::NoPendingCast(side))?;
        self.mana[side] += pending.mana_spent;
        tracing::debug!(%side, spell = %pending.spell_id, refund = pending.mana_spent, "cast cancelled");
        Ok(pending.mana_spent)
    }

    /// Pending casts never outlive a round.
    pub fn end_round(&mut self) {
        for side in Side::BOTH {
            // Only sides with a pending cast are cancelled.
            let _ = self.cancel(side);
        }
    }

    /// Forget pending casts and cast streaks.
    pub fn end_combat(&mut self) {
        self.end_round();
        for side in Side::BOTH {
            self.history[side].clear();
        }
    }

    fn take_pending(&mut self, side: Side) -> Result<(PendingSpell, &'c SpellDefinition), CastError> {
        let catalogue = self.catalogue;
        let pending = self.pending[side].take().ok_or(CastError::NoPendingCast(side))?;
        match catalogue.get(pending.spell_id.as_str()) {
            Some(spell) => Ok((pending, spell)),
            None => Err(CastError::UnknownSpell(pending.spell_id.to_string())),
        }
    }

    fn absorb(&mut self, side: Side, advance: Advance) -> CastProgress {
        match advance {
            Advance::Awaiting(pending) => {
                let stage = pending.stage;
                self.pending[side] = Some(pending);
                CastProgress::Awaiting { stage }
            }
            Advance::Rejected(pending) => {
                let stage = pending.stage;
                self.pending[side] = Some(pending);
                CastProgress::Rejected { stage }
            }
            Advance::Resolved(cast) => {
                self.history[side].record(cast.spell_id);
                CastProgress::Resolved(cast)
            }
        }
    }
}

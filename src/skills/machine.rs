//! Skill-phase transitions.
//!
//! ```text
//! NotStarted ──init──► Active(side) ──activate / pass──► Active(other | same)
//!      │                     │
//!      └──no actions──► Ended ◄──neither side can act──┘
//! ```
//!
//! A side can act while it has not passed and at least one of its lane
//! cards has a usable ability. After an activation play moves to the
//! opponent if the opponent can act, otherwise it stays. A pass is final
//! for the rest of the phase.

use im::{OrdMap, Vector};
use smallvec::SmallVec;

use crate::cards::{Card, CardId, CardTag};
use crate::core::{Lanes, SeededRng, Side, SideMap, LANE_COUNT};

use super::ability::{AbilityRecord, SkillAbility, SkillTarget, SkillTargetKind};
use super::error::SkillError;
use super::state::{
    SkillLane, SkillLimits, SkillOption, SkillOutcome, SkillPhaseSetup, SkillPhaseState, SkillStatus, Targeting,
};

/// Banner shown when neither side has a usable ability.
pub const NO_ACTIONS_BANNER: &str = "No skill actions available";

impl SkillPhaseState {
    /// Start a skill phase.
    ///
    /// Abilities are derived from the committed cards' values. If neither
    /// side can act the phase ends immediately with both sides passed and
    /// locked; if only one can act, it starts regardless of
    /// `starting_side`.
    #[must_use]
    pub fn init(setup: SkillPhaseSetup) -> Self {
        let lanes = setup.board.map(|_, lanes| {
            std::array::from_fn(|lane| SkillLane {
                card: lanes[lane].clone(),
                boost: 0,
            })
        });

        let abilities: OrdMap<CardId, AbilityRecord> = setup
            .board
            .iter()
            .flat_map(|(_, lanes)| lanes.iter().flatten())
            .map(|card| (card.id, AbilityRecord::new(card.id, SkillAbility::derive(card.value()))))
            .collect();

        let mut state = Self {
            status: SkillStatus::NotStarted,
            lanes,
            abilities,
            reserves: setup.reserves,
            draw_piles: setup.draw_piles,
            discards: SideMap::default(),
            passed: SideMap::default(),
            play_locked: SideMap::default(),
            limits: SkillLimits {
                max_rerolls: setup.config.max_rerolls_per_side,
                rerolls_used: SideMap::default(),
            },
            targeting: None,
            rng: SeededRng::new(setup.seed),
            banner: None,
            log: Vector::new(),
        };

        let eligible = SideMap::new(|side| !state.options(side).is_empty());
        state.play_locked = eligible.map(|_, &can_act| !can_act);

        state.status = match (eligible.player, eligible.enemy) {
            (false, false) => {
                state.passed = SideMap::with_value(true);
                state.banner = Some(NO_ACTIONS_BANNER.to_string());
                state.log.push_back(NO_ACTIONS_BANNER.to_string());
                SkillStatus::Ended
            }
            (true, false) => SkillStatus::Active(Side::Player),
            (false, true) => SkillStatus::Active(Side::Enemy),
            (true, true) => SkillStatus::Active(setup.starting_side),
        };

        tracing::debug!(status = ?state.status, seed = setup.seed, "skill phase started");
        state
    }

    /// Activations `side` could start right now. Never fails.
    ///
    /// Turn order is not considered: a side waiting for its turn still
    /// sees what it could do.
    #[must_use]
    pub fn options(&self, side: Side) -> Vec<SkillOption> {
        if self.status == SkillStatus::Ended || self.passed[side] {
            return Vec::new();
        }
        (0..LANE_COUNT)
            .filter_map(|lane| {
                let card = self.lanes[side][lane].card.as_ref()?;
                let record = self.usable_record(side, card).ok()?;
                Some(SkillOption {
                    lane,
                    card_id: card.id,
                    ability: record.ability,
                })
            })
            .collect()
    }

    /// Whether `side` still has something to do this phase.
    #[must_use]
    pub fn can_act(&self, side: Side) -> bool {
        !self.options(side).is_empty()
    }

    /// Begin activating the ability of the card in `lane`.
    ///
    /// Snapshots the state so the activation can be cancelled.
    pub fn begin_activation(&mut self, side: Side, lane: usize) -> Result<(), SkillError> {
        self.ensure_turn(side)?;
        if self.targeting.is_some() {
            return Err(SkillError::TargetingInProgress);
        }

        let card = self.card_in(side, lane)?;
        let record = self.usable_record(side, card)?;

        self.targeting = Some(Targeting {
            side,
            lane,
            card_id: card.id,
            ability: record.ability,
            picks: SmallVec::new(),
            snapshot: Box::new(self.snapshot()),
        });
        tracing::trace!(%side, lane, ability = %record.ability, "activation begun");
        Ok(())
    }

    /// Add a selection to the activation being targeted.
    ///
    /// Returns how many selections are still needed.
    pub fn pick_target(&mut self, side: Side, target: SkillTarget) -> Result<usize, SkillError> {
        self.ensure_turn(side)?;
        let targeting = self.targeting.as_ref().ok_or(SkillError::NotTargeting)?;

        let step = targeting.picks.len();
        let kind = *targeting
            .ability
            .targets()
            .get(step)
            .ok_or(SkillError::WrongTargetCount {
                expected: targeting.ability.targets().len(),
                actual: step + 1,
            })?;

        if !self.target_allowed(side, kind, target, &targeting.picks) {
            return Err(SkillError::InvalidTarget);
        }

        let targeting = self.targeting.as_mut().ok_or(SkillError::NotTargeting)?;
        targeting.picks.push(target);
        Ok(targeting.remaining())
    }

    /// Abandon the activation being targeted, restoring the snapshot.
    pub fn cancel_targeting(&mut self, side: Side) -> Result<(), SkillError> {
        self.ensure_turn(side)?;
        let targeting = self.targeting.take().ok_or(SkillError::NotTargeting)?;
        self.restore(*targeting.snapshot);
        tracing::trace!(%side, "activation cancelled");
        Ok(())
    }

    /// Perform the activation being targeted and hand off play.
    pub fn confirm_activation(&mut self, side: Side) -> Result<(), SkillError> {
        self.ensure_turn(side)?;
        let targeting = self.targeting.as_ref().ok_or(SkillError::NotTargeting)?;

        let expected = targeting.ability.targets().len();
        if targeting.picks.len() != expected {
            return Err(SkillError::WrongTargetCount {
                expected,
                actual: targeting.picks.len(),
            });
        }

        let Some(targeting) = self.targeting.take() else {
            return Err(SkillError::NotTargeting);
        };
        self.perform(&targeting);

        if let Some(record) = self.abilities.get_mut(&targeting.card_id) {
            record.uses_remaining = record.uses_remaining.saturating_sub(1);
        }

        self.hand_off(side, false);
        Ok(())
    }

    /// Give up the rest of the phase.
    pub fn pass(&mut self, side: Side) -> Result<(), SkillError> {
        self.ensure_turn(side)?;
        if self.targeting.is_some() {
            return Err(SkillError::TargetingInProgress);
        }
        self.passed[side] = true;
        self.log.push_back(format!("{side} passes"));
        self.hand_off(side, true);
        Ok(())
    }

    /// Apply an external reassignment of `side`'s committed cards.
    ///
    /// Abilities stay with their cards; lane boosts stay with their lanes.
    /// Incoming cards held in reserve leave it, and displaced lane cards
    /// return to it.
    pub fn reassign_lanes(&mut self, side: Side, lanes: Lanes) -> Result<(), SkillError> {
        if self.targeting.is_some() {
            return Err(SkillError::TargetingInProgress);
        }

        let incoming: Vec<CardId> = lanes.iter().flatten().map(|card| card.id).collect();
        self.reserves[side].retain(|card| !incoming.contains(&card.id));

        for (slot, card) in self.lanes[side].iter_mut().zip(lanes) {
            if let Some(displaced) = std::mem::replace(&mut slot.card, card) {
                if !incoming.contains(&displaced.id) {
                    self.reserves[side].push_back(displaced);
                }
            }
        }
        self.refresh_locks();
        if let SkillStatus::Active(current) = self.status {
            if !self.can_act(current) {
                self.hand_off(current, false);
            }
        }
        Ok(())
    }

    /// End the phase and return the resulting board.
    #[must_use]
    pub fn into_outcome(self) -> SkillOutcome {
        let mut state = self;
        if let Some(targeting) = state.targeting.take() {
            state.restore(*targeting.snapshot);
        }

        SkillOutcome {
            board: state.lanes.map(|_, lanes| std::array::from_fn(|lane| lanes[lane].card.clone())),
            boosts: state.lanes.map(|_, lanes| std::array::from_fn(|lane| lanes[lane].boost)),
            reserves: state.reserves,
            draw_piles: state.draw_piles,
            discards: state.discards,
            log: state.log,
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn ensure_turn(&self, side: Side) -> Result<(), SkillError> {
        match self.status {
            SkillStatus::Active(active) if active == side => Ok(()),
            SkillStatus::Active(_) if self.passed[side] => Err(SkillError::AlreadyPassed(side)),
            SkillStatus::Active(_) => Err(SkillError::NotYourTurn(side)),
            SkillStatus::NotStarted | SkillStatus::Ended => Err(SkillError::PhaseNotActive),
        }
    }

    fn card_in(&self, side: Side, lane: usize) -> Result<&Card, SkillError> {
        self.lanes[side]
            .get(lane)
            .ok_or(SkillError::LaneOutOfRange(lane))?
            .card
            .as_ref()
            .ok_or(SkillError::EmptyLane { side, lane })
    }

    /// The card's record, if its ability could be used right now.
    fn usable_record(&self, side: Side, card: &Card) -> Result<AbilityRecord, SkillError> {
        let record = *self.abilities.get(&card.id).ok_or(SkillError::NoAbility(card.id))?;
        if record.is_exhausted() {
            return Err(SkillError::Exhausted(card.id));
        }

        let reserve = &self.reserves[side];
        let usable = match record.ability {
            SkillAbility::SwapReserve => !reserve.is_empty() && !card.has_tag(CardTag::Anchored),
            SkillAbility::Reroll => {
                if self.limits.rerolls_left(side) == 0 {
                    return Err(SkillError::RerollLimitReached(side));
                }
                true
            }
            SkillAbility::BoostLane => true,
            SkillAbility::ReserveBoost => reserve.iter().any(|card| card.reserve_value() > 0),
        };

        if usable {
            Ok(record)
        } else {
            Err(SkillError::NoLegalTarget(card.id))
        }
    }

    fn target_allowed(&self, side: Side, kind: SkillTargetKind, target: SkillTarget, picks: &[SkillTarget]) -> bool {
        if picks.contains(&target) {
            return false;
        }
        match (kind, target) {
            (SkillTargetKind::ReserveCard, SkillTarget::Reserve(id)) => {
                self.reserves[side].iter().any(|card| card.id == id)
            }
            (SkillTargetKind::PositiveReserveCard, SkillTarget::Reserve(id)) => self.reserves[side]
                .iter()
                .any(|card| card.id == id && card.reserve_value() > 0),
            (SkillTargetKind::FriendlyLane, SkillTarget::Lane(lane)) => {
                self.lanes[side].get(lane).is_some_and(|slot| slot.card.is_some())
            }
            _ => false,
        }
    }

    fn take_reserve(&mut self, side: Side, id: CardId) -> Option<Card> {
        let index = self.reserves[side].iter().position(|card| card.id == id)?;
        Some(self.reserves[side].remove(index))
    }

    fn perform(&mut self, targeting: &Targeting) {
        let Targeting {
            side, lane, ability, ..
        } = *targeting;
        let picks = targeting.picks.as_slice();

        match (ability, picks) {
            (SkillAbility::SwapReserve, &[SkillTarget::Reserve(id)]) => {
                if let Some(incoming) = self.take_reserve(side, id) {
                    let outgoing = self.lanes[side][lane].card.replace(incoming.clone());
                    if let Some(outgoing) = outgoing {
                        self.log
                            .push_back(format!("{side} swaps {} for {}", outgoing.name, incoming.name));
                        self.reserves[side].push_back(outgoing);
                    }
                }
            }
            (SkillAbility::Reroll, &[]) => {
                self.limits.rerolls_used[side] += 1;
                let Some(index) = self.rng.next_index(self.draw_piles[side].len()) else {
                    self.log.push_back(format!("{side} rerolls, but the draw pile is empty"));
                    return;
                };
                let drawn = self.draw_piles[side].remove(index);
                self.log.push_back(format!("{side} rerolls into {}", drawn.name));
                if let Some(old) = self.lanes[side][lane].card.replace(drawn) {
                    self.discards[side].push_back(old);
                }
            }
            (SkillAbility::BoostLane, &[SkillTarget::Lane(target)]) => {
                let amount = self.lanes[side][lane].card.as_ref().map_or(0, Card::value);
                self.lanes[side][target].boost += amount;
                self.log.push_back(format!("{side} boosts lane {} by {amount}", target + 1));
            }
            (SkillAbility::ReserveBoost, &[SkillTarget::Reserve(id), SkillTarget::Lane(target)]) => {
                if let Some(spent) = self.take_reserve(side, id) {
                    let amount = spent.reserve_value();
                    self.lanes[side][target].boost += amount;
                    self.log
                        .push_back(format!("{side} spends {} to boost lane {} by {amount}", spent.name, target + 1));
                    self.discards[side].push_back(spent);
                }
            }
            _ => {}
        }
        tracing::debug!(%side, lane, %ability, "skill activated");
    }

    fn refresh_locks(&mut self) {
        for side in Side::BOTH {
            self.play_locked[side] = !self.passed[side] && !self.can_act(side);
        }
    }

    /// Decide who plays next after `actor` activated or passed.
    fn hand_off(&mut self, actor: Side, passed: bool) {
        self.refresh_locks();
        let opponent = actor.opponent();

        self.status = if self.can_act(opponent) {
            SkillStatus::Active(opponent)
        } else if !passed && self.can_act(actor) {
            SkillStatus::Active(actor)
        } else {
            SkillStatus::Ended
        };

        tracing::debug!(%actor, passed, status = ?self.status, "skill turn handed off");
    }
}

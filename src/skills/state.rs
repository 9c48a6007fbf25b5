//! Skill-phase state and read-only views.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, CardId, Fighter};
use crate::core::{Board, EngineConfig, SeededRng, Side, SideMap, LANE_COUNT};

use super::ability::{AbilityRecord, SkillAbility, SkillTarget};

/// Where the phase is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillStatus {
    NotStarted,
    Active(Side),
    Ended,
}

/// One lane slot of one side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLane {
    pub card: Option<Card>,
    /// Added to the lane's value at reveal.
    pub boost: i32,
}

/// Per-phase limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLimits {
    pub max_rerolls: u8,
    pub rerolls_used: SideMap<u8>,
}

impl SkillLimits {
    #[must_use]
    pub fn rerolls_left(&self, side: Side) -> u8 {
        self.max_rerolls.saturating_sub(self.rerolls_used[side])
    }
}

/// Everything an activation may change, captured before targeting starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSnapshot {
    pub lanes: SideMap<[SkillLane; LANE_COUNT]>,
    pub abilities: OrdMap<CardId, AbilityRecord>,
    pub reserves: SideMap<Vector<Card>>,
    pub draw_piles: SideMap<Vector<Card>>,
    pub discards: SideMap<Vector<Card>>,
    pub limits: SkillLimits,
    pub rng: SeededRng,
}

/// An activation awaiting its targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targeting {
    pub side: Side,
    pub lane: usize,
    pub card_id: CardId,
    pub ability: SkillAbility,
    pub picks: SmallVec<[SkillTarget; 2]>,
    pub snapshot: Box<SkillSnapshot>,
}

impl Targeting {
    /// Selections still needed before the activation can be confirmed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.ability.targets().len().saturating_sub(self.picks.len())
    }
}

/// A lane as presented to callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaneView {
    pub card: Option<Card>,
    pub boost: i32,
    pub ability: Option<SkillAbility>,
    pub exhausted: bool,
    pub uses_remaining: u8,
}

/// An activation the active side could start right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillOption {
    pub lane: usize,
    pub card_id: CardId,
    pub ability: SkillAbility,
}

/// Inputs of a skill phase.
#[derive(Clone, Debug)]
pub struct SkillPhaseSetup {
    pub board: Board,
    pub reserves: SideMap<Vector<Card>>,
    pub draw_piles: SideMap<Vector<Card>>,
    pub starting_side: Side,
    pub seed: u64,
    pub config: EngineConfig,
}

impl SkillPhaseSetup {
    /// Setup with empty reserves and draw piles, player first, seed zero.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            reserves: SideMap::default(),
            draw_piles: SideMap::default(),
            starting_side: Side::Player,
            seed: 0,
            config: EngineConfig::default(),
        }
    }

    /// Setup for two fighters: each reserve is the first `reserve_cap`
    /// cards of the hand and each draw pile is the deck.
    #[must_use]
    pub fn from_fighters(board: Board, fighters: &SideMap<Fighter>, config: EngineConfig) -> Self {
        Self {
            reserves: fighters.map(|_, fighter| fighter.hand.take(config.reserve_cap)),
            draw_piles: fighters.map(|_, fighter| fighter.deck.clone()),
            config,
            ..Self::new(board)
        }
    }

    /// Set the reserves (builder pattern).
    #[must_use]
    pub fn with_reserves(mut self, reserves: SideMap<Vector<Card>>) -> Self {
        self.reserves = reserves;
        self
    }

    /// Set the draw piles (builder pattern).
    #[must_use]
    pub fn with_draw_piles(mut self, draw_piles: SideMap<Vector<Card>>) -> Self {
        self.draw_piles = draw_piles;
        self
    }

    /// Set the side that acts first (builder pattern).
    #[must_use]
    pub fn starting_with(mut self, side: Side) -> Self {
        self.starting_side = side;
        self
    }

    /// Set the RNG seed (builder pattern).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the configuration (builder pattern).
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

/// What the phase hands back to the round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillOutcome {
    pub board: Board,
    pub boosts: SideMap<[i32; LANE_COUNT]>,
    pub reserves: SideMap<Vector<Card>>,
    pub draw_piles: SideMap<Vector<Card>>,
    pub discards: SideMap<Vector<Card>>,
    pub log: Vector<String>,
}

/// The skill phase.
///
/// All transitions live in the `machine` module. The state is plain data,
/// so two runs can be compared byte for byte after serialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPhaseState {
    pub(crate) status: SkillStatus,
    pub(crate) lanes: SideMap<[SkillLane; LANE_COUNT]>,
    pub(crate) abilities: OrdMap<CardId, AbilityRecord>,
    pub(crate) reserves: SideMap<Vector<Card>>,
    pub(crate) draw_piles: SideMap<Vector<Card>>,
    pub(crate) discards: SideMap<Vector<Card>>,
    pub(crate) passed: SideMap<bool>,
    pub(crate) play_locked: SideMap<bool>,
    pub(crate) limits: SkillLimits,
    pub(crate) targeting: Option<Targeting>,
    pub(crate) rng: SeededRng,
    pub(crate) banner: Option<String>,
    pub(crate) log: Vector<String>,
}

impl SkillPhaseState {
    #[must_use]
    pub fn status(&self) -> SkillStatus {
        self.status
    }

    /// The side whose turn it is.
    #[must_use]
    pub fn active_side(&self) -> Option<Side> {
        match self.status {
            SkillStatus::Active(side) => Some(side),
            SkillStatus::NotStarted | SkillStatus::Ended => None,
        }
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.status == SkillStatus::Ended
    }

    #[must_use]
    pub fn passed(&self, side: Side) -> bool {
        self.passed[side]
    }

    #[must_use]
    pub fn play_locked(&self, side: Side) -> bool {
        self.play_locked[side]
    }

    #[must_use]
    pub fn limits(&self) -> &SkillLimits {
        &self.limits
    }

    #[must_use]
    pub fn targeting(&self) -> Option<&Targeting> {
        self.targeting.as_ref()
    }

    #[must_use]
    pub fn reserve(&self, side: Side) -> &Vector<Card> {
        &self.reserves[side]
    }

    #[must_use]
    pub fn draw_pile(&self, side: Side) -> &Vector<Card> {
        &self.draw_piles[side]
    }

    #[must_use]
    pub fn discard(&self, side: Side) -> &Vector<Card> {
        &self.discards[side]
    }

    /// Banner shown when the phase ended before any turn.
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    #[must_use]
    pub fn log(&self) -> &Vector<String> {
        &self.log
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Binary encoding of the whole phase. Two replays of the same seed and
    /// actions encode to identical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Ability record of a card, wherever it sits.
    #[must_use]
    pub fn ability_of(&self, card_id: CardId) -> Option<&AbilityRecord> {
        self.abilities.get(&card_id)
    }

    /// A lane with its card's ability and exhaustion.
    #[must_use]
    pub fn lane_view(&self, side: Side, lane: usize) -> Option<LaneView> {
        let slot = self.lanes[side].get(lane)?;
        let record = slot
            .card
            .as_ref()
            .and_then(|card| self.abilities.get(&card.id));

        Some(LaneView {
            card: slot.card.clone(),
            boost: slot.boost,
            ability: record.map(|record| record.ability),
            exhausted: record.is_some_and(AbilityRecord::is_exhausted),
            uses_remaining: record.map_or(0, |record| record.uses_remaining),
        })
    }

    pub(crate) fn snapshot(&self) -> SkillSnapshot {
        SkillSnapshot {
            lanes: self.lanes.clone(),
            abilities: self.abilities.clone(),
            reserves: self.reserves.clone(),
            draw_piles: self.draw_piles.clone(),
            discards: self.discards.clone(),
            limits: self.limits,
            rng: self.rng,
        }
    }

    pub(crate) fn restore(&mut self, snapshot: SkillSnapshot) {
        self.lanes = snapshot.lanes;
        self.abilities = snapshot.abilities;
        self.reserves = snapshot.reserves;
        self.draw_piles = snapshot.draw_piles;
        self.discards = snapshot.discards;
        self.limits = snapshot.limits;
        self.rng = snapshot.rng;
    }
}

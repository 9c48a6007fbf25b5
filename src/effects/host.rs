//! The seam between the effect engine and caller-owned match state.
//!
//! The engine never holds match data. It reads snapshots through the
//! `MatchHost` getters and changes them only through updater closures,
//! each receiving the current value and returning the next one.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{Board, LaneBoosts, Side, SideMap, LANE_COUNT};
use crate::spells::EffectPayload;
use crate::wheel::WheelToken;

/// Chill stacks per card id.
pub type ChillStacks = OrdMap<CardId, u32>;

/// Tokens of the three wheels.
pub type Tokens = [WheelToken; LANE_COUNT];

/// Caller-owned match state, as seen by the effect engine.
pub trait MatchHost {
    /// Committed cards of both sides.
    fn assignments(&self) -> &Board;

    /// Reserve totals, after any penalties already applied.
    fn reserve_sums(&self) -> SideMap<i32>;

    /// Persisted wheel tokens.
    fn tokens(&self) -> Tokens;

    /// Skill-phase lane boosts, counted in every token recomputation.
    fn lane_boosts(&self) -> LaneBoosts;

    fn update_assignments(&mut self, updater: &dyn Fn(&Board) -> Board) -> Board;

    fn update_reserve_sums(&mut self, updater: &dyn Fn(&SideMap<i32>) -> SideMap<i32>) -> SideMap<i32>;

    /// Persist token changes. Only called for revealed phases and for
    /// explicit token shifts.
    fn update_tokens(&mut self, updater: &dyn Fn(&Tokens) -> Tokens) -> Tokens;

    fn update_lane_chill_stacks(&mut self, updater: &dyn Fn(&ChillStacks) -> ChillStacks) -> ChillStacks;

    fn set_initiative(&mut self, side: Side);

    fn append_log(&mut self, line: &str);

    /// Show a recomputed token position without persisting it.
    fn update_token_visual(&mut self, wheel: usize, position: u8);

    /// Lower a side's reserve total, clamped at zero.
    fn apply_reserve_penalty(&mut self, side: Side, amount: i32) {
        self.update_reserve_sums(&|sums| {
            let mut next = *sums;
            next[side] = (next[side] - amount).max(0);
            next
        });
    }

    /// Called once per applied payload, with the payload itself.
    fn broadcast_effects(&mut self, _payload: &EffectPayload) {}
}

/// In-memory match state.
///
/// Besides the data itself it counts how often the engine touched each
/// part, which replays and tests use to check the engine's call pattern.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub board: Board,
    pub boosts: LaneBoosts,
    pub reserve_sums: SideMap<i32>,
    pub tokens: Tokens,
    pub chill_stacks: ChillStacks,
    pub initiative: Side,
    pub log: Vector<String>,
    /// Latest previewed position per wheel.
    pub token_visuals: [Option<u8>; LANE_COUNT],

    pub assignment_updates: u32,
    pub token_commits: u32,
    pub token_visual_updates: [u32; LANE_COUNT],
    pub broadcasts: Vec<EffectPayload>,
}

impl MatchState {
    /// Create a state with the given board and tokens.
    #[must_use]
    pub fn new(board: Board, tokens: Tokens) -> Self {
        Self {
            board,
            tokens,
            ..Self::default()
        }
    }

    /// Set reserve totals (builder pattern).
    #[must_use]
    pub fn with_reserve_sums(mut self, reserve_sums: SideMap<i32>) -> Self {
        self.reserve_sums = reserve_sums;
        self
    }

    /// Set skill-phase lane boosts (builder pattern).
    #[must_use]
    pub fn with_lane_boosts(mut self, boosts: LaneBoosts) -> Self {
        self.boosts = boosts;
        self
    }

    /// Set the initiative holder (builder pattern).
    #[must_use]
    pub fn with_initiative(mut self, initiative: Side) -> Self {
        self.initiative = initiative;
        self
    }
}

impl MatchHost for MatchState {
    fn assignments(&self) -> &Board {
        &self.board
    }

    fn reserve_sums(&self) -> SideMap<i32> {
        self.reserve_sums
    }

    fn tokens(&self) -> Tokens {
        self.tokens
    }

    fn lane_boosts(&self) -> LaneBoosts {
        self.boosts
    }

    fn update_assignments(&mut self, updater: &dyn Fn(&Board) -> Board) -> Board {
        self.board = updater(&self.board);
        self.assignment_updates += 1;
        self.board.clone()
    }

    fn update_reserve_sums(&mut self, updater: &dyn Fn(&SideMap<i32>) -> SideMap<i32>) -> SideMap<i32> {
        self.reserve_sums = updater(&self.reserve_sums);
        self.reserve_sums
    }

    fn update_tokens(&mut self, updater: &dyn Fn(&Tokens) -> Tokens) -> Tokens {
        self.tokens = updater(&self.tokens);
        self.token_commits += 1;
        self.tokens
    }

    fn update_lane_chill_stacks(&mut self, updater: &dyn Fn(&ChillStacks) -> ChillStacks) -> ChillStacks {
        self.chill_stacks = updater(&self.chill_stacks);
        self.chill_stacks.clone()
    }

    fn set_initiative(&mut self, side: Side) {
        self.initiative = side;
    }

    fn append_log(&mut self, line: &str) {
        self.log.push_back(line.to_string());
    }

    fn update_token_visual(&mut self, wheel: usize, position: u8) {
        if let Some(slot) = self.token_visuals.get_mut(wheel) {
            *slot = Some(position);
            self.token_visual_updates[wheel] += 1;
        }
    }

    fn broadcast_effects(&mut self, payload: &EffectPayload) {
        self.broadcasts.push(payload.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_penalty_clamps() {
        let mut state = MatchState::default().with_reserve_sums(SideMap::from_pair(5, 1));
        state.apply_reserve_penalty(Side::Player, 2);
        state.apply_reserve_penalty(Side::Enemy, 3);
        assert_eq!(state.reserve_sums, SideMap::from_pair(3, 0));
    }

    #[test]
    fn test_counters() {
        let mut state = MatchState::default();
        state.update_tokens(&|tokens| *tokens);
        state.update_token_visual(1, 9);
        state.update_token_visual(7, 9);

        assert_eq!(state.token_commits, 1);
        assert_eq!(state.token_visuals, [None, Some(9), None]);
        assert_eq!(state.token_visual_updates, [0, 1, 0]);
    }

    #[test]
    fn test_state_serialization() {
        let mut state = MatchState::default().with_initiative(Side::Enemy);
        state.append_log("hello");
        let bytes = bincode::serialize(&state).unwrap();
        let restored: MatchState = bincode::deserialize(&bytes).unwrap();
        assert_eq!(state, restored);
    }
}

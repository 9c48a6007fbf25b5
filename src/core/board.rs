//! Committed board state.
//!
//! Each side owns three lane slots; each slot holds at most one card.
//! Lane `i` of both sides feeds wheel `i`.

use crate::cards::{Card, CardId};

use super::config::LANE_COUNT;
use super::side::{Side, SideMap};

/// One side's lane slots.
pub type Lanes = [Option<Card>; LANE_COUNT];

/// Both sides' lane slots.
pub type Board = SideMap<Lanes>;

/// An empty set of lanes.
#[must_use]
pub fn empty_lanes() -> Lanes {
    [None, None, None]
}

/// Committed value of a lane (0 when empty).
#[must_use]
pub fn lane_value(lanes: &Lanes, lane: usize) -> i32 {
    lanes
        .get(lane)
        .and_then(Option::as_ref)
        .map_or(0, Card::value)
}

/// Skill-phase boosts per side and lane, added to lane values at reveal.
pub type LaneBoosts = SideMap<[i32; LANE_COUNT]>;

/// No boosts on any lane.
#[must_use]
pub fn no_boosts() -> LaneBoosts {
    SideMap::from_pair([0; LANE_COUNT], [0; LANE_COUNT])
}

/// Value a side contributes to a wheel: its committed card plus the lane's boost.
#[must_use]
pub fn lane_total(board: &Board, boosts: &LaneBoosts, side: Side, lane: usize) -> i32 {
    lane_value(&board[side], lane) + boosts[side].get(lane).copied().unwrap_or(0)
}

/// Find which lane holds a card.
#[must_use]
pub fn find_lane(lanes: &Lanes, id: CardId) -> Option<usize> {
    lanes
        .iter()
        .position(|slot| slot.as_ref().is_some_and(|c| c.id == id))
}

/// Find which side and lane hold a card.
#[must_use]
pub fn locate(board: &Board, id: CardId) -> Option<(Side, usize)> {
    Side::BOTH
        .into_iter()
        .find_map(|side| find_lane(&board[side], id).map(|lane| (side, lane)))
}

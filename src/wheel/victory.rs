//! Victory-condition evaluation and full-board resolution.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{lane_total, Board, EngineConfig, LaneBoosts, Side, SideMap, LANE_COUNT};

use super::section::{Section, VictoryCondition, Wheel};
use super::token::WheelToken;

/// Everything a section needs to pick a winner for one lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneContext {
    pub player_value: i32,
    pub enemy_value: i32,
    /// Reserve totals after any drains have been applied.
    pub reserve_sums: SideMap<i32>,
    pub initiative: Side,
}

/// Sum the reserve values of at most `cap` leftover cards, in hand order.
///
/// ```
/// use wheel_duel::cards::CardFactory;
/// use wheel_duel::wheel::reserve_sum;
///
/// let mut factory = CardFactory::new();
/// let hand = vec![factory.normal("3", 3), factory.split("1/4", 1, 4), factory.normal("9", 9)];
/// assert_eq!(reserve_sum(&hand, 2), 7);
/// ```
#[must_use]
pub fn reserve_sum<'a>(cards: impl IntoIterator<Item = &'a Card>, cap: usize) -> i32 {
    cards.into_iter().take(cap).map(Card::reserve_value).sum()
}

fn winner_of(ordering: Ordering, initiative: Side, config: &EngineConfig) -> Option<Side> {
    match ordering {
        Ordering::Greater => Some(Side::Player),
        Ordering::Less => Some(Side::Enemy),
        Ordering::Equal if config.initiative_breaks_ties => Some(initiative),
        Ordering::Equal => None,
    }
}

/// Decide the winner of a lane whose token landed in `section`.
///
/// Returns `None` on a tie unless the configuration lets initiative break it.
#[must_use]
pub fn evaluate(section: &Section, ctx: &LaneContext, config: &EngineConfig) -> Option<Side> {
    let ordering = match section.condition {
        VictoryCondition::Strongest => ctx.player_value.cmp(&ctx.enemy_value),
        VictoryCondition::Weakest => ctx.enemy_value.cmp(&ctx.player_value),
        VictoryCondition::ReserveSum => ctx.reserve_sums.player.cmp(&ctx.reserve_sums.enemy),
        VictoryCondition::ClosestToTarget => {
            let target = section.target.unwrap_or(0);
            let player_gap = (ctx.player_value - target).abs();
            let enemy_gap = (ctx.enemy_value - target).abs();
            enemy_gap.cmp(&player_gap)
        }
        VictoryCondition::Initiative => return Some(ctx.initiative),
    };
    winner_of(ordering, ctx.initiative, config)
}

/// Outcome of one wheel at reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneOutcome {
    pub wheel: usize,
    pub token: WheelToken,
    pub section_index: usize,
    pub condition: VictoryCondition,
    pub player_value: i32,
    pub enemy_value: i32,
    pub winner: Option<Side>,
}

/// Spin and evaluate all three wheels from their origins.
///
/// Lane values are the committed card values plus any skill-phase boosts.
#[must_use]
pub fn resolve_board(
    wheels: &[Wheel; LANE_COUNT],
    tokens: &[WheelToken; LANE_COUNT],
    board: &Board,
    boosts: &LaneBoosts,
    reserve_sums: SideMap<i32>,
    initiative: Side,
    config: &EngineConfig,
) -> [LaneOutcome; LANE_COUNT] {
    std::array::from_fn(|lane| {
        let player_value = lane_total(board, boosts, Side::Player, lane);
        let enemy_value = lane_total(board, boosts, Side::Enemy, lane);
        let token = tokens[lane].spun(player_value, enemy_value);
        let (section_index, section) = wheels[lane].section_at(token.position);
        let ctx = LaneContext {
            player_value,
            enemy_value,
            reserve_sums,
            initiative,
        };
        let winner = evaluate(section, &ctx, config);

        tracing::debug!(
            lane,
            position = token.position,
            condition = ?section.condition,
            ?winner,
            "wheel resolved"
        );

        LaneOutcome {
            wheel: lane,
            token,
            section_index,
            condition: section.condition,
            player_value,
            enemy_value,
            winner,
        }
    })
}

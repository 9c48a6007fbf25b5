//! Application of effect payloads to a `MatchHost`.
//!
//! Records are applied in a fixed order:
//!
//! 1. card adjustments and mirror copies (one board update, if anything changed)
//! 2. wheel token shifts
//! 3. one token recomputation per affected wheel
//! 4. reserve drains
//! 5. chill stacks
//! 6. initiative claims
//! 7. log lines
//!
//! Records owned by the round layer are returned untouched in
//! `ApplyReport::deferred`, and the payload is broadcast exactly once.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Fighter;
use crate::core::{find_lane, lane_total, Board, EngineConfig, Phase, Side, SideMap, LANE_COUNT};
use crate::spells::{
    DelayedEffect, DrawRequest, EffectPayload, HandAdjustment, HandDiscard, InitiativeChallenge, PositionSwap,
};

use super::host::{MatchHost, Tokens};

/// Where in the round a payload is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApplyScope {
    pub phase: Phase,
}

impl ApplyScope {
    #[must_use]
    pub const fn new(phase: Phase) -> Self {
        Self { phase }
    }
}

/// Records the engine does not apply itself, in payload order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredEffects {
    pub position_swaps: Vec<PositionSwap>,
    pub hand_discards: Vec<HandDiscard>,
    pub hand_adjustments: Vec<HandAdjustment>,
    pub initiative_challenges: Vec<InitiativeChallenge>,
    pub draw_cards: Vec<DrawRequest>,
    pub delayed_effects: Vec<DelayedEffect>,
}

impl DeferredEffects {
    fn from_payload(payload: &EffectPayload) -> Self {
        Self {
            position_swaps: payload.position_swaps.clone(),
            hand_discards: payload.hand_discards.clone(),
            hand_adjustments: payload.hand_adjustments.clone(),
            initiative_challenges: payload.initiative_challenges.clone(),
            draw_cards: payload.draw_cards.clone(),
            delayed_effects: payload.delayed_effects.clone(),
        }
    }

    /// Draw the requested cards into the fighters' hands.
    ///
    /// No hand grows past `config.hand_limit`; requests beyond it are
    /// dropped. Returns how many cards each side drew.
    pub fn apply_draws(&self, fighters: &mut SideMap<Fighter>, config: &EngineConfig) -> SideMap<usize> {
        let mut drawn = SideMap::<usize>::default();
        for request in &self.draw_cards {
            let count = usize::try_from(request.count).unwrap_or(usize::MAX);
            drawn[request.side] += fighters[request.side].draw_capped(count, config.hand_limit);
        }
        tracing::debug!(player = drawn.player, enemy = drawn.enemy, "deferred draws applied");
        drawn
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position_swaps.is_empty()
            && self.hand_discards.is_empty()
            && self.hand_adjustments.is_empty()
            && self.initiative_challenges.is_empty()
            && self.draw_cards.is_empty()
            && self.delayed_effects.is_empty()
    }
}

/// What applying a payload did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Wheels whose token was recomputed, ascending.
    pub recomputed_wheels: SmallVec<[usize; LANE_COUNT]>,
    /// Records skipped because their card was no longer on the board.
    pub omitted: usize,
    pub deferred: DeferredEffects,
}

/// Board after card records, the lanes they touched and how many were stale.
struct BoardChange {
    board: Board,
    lanes: [bool; LANE_COUNT],
    omitted: usize,
}

fn apply_card_records(current: &Board, payload: &EffectPayload) -> BoardChange {
    let mut board = current.clone();
    let mut lanes = [false; LANE_COUNT];
    let mut omitted = 0;

    for adjustment in &payload.card_adjustments {
        let lanes_of_side = &mut board[adjustment.side];
        let Some(lane) = find_lane(lanes_of_side, adjustment.card_id) else {
            omitted += 1;
            continue;
        };
        if let Some(card) = &mut lanes_of_side[lane] {
            let adjusted = card.adjusted(&adjustment.delta);
            if adjusted != *card {
                *card = adjusted;
                lanes[lane] = true;
            }
        }
    }

    for mirror in &payload.mirror_copy_effects {
        let source = find_lane(&board[mirror.source_side], mirror.source)
            .and_then(|lane| board[mirror.source_side][lane].clone());
        let target_lane = find_lane(&board[mirror.target_side], mirror.target);

        let (Some(source), Some(lane)) = (source, target_lane) else {
            omitted += 1;
            continue;
        };
        if let Some(card) = &mut board[mirror.target_side][lane] {
            let mirrored = card.mirrored_from(&source);
            if mirrored != *card {
                *card = mirrored;
                lanes[lane] = true;
            }
        }
    }

    BoardChange { board, lanes, omitted }
}

/// Applies effect payloads.
pub struct EffectEngine;

impl EffectEngine {
    /// Apply every record of `payload` to `host`.
    ///
    /// Token recomputation is a pure function of each wheel's origin, the
    /// committed values after the payload and the host's lane boosts. Before reveal it is only
    /// previewed through `update_token_visual`; once revealed it is
    /// committed through a single `update_tokens` call.
    pub fn apply<H: MatchHost + ?Sized>(payload: &EffectPayload, host: &mut H, scope: &ApplyScope) -> ApplyReport {
        let mut report = ApplyReport::default();
        let mut affected = [false; LANE_COUNT];

        // Cards.
        let change = apply_card_records(host.assignments(), payload);
        report.omitted += change.omitted;
        if change.omitted > 0 {
            tracing::warn!(omitted = change.omitted, "stale card records omitted");
        }
        if change.lanes.iter().any(|&touched| touched) {
            host.update_assignments(&|board| apply_card_records(board, payload).board);
            affected = change.lanes;
        }

        // Token shifts persist immediately: they move the origin itself.
        let mut shifts = [0i32; LANE_COUNT];
        for adjustment in &payload.wheel_token_adjustments {
            match shifts.get_mut(adjustment.wheel) {
                Some(shift) => {
                    *shift += adjustment.delta;
                    affected[adjustment.wheel] = true;
                }
                None => report.omitted += 1,
            }
        }
        if shifts.iter().any(|&shift| shift != 0) {
            host.update_tokens(&|tokens| shift_tokens(tokens, &shifts));
        }

        // Recompute each affected wheel exactly once.
        let board = host.assignments().clone();
        let boosts = host.lane_boosts();
        let tokens = host.tokens();
        let mut recomputed = tokens;
        for wheel in (0..LANE_COUNT).filter(|&wheel| affected[wheel]) {
            let player_value = lane_total(&board, &boosts, Side::Player, wheel);
            let enemy_value = lane_total(&board, &boosts, Side::Enemy, wheel);
            recomputed[wheel] = tokens[wheel].spun(player_value, enemy_value);
            report.recomputed_wheels.push(wheel);
            tracing::trace!(wheel, position = recomputed[wheel].position, "token recomputed");
        }

        if !report.recomputed_wheels.is_empty() {
            if scope.phase.is_revealed() {
                host.update_tokens(&|current| {
                    let mut next = *current;
                    for wheel in (0..LANE_COUNT).filter(|&wheel| affected[wheel]) {
                        next[wheel] = recomputed[wheel];
                    }
                    next
                });
            } else {
                for &wheel in &report.recomputed_wheels {
                    host.update_token_visual(wheel, recomputed[wheel].position);
                }
            }
        }

        // Reserves.
        for drain in &payload.reserve_drains {
            tracing::trace!(side = %drain.side, amount = drain.amount, "reserve drained");
            host.apply_reserve_penalty(drain.side, drain.amount);
        }

        // Chill only ever grows.
        let chills: Vec<_> = payload.chilled_cards.iter().filter(|chill| chill.stacks > 0).copied().collect();
        if !chills.is_empty() {
            host.update_lane_chill_stacks(&|stacks| {
                let mut next = stacks.clone();
                for chill in &chills {
                    *next.entry(chill.card_id).or_insert(0) += chill.stacks.unsigned_abs();
                }
                next
            });
        }

        for claim in &payload.initiative_claims {
            host.set_initiative(claim.side);
        }

        for line in &payload.log {
            host.append_log(line);
        }

        report.deferred = DeferredEffects::from_payload(payload);
        host.broadcast_effects(payload);

        tracing::debug!(
            phase = %scope.phase,
            recomputed = ?report.recomputed_wheels,
            omitted = report.omitted,
            "payload applied"
        );
        report
    }
}

fn shift_tokens(tokens: &Tokens, shifts: &[i32; LANE_COUNT]) -> Tokens {
    let mut next = *tokens;
    for (token, &shift) in next.iter_mut().zip(shifts) {
        if shift != 0 {
            *token = token.shifted(shift);
        }
    }
    next
}

//! Effect application tests: spells cast through a session and applied to
//! an in-memory match.

use im::Vector;

use wheel_duel::cards::{Card, CardFactory, CardId, Fighter, StatDelta};
use wheel_duel::core::{Board, EngineConfig, Phase, Side, SideMap};
use wheel_duel::effects::{ApplyScope, EffectEngine, MatchState};
use wheel_duel::spells::{
    CardLocation, CastContext, CastProgress, CastSession, SpellCatalogue, SpellRuntimeState, SpellSelection,
};
use wheel_duel::wheel::{evaluate, resolve_board, spin, LaneContext, Section, VictoryCondition, Wheel, WheelToken};

fn duel_board() -> Board {
    Board::from_pair(
        [
            Some(Card::normal(CardId(1), "Four", 4)),
            Some(Card::normal(CardId(2), "Three", 3)),
            None,
        ],
        [
            Some(Card::normal(CardId(3), "Seven", 7)),
            Some(Card::normal(CardId(4), "Five", 5)),
            None,
        ],
    )
}

fn lane_card(state: &MatchState, side: Side, lane: usize) -> &Card {
    state.board[side][lane].as_ref().expect("lane should hold a card")
}

// =============================================================================
// Mirror
// =============================================================================

#[test]
fn test_mirror_copies_value_and_recomputes_once() {
    let mut state = MatchState::new(duel_board(), [WheelToken::at(2); 3])
        .with_reserve_sums(SideMap::from_pair(6, 2))
        .with_initiative(Side::Enemy);

    let mut payload = SpellRuntimeState::new();
    payload.mirror(Side::Player, CardId(1), Side::Enemy, CardId(3));
    // A second mirror onto the same wheel must not recompute it again.
    payload.mirror(Side::Player, CardId(1), Side::Enemy, CardId(3));

    let report = EffectEngine::apply(&payload, &mut state, &ApplyScope::new(Phase::Showdown));

    assert_eq!(lane_card(&state, Side::Player, 0).value(), 7);
    assert_eq!(lane_card(&state, Side::Enemy, 0).value(), 7);
    assert_eq!(lane_card(&state, Side::Player, 0).id, CardId(1));

    assert_eq!(report.recomputed_wheels.as_slice(), &[0]);
    assert_eq!(state.token_commits, 1);
    assert_eq!(state.tokens[0].position, spin(2, 7, 7));

    assert_eq!(state.reserve_sums, SideMap::from_pair(6, 2));
    assert!(state.chill_stacks.is_empty());
    assert_eq!(state.initiative, Side::Enemy);
    assert!(state.log.is_empty());
}

#[test]
fn test_mirror_image_spell_end_to_end() {
    let catalogue = SpellCatalogue::standard();
    let mut session = CastSession::new(&catalogue, SideMap::from_pair(3, 0));
    let board = duel_board();
    let hands = SideMap::<Vector<Card>>::default();
    let ctx = CastContext::new(Phase::Choose, &board, &hands);

    session.activate(Side::Player, "mirror_image", &ctx).unwrap();
    let ally = SpellSelection::Card {
        side: Side::Player,
        location: CardLocation::Lane(1),
    };
    let Ok(CastProgress::Resolved(cast)) = session.select(Side::Player, &ally, &ctx) else {
        panic!("mirror image should resolve after one selection");
    };

    let mut state = MatchState::new(board.clone(), [WheelToken::at(0); 3]);
    EffectEngine::apply(&cast.payload, &mut state, &ApplyScope::new(Phase::Choose));

    assert_eq!(lane_card(&state, Side::Player, 1).value(), 5);
    assert_eq!(state.log.len(), 1);
    assert_eq!(state.broadcasts, vec![cast.payload]);
}

#[test]
fn test_insight_draw_is_left_to_the_round_and_capped() {
    let catalogue = SpellCatalogue::standard();
    let mut session = CastSession::new(&catalogue, SideMap::from_pair(2, 0));
    let board = duel_board();
    let mut factory = CardFactory::new();
    let mut fighters = SideMap::from_pair(
        Fighter::new("Player", (1..=7).map(|n| factory.normal("p", n))),
        Fighter::new("Enemy", (1..=7).map(|n| factory.normal("e", n))),
    );
    let config = EngineConfig::default();
    fighters.player.refill_hand(config.hand_limit - 1);

    let hands = SideMap::from_pair(fighters.player.hand.clone(), fighters.enemy.hand.clone());
    let ctx = CastContext::new(Phase::Choose, &board, &hands);
    let Ok(CastProgress::Resolved(cast)) = session.activate(Side::Player, "insight", &ctx) else {
        panic!("insight targets its caster automatically");
    };

    let mut state = MatchState::new(board.clone(), [WheelToken::at(0); 3]);
    let report = EffectEngine::apply(&cast.payload, &mut state, &ApplyScope::new(Phase::Choose));
    assert_eq!(state.assignment_updates, 0);

    assert_eq!(report.deferred.apply_draws(&mut fighters, &config), SideMap::from_pair(1, 0));
    assert_eq!(fighters.player.hand.len(), config.hand_limit);

    // A second draw bounces off the full hand.
    assert_eq!(report.deferred.apply_draws(&mut fighters, &config), SideMap::from_pair(0, 0));
    assert_eq!(fighters.player.deck.len(), 2);
}

// =============================================================================
// Reserve Drains
// =============================================================================

#[test]
fn test_drain_flips_reserve_sum_winner() {
    let section = Section::new(VictoryCondition::ReserveSum, 0, 15);
    let config = EngineConfig::default();
    let mut state = MatchState::new(duel_board(), [WheelToken::at(0); 3]).with_reserve_sums(SideMap::from_pair(5, 4));

    let lane = |state: &MatchState| LaneContext {
        player_value: 4,
        enemy_value: 7,
        reserve_sums: state.reserve_sums,
        initiative: Side::Player,
    };
    assert_eq!(evaluate(&section, &lane(&state), &config), Some(Side::Player));

    // The enemy siphons the player's reserve.
    let catalogue = SpellCatalogue::standard();
    let mut session = CastSession::new(&catalogue, SideMap::from_pair(0, 2));
    let board = state.board.clone();
    let hands = SideMap::<Vector<Card>>::default();
    let ctx = CastContext::new(Phase::Choose, &board, &hands);
    let Ok(CastProgress::Resolved(cast)) = session.activate(Side::Enemy, "siphon", &ctx) else {
        panic!("siphon resolves immediately");
    };

    EffectEngine::apply(&cast.payload, &mut state, &ApplyScope::new(Phase::Choose));

    assert_eq!(state.reserve_sums, SideMap::from_pair(3, 4));
    assert_eq!(evaluate(&section, &lane(&state), &config), Some(Side::Enemy));
}

#[test]
fn test_drain_clamps_at_zero() {
    let mut state = MatchState::default().with_reserve_sums(SideMap::from_pair(1, 0));
    let mut payload = SpellRuntimeState::new();
    payload.drain_reserve(Side::Player, 2);
    payload.drain_reserve(Side::Player, 2);

    EffectEngine::apply(&payload, &mut state, &ApplyScope::new(Phase::Choose));
    assert_eq!(state.reserve_sums, SideMap::from_pair(0, 0));
}

// =============================================================================
// Token Persistence
// =============================================================================

#[test]
fn test_pre_reveal_change_previews_without_commit() {
    let mut state = MatchState::new(duel_board(), [WheelToken::at(5); 3]);
    let mut payload = SpellRuntimeState::new();
    payload.adjust_card(Side::Enemy, CardId(4), StatDelta::uniform(-3));

    let report = EffectEngine::apply(&payload, &mut state, &ApplyScope::new(Phase::Choose));

    assert_eq!(report.recomputed_wheels.as_slice(), &[1]);
    assert_eq!(state.token_commits, 0);
    assert_eq!(state.tokens[1], WheelToken::at(5));
    // 5 + 3 + (5 - 3)
    assert_eq!(state.token_visuals[1], Some(10));
    assert_eq!(state.token_visual_updates, [0, 1, 0]);
}

#[test]
fn test_post_reveal_change_commits() {
    let mut state = MatchState::new(duel_board(), [WheelToken::at(5); 3]);
    let mut payload = SpellRuntimeState::new();
    payload.adjust_card(Side::Enemy, CardId(4), StatDelta::uniform(-3));

    EffectEngine::apply(&payload, &mut state, &ApplyScope::new(Phase::Resolve));

    assert_eq!(state.token_commits, 1);
    assert_eq!(state.tokens[1].position, 10);
    assert_eq!(state.tokens[1].origin, 5);
    assert_eq!(state.token_visuals, [None; 3]);
}

#[test]
fn test_token_matches_rederivation_after_payloads() {
    let mut factory = CardFactory::new();
    let board = Board::from_pair(
        [Some(factory.normal("a", 2)), Some(factory.normal("b", 6)), Some(factory.normal("c", 1))],
        [Some(factory.normal("d", 4)), Some(factory.normal("e", 3)), Some(factory.normal("f", 9))],
    );
    let ids: Vec<CardId> = board.player.iter().chain(board.enemy.iter()).flatten().map(|c| c.id).collect();
    let mut state = MatchState::new(board, [WheelToken::at(7), WheelToken::at(0), WheelToken::at(13)]);

    for (round, id) in ids.iter().enumerate() {
        let side = if round < 3 { Side::Player } else { Side::Enemy };
        let mut payload = SpellRuntimeState::new();
        payload.adjust_card(side, *id, StatDelta::uniform(round as i32 - 2));
        EffectEngine::apply(&payload, &mut state, &ApplyScope::new(Phase::Resolve));
    }

    for wheel in 0..3 {
        let player = state.board.player[wheel].as_ref().map_or(0, Card::value);
        let enemy = state.board.enemy[wheel].as_ref().map_or(0, Card::value);
        assert_eq!(state.tokens[wheel].position, spin(state.tokens[wheel].origin, player, enemy));
    }
}

#[test]
fn test_commit_on_boosted_lane_matches_board_resolution() {
    let boosts = SideMap::from_pair([4, 0, 0], [0, 0, 0]);
    let mut state = MatchState::new(duel_board(), [WheelToken::at(0); 3]).with_lane_boosts(boosts);
    let mut payload = SpellRuntimeState::new();
    payload.adjust_card(Side::Enemy, CardId(3), StatDelta::uniform(-3));

    EffectEngine::apply(&payload, &mut state, &ApplyScope::new(Phase::Showdown));

    // 0 + (4 + 4) + (7 - 3)
    assert_eq!(state.tokens[0].position, 12);

    let wheels = [Wheel::standard(), Wheel::standard(), Wheel::standard()];
    let outcomes = resolve_board(
        &wheels,
        &[WheelToken::at(0); 3],
        &state.board,
        &boosts,
        state.reserve_sums,
        state.initiative,
        &EngineConfig::default(),
    );
    assert_eq!(outcomes[0].token, state.tokens[0]);
}

#[test]
fn test_preview_on_boosted_lane_counts_boost() {
    let boosts = SideMap::from_pair([0, 2, 0], [0, 1, 0]);
    let mut state = MatchState::new(duel_board(), [WheelToken::at(5); 3]).with_lane_boosts(boosts);
    let mut payload = SpellRuntimeState::new();
    payload.adjust_card(Side::Player, CardId(2), StatDelta::uniform(1));

    EffectEngine::apply(&payload, &mut state, &ApplyScope::new(Phase::Choose));

    // 5 + (4 + 2) + (5 + 1)
    assert_eq!(state.token_visuals[1], Some(1));
    assert_eq!(state.tokens[1], WheelToken::at(5));
}

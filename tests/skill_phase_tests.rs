//! Skill phase tests: turn order, card-bound abilities, limits and replay.

use im::Vector;

use wheel_duel::cards::{Card, CardId, Fighter};
use wheel_duel::core::{Board, EngineConfig, Side, SideMap};
use wheel_duel::skills::{
    SkillAbility, SkillError, SkillPhaseSetup, SkillPhaseState, SkillStatus, SkillTarget, NO_ACTIONS_BANNER,
};

fn card(id: u32, value: i32) -> Card {
    Card::normal(CardId(id), format!("c{id}"), value)
}

fn pile(cards: impl IntoIterator<Item = Card>) -> Vector<Card> {
    cards.into_iter().collect()
}

// =============================================================================
// Phase Start
// =============================================================================

#[test]
fn test_no_actions_ends_phase_with_banner() {
    // Swap-reserve cards with nothing in reserve cannot act.
    let board = Board::from_pair([Some(card(1, 0)), None, None], [Some(card(2, -1)), None, None]);
    let mut state = SkillPhaseState::init(SkillPhaseSetup::new(board).starting_with(Side::Enemy));

    assert_eq!(state.status(), SkillStatus::Ended);
    assert_eq!(state.banner(), Some(NO_ACTIONS_BANNER));
    assert_eq!(state.log().back().map(String::as_str), Some(NO_ACTIONS_BANNER));
    for side in Side::BOTH {
        assert!(state.passed(side));
        assert!(state.play_locked(side));
        assert!(state.options(side).is_empty());
    }
    assert_eq!(state.pass(Side::Player), Err(SkillError::PhaseNotActive));
}

#[test]
fn test_starting_side_is_honoured_when_both_can_act() {
    let board = Board::from_pair([Some(card(1, 4)), None, None], [Some(card(2, 4)), None, None]);
    let state = SkillPhaseState::init(SkillPhaseSetup::new(board).starting_with(Side::Enemy));

    assert_eq!(state.active_side(), Some(Side::Enemy));
    assert!(!state.play_locked(Side::Player));
}

#[test]
fn test_setup_from_fighters_reserves_and_draw_piles() {
    let mut player = Fighter::new("Player", (30..36).map(|id| card(id, 2)));
    player.refill_hand(EngineConfig::default().hand_limit);
    let enemy = Fighter::new("Enemy", [card(40, 7)]);
    let fighters = SideMap::from_pair(player, enemy);

    // Swap-reserve player card, boost-lane enemy card.
    let board = Board::from_pair([Some(card(1, 0)), None, None], [Some(card(2, 4)), None, None]);
    let setup = SkillPhaseSetup::from_fighters(board, &fighters, EngineConfig::default());
    let mut state = SkillPhaseState::init(setup);

    let reserve: Vec<_> = state.reserve(Side::Player).iter().map(|c| c.id).collect();
    assert_eq!(reserve, vec![CardId(30), CardId(31)]);
    assert!(state.reserve(Side::Enemy).is_empty());
    assert_eq!(state.draw_pile(Side::Player).iter().map(|c| c.id).collect::<Vec<_>>(), vec![CardId(35)]);
    assert_eq!(state.draw_pile(Side::Enemy).len(), 1);

    state.begin_activation(Side::Player, 0).unwrap();
    state.pick_target(Side::Player, SkillTarget::Reserve(CardId(31))).unwrap();
    state.confirm_activation(Side::Player).unwrap();
    assert_eq!(state.lane_view(Side::Player, 0).unwrap().card.map(|c| c.id), Some(CardId(31)));
}

// =============================================================================
// Turn Order
// =============================================================================

#[test]
fn test_pass_is_final_for_the_phase() {
    let board = Board::from_pair(
        [Some(card(1, 4)), None, None],
        [Some(card(3, 4)), Some(card(4, 5)), None],
    );
    let mut state = SkillPhaseState::init(SkillPhaseSetup::new(board));

    state.pass(Side::Player).unwrap();
    assert_eq!(state.active_side(), Some(Side::Enemy));

    state.begin_activation(Side::Enemy, 0).unwrap();
    state.pick_target(Side::Enemy, SkillTarget::Lane(0)).unwrap();
    state.confirm_activation(Side::Enemy).unwrap();

    // The player passed, so play stays with the enemy.
    assert_eq!(state.active_side(), Some(Side::Enemy));
    assert_eq!(
        state.begin_activation(Side::Player, 0),
        Err(SkillError::AlreadyPassed(Side::Player))
    );
    assert!(state.options(Side::Player).is_empty());

    state.begin_activation(Side::Enemy, 1).unwrap();
    state.pick_target(Side::Enemy, SkillTarget::Lane(0)).unwrap();
    state.confirm_activation(Side::Enemy).unwrap();

    assert!(state.is_ended());
    assert_eq!(state.into_outcome().boosts.enemy, [9, 0, 0]);
}

#[test]
fn test_reroll_limit_locks_side() {
    let board = Board::from_pair(
        [Some(card(1, 1)), Some(card(2, 2)), None],
        [Some(card(3, 4)), None, None],
    );
    let setup = SkillPhaseSetup::new(board)
        .with_draw_piles(SideMap::from_pair(pile([card(20, 8), card(21, 6)]), Vector::new()))
        .with_config(EngineConfig::default().with_max_rerolls(1));
    let mut state = SkillPhaseState::init(setup);
    assert_eq!(state.options(Side::Player).len(), 2);

    state.begin_activation(Side::Player, 0).unwrap();
    state.confirm_activation(Side::Player).unwrap();

    assert_eq!(state.limits().rerolls_left(Side::Player), 0);
    assert_eq!(state.draw_pile(Side::Player).len(), 1);
    assert_eq!(state.discard(Side::Player).iter().map(|c| c.id).collect::<Vec<_>>(), vec![CardId(1)]);
    assert!(state.options(Side::Player).is_empty());
    assert!(state.play_locked(Side::Player));
    assert_eq!(state.active_side(), Some(Side::Enemy));

    state.pass(Side::Enemy).unwrap();
    assert!(state.is_ended());
}

// =============================================================================
// Card-Bound Abilities
// =============================================================================

#[test]
fn test_exhaustion_follows_card_through_reassignment() {
    let board = Board::from_pair(
        [Some(card(1, 0)), Some(card(2, 4)), None],
        [None, None, None],
    );
    let setup = SkillPhaseSetup::new(board).with_reserves(SideMap::from_pair(pile([card(10, 3)]), Vector::new()));
    let mut state = SkillPhaseState::init(setup);

    state.begin_activation(Side::Player, 0).unwrap();
    assert_eq!(state.pick_target(Side::Player, SkillTarget::Reserve(CardId(10))), Ok(0));
    state.confirm_activation(Side::Player).unwrap();
    assert_eq!(state.reserve(Side::Player).iter().map(|c| c.id).collect::<Vec<_>>(), vec![CardId(1)]);

    // The swapped-out card comes back from reserve into a different lane.
    state
        .reassign_lanes(Side::Player, [Some(card(10, 3)), Some(card(2, 4)), Some(card(1, 0))])
        .unwrap();

    assert!(state.reserve(Side::Player).is_empty());
    let moved = state.lane_view(Side::Player, 2).unwrap();
    assert_eq!(moved.card.map(|c| c.id), Some(CardId(1)));
    assert_eq!(moved.ability, Some(SkillAbility::SwapReserve));
    assert!(moved.exhausted);
    assert_eq!(moved.uses_remaining, 0);

    let options = state.options(Side::Player);
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].card_id, CardId(2));
}

#[test]
fn test_reassignment_returns_displaced_cards_to_reserve() {
    let board = Board::from_pair(
        [Some(card(1, 4)), Some(card(2, 5)), None],
        [Some(card(3, 4)), None, None],
    );
    let mut state = SkillPhaseState::init(SkillPhaseSetup::new(board));

    state
        .reassign_lanes(Side::Player, [Some(card(2, 5)), None, None])
        .unwrap();

    assert_eq!(state.reserve(Side::Player).iter().map(|c| c.id).collect::<Vec<_>>(), vec![CardId(1)]);
    assert_eq!(state.lane_view(Side::Player, 0).unwrap().ability, Some(SkillAbility::BoostLane));
    assert_eq!(state.lane_view(Side::Player, 1).unwrap().card, None);
}

// =============================================================================
// Determinism
// =============================================================================

fn replay(seed: u64) -> SkillPhaseState {
    let board = Board::from_pair(
        [Some(card(1, 1)), Some(card(2, 4)), None],
        [Some(card(3, 2)), None, None],
    );
    let draws = pile((20..26).map(|id| card(id, id as i32 - 18)));
    let setup = SkillPhaseSetup::new(board)
        .with_draw_piles(SideMap::from_pair(draws.clone(), draws))
        .with_seed(seed);
    let mut state = SkillPhaseState::init(setup);

    state.begin_activation(Side::Player, 0).unwrap();
    state.confirm_activation(Side::Player).unwrap();
    state.begin_activation(Side::Enemy, 0).unwrap();
    state.confirm_activation(Side::Enemy).unwrap();
    state.begin_activation(Side::Player, 1).unwrap();
    state.pick_target(Side::Player, SkillTarget::Lane(0)).unwrap();
    state.confirm_activation(Side::Player).unwrap();
    state
}

#[test]
fn test_same_seed_same_actions_replay_identically() {
    let first = replay(42);
    let second = replay(42);

    assert!(first.is_ended());
    assert_eq!(first.seed(), second.seed());
    assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());

    let restored: SkillPhaseState = bincode::deserialize(&first.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, first);
    assert_eq!(first.into_outcome(), second.into_outcome());
}

//! The skill phase: a turn-based sub-game played on the committed board.
//!
//! ## Key Types
//!
//! - `SkillAbility`: One-time ability derived from a card's value
//! - `SkillPhaseState`: The phase itself, with turn order and limits
//! - `SkillOption`: An activation the caller may offer to a side
//! - `SkillOutcome`: Board, boosts and reserves handed back at the end
//!
//! ## Example
//!
//! ```
//! use wheel_duel::cards::{Card, CardId};
//! use wheel_duel::core::{Board, Side};
//! use wheel_duel::skills::{SkillPhaseSetup, SkillPhaseState, SkillTarget};
//!
//! let board = Board::from_pair(
//!     [Some(Card::normal(CardId(1), "Four", 4)), None, None],
//!     [None, None, None],
//! );
//! let mut phase = SkillPhaseState::init(SkillPhaseSetup::new(board));
//!
//! phase.begin_activation(Side::Player, 0).unwrap();
//! phase.pick_target(Side::Player, SkillTarget::Lane(0)).unwrap();
//! phase.confirm_activation(Side::Player).unwrap();
//!
//! assert!(phase.is_ended());
//! assert_eq!(phase.into_outcome().boosts.player, [4, 0, 0]);
//! ```

mod ability;
mod error;
mod machine;
mod state;

pub use ability::{AbilityRecord, SkillAbility, SkillTarget, SkillTargetKind};
pub use error::SkillError;
pub use machine::NO_ACTIONS_BANNER;
pub use state::{
    LaneView, SkillLane, SkillLimits, SkillOption, SkillOutcome, SkillPhaseSetup, SkillPhaseState, SkillSnapshot,
    SkillStatus, Targeting,
};

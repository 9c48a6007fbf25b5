//! Skill-phase usage errors.

use thiserror::Error;

use crate::cards::CardId;
use crate::core::Side;

/// An action the caller should not have attempted.
///
/// Legal actions are listed by `SkillPhaseState::options`, which never
/// fails. Forcing anything else is reported here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillError {
    #[error("the skill phase is not running")]
    PhaseNotActive,

    #[error("it is not {0}'s turn")]
    NotYourTurn(Side),

    #[error("{0} has already passed")]
    AlreadyPassed(Side),

    #[error("an activation is already being targeted")]
    TargetingInProgress,

    #[error("no activation is being targeted")]
    NotTargeting,

    #[error("lane {0} does not exist")]
    LaneOutOfRange(usize),

    #[error("{side} has no card in lane {lane}")]
    EmptyLane { side: Side, lane: usize },

    #[error("card {0} has no skill ability")]
    NoAbility(CardId),

    #[error("card {0} has already used its ability")]
    Exhausted(CardId),

    #[error("{0} has used every reroll this phase")]
    RerollLimitReached(Side),

    #[error("card {0} has no legal target")]
    NoLegalTarget(CardId),

    #[error("target is not valid for this step")]
    InvalidTarget,

    #[error("expected {expected} targets, got {actual}")]
    WrongTargetCount { expected: usize, actual: usize },
}

//! Cast activation errors.

use thiserror::Error;

use crate::cards::Arcana;
use crate::core::{Phase, Side};

/// Why a cast could not start or continue.
///
/// An invalid target selection is not an error: it is reported as
/// `CastProgress::Rejected` and leaves the pending cast untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CastError {
    #[error("unknown spell `{0}`")]
    UnknownSpell(String),

    #[error("{spell} cannot be cast during the {phase} phase")]
    PhaseNotAllowed { spell: &'static str, phase: Phase },

    #[error("{spell} requires a {arcana:?} card")]
    MissingArcana { spell: &'static str, arcana: Arcana },

    #[error("not enough mana: {required} required, {available} available")]
    InsufficientMana { required: u32, available: u32 },

    #[error("{spell} has no valid target")]
    NoValidTargets { spell: &'static str },

    #[error("{0} has no pending cast")]
    NoPendingCast(Side),
}

//! # wheel-duel
//!
//! Match resolution engine for a two-sided card and wheel duel.
//!
//! Both sides commit cards to three lanes. Each lane has a wheel whose
//! token spins by the sum of the committed values and lands in a section
//! carrying a victory condition. On top of that sit a staged, targeted
//! spell system and an optional skill phase played before reveal.
//!
//! ## Design Principles
//!
//! 1. **Plain Data In, Plain Data Out**: The engine owns no I/O. Callers
//!    hand it boards and hands; it returns outcomes and effect records.
//!
//! 2. **Describe, Then Apply**: Spells and skills never touch match state
//!    directly. They produce effect payloads that `effects::EffectEngine`
//!    applies through the `MatchHost` updaters.
//!
//! 3. **Deterministic**: All randomness flows through an explicitly
//!    threaded seed, so identical seeds and actions replay identically.
//!
//! ## Modules
//!
//! - `core`: Sides, board, RNG, configuration
//! - `cards`: Cards, fresh-id construction, fighters
//! - `wheel`: Wheels, token arithmetic, victory conditions
//! - `spells`: Spell catalogue, staged targeting, casting sessions
//! - `effects`: Effect payload application
//! - `skills`: The skill-phase state machine
//! - `cpu`: Spell choice for non-human casters

pub mod cards;
pub mod core;
pub mod cpu;
pub mod effects;
pub mod skills;
pub mod spells;
pub mod wheel;

// Re-export commonly used types
pub use crate::core::{Board, EngineConfig, Lanes, Phase, SeededRng, Side, SideMap, LANE_COUNT, WHEEL_POSITIONS};

pub use crate::cards::{Arcana, Card, CardFactory, CardId, CardTag, CardVariant, Fighter, StatDelta};

pub use crate::wheel::{resolve_board, resolve_token, spin, LaneOutcome, VictoryCondition, Wheel, WheelToken};

pub use crate::spells::{
    CastContext, CastError, CastProgress, CastSession, EffectPayload, PendingSpell, SpellCatalogue, SpellDefinition,
    SpellId, SpellRuntimeState, SpellSelection,
};

pub use crate::effects::{ApplyReport, ApplyScope, EffectEngine, MatchHost, MatchState};

pub use crate::skills::{SkillAbility, SkillError, SkillPhaseSetup, SkillPhaseState, SkillStatus};

pub use crate::cpu::{CpuCaster, CpuChoice};

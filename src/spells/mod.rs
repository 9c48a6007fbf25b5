//! Spell system: catalogue, staged targeting and casting.
//!
//! ## Key Types
//!
//! - `SpellDefinition`: Static spell data (cost, phases, stages, resolver)
//! - `SpellCatalogue`: Registry with the standard spell list
//! - `PendingSpell`: An in-flight cast, advanced one stage at a time
//! - `CastSession`: Mana, pending casts and streaks of both sides
//! - `SpellRuntimeState`: Typed effect records a resolver produces
//!
//! ## Casting
//!
//! ```
//! use im::Vector;
//! use wheel_duel::cards::{Card, CardId};
//! use wheel_duel::core::{Board, Phase, Side, SideMap};
//! use wheel_duel::spells::{CardLocation, CastContext, CastProgress, CastSession, SpellCatalogue, SpellSelection};
//!
//! let catalogue = SpellCatalogue::standard();
//! let mut session = CastSession::new(&catalogue, SideMap::from_pair(3, 3));
//!
//! let board = Board::from_pair(
//!     [Some(Card::normal(CardId(1), "Four", 4)), None, None],
//!     [Some(Card::normal(CardId(2), "Seven", 7)), None, None],
//! );
//! let hands = SideMap::<Vector<Card>>::default();
//! let ctx = CastContext::new(Phase::Choose, &board, &hands);
//!
//! session.activate(Side::Player, "bolster", &ctx).unwrap();
//! let ally = SpellSelection::Card { side: Side::Player, location: CardLocation::Lane(0) };
//! let progress = session.select(Side::Player, &ally, &ctx).unwrap();
//! assert!(matches!(progress, CastProgress::Resolved(_)));
//! ```

pub mod casting;
pub mod catalogue;
pub mod definition;
pub mod error;
pub mod runtime;
pub mod session;
pub mod targeting;

pub use casting::{advance, open, skip_stage, Advance, PendingSpell, ResolvedCast, TargetList};
pub use catalogue::{ids, SpellCatalogue};
pub use definition::{
    compute_cost, CardFilter, CastHistory, CostContext, CostFn, Location, Ownership, ResolveFn, SpellDefinition,
    SpellId, StageKind, TargetStage,
};
pub use error::CastError;
pub use runtime::{
    CardAdjustment, ChillStack, DelayedEffect, DelayedKind, DelayedTiming, DrawRequest, EffectPayload, HandAdjustment,
    HandDiscard, InitiativeChallenge, InitiativeClaim, MirrorCopy, PositionSwap, ReserveDrain, SpellRuntimeState,
    WheelTokenAdjustment,
};
pub use session::{CastProgress, CastSession};
pub use targeting::{
    candidates, validate_selection, CardLocation, CastContext, ResolveScope, ResolvedTarget, SpellSelection,
    TargetedCard,
};

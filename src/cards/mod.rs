//! Card system: cards, identities and fighters.
//!
//! ## Key Types
//!
//! - `CardId`: Identity of a card instance
//! - `Card`: Immutable card data (variant, arcana, tags)
//! - `CardFactory`: Fresh-id card construction
//! - `Fighter`: Deck, hand and discard of one side

pub mod card;
pub mod fighter;

pub use card::{Arcana, Card, CardFactory, CardId, CardTag, CardVariant, StatDelta};
pub use fighter::Fighter;

//! Cards - the committed values that drive every wheel.
//!
//! A `Card` is immutable once created. Effects never edit a card in place;
//! they build a new `Card` with the same identity and adjusted stats, so a
//! card held in a hand snapshot can never be changed by an effect applied
//! to the board.
//!
//! ## Variants
//!
//! - `Normal`: a single printed `number`
//! - `Split`: a `left_value` used when committed to a lane and a
//!   `right_value` used while the card sits in reserve

use im::OrdSet;
use serde::{Deserialize, Serialize};

/// Unique identity of a card instance.
///
/// Effects, exhaustion and ability records all track cards by id, never by
/// the lane they currently occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Arcana symbol printed on a card.
///
/// Gates spell visibility and optional bonus target stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Arcana {
    Sun,
    Moon,
    Star,
    Flame,
    Frost,
}

/// Gameplay tag carried by a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardTag {
    /// Cannot be chosen by an opposing spell's card stage.
    Warded,
    /// Cannot be relocated by swaps.
    Anchored,
}

/// Printed stats of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardVariant {
    Normal { number: i32 },
    Split { left_value: i32, right_value: i32 },
}

/// A stat change for a single card.
///
/// `number` applies to normal cards, `left_value`/`right_value` to split
/// cards. Fields that do not match the card's variant are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatDelta {
    pub number: i32,
    pub left_value: i32,
    pub right_value: i32,
}

impl StatDelta {
    /// A delta that shifts every printed value of a card by `amount`.
    #[must_use]
    pub const fn uniform(amount: i32) -> Self {
        Self {
            number: amount,
            left_value: amount,
            right_value: amount,
        }
    }

    /// Whether applying this delta changes nothing.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.number == 0 && self.left_value == 0 && self.right_value == 0
    }
}

/// A card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub variant: CardVariant,
    pub arcana: Option<Arcana>,
    #[serde(default)]
    pub tags: OrdSet<CardTag>,
}

impl Card {
    /// Create a normal card.
    #[must_use]
    pub fn normal(id: CardId, name: impl Into<String>, number: i32) -> Self {
        Self {
            id,
            name: name.into(),
            variant: CardVariant::Normal { number },
            arcana: None,
            tags: OrdSet::new(),
        }
    }

    /// Create a split card.
    #[must_use]
    pub fn split(id: CardId, name: impl Into<String>, left_value: i32, right_value: i32) -> Self {
        Self {
            id,
            name: name.into(),
            variant: CardVariant::Split {
                left_value,
                right_value,
            },
            arcana: None,
            tags: OrdSet::new(),
        }
    }

    /// Set the arcana symbol (builder pattern).
    #[must_use]
    pub fn with_arcana(mut self, arcana: Arcana) -> Self {
        self.arcana = Some(arcana);
        self
    }

    /// Add a tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: CardTag) -> Self {
        self.tags.insert(tag);
        self
    }

    /// Check for a tag.
    #[must_use]
    pub fn has_tag(&self, tag: CardTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Value contributed when committed to a lane.
    #[must_use]
    pub const fn value(&self) -> i32 {
        match self.variant {
            CardVariant::Normal { number } => number,
            CardVariant::Split { left_value, .. } => left_value,
        }
    }

    /// Value contributed while held in reserve.
    #[must_use]
    pub const fn reserve_value(&self) -> i32 {
        match self.variant {
            CardVariant::Normal { number } => number,
            CardVariant::Split { right_value, .. } => right_value,
        }
    }

    /// A new instance of this card with `delta` applied.
    #[must_use]
    pub fn adjusted(&self, delta: &StatDelta) -> Self {
        let variant = match self.variant {
            CardVariant::Normal { number } => CardVariant::Normal {
                number: number + delta.number,
            },
            CardVariant::Split {
                left_value,
                right_value,
            } => CardVariant::Split {
                left_value: left_value + delta.left_value,
                right_value: right_value + delta.right_value,
            },
        };
        Self {
            variant,
            ..self.clone()
        }
    }

    /// A new instance of this card carrying `source`'s printed stats.
    #[must_use]
    pub fn mirrored_from(&self, source: &Card) -> Self {
        Self {
            variant: source.variant,
            ..self.clone()
        }
    }
}

/// Hands out cards with fresh identities.
///
/// ```
/// use wheel_duel::cards::CardFactory;
///
/// let mut factory = CardFactory::new();
/// let a = factory.normal("Seven", 7);
/// let b = factory.fresh_copy(&a);
///
/// assert_eq!(a.value(), b.value());
/// assert_ne!(a.id, b.id);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFactory {
    next_id: u32,
}

impl CardFactory {
    /// Create a factory starting at id 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory whose first id is `first_id`.
    #[must_use]
    pub const fn starting_at(first_id: u32) -> Self {
        Self { next_id: first_id }
    }

    fn allocate(&mut self) -> CardId {
        let id = CardId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a normal card with a fresh id.
    pub fn normal(&mut self, name: impl Into<String>, number: i32) -> Card {
        let id = self.allocate();
        Card::normal(id, name, number)
    }

    /// Create a split card with a fresh id.
    pub fn split(&mut self, name: impl Into<String>, left_value: i32, right_value: i32) -> Card {
        let id = self.allocate();
        Card::split(id, name, left_value, right_value)
    }

    /// Copy a card's stats, arcana and tags onto a fresh id.
    pub fn fresh_copy(&mut self, card: &Card) -> Card {
        Card {
            id: self.allocate(),
            ..card.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_by_variant() {
        let normal = Card::normal(CardId(1), "Four", 4);
        assert_eq!(normal.value(), 4);
        assert_eq!(normal.reserve_value(), 4);

        let split = Card::split(CardId(2), "Two/Six", 2, 6);
        assert_eq!(split.value(), 2);
        assert_eq!(split.reserve_value(), 6);
    }

    #[test]
    fn test_adjusted_is_new_instance() {
        let card = Card::normal(CardId(1), "Four", 4);
        let adjusted = card.adjusted(&StatDelta::uniform(-3));

        assert_eq!(card.value(), 4);
        assert_eq!(adjusted.value(), 1);
        assert_eq!(adjusted.id, card.id);
    }

    #[test]
    fn test_adjusted_split_ignores_number() {
        let card = Card::split(CardId(1), "Split", 3, 5);
        let delta = StatDelta {
            number: 10,
            left_value: 1,
            right_value: -2,
        };

        let adjusted = card.adjusted(&delta);
        assert_eq!(
            adjusted.variant,
            CardVariant::Split {
                left_value: 4,
                right_value: 3
            }
        );
    }

    #[test]
    fn test_mirrored_keeps_identity() {
        let target = Card::normal(CardId(1), "Four", 4).with_arcana(Arcana::Moon);
        let source = Card::normal(CardId(2), "Seven", 7);

        let mirrored = target.mirrored_from(&source);
        assert_eq!(mirrored.id, CardId(1));
        assert_eq!(mirrored.arcana, Some(Arcana::Moon));
        assert_eq!(mirrored.value(), 7);
    }

    #[test]
    fn test_tags() {
        let card = Card::normal(CardId(1), "Wall", 5)
            .with_tag(CardTag::Anchored)
            .with_tag(CardTag::Anchored);

        assert!(card.has_tag(CardTag::Anchored));
        assert!(!card.has_tag(CardTag::Warded));
        assert_eq!(card.tags.len(), 1);
    }

    #[test]
    fn test_factory_ids_are_fresh() {
        let mut factory = CardFactory::starting_at(10);
        let a = factory.normal("A", 1);
        let b = factory.split("B", 1, 2);
        let c = factory.fresh_copy(&a);

        assert_eq!(a.id, CardId(10));
        assert_eq!(b.id, CardId(11));
        assert_eq!(c.id, CardId(12));
        assert_eq!(c.name, "A");
    }

    #[test]
    fn test_card_serialization() {
        let card = Card::split(CardId(3), "Split", 1, 9)
            .with_arcana(Arcana::Star)
            .with_tag(CardTag::Warded);
        let json = serde_json::to_string(&card).unwrap();
        let deserialized: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, deserialized);
    }
}

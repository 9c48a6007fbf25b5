//! Fighters - a side's deck, hand and discard pile.
//!
//! The engine reads fighters; the drafting layer owns them. Card totals are
//! conserved across the three piles: every operation here moves cards, it
//! never creates or destroys them.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardId};

/// A combatant's card piles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub name: String,
    /// Draw pile; the front is the top.
    pub deck: Vector<Card>,
    pub hand: Vector<Card>,
    pub discard: Vector<Card>,
}

impl Fighter {
    /// Create a fighter with a deck and empty hand/discard.
    pub fn new(name: impl Into<String>, deck: impl IntoIterator<Item = Card>) -> Self {
        Self {
            name: name.into(),
            deck: deck.into_iter().collect(),
            hand: Vector::new(),
            discard: Vector::new(),
        }
    }

    /// Cards across deck, hand and discard.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard.len()
    }

    /// Draw up to `count` cards from the top of the deck.
    ///
    /// Drawing from an empty deck is a no-op. Returns how many were drawn.
    pub fn draw(&mut self, count: usize) -> usize {
        let mut drawn = 0;
        for _ in 0..count {
            match self.deck.pop_front() {
                Some(card) => {
                    self.hand.push_back(card);
                    drawn += 1;
                }
                None => break,
            }
        }
        drawn
    }

    /// Draw until the hand holds `limit` cards (or the deck runs out).
    pub fn refill_hand(&mut self, limit: usize) -> usize {
        let missing = limit.saturating_sub(self.hand.len());
        self.draw(missing)
    }

    /// Draw up to `count` cards without growing the hand past `limit`.
    pub fn draw_capped(&mut self, count: usize, limit: usize) -> usize {
        self.draw(count.min(limit.saturating_sub(self.hand.len())))
    }

    /// Take a card out of the hand (to commit it to a lane).
    pub fn take_from_hand(&mut self, id: CardId) -> Option<Card> {
        let index = self.hand.iter().position(|c| c.id == id)?;
        Some(self.hand.remove(index))
    }

    /// Move a card from the hand to the discard pile.
    pub fn discard_from_hand(&mut self, id: CardId) -> bool {
        match self.take_from_hand(id) {
            Some(card) => {
                self.discard.push_back(card);
                true
            }
            None => false,
        }
    }

    /// Put a card (e.g. one returning from a lane) on the discard pile.
    pub fn discard_card(&mut self, card: Card) {
        self.discard.push_back(card);
    }
}

use santase_core::model::card::Card;
use santase_core::model::deck::DECK_SIZE;
use santase_core::model::hand::Hand;

/// Cards the bot has not seen yet: still in the stock or in the other hand.
#[derive(Debug, Clone)]
pub struct UnseenTracker {
    unseen: [bool; DECK_SIZE],
    count: usize,
}

impl UnseenTracker {
    pub fn new() -> Self {
        Self {
            unseen: [true; DECK_SIZE],
            count: DECK_SIZE,
        }
    }

    /// Starts from the bot's own deal; the face-up trump is visible to both.
    pub fn for_deal(hand: &Hand, trump_card: Card) -> Self {
        let mut tracker = Self::new();
        for &card in hand.iter() {
            tracker.note_seen(card);
        }
        tracker.note_seen(trump_card);
        tracker
    }

    pub fn note_seen(&mut self, card: Card) {
        let slot = &mut self.unseen[card.index()];
        if *slot {
            *slot = false;
            self.count -= 1;
        }
    }

    pub fn is_unseen(&self, card: Card) -> bool {
        self.unseen[card.index()]
    }

    pub fn unseen_count(&self) -> usize {
        self.count
    }
}

impl Default for UnseenTracker {
    fn default() -> Self {
        Self::new()
    }
}

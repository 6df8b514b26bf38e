//! Game 1: classic pair matching over a shuffled 4×3 deck.

use rand::Rng;
use rand::seq::SliceRandom;

use super::{Point, Rect};
use crate::config::MemoryConfig;
use crate::timer::Timers;

pub const SYMBOLS: [&str; 6] = ["🎂", "🎁", "💖", "🌟", "😊", "🎉"];
pub const COLUMNS: usize = 4;
pub const ROWS: usize = 3;

// Grid placement in game space.
const GRID_LEFT: f64 = 12.0;
const GRID_TOP: f64 = 24.0;
const CARD_W: f64 = 17.5;
const CARD_H: f64 = 22.0;
const GAP_X: f64 = 2.0;
const GAP_Y: f64 = 3.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    /// Position on the board; equal to the card's index in the deck.
    pub id: usize,
    pub symbol: &'static str,
    pub face_up: bool,
    pub matched: bool,
}

/// Every symbol twice, uniformly permuted (Fisher–Yates).
pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut symbols: Vec<&'static str> = SYMBOLS.iter().chain(SYMBOLS.iter()).copied().collect();
    symbols.shuffle(rng);
    symbols
        .into_iter()
        .enumerate()
        .map(|(id, symbol)| Card {
            id,
            symbol,
            face_up: false,
            matched: false,
        })
        .collect()
}

pub fn card_rect(id: usize) -> Rect {
    let col = (id % COLUMNS) as f64;
    let row = (id / COLUMNS) as f64;
    Rect::new(
        GRID_LEFT + col * (CARD_W + GAP_X),
        GRID_TOP + row * (CARD_H + GAP_Y),
        CARD_W,
        CARD_H,
    )
}

/// Card under `p`; gaps between cards hit nothing.
pub fn card_at(p: Point) -> Option<usize> {
    (0..COLUMNS * ROWS).find(|&id| card_rect(id).contains(p))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Resolve { first: usize, second: usize, pair: bool },
    Finish,
}

#[derive(Debug)]
pub struct MemoryGame {
    cfg: MemoryConfig,
    cards: Vec<Card>,
    // Ids of face-up, unmatched cards (0..=2).
    flipped: Vec<usize>,
    locked: bool,
    timers: Timers<Action>,
    finished: bool,
}

impl MemoryGame {
    pub fn new<R: Rng + ?Sized>(cfg: MemoryConfig, rng: &mut R) -> Self {
        Self::with_deck(cfg, shuffled_deck(rng))
    }

    pub fn with_deck(cfg: MemoryConfig, cards: Vec<Card>) -> Self {
        Self {
            cfg,
            cards,
            flipped: Vec::with_capacity(2),
            locked: false,
            timers: Timers::new(),
            finished: false,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count() / 2
    }

    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(|c| c.matched)
    }

    /// Flip card `id` face up. Ignored while the board is locked or if the card
    /// is already face up or matched. Returns whether the card flipped.
    pub fn select(&mut self, id: usize, now_ms: f64) -> bool {
        if self.locked {
            tracing::trace!(id, "card ignored, board locked");
            return false;
        }
        let Some(card) = self.cards.get_mut(id) else {
            return false;
        };
        if card.face_up || card.matched {
            return false;
        }
        card.face_up = true;
        self.flipped.push(id);

        if let &[first, second] = self.flipped.as_slice() {
            self.locked = true;
            let pair = self.cards[first].symbol == self.cards[second].symbol;
            let delay = if pair {
                self.cfg.match_delay_ms
            } else {
                self.cfg.mismatch_delay_ms
            };
            self.timers.after(
                now_ms,
                delay,
                Action::Resolve {
                    first,
                    second,
                    pair,
                },
            );
        }
        true
    }

    /// Runs due match checks. Returns `true` on the frame completion fires.
    pub fn update(&mut self, now_ms: f64) -> bool {
        let mut completed = false;
        while let Some(action) = self.timers.pop_due(now_ms) {
            match action {
                Action::Resolve {
                    first,
                    second,
                    pair,
                } => {
                    for id in [first, second] {
                        let card = &mut self.cards[id];
                        if pair {
                            card.matched = true;
                        } else {
                            card.face_up = false;
                        }
                    }
                    self.flipped.clear();
                    self.locked = false;
                    if pair {
                        tracing::debug!(symbol = self.cards[first].symbol, "pair matched");
                        if self.all_matched() {
                            self.timers
                                .after(now_ms, self.cfg.finish_delay_ms, Action::Finish);
                        }
                    }
                }
                Action::Finish => {
                    if !self.finished {
                        self.finished = true;
                        completed = true;
                        tracing::debug!("memory game complete");
                    }
                }
            }
        }
        completed
    }
}

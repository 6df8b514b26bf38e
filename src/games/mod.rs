//! The four mini-games and the enum the stage controller mounts them through.
//!
//! Games live in a 0–100 coordinate space on both axes (percent of the play
//! area); the shell maps canvas pixels into it. Each game is driven by
//! `update(now)` once per animation frame, owns its own [`Timers`](crate::timer::Timers)
//! queue, and reports completion exactly once as the return value of `update`.

use rand::Rng;

use crate::config::GreetingConfig;
use crate::content::Theme;

pub mod balloon;
pub mod hearts;
pub mod memory;
pub mod simon;

pub use balloon::BalloonPop;
pub use hearts::CatchHearts;
pub use memory::MemoryGame;
pub use simon::SimonSays;

/// Point in game space (0–100 on both axes).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in game space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Which game is mounted. Also the payload of the completion signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameKind {
    Memory,
    Balloons,
    Hearts,
    Simon,
}

impl GameKind {
    pub const fn theme(self) -> Theme {
        match self {
            GameKind::Memory => Theme::Memories,
            GameKind::Balloons => Theme::Strength,
            GameKind::Hearts => Theme::Love,
            GameKind::Simon => Theme::Journey,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            GameKind::Memory => "Game 1: Sweet Memories",
            GameKind::Balloons => "Game 2: Pop the Balloons",
            GameKind::Hearts => "Game 3: Catch the Love",
            GameKind::Simon => "Game 4: Harmony",
        }
    }
}

/// A mounted mini-game. Dropping it drops its timers, so nothing it scheduled
/// can run after the stage moves on.
#[derive(Debug)]
pub enum ActiveGame {
    Memory(MemoryGame),
    Balloons(BalloonPop),
    Hearts(CatchHearts),
    Simon(SimonSays),
}

impl ActiveGame {
    pub fn mount<R: Rng + ?Sized>(
        kind: GameKind,
        cfg: &GreetingConfig,
        rng: &mut R,
        now_ms: f64,
    ) -> Self {
        match kind {
            GameKind::Memory => ActiveGame::Memory(MemoryGame::new(cfg.memory.clone(), rng)),
            GameKind::Balloons => {
                ActiveGame::Balloons(BalloonPop::new(cfg.balloons.clone(), now_ms))
            }
            GameKind::Hearts => {
                ActiveGame::Hearts(CatchHearts::new(cfg.hearts.clone(), rng, now_ms))
            }
            GameKind::Simon => ActiveGame::Simon(SimonSays::new(cfg.simon.clone(), now_ms)),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            ActiveGame::Memory(_) => GameKind::Memory,
            ActiveGame::Balloons(_) => GameKind::Balloons,
            ActiveGame::Hearts(_) => GameKind::Hearts,
            ActiveGame::Simon(_) => GameKind::Simon,
        }
    }

    /// Advance one animation frame. Returns the game's kind on the single frame
    /// in which it completes.
    pub fn update<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> Option<GameKind> {
        let done = match self {
            ActiveGame::Memory(g) => g.update(now_ms),
            ActiveGame::Balloons(g) => g.update(now_ms, rng),
            ActiveGame::Hearts(g) => g.update(now_ms, rng),
            ActiveGame::Simon(g) => g.update(now_ms, rng),
        };
        done.then(|| self.kind())
    }

    pub fn pointer_down(&mut self, p: Point, now_ms: f64) {
        match self {
            ActiveGame::Memory(g) => {
                if let Some(id) = memory::card_at(p) {
                    g.select(id, now_ms);
                }
            }
            ActiveGame::Balloons(g) => g.pointer_down(p, now_ms),
            ActiveGame::Hearts(g) => g.set_basket(p.x),
            ActiveGame::Simon(g) => {
                if let Some(color) = simon::pad_at(p) {
                    g.press(color, now_ms);
                }
            }
        }
    }

    pub fn pointer_move(&mut self, p: Point) {
        if let ActiveGame::Hearts(g) = self {
            g.set_basket(p.x);
        }
    }
}

//! Game 2: balloons rise from below the play area and are popped by tapping them.

use rand::Rng;

use super::{Point, Rect};
use crate::config::BalloonConfig;
use crate::timer::Timers;

/// Balloon box size; `(x, y)` is the top-left corner.
pub const BALLOON_W: f64 = 10.0;
pub const BALLOON_H: f64 = 14.0;
/// Spawn height (below the visible area).
const SPAWN_Y: f64 = 110.0;
/// Balloons at or above this height have left the screen.
const EXIT_Y: f64 = -20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalloonColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Pink,
}

impl BalloonColor {
    pub const ALL: [BalloonColor; 6] = [
        BalloonColor::Red,
        BalloonColor::Blue,
        BalloonColor::Green,
        BalloonColor::Yellow,
        BalloonColor::Purple,
        BalloonColor::Pink,
    ];

    pub const fn css(self) -> &'static str {
        match self {
            BalloonColor::Red => "#f87171",
            BalloonColor::Blue => "#60a5fa",
            BalloonColor::Green => "#4ade80",
            BalloonColor::Yellow => "#facc15",
            BalloonColor::Purple => "#c084fc",
            BalloonColor::Pink => "#f472b6",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Balloon {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub color: BalloonColor,
}

impl Balloon {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, BALLOON_W, BALLOON_H)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Spawn,
    Finish,
}

#[derive(Debug)]
pub struct BalloonPop {
    cfg: BalloonConfig,
    balloons: Vec<Balloon>,
    score: u32,
    next_id: u64,
    timers: Timers<Action>,
    finished: bool,
}

impl BalloonPop {
    pub fn new(cfg: BalloonConfig, now_ms: f64) -> Self {
        let mut timers = Timers::new();
        if cfg.target == 0 {
            timers.after(now_ms, cfg.finish_delay_ms, Action::Finish);
        } else {
            timers.after(now_ms, cfg.spawn_interval_ms, Action::Spawn);
        }
        Self {
            cfg,
            balloons: Vec::new(),
            score: 0,
            next_id: 0,
            timers,
            finished: false,
        }
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn target(&self) -> u32 {
        self.cfg.target
    }

    /// Target reached; the completion signal may still be pending.
    pub fn is_cleared(&self) -> bool {
        self.score >= self.cfg.target
    }

    /// One animation frame. Returns `true` on the frame completion fires.
    pub fn update<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> bool {
        let mut completed = false;
        while let Some(action) = self.timers.pop_due(now_ms) {
            match action {
                Action::Spawn => {
                    if self.is_cleared() {
                        continue;
                    }
                    if self.balloons.len() < self.cfg.max_alive {
                        self.spawn(rng);
                    }
                    self.timers
                        .after(now_ms, self.cfg.spawn_interval_ms, Action::Spawn);
                }
                Action::Finish => {
                    if !self.finished {
                        self.finished = true;
                        completed = true;
                        tracing::debug!(score = self.score, "balloon game complete");
                    }
                }
            }
        }

        for b in &mut self.balloons {
            b.y -= b.speed;
        }
        self.balloons.retain(|b| b.y > EXIT_Y);
        completed
    }

    fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let id = self.next_id;
        self.next_id += 1;
        let color = BalloonColor::ALL[rng.gen_range(0..BalloonColor::ALL.len())];
        self.balloons.push(Balloon {
            id,
            x: rng.gen_range(10.0..90.0),
            y: SPAWN_Y,
            speed: rng.gen_range(0.3..0.8),
            color,
        });
    }

    /// Pop the topmost balloon under `p`, if any.
    pub fn pointer_down(&mut self, p: Point, now_ms: f64) {
        let hit = self
            .balloons
            .iter()
            .rev()
            .find(|b| b.bounds().contains(p))
            .map(|b| b.id);
        if let Some(id) = hit {
            self.pop(id, now_ms);
        }
    }

    /// Pop balloon `id`. The id is looked up before scoring so repeated events
    /// for the same balloon count once. Returns whether the pop scored.
    pub fn pop(&mut self, id: u64, now_ms: f64) -> bool {
        if self.is_cleared() {
            tracing::trace!(id, "pop ignored, target already reached");
            return false;
        }
        let Some(idx) = self.balloons.iter().position(|b| b.id == id) else {
            return false;
        };
        self.balloons.remove(idx);
        self.score += 1;
        if self.is_cleared() {
            self.timers
                .after(now_ms, self.cfg.finish_delay_ms, Action::Finish);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const FRAME: f64 = 16.0;

    fn game() -> (BalloonPop, SmallRng) {
        (
            BalloonPop::new(BalloonConfig::default(), 0.0),
            SmallRng::seed_from_u64(7),
        )
    }

    #[test]
    fn spawns_on_interval_below_screen() {
        let (mut g, mut rng) = game();
        assert!(!g.update(999.0, &mut rng));
        assert!(g.balloons().is_empty());
        g.update(1000.0, &mut rng);
        assert_eq!(g.balloons().len(), 1);
        let b = &g.balloons()[0];
        assert!((10.0..90.0).contains(&b.x));
        assert!((0.3..0.8).contains(&b.speed));
        assert!((b.y - (SPAWN_Y - b.speed)).abs() < 1e-9);
    }

    #[test]
    fn concurrent_balloons_are_capped() {
        let cfg = BalloonConfig {
            spawn_interval_ms: 10.0,
            ..BalloonConfig::default()
        };
        let mut g = BalloonPop::new(cfg, 0.0);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut now = 0.0;
        for _ in 0..40 {
            now += 10.0;
            g.update(now, &mut rng);
            assert!(g.balloons().len() <= 8);
        }
        assert_eq!(g.balloons().len(), 8);
    }

    #[test]
    fn balloons_leave_through_the_top_without_penalty() {
        let (mut g, mut rng) = game();
        g.update(1000.0, &mut rng);
        let mut now = 1000.0;
        // slowest balloon needs (110 + 20) / 0.3 frames to exit
        for _ in 0..450 {
            now += FRAME;
            g.update(now, &mut rng);
        }
        assert!(g.balloons().iter().all(|b| b.id != 0));
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn duplicate_pop_scores_once() {
        let (mut g, mut rng) = game();
        g.update(1000.0, &mut rng);
        let id = g.balloons()[0].id;
        assert!(g.pop(id, 1000.0));
        assert!(!g.pop(id, 1000.0));
        assert_eq!(g.score(), 1);
    }

    #[test]
    fn pointer_hits_balloon_box() {
        let (mut g, mut rng) = game();
        g.update(1000.0, &mut rng);
        let b = g.balloons()[0].clone();
        g.pointer_down(Point::new(b.x - 1.0, b.y + 1.0), 1000.0);
        assert_eq!(g.score(), 0);
        g.pointer_down(Point::new(b.x + 1.0, b.y + 1.0), 1000.0);
        assert_eq!(g.score(), 1);
        assert!(g.balloons().is_empty());
    }

    #[test]
    fn zero_target_completes_without_pops() {
        let cfg = BalloonConfig {
            target: 0,
            ..BalloonConfig::default()
        };
        let mut g = BalloonPop::new(cfg, 0.0);
        let mut rng = SmallRng::seed_from_u64(2);
        let mut completions = 0;
        let mut now = 0.0;
        for _ in 0..2_000 {
            if g.update(now, &mut rng) {
                completions += 1;
                assert!(now >= 1000.0);
            }
            now += FRAME;
        }
        assert_eq!(completions, 1);
        assert!(g.balloons().is_empty());
    }
}

//! Game 3: a single heart falls at a time and is caught with a basket that
//! follows the pointer along the bottom edge.

use rand::Rng;

use crate::config::HeartsConfig;
use crate::timer::Timers;

/// Bottom edge of the play area; hearts at or below it are discarded.
const FLOOR_Y: f64 = 100.0;
const FIRST_SPAWN_Y: f64 = 0.0;
const NEXT_SPAWN_Y: f64 = -15.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Heart {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
}

/// Whether a heart at `(heart_x, heart_y)` lands in a basket centred on `basket_x`.
/// Both bounds are strict.
pub fn is_caught(cfg: &HeartsConfig, heart_x: f64, heart_y: f64, basket_x: f64) -> bool {
    let (low, high) = cfg.catch_band;
    heart_y > low && heart_y < high && (heart_x - basket_x).abs() < cfg.catch_radius
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Finish,
}

#[derive(Debug)]
pub struct CatchHearts {
    cfg: HeartsConfig,
    basket_x: f64,
    // At most one heart is ever alive.
    heart: Option<Heart>,
    score: u32,
    next_id: u64,
    timers: Timers<Action>,
    finished: bool,
}

impl CatchHearts {
    /// A zero target starts cleared and completes after `finish_delay_ms`.
    pub fn new<R: Rng + ?Sized>(cfg: HeartsConfig, rng: &mut R, now_ms: f64) -> Self {
        let mut game = Self {
            cfg,
            basket_x: 50.0,
            heart: None,
            score: 0,
            next_id: 0,
            timers: Timers::new(),
            finished: false,
        };
        if game.is_cleared() {
            game.timers
                .after(now_ms, game.cfg.finish_delay_ms, Action::Finish);
        } else {
            let speed = rng.gen_range(0.5..1.0);
            game.spawn(rng, FIRST_SPAWN_Y, speed);
        }
        game
    }

    pub fn heart(&self) -> Option<&Heart> {
        self.heart.as_ref()
    }

    pub fn basket_x(&self) -> f64 {
        self.basket_x
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn target(&self) -> u32 {
        self.cfg.target
    }

    pub fn is_cleared(&self) -> bool {
        self.score >= self.cfg.target
    }

    /// Move the basket; the value is clamped to the play area.
    pub fn set_basket(&mut self, x: f64) {
        if x.is_finite() {
            self.basket_x = x.clamp(0.0, 100.0);
        }
    }

    /// One animation frame: move, test the catch, respawn. Returns `true` on the
    /// frame completion fires.
    pub fn update<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> bool {
        let mut completed = false;
        while let Some(Action::Finish) = self.timers.pop_due(now_ms) {
            if !self.finished {
                self.finished = true;
                completed = true;
                tracing::debug!(score = self.score, "hearts game complete");
            }
        }
        if self.is_cleared() {
            return completed;
        }

        if let Some(mut heart) = self.heart.take() {
            heart.y += heart.speed;
            if is_caught(&self.cfg, heart.x, heart.y, self.basket_x) {
                self.score += 1;
                if self.is_cleared() {
                    self.timers
                        .after(now_ms, self.cfg.finish_delay_ms, Action::Finish);
                }
            } else if heart.y < FLOOR_Y {
                self.heart = Some(heart);
            }
        }

        if self.heart.is_none() && !self.is_cleared() {
            let speed = rng.gen_range(0.6..1.2);
            self.spawn(rng, NEXT_SPAWN_Y, speed);
        }
        completed
    }

    fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R, y: f64, speed: f64) {
        let id = self.next_id;
        self.next_id += 1;
        self.heart = Some(Heart {
            id,
            x: rng.gen_range(5.0..95.0),
            y,
            speed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn catch_band_is_strict() {
        let cfg = HeartsConfig::default();
        assert!(!is_caught(&cfg, 50.0, 84.9, 50.0));
        assert!(!is_caught(&cfg, 50.0, 85.0, 50.0));
        assert!(is_caught(&cfg, 50.0, 85.1, 50.0));
        assert!(is_caught(&cfg, 50.0, 94.9, 50.0));
        assert!(!is_caught(&cfg, 50.0, 95.0, 50.0));
        assert!(!is_caught(&cfg, 50.0, 95.1, 50.0));
    }

    #[test]
    fn catch_radius_is_strict() {
        let cfg = HeartsConfig::default();
        assert!(is_caught(&cfg, 59.9, 90.0, 50.0));
        assert!(!is_caught(&cfg, 60.0, 90.0, 50.0));
        assert!(!is_caught(&cfg, 60.1, 90.0, 50.0));
        assert!(is_caught(&cfg, 40.1, 90.0, 50.0));
        assert!(!is_caught(&cfg, 40.0, 90.0, 50.0));
    }

    #[test]
    fn basket_is_clamped() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut g = CatchHearts::new(HeartsConfig::default(), &mut rng, 0.0);
        assert_eq!(g.basket_x(), 50.0);
        g.set_basket(-4.0);
        assert_eq!(g.basket_x(), 0.0);
        g.set_basket(130.0);
        assert_eq!(g.basket_x(), 100.0);
        g.set_basket(f64::NAN);
        assert_eq!(g.basket_x(), 100.0);
    }

    #[test]
    fn missed_heart_respawns_above_screen() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut g = CatchHearts::new(HeartsConfig::default(), &mut rng, 0.0);
        let first = g.heart().unwrap().clone();
        assert_eq!(first.y, FIRST_SPAWN_Y);
        // park the basket far away from the heart
        g.set_basket(if first.x > 50.0 { 0.0 } else { 100.0 });
        let mut now = 0.0;
        while g.heart().map(|h| h.id) == Some(first.id) {
            now += 16.0;
            g.update(now, &mut rng);
        }
        let next = g.heart().unwrap();
        assert_eq!(next.id, first.id + 1);
        assert_eq!(next.y, NEXT_SPAWN_Y);
        assert!((0.6..1.2).contains(&next.speed));
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn catches_count_until_completion_fires_once() {
        let cfg = HeartsConfig::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut g = CatchHearts::new(cfg.clone(), &mut rng, 0.0);
        let mut now = 0.0;
        let mut completions = 0;
        let mut cleared_at = None;
        for _ in 0..5_000 {
            now += 16.0;
            if let Some(h) = g.heart() {
                g.set_basket(h.x);
            }
            let score = g.score();
            let id = g.heart().map(|h| h.id);
            if g.update(now, &mut rng) {
                completions += 1;
                let waited = now - cleared_at.unwrap();
                assert!(waited >= cfg.finish_delay_ms && waited < cfg.finish_delay_ms + 16.0);
            }
            if g.score() > score {
                assert_eq!(g.score(), score + 1);
                if g.is_cleared() {
                    cleared_at = Some(now);
                    assert!(g.heart().is_none());
                } else {
                    // replacement spawns on the catching frame
                    let next = g.heart().unwrap();
                    assert_ne!(Some(next.id), id);
                    assert_eq!(next.y, NEXT_SPAWN_Y);
                }
            }
            if g.is_cleared() {
                assert!(g.heart().is_none());
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(g.score(), cfg.target);
    }

    #[test]
    fn zero_target_completes_without_hearts() {
        let cfg = HeartsConfig {
            target: 0,
            ..HeartsConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(4);
        let mut g = CatchHearts::new(cfg, &mut rng, 100.0);
        assert!(g.heart().is_none());
        assert!(!g.update(599.0, &mut rng));
        assert!(g.update(600.0, &mut rng));
        assert!(!g.update(2_000.0, &mut rng));
        assert!(g.heart().is_none());
    }
}

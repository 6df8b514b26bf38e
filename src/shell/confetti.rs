//! Confetti burst for the final screen. Pieces live in game space and fall
//! with a little drift; the burst is refilled while the final screen shows.

use rand::Rng;

const COLORS: [&str; 6] = [
    "#f43f5e", "#fb923c", "#facc15", "#34d399", "#60a5fa", "#c084fc",
];
const MAX_PIECES: usize = 90;

#[derive(Clone, Debug)]
pub struct Piece {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    pub angle: f64,
    spin: f64,
    pub size: f64,
    pub color: &'static str,
}

#[derive(Clone, Debug, Default)]
pub struct Confetti {
    pieces: Vec<Piece>,
}

impl Confetti {
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    /// Top up to the cap, then move every piece one frame.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        while self.pieces.len() < MAX_PIECES {
            self.pieces.push(Piece {
                x: rng.gen_range(0.0..100.0),
                y: rng.gen_range(-60.0..-2.0),
                vx: rng.gen_range(-0.15..0.15),
                vy: rng.gen_range(0.25..0.7),
                angle: rng.gen_range(0.0..std::f64::consts::TAU),
                spin: rng.gen_range(-0.12..0.12),
                size: rng.gen_range(1.0..2.2),
                color: COLORS[rng.gen_range(0..COLORS.len())],
            });
        }
        for p in &mut self.pieces {
            p.x += p.vx;
            p.y += p.vy;
            p.angle += p.spin;
        }
        self.pieces.retain(|p| p.y < 105.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn burst_is_capped_and_recycled() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut c = Confetti::default();
        for _ in 0..600 {
            c.update(&mut rng);
            assert!(c.pieces().len() <= MAX_PIECES);
        }
        assert!(c.pieces().iter().all(|p| p.y < 105.0));
        c.clear();
        assert!(c.pieces().is_empty());
    }
}

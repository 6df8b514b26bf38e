//! Game 4: Simon-Says. The sequence grows by one random colour per cleared
//! round; a wrong press wipes it and the game starts over.

use rand::Rng;

use super::{Point, Rect};
use crate::config::SimonConfig;
use crate::timer::Timers;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimonColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl SimonColor {
    pub const PALETTE: [SimonColor; 4] = [
        SimonColor::Red,
        SimonColor::Blue,
        SimonColor::Green,
        SimonColor::Yellow,
    ];

    /// (idle, lit) fill colours.
    pub const fn css(self) -> (&'static str, &'static str) {
        match self {
            SimonColor::Red => ("#b91c1c", "#f87171"),
            SimonColor::Blue => ("#1d4ed8", "#93c5fd"),
            SimonColor::Green => ("#15803d", "#86efac"),
            SimonColor::Yellow => ("#ca8a04", "#fde68a"),
        }
    }
}

// 2×2 pad layout in game space.
const PAD_LEFT: f64 = 20.0;
const PAD_TOP: f64 = 30.0;
const PAD_SIZE: f64 = 28.0;
const PAD_GAP: f64 = 4.0;

pub fn pad_rect(color: SimonColor) -> Rect {
    let idx = SimonColor::PALETTE
        .iter()
        .position(|c| *c == color)
        .unwrap_or(0);
    let col = (idx % 2) as f64;
    let row = (idx / 2) as f64;
    Rect::new(
        PAD_LEFT + col * (PAD_SIZE + PAD_GAP),
        PAD_TOP + row * (PAD_SIZE + PAD_GAP),
        PAD_SIZE,
        PAD_SIZE,
    )
}

pub fn pad_at(p: Point) -> Option<SimonColor> {
    SimonColor::PALETTE
        .into_iter()
        .find(|c| pad_rect(*c).contains(p))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimonPhase {
    /// A new colour is about to be appended.
    Waiting,
    /// The sequence is being shown; input is locked.
    Playback,
    /// The player repeats the sequence.
    Input,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    AddColor,
    Light(usize),
    Dim,
    EndPlayback,
    Unflash(SimonColor),
    Finish,
}

#[derive(Debug)]
pub struct SimonSays {
    cfg: SimonConfig,
    sequence: Vec<SimonColor>,
    step: usize,
    phase: SimonPhase,
    lit: Option<SimonColor>,
    flash: Option<SimonColor>,
    message: String,
    timers: Timers<Action>,
    finished: bool,
}

impl SimonSays {
    pub fn new(cfg: SimonConfig, now_ms: f64) -> Self {
        let mut timers = Timers::new();
        timers.after(now_ms, cfg.round_delay_ms, Action::AddColor);
        Self {
            cfg,
            sequence: Vec::new(),
            step: 0,
            phase: SimonPhase::Waiting,
            lit: None,
            flash: None,
            message: "Watch the sequence!".to_string(),
            timers,
            finished: false,
        }
    }

    pub fn sequence(&self) -> &[SimonColor] {
        &self.sequence
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn phase(&self) -> SimonPhase {
        self.phase
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Colour currently drawn highlighted (playback or press flash).
    pub fn highlighted(&self) -> Option<SimonColor> {
        self.flash.or(self.lit)
    }

    /// Runs due playback / round steps. Returns `true` on the frame completion fires.
    pub fn update<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) -> bool {
        let mut completed = false;
        while let Some(action) = self.timers.pop_due(now_ms) {
            match action {
                Action::AddColor => {
                    let color = SimonColor::PALETTE[rng.gen_range(0..SimonColor::PALETTE.len())];
                    self.sequence.push(color);
                    self.start_playback(now_ms);
                }
                Action::Light(i) => self.lit = self.sequence.get(i).copied(),
                Action::Dim => self.lit = None,
                Action::EndPlayback => {
                    self.lit = None;
                    self.phase = SimonPhase::Input;
                    self.message = "Your turn!".to_string();
                }
                Action::Unflash(color) => {
                    if self.flash == Some(color) {
                        self.flash = None;
                    }
                }
                Action::Finish => {
                    if !self.finished {
                        self.finished = true;
                        completed = true;
                        tracing::debug!("simon game complete");
                    }
                }
            }
        }
        completed
    }

    fn start_playback(&mut self, now_ms: f64) {
        self.phase = SimonPhase::Playback;
        self.step = 0;
        self.message = format!("Level {}/{}", self.sequence.len(), self.cfg.win_length);
        let slot = self.cfg.pause_ms + self.cfg.highlight_ms;
        for i in 0..self.sequence.len() {
            let start = now_ms + i as f64 * slot;
            self.timers.schedule(start + self.cfg.pause_ms, Action::Light(i));
            self.timers.schedule(start + slot, Action::Dim);
        }
        self.timers.schedule(
            now_ms + self.sequence.len() as f64 * slot,
            Action::EndPlayback,
        );
        tracing::debug!(length = self.sequence.len(), "simon playback");
    }

    /// Player presses a pad. Ignored outside the input phase.
    pub fn press(&mut self, color: SimonColor, now_ms: f64) {
        if self.phase != SimonPhase::Input {
            tracing::trace!(?color, phase = ?self.phase, "press ignored");
            return;
        }
        self.flash = Some(color);
        self.timers
            .after(now_ms, self.cfg.press_flash_ms, Action::Unflash(color));

        if self.sequence.get(self.step) != Some(&color) {
            tracing::debug!(reached = self.sequence.len(), "simon sequence reset");
            self.sequence.clear();
            self.step = 0;
            self.phase = SimonPhase::Waiting;
            self.message = "Oops! Try again.".to_string();
            self.timers
                .after(now_ms, self.cfg.round_delay_ms, Action::AddColor);
            return;
        }

        if self.step + 1 < self.sequence.len() {
            self.step += 1;
        } else if self.sequence.len() >= self.cfg.win_length {
            self.phase = SimonPhase::Won;
            self.message = "You Win!".to_string();
            self.timers
                .after(now_ms, self.cfg.finish_delay_ms, Action::Finish);
        } else {
            self.phase = SimonPhase::Waiting;
            self.message = "Correct! Get ready...".to_string();
            self.timers
                .after(now_ms, self.cfg.round_delay_ms, Action::AddColor);
        }
    }
}

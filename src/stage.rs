//! Stage controller: the forward-only sequence of screens.
//!
//! ```text
//! Intro -> Game1 -> Quote1 -> Game2 -> Quote2 -> Game3 -> Quote3 -> Game4 -> Quote4 -> Final
//!                                                                               restart -> Intro
//! ```
//!
//! Leaving a game or the last quote passes through a loading phase while the
//! quote (or final note) is fetched. The controller owns the mounted game; the
//! game is dropped the moment it signals completion, so none of its timers can
//! fire afterwards. Any signal that does not fit the current stage is a no-op.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::GreetingConfig;
use crate::content::{Content, ContentRequest, ContentSource, PendingContent, Quote, StaticContent};
use crate::games::{ActiveGame, GameKind, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Intro,
    Game1,
    Quote1,
    Game2,
    Quote2,
    Game3,
    Quote3,
    Game4,
    Quote4,
    Final,
}

impl Stage {
    /// The forward path, in order.
    pub const SEQUENCE: [Stage; 10] = [
        Stage::Intro,
        Stage::Game1,
        Stage::Quote1,
        Stage::Game2,
        Stage::Quote2,
        Stage::Game3,
        Stage::Quote3,
        Stage::Game4,
        Stage::Quote4,
        Stage::Final,
    ];

    pub fn game(self) -> Option<GameKind> {
        match self {
            Stage::Game1 => Some(GameKind::Memory),
            Stage::Game2 => Some(GameKind::Balloons),
            Stage::Game3 => Some(GameKind::Hearts),
            Stage::Game4 => Some(GameKind::Simon),
            _ => None,
        }
    }

    pub fn is_quote(self) -> bool {
        matches!(
            self,
            Stage::Quote1 | Stage::Quote2 | Stage::Quote3 | Stage::Quote4
        )
    }

    /// Next stage on the forward path; `Final` has none (only restart leaves it).
    pub fn next(self) -> Option<Stage> {
        let idx = Stage::SEQUENCE.iter().position(|s| *s == self)?;
        Stage::SEQUENCE.get(idx + 1).copied()
    }

    /// Label of the stage's button, if it has one.
    pub fn button_label(self) -> Option<&'static str> {
        match self {
            Stage::Intro => Some("Start Journey ✨"),
            Stage::Quote1 | Stage::Quote2 | Stage::Quote3 => Some("Next Chapter ➜"),
            Stage::Quote4 => Some("Open Gift 🎁"),
            Stage::Final => Some("Play Again"),
            _ => None,
        }
    }
}

pub struct StageController {
    cfg: GreetingConfig,
    content: Box<dyn ContentSource>,
    rng: SmallRng,
    stage: Stage,
    game: Option<ActiveGame>,
    loading: Option<PendingContent>,
    quote: Option<Quote>,
    final_note: Option<String>,
}

impl std::fmt::Debug for StageController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageController")
            .field("stage", &self.stage)
            .field("game", &self.game.as_ref().map(ActiveGame::kind))
            .field("loading", &self.loading)
            .field("quote", &self.quote)
            .field("final_note", &self.final_note.is_some())
            .finish()
    }
}

impl StageController {
    /// Controller using the built-in content (patched by `cfg.content`) and an
    /// entropy-seeded RNG.
    pub fn new(cfg: GreetingConfig) -> Self {
        let content = Box::new(StaticContent::with_overrides(&cfg.content));
        Self::with_parts(cfg, content, SmallRng::from_entropy())
    }

    pub fn with_parts(cfg: GreetingConfig, content: Box<dyn ContentSource>, rng: SmallRng) -> Self {
        Self {
            cfg,
            content,
            rng,
            stage: Stage::Intro,
            game: None,
            loading: None,
            quote: None,
            final_note: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn game(&self) -> Option<&ActiveGame> {
        self.game.as_ref()
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    pub fn final_note(&self) -> Option<&str> {
        self.final_note.as_deref()
    }

    fn enter(&mut self, stage: Stage, now_ms: f64) {
        tracing::info!(from = ?self.stage, to = ?stage, "stage transition");
        self.stage = stage;
        self.game = stage
            .game()
            .map(|kind| ActiveGame::mount(kind, &self.cfg, &mut self.rng, now_ms));
    }

    /// Intro -> Game1.
    pub fn start(&mut self, now_ms: f64) {
        if self.stage != Stage::Intro || self.is_loading() {
            tracing::trace!(stage = ?self.stage, "start ignored");
            return;
        }
        self.enter(Stage::Game1, now_ms);
    }

    /// Completion signal from game `kind`. Only the game mounted on the current
    /// stage can trigger it; the game is unmounted and its quote requested.
    pub fn complete_game(&mut self, kind: GameKind, now_ms: f64) {
        if self.is_loading() || self.stage.game() != Some(kind) {
            tracing::trace!(?kind, stage = ?self.stage, "completion ignored");
            return;
        }
        tracing::info!(?kind, "game complete");
        self.game = None;
        let request = ContentRequest::Quote(kind.theme().key().to_string());
        self.loading = Some(PendingContent::start(
            self.content.as_ref(),
            request,
            now_ms,
            self.cfg.transition_delay_ms,
        ));
    }

    /// QuoteN -> Game(N+1), or Quote4 -> loading -> Final.
    pub fn next(&mut self, now_ms: f64) {
        if self.is_loading() || !self.stage.is_quote() {
            tracing::trace!(stage = ?self.stage, "next ignored");
            return;
        }
        if self.stage == Stage::Quote4 {
            self.loading = Some(PendingContent::start(
                self.content.as_ref(),
                ContentRequest::FinalNote,
                now_ms,
                0.0,
            ));
            return;
        }
        self.quote = None;
        if let Some(next) = self.stage.next() {
            self.enter(next, now_ms);
        }
    }

    /// Final -> Intro, discarding every piece of per-run state.
    pub fn restart(&mut self) {
        if self.stage != Stage::Final || self.is_loading() {
            tracing::trace!(stage = ?self.stage, "restart ignored");
            return;
        }
        tracing::info!("journey restarted");
        self.stage = Stage::Intro;
        self.game = None;
        self.quote = None;
        self.final_note = None;
    }

    /// Activate the current stage's button (start / next chapter / open gift / play again).
    pub fn press_button(&mut self, now_ms: f64) {
        match self.stage {
            Stage::Intro => self.start(now_ms),
            Stage::Final => self.restart(),
            s if s.is_quote() => self.next(now_ms),
            _ => {}
        }
    }

    /// One animation frame: resolve a due content fetch, then advance the
    /// mounted game and act on its completion.
    pub fn tick(&mut self, now_ms: f64) {
        if let Some(pending) = &self.loading {
            if let Some(content) = pending.poll(self.content.as_ref(), now_ms) {
                self.loading = None;
                self.deliver(content, now_ms);
            }
            return;
        }
        let done = match self.game.as_mut() {
            Some(game) => game.update(now_ms, &mut self.rng),
            None => None,
        };
        if let Some(kind) = done {
            self.complete_game(kind, now_ms);
        }
    }

    fn deliver(&mut self, content: Content, now_ms: f64) {
        match content {
            Content::Quote(quote) => {
                self.quote = Some(quote);
                if let Some(next) = self.stage.next() {
                    self.enter(next, now_ms);
                }
            }
            Content::FinalNote(note) => {
                self.quote = None;
                self.final_note = Some(note);
                self.enter(Stage::Final, now_ms);
            }
        }
    }

    pub fn pointer_down(&mut self, p: Point, now_ms: f64) {
        if self.is_loading() {
            return;
        }
        if let Some(game) = self.game.as_mut() {
            game.pointer_down(p, now_ms);
        }
    }

    pub fn pointer_move(&mut self, p: Point) {
        if self.is_loading() {
            return;
        }
        if let Some(game) = self.game.as_mut() {
            game.pointer_move(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> StageController {
        StageController::with_parts(
            GreetingConfig::default(),
            Box::new(StaticContent::new()),
            SmallRng::seed_from_u64(42),
        )
    }

    #[test]
    fn forward_path_is_fixed() {
        let mut s = Stage::Intro;
        let mut seen = vec![s];
        while let Some(n) = s.next() {
            seen.push(n);
            s = n;
        }
        assert_eq!(seen, Stage::SEQUENCE.to_vec());
        assert_eq!(Stage::Final.next(), None);
    }

    #[test]
    fn start_mounts_memory_game() {
        let mut c = controller();
        assert!(c.game().is_none());
        c.start(0.0);
        assert_eq!(c.stage(), Stage::Game1);
        assert_eq!(c.game().map(ActiveGame::kind), Some(GameKind::Memory));
        c.start(1.0);
        assert_eq!(c.stage(), Stage::Game1);
    }

    #[test]
    fn completion_from_wrong_game_is_ignored() {
        let mut c = controller();
        c.start(0.0);
        c.complete_game(GameKind::Hearts, 10.0);
        assert!(!c.is_loading());
        assert!(c.game().is_some());
    }

    #[test]
    fn completion_loads_quote_then_shows_it() {
        let mut c = controller();
        c.start(0.0);
        c.complete_game(GameKind::Memory, 100.0);
        assert!(c.is_loading());
        assert!(c.game().is_none());
        assert_eq!(c.stage(), Stage::Game1);
        // duplicate signal while loading
        c.complete_game(GameKind::Memory, 110.0);
        c.tick(1_699.0);
        assert!(c.is_loading());
        c.tick(1_700.0);
        assert!(!c.is_loading());
        assert_eq!(c.stage(), Stage::Quote1);
        assert_eq!(c.quote(), Some(&StaticContent::new().quote("MEMORIES")));
    }

    #[test]
    fn next_clears_quote_and_mounts_following_game() {
        let mut c = controller();
        c.start(0.0);
        c.complete_game(GameKind::Memory, 0.0);
        c.tick(2_000.0);
        c.next(2_100.0);
        assert_eq!(c.stage(), Stage::Game2);
        assert!(c.quote().is_none());
        assert_eq!(c.game().map(ActiveGame::kind), Some(GameKind::Balloons));
    }

    #[test]
    fn buttons_only_exist_on_static_screens() {
        for s in Stage::SEQUENCE {
            assert_eq!(s.button_label().is_some(), s.game().is_none(), "{s:?}");
        }
    }

    #[test]
    fn dropped_game_timers_never_fire() {
        use crate::games::memory::card_rect;

        let mut c = controller();
        c.start(0.0);
        let Some(ActiveGame::Memory(g)) = c.game() else {
            panic!("memory game not mounted");
        };
        let cards = g.cards().to_vec();
        let a = &cards[0];
        let b = cards
            .iter()
            .find(|x| x.id != a.id && x.symbol != a.symbol)
            .unwrap();
        c.pointer_down(card_rect(a.id).center(), 0.0);
        c.pointer_down(card_rect(b.id).center(), 0.0);
        assert!(matches!(c.game(), Some(ActiveGame::Memory(g)) if g.is_locked()));

        // mismatch resolve is pending until 1000 ms; leave the stage first
        c.complete_game(GameKind::Memory, 10.0);
        let before = format!("{c:?}");
        c.tick(1_000.0);
        c.tick(1_500.0);
        assert!(c.is_loading());
        assert!(c.game().is_none());
        assert_eq!(format!("{c:?}"), before);

        c.tick(1_610.0);
        assert_eq!(c.stage(), Stage::Quote1);
        assert!(c.game().is_none());
    }
}

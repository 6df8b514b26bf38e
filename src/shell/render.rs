//! Canvas drawing for every stage. Drawing errors are ignored (`.ok()`): a
//! missed glyph for one frame is not worth surfacing.

use web_sys::CanvasRenderingContext2d;

use super::confetti::Confetti;
use super::layout::{button_rect, to_px, wrap_words};
use crate::games::balloon::BalloonPop;
use crate::games::hearts::CatchHearts;
use crate::games::memory::{self, MemoryGame};
use crate::games::simon::{self, SimonPhase, SimonSays};
use crate::games::{ActiveGame, GameKind, Rect};
use crate::stage::{Stage, StageController};

const SANS: &str = "'Nunito', 'Segoe UI', sans-serif";
const SERIF: &str = "Georgia, 'Times New Roman', serif";
const EMOJI: &str = "'Noto Color Emoji', 'Apple Color Emoji', 'Segoe UI Emoji', sans-serif";

/// Canvas plus its size in pixels.
pub struct Painter<'a> {
    pub ctx: &'a CanvasRenderingContext2d,
    pub w: f64,
    pub h: f64,
}

impl Painter<'_> {
    fn x(&self, gx: f64) -> f64 {
        gx / 100.0 * self.w
    }

    fn y(&self, gy: f64) -> f64 {
        gy / 100.0 * self.h
    }

    fn font(&self, px: f64, family: &str, weight: &str) {
        self.ctx.set_font(&format!("{weight} {px}px {family}"));
    }

    fn text(&self, s: &str, gx: f64, gy: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_text(s, self.x(gx), self.y(gy)).ok();
    }

    fn rounded_rect(&self, x: f64, y: f64, w: f64, h: f64, r: f64) {
        let r = r.min(w / 2.0).min(h / 2.0);
        let ctx = self.ctx;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        ctx.arc_to(x + w, y, x + w, y + h, r).ok();
        ctx.arc_to(x + w, y + h, x, y + h, r).ok();
        ctx.arc_to(x, y + h, x, y, r).ok();
        ctx.arc_to(x, y, x + w, y, r).ok();
        ctx.close_path();
    }

    fn fill_box(&self, r: Rect, radius: f64, fill: &str) {
        let (x, y, w, h) = to_px(r, self.w, self.h);
        self.rounded_rect(x, y, w, h, radius);
        self.ctx.set_fill_style_str(fill);
        self.ctx.fill();
    }

    fn stroke_box(&self, r: Rect, radius: f64, stroke: &str, width: f64) {
        let (x, y, w, h) = to_px(r, self.w, self.h);
        self.rounded_rect(x, y, w, h, radius);
        self.ctx.set_stroke_style_str(stroke);
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }

    fn measure(&self, s: &str) -> f64 {
        self.ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0)
    }

    /// Wrap `text` to `max_w` game units and draw it centred, starting at `top`.
    /// Returns the game-space y below the last line.
    fn paragraph(&self, text: &str, top: f64, max_w: f64, line_h: f64, color: &str) -> f64 {
        let max_px = self.x(max_w);
        let lines = wrap_words(text, max_px, |s| self.measure(s));
        let mut y = top;
        for line in &lines {
            self.text(line, 50.0, y, color);
            y += line_h;
        }
        y
    }
}

pub fn render(p: &Painter<'_>, ctl: &StageController, confetti: &Confetti, now: f64) {
    background(p, now);
    p.ctx.set_text_align("center");
    p.ctx.set_text_baseline("middle");

    if ctl.is_loading() {
        loading(p, now);
        return;
    }

    match ctl.stage() {
        Stage::Intro => intro(p),
        Stage::Final => {
            draw_confetti(p, confetti);
            final_screen(p, ctl.final_note().unwrap_or_default());
        }
        s if s.is_quote() => {
            if let Some(q) = ctl.quote() {
                quote(p, &q.text);
            }
        }
        _ => {}
    }
    if let Some(game) = ctl.game() {
        draw_game(p, game, now);
    }
    if let (Some(label), Some(rect)) = (ctl.stage().button_label(), button_rect(ctl.stage())) {
        button(p, rect, label, ctl.stage() == Stage::Final, now);
    }
}

fn background(p: &Painter<'_>, now: f64) {
    let ctx = p.ctx;
    let grad = ctx.create_linear_gradient(0.0, 0.0, 0.0, p.h);
    grad.add_color_stop(0.0, "#fff1f2").ok();
    grad.add_color_stop(0.5, "#ffffff").ok();
    grad.add_color_stop(1.0, "#ffe4e6").ok();
    ctx.set_fill_style_canvas_gradient(&grad);
    ctx.fill_rect(0.0, 0.0, p.w, p.h);

    // Three slow floating blobs, staggered by one second each.
    let blobs = [
        (15.0, 12.0, 10.0, "rgba(254,240,138,0.35)"),
        (82.0, 18.0, 10.0, "rgba(251,207,232,0.35)"),
        (50.0, 82.0, 15.0, "rgba(233,213,255,0.35)"),
    ];
    for (i, (gx, gy, r, color)) in blobs.into_iter().enumerate() {
        let phase = (now / 1000.0 - i as f64) * std::f64::consts::TAU / 6.0;
        let dy = phase.sin() * 2.0;
        ctx.begin_path();
        ctx.arc(p.x(gx), p.y(gy + dy), p.x(r), 0.0, std::f64::consts::TAU)
            .ok();
        ctx.set_fill_style_str(color);
        ctx.fill();
    }
}

fn loading(p: &Painter<'_>, now: f64) {
    let ctx = p.ctx;
    let (cx, cy, r) = (p.x(50.0), p.y(46.0), 28.0);
    ctx.set_line_width(6.0);
    ctx.set_stroke_style_str("#fda4af");
    ctx.begin_path();
    ctx.arc(cx, cy, r, 0.0, std::f64::consts::TAU).ok();
    ctx.stroke();
    let start = (now / 1000.0) * std::f64::consts::TAU;
    ctx.set_stroke_style_str("#f43f5e");
    ctx.begin_path();
    ctx.arc(cx, cy, r, start, start + std::f64::consts::FRAC_PI_2).ok();
    ctx.stroke();

    let pulse = 0.6 + 0.4 * ((now / 1000.0) * std::f64::consts::PI).sin().abs();
    ctx.set_global_alpha(pulse);
    p.font(18.0, SANS, "500");
    p.text("Preparing a surprise...", 50.0, 56.0, "#fb7185");
    ctx.set_global_alpha(1.0);
}

fn intro(p: &Painter<'_>) {
    p.font(64.0, SANS, "900");
    p.text("Happy", 50.0, 24.0, "#f43f5e");
    p.text("Birthday!", 50.0, 34.0, "#fb923c");
    p.font(19.0, SANS, "400");
    p.paragraph(
        "I've prepared a small journey for you. Four little challenges to celebrate how amazing you are. Are you ready?",
        46.0,
        74.0,
        4.2,
        "#475569",
    );
}

fn quote(p: &Painter<'_>, text: &str) {
    p.font(72.0, SERIF, "400");
    p.text("\u{201C}", 50.0, 16.0, "#fda4af");
    p.font(24.0, SERIF, "500");
    p.paragraph(text, 30.0, 80.0, 5.0, "#1e293b");
}

fn final_screen(p: &Painter<'_>, note: &str) {
    p.font(32.0, SANS, "700");
    p.text("Congratulations! 🎉", 50.0, 7.0, "#e11d48");

    let card = Rect::new(6.0, 12.0, 88.0, 66.0);
    p.fill_box(card, 18.0, "rgba(255,255,255,0.85)");
    p.stroke_box(card, 18.0, "#ffe4e6", 1.5);

    // Shrink the note until it fits the card.
    let quoted = format!("\u{201C}{note}\u{201D}");
    let mut size = 18.0;
    loop {
        p.font(size, SERIF, "italic 400");
        let line_h = size * 1.45 / p.h * 100.0;
        let lines = wrap_words(&quoted, p.x(80.0), |s| p.measure(s)).len();
        if lines as f64 * line_h <= card.h - 4.0 || size <= 10.0 {
            p.paragraph(&quoted, card.y + 2.0 + line_h / 2.0, 80.0, line_h, "#334155");
            break;
        }
        size -= 1.0;
    }

    p.font(14.0, SANS, "400");
    p.text("Created with ❤️ just for you.", 50.0, 82.0, "#fb7185");
}

fn draw_confetti(p: &Painter<'_>, confetti: &Confetti) {
    let ctx = p.ctx;
    for piece in confetti.pieces() {
        ctx.save();
        ctx.translate(p.x(piece.x), p.y(piece.y)).ok();
        ctx.rotate(piece.angle).ok();
        ctx.set_fill_style_str(piece.color);
        let s = p.x(piece.size);
        ctx.fill_rect(-s / 2.0, -s / 4.0, s, s / 2.0);
        ctx.restore();
    }
}

fn button(p: &Painter<'_>, rect: Rect, label: &str, secondary: bool, now: f64) {
    // Quote buttons bounce gently.
    let bounce = if secondary {
        0.0
    } else {
        ((now / 1000.0) * std::f64::consts::PI).sin().abs() * -1.0
    };
    let r = Rect::new(rect.x, rect.y + bounce, rect.w, rect.h);
    let (fill, text) = if secondary {
        ("#ffffff", "#f43f5e")
    } else {
        ("#f43f5e", "#ffffff")
    };
    p.fill_box(r, 40.0, fill);
    if secondary {
        p.stroke_box(r, 40.0, "#fecdd3", 1.5);
    }
    p.font(22.0, SANS, "600");
    let c = r.center();
    p.text(label, c.x, c.y, text);
}

fn draw_game(p: &Painter<'_>, game: &ActiveGame, now: f64) {
    match game {
        ActiveGame::Memory(g) => memory_board(p, g),
        ActiveGame::Balloons(g) => balloons(p, g),
        ActiveGame::Hearts(g) => hearts(p, g),
        ActiveGame::Simon(g) => simon_pads(p, g, now),
    }
}

fn memory_board(p: &Painter<'_>, g: &MemoryGame) {
    p.font(26.0, SANS, "700");
    p.text(GameKind::Memory.title(), 50.0, 8.0, "#e11d48");
    p.font(17.0, SANS, "400");
    p.text("Find all the matching pairs!", 50.0, 15.0, "#475569");

    for card in g.cards() {
        let r = memory::card_rect(card.id);
        if card.face_up || card.matched {
            p.fill_box(r, 12.0, "#ffffff");
            let border = if card.matched { "#fb7185" } else { "#fda4af" };
            p.stroke_box(r, 12.0, border, 2.0);
            p.font(34.0, EMOJI, "400");
            let c = r.center();
            p.text(card.symbol, c.x, c.y, "#000000");
        } else {
            p.fill_box(r, 12.0, "#fecdd3");
            p.stroke_box(r, 12.0, "#fda4af", 2.0);
            p.font(26.0, SANS, "700");
            let c = r.center();
            p.text("?", c.x, c.y, "rgba(136,19,55,0.5)");
        }
    }
}

fn balloons(p: &Painter<'_>, g: &BalloonPop) {
    let ctx = p.ctx;
    let area = Rect::new(0.0, 0.0, 100.0, 100.0);
    p.fill_box(area, 24.0, "#e0f2fe");
    p.stroke_box(area, 24.0, "#bae6fd", 4.0);

    p.font(64.0, SANS, "900");
    p.text("GAME 2", 50.0, 50.0, "rgba(7,89,133,0.1)");

    for b in g.balloons() {
        let (x, y, w, h) = to_px(b.bounds(), p.w, p.h);
        let (cx, cy) = (x + w / 2.0, y + h / 2.0);
        // string
        ctx.set_stroke_style_str("rgba(148,163,184,0.6)");
        ctx.set_line_width(1.5);
        ctx.begin_path();
        ctx.move_to(cx, y + h);
        ctx.line_to(cx, y + h + p.y(3.0));
        ctx.stroke();
        // body
        ctx.begin_path();
        ctx.ellipse(cx, cy, w / 2.0, h / 2.0, 0.0, 0.0, std::f64::consts::TAU)
            .ok();
        ctx.set_fill_style_str(b.color.css());
        ctx.fill();
        // shine
        ctx.begin_path();
        ctx.ellipse(
            x + w * 0.3,
            y + h * 0.28,
            w * 0.09,
            h * 0.14,
            -std::f64::consts::FRAC_PI_4,
            0.0,
            std::f64::consts::TAU,
        )
        .ok();
        ctx.set_fill_style_str("rgba(255,255,255,0.3)");
        ctx.fill();
    }

    hud_pill(
        p,
        Rect::new(3.0, 2.5, 34.0, 5.5),
        &format!("Pop Count: {}/{}", g.score(), g.target()),
        "rgba(255,255,255,0.8)",
        "#334155",
    );

    if g.is_cleared() {
        ctx.set_fill_style_str("rgba(0,0,0,0.2)");
        ctx.fill_rect(0.0, 0.0, p.w, p.h);
        p.font(40.0, SANS, "700");
        p.text("Popped!", 50.0, 50.0, "#ffffff");
    }
}

fn hearts(p: &Painter<'_>, g: &CatchHearts) {
    let area = Rect::new(0.0, 0.0, 100.0, 100.0);
    p.fill_box(area, 24.0, "#1e1b4b");

    hud_pill(
        p,
        Rect::new(60.0, 2.5, 37.0, 5.5),
        &format!("Love Caught: {}/{}", g.score(), g.target()),
        "rgba(255,255,255,0.2)",
        "#ffffff",
    );

    if let Some(h) = g.heart() {
        p.font(30.0, EMOJI, "400");
        p.text("💖", h.x, h.y, "#ffffff");
    }

    // Basket spans the catch band.
    let basket = Rect::new(g.basket_x() - 6.0, 88.0, 12.0, 7.0);
    p.fill_box(basket, 10.0, "#f43f5e");
    p.stroke_box(basket, 10.0, "#fda4af", 3.0);

    p.font(12.0, SANS, "400");
    p.text("Slide to catch the heart", 50.0, 98.0, "rgba(199,210,254,0.5)");
}

fn simon_pads(p: &Painter<'_>, g: &SimonSays, now: f64) {
    p.font(26.0, SANS, "700");
    p.text(GameKind::Simon.title(), 50.0, 8.0, "#e11d48");
    p.font(21.0, SANS, "500");
    p.text(g.message(), 50.0, 17.0, "#334155");

    p.fill_box(Rect::new(16.0, 26.0, 68.0, 68.0), 28.0, "#f1f5f9");
    let lit = g.highlighted();
    for color in simon::SimonColor::PALETTE {
        let (idle, bright) = color.css();
        let r = simon::pad_rect(color);
        if lit == Some(color) {
            p.fill_box(r, 18.0, bright);
            p.stroke_box(r, 18.0, "#ffffff", 4.0);
        } else {
            p.ctx.set_global_alpha(0.8);
            p.fill_box(r, 18.0, idle);
            p.ctx.set_global_alpha(1.0);
        }
    }
    if g.phase() == SimonPhase::Won {
        let glow = 0.15 + 0.1 * ((now / 200.0).sin());
        p.ctx.set_fill_style_str(&format!("rgba(244,63,94,{glow:.2})"));
        p.ctx.fill_rect(0.0, 0.0, p.w, p.h);
    }
}

fn hud_pill(p: &Painter<'_>, r: Rect, label: &str, fill: &str, color: &str) {
    p.fill_box(r, 40.0, fill);
    p.font(16.0, SANS, "700");
    let c = r.center();
    p.text(label, c.x, c.y, color);
}

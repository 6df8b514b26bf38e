//! Canvas geometry shared by rendering and input routing. Everything here is
//! pure so it can be tested natively.

use crate::games::{Point, Rect};
use crate::stage::Stage;

pub const CANVAS_W: u32 = 640;
pub const CANVAS_H: u32 = 720;

/// Canvas pixel -> game space (0–100 on both axes), clamped to the canvas.
pub fn to_game(px: f64, py: f64, width: f64, height: f64) -> Point {
    if width <= 0.0 || height <= 0.0 {
        return Point::new(0.0, 0.0);
    }
    Point::new(
        (px / width * 100.0).clamp(0.0, 100.0),
        (py / height * 100.0).clamp(0.0, 100.0),
    )
}

/// Game-space box -> canvas pixels `(x, y, w, h)`.
pub fn to_px(r: Rect, width: f64, height: f64) -> (f64, f64, f64, f64) {
    (
        r.x / 100.0 * width,
        r.y / 100.0 * height,
        r.w / 100.0 * width,
        r.h / 100.0 * height,
    )
}

/// Where the stage's button sits, if it has one.
pub fn button_rect(stage: Stage) -> Option<Rect> {
    stage.button_label()?;
    let y = match stage {
        Stage::Intro => 68.0,
        Stage::Final => 88.0,
        _ => 76.0,
    };
    Some(Rect::new(22.0, y, 56.0, 8.0))
}

pub fn hits_button(stage: Stage, p: Point) -> bool {
    button_rect(stage).is_some_and(|r| r.contains(p))
}

/// Greedy word wrap. `measure` returns the rendered width of a string; explicit
/// newlines start new lines and blank lines are kept as empty entries.
pub fn wrap_words(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{line} {word}");
            if measure(&candidate) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
            }
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> f64 {
        s.chars().count() as f64
    }

    #[test]
    fn pixel_mapping_round_trips_corners() {
        let p = to_game(320.0, 720.0, 640.0, 720.0);
        assert_eq!(p, Point::new(50.0, 100.0));
        assert_eq!(to_game(-5.0, 10_000.0, 640.0, 720.0), Point::new(0.0, 100.0));
        assert_eq!(to_game(1.0, 1.0, 0.0, 720.0), Point::new(0.0, 0.0));
        let (x, y, w, h) = to_px(Rect::new(50.0, 50.0, 10.0, 10.0), 640.0, 720.0);
        assert_eq!((x, y, w, h), (320.0, 360.0, 64.0, 72.0));
    }

    #[test]
    fn games_have_no_button() {
        for s in [Stage::Game1, Stage::Game2, Stage::Game3, Stage::Game4] {
            assert!(button_rect(s).is_none());
            assert!(!hits_button(s, Point::new(50.0, 80.0)));
        }
        let r = button_rect(Stage::Quote2).unwrap();
        assert!(hits_button(Stage::Quote2, r.center()));
    }

    #[test]
    fn wrap_respects_width_and_paragraphs() {
        let lines = wrap_words("aa bb cc dd\n\nee", 5.0, chars);
        assert_eq!(lines, vec!["aa bb", "cc dd", "", "ee"]);
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let lines = wrap_words("a supercalifragilistic b", 5.0, chars);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }
}

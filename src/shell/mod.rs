//! Browser shell: owns the canvas, routes DOM input into the stage controller
//! and drives everything from one `requestAnimationFrame` loop.
//!
//! All mutable state lives in a single thread-local [`Shell`]. Event listeners
//! and the frame callback borrow it briefly and never hold it across frames.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use crate::config::GreetingConfig;
use crate::error::ShellError;
use crate::games::Point;
use crate::stage::{Stage, StageController};

pub mod confetti;
pub mod layout;
pub mod render;

use confetti::Confetti;
use layout::{CANVAS_H, CANVAS_W, hits_button, to_game};

const CANVAS_ID: &str = "bj-canvas";

/// Runtime presentation state.
struct Shell {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    controller: StageController,
    confetti: Confetti,
    rng: SmallRng,
}

thread_local! {
    static SHELL: RefCell<Option<Shell>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Pointer press in game space: the stage button wins, otherwise the press
/// goes to the mounted game. Presses while loading are dropped.
pub fn route_pointer_down(ctl: &mut StageController, p: Point, now_ms: f64) {
    if ctl.is_loading() {
        return;
    }
    if hits_button(ctl.stage(), p) {
        ctl.press_button(now_ms);
    } else {
        ctl.pointer_down(p, now_ms);
    }
}

/// Keyboard shortcut for the stage button. Auto-repeat events from a held key
/// are dropped. Returns whether the key was consumed.
pub fn route_key(ctl: &mut StageController, key: &str, repeat: bool, now_ms: f64) -> bool {
    if !matches!(key, "Enter" | " ") || ctl.stage().button_label().is_none() {
        return false;
    }
    if !repeat {
        ctl.press_button(now_ms);
    }
    true
}

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Mount the greeting into the page. Calling it again restarts the journey
/// with the new configuration but keeps the existing canvas, listeners and loop.
pub fn start(cfg: GreetingConfig) -> Result<(), ShellError> {
    let controller = StageController::new(cfg);
    let fresh = SHELL.with(|cell| {
        let mut slot = cell.borrow_mut();
        match slot.as_mut() {
            Some(shell) => {
                shell.controller = controller;
                shell.confetti.clear();
                None
            }
            None => Some(controller),
        }
    });
    let Some(controller) = fresh else {
        tracing::info!("greeting reconfigured");
        return Ok(());
    };

    let win = window().ok_or(ShellError::NoWindow)?;
    let doc = win.document().ok_or(ShellError::NoDocument)?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()
            .map_err(|_| ShellError::Dom(format!("#{CANVAS_ID} is not a canvas")))?
    } else {
        let c: HtmlCanvasElement = doc
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| ShellError::Dom("created element is not a canvas".into()))?;
        c.set_id(CANVAS_ID);
        c.set_width(CANVAS_W);
        c.set_height(CANVAS_H);
        c.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); max-width:100vw; max-height:100vh; border-radius:24px; box-shadow:0 0 32px 0 rgba(244,63,94,0.15); touch-action:none; user-select:none;").ok();
        doc.body().ok_or(ShellError::NoBody)?.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(ShellError::NoContext)?
        .dyn_into()
        .map_err(|_| ShellError::NoContext)?;

    SHELL.with(|cell| {
        cell.replace(Some(Shell {
            canvas: canvas.clone(),
            ctx,
            controller,
            confetti: Confetti::default(),
            rng: SmallRng::from_entropy(),
        }))
    });

    install_listeners(&doc, &canvas)?;
    start_loop();
    tracing::info!("greeting started");
    Ok(())
}

/// Client coordinates -> game space, using the canvas' on-screen box so CSS
/// scaling does not skew hit tests.
fn event_point(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> Point {
    let rect = canvas.get_bounding_client_rect();
    to_game(
        client_x - rect.left(),
        client_y - rect.top(),
        rect.width(),
        rect.height(),
    )
}

fn install_listeners(doc: &web_sys::Document, canvas: &HtmlCanvasElement) -> Result<(), ShellError> {
    // Press: pop / flip / pad / button
    {
        let target = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::PointerEvent| {
            evt.prevent_default();
            let p = event_point(&target, evt.client_x() as f64, evt.client_y() as f64);
            let now = performance_now();
            SHELL.with(|cell| {
                if let Some(shell) = cell.borrow_mut().as_mut() {
                    route_pointer_down(&mut shell.controller, p, now);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Basket tracking (mouse / pen)
    {
        let target = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::PointerEvent| {
            let p = event_point(&target, evt.client_x() as f64, evt.client_y() as f64);
            SHELL.with(|cell| {
                if let Some(shell) = cell.borrow_mut().as_mut() {
                    shell.controller.pointer_move(p);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Basket tracking (touch)
    {
        let target = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            let Some(touch) = evt.touches().get(0) else {
                return;
            };
            evt.prevent_default();
            let p = event_point(&target, touch.client_x() as f64, touch.client_y() as f64);
            SHELL.with(|cell| {
                if let Some(shell) = cell.borrow_mut().as_mut() {
                    shell.controller.pointer_move(p);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Enter / Space activate the stage button
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let key = evt.key();
            let now = performance_now();
            let consumed = SHELL.with(|cell| {
                cell.borrow_mut()
                    .as_mut()
                    .is_some_and(|shell| route_key(&mut shell.controller, &key, evt.repeat(), now))
            });
            // keep Space from scrolling the page
            if consumed {
                evt.prevent_default();
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        SHELL.with(|cell| {
            if let Some(shell) = cell.borrow_mut().as_mut() {
                frame(shell, ts);
            }
        });
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn frame(shell: &mut Shell, now: f64) {
    shell.controller.tick(now);
    if shell.controller.stage() == Stage::Final && !shell.controller.is_loading() {
        shell.confetti.update(&mut shell.rng);
    } else {
        shell.confetti.clear();
    }
    let painter = render::Painter {
        ctx: &shell.ctx,
        w: shell.canvas.width() as f64,
        h: shell.canvas.height() as f64,
    };
    render::render(&painter, &shell.controller, &shell.confetti, now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::StaticContent;
    use crate::games::GameKind;
    use layout::button_rect;

    fn controller() -> StageController {
        StageController::with_parts(
            GreetingConfig::default(),
            Box::new(StaticContent::new()),
            SmallRng::seed_from_u64(8),
        )
    }

    #[test]
    fn intro_button_starts_journey() {
        let mut ctl = controller();
        route_pointer_down(&mut ctl, Point::new(5.0, 5.0), 0.0);
        assert_eq!(ctl.stage(), Stage::Intro);
        let hit = button_rect(Stage::Intro).unwrap().center();
        route_pointer_down(&mut ctl, hit, 0.0);
        assert_eq!(ctl.stage(), Stage::Game1);
    }

    #[test]
    fn keys_only_drive_buttons() {
        let mut ctl = controller();
        assert!(!route_key(&mut ctl, "a", false, 0.0));
        assert_eq!(ctl.stage(), Stage::Intro);
        assert!(route_key(&mut ctl, "Enter", false, 0.0));
        assert_eq!(ctl.stage(), Stage::Game1);
        // games have no button
        assert!(!route_key(&mut ctl, " ", false, 0.0));
        assert_eq!(ctl.stage(), Stage::Game1);
    }

    #[test]
    fn held_key_presses_the_button_once() {
        let mut ctl = controller();
        ctl.start(0.0);
        ctl.complete_game(GameKind::Memory, 0.0);
        ctl.tick(5_000.0);
        assert_eq!(ctl.stage(), Stage::Quote1);
        assert!(route_key(&mut ctl, " ", false, 5_000.0));
        assert_eq!(ctl.stage(), Stage::Game2);
        ctl.complete_game(GameKind::Balloons, 5_000.0);
        ctl.tick(10_000.0);
        assert_eq!(ctl.stage(), Stage::Quote2);
        // repeats are consumed but do nothing
        assert!(route_key(&mut ctl, "Enter", true, 10_000.0));
        assert!(route_key(&mut ctl, "Enter", true, 10_016.0));
        assert_eq!(ctl.stage(), Stage::Quote2);
    }

    #[test]
    fn presses_while_loading_are_dropped() {
        let mut ctl = controller();
        ctl.start(0.0);
        ctl.complete_game(GameKind::Memory, 0.0);
        let hit = button_rect(Stage::Quote1).unwrap().center();
        route_pointer_down(&mut ctl, hit, 10.0);
        assert!(ctl.is_loading());
        ctl.tick(5_000.0);
        assert_eq!(ctl.stage(), Stage::Quote1);
        route_pointer_down(&mut ctl, hit, 5_010.0);
        assert_eq!(ctl.stage(), Stage::Game2);
    }
}

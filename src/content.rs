//! Greeting text: one quote per theme and the closing note.
//!
//! Content is served through [`ContentSource`] so the static table can be swapped
//! for another backend without touching the stage machine. Lookups never fail:
//! unknown theme keys fall back to the `JOY` entry.

use std::collections::BTreeMap;

use crate::config::ContentConfig;

/// Theme attached to each mini-game; decides which quote follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Theme {
    Memories,
    Strength,
    Love,
    Journey,
}

impl Theme {
    pub const fn key(self) -> &'static str {
        match self {
            Theme::Memories => "MEMORIES",
            Theme::Strength => "STRENGTH",
            Theme::Love => "LOVE",
            Theme::Journey => "JOURNEY",
        }
    }
}

/// Key used when a theme is not in the table.
pub const FALLBACK_THEME: &str = "JOY";

pub const BIRTHDAY_QUOTES: &[(&str, &str)] = &[
    (
        "MEMORIES",
        "Memories are the threads that weave the tapestry of our lives. Today, we celebrate the beautiful story you've written so far and the amazing chapters yet to come.",
    ),
    (
        "STRENGTH",
        "Your strength isn't just in what you can carry, but in how you lift others up. You are a beacon of kindness and resilience, and you are cherished more than you know.",
    ),
    (
        "LOVE",
        "The world is a brighter place simply because you are in it. May your birthday be filled with the same warmth and love that you so freely give to everyone around you.",
    ),
    (
        "JOURNEY",
        "Life is a beautiful journey, and every year is a new horizon. Embrace the adventure ahead with your beautiful smile, knowing you have so many people cheering you on.",
    ),
    (
        "JOY",
        "May your day be filled with the kind of joy that makes your cheeks hurt from smiling.",
    ),
];

pub const FINAL_BIRTHDAY_NOTE: &str = "Happy Birthday, my dearest soul-friend 🤍

Some people walk into our lives quietly and then, without us realizing it, become home. You are that person for me. Through laughter that healed, tears that were understood without words, and moments that felt too heavy to carry alone, you were always there, standing beside me with a heart full of love.

On your birthday, I want you to know how deeply grateful I am for you. For your kindness that never asks for anything in return. For your strength, even on days you don't see it yourself. For the way you love so purely and show up so genuinely, making the world softer just by being in it.

You deserve a life filled with peace, happiness, and dreams that come true one by one. May this year bring you moments that make your heart smile, love that feels safe and deep, and success that finds you effortlessly. And on days when things feel overwhelming, I hope you remember you're never alone. You have me, always.

Thank you for being my constant, my safe place, my forever friend. I'm so proud of the person you are and so lucky to walk through life with you.

Happy Birthday. May your heart feel as loved today as you make others feel every single day 💖";

/// A quote shown between games.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
}

/// Anything that can answer "given a theme key (or the final screen), return text".
pub trait ContentSource {
    fn quote(&self, theme_key: &str) -> Quote;
    fn final_note(&self) -> String;

    /// Cosmetic latency applied to every fetch.
    fn latency_ms(&self) -> f64 {
        800.0
    }
}

/// Built-in table, optionally patched from configuration.
#[derive(Clone, Debug)]
pub struct StaticContent {
    overrides: BTreeMap<String, String>,
    final_note: Option<String>,
    latency_ms: f64,
}

impl Default for StaticContent {
    fn default() -> Self {
        Self {
            overrides: BTreeMap::new(),
            final_note: None,
            latency_ms: 800.0,
        }
    }
}

impl StaticContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply quote / final-note overrides and latency from configuration.
    /// Blank override texts are skipped so the greeting never shows an empty card.
    pub fn with_overrides(cfg: &ContentConfig) -> Self {
        let overrides = cfg
            .quotes
            .iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(k, v)| (k.to_ascii_uppercase(), v.clone()))
            .collect();
        Self {
            overrides,
            final_note: cfg.final_note.clone().filter(|n| !n.trim().is_empty()),
            latency_ms: cfg.latency_ms.max(0.0),
        }
    }

    fn builtin(key: &str) -> Option<&'static str> {
        BIRTHDAY_QUOTES
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, text)| *text)
    }
}

impl ContentSource for StaticContent {
    fn quote(&self, theme_key: &str) -> Quote {
        let key = theme_key.trim().to_ascii_uppercase();
        let text = self
            .overrides
            .get(&key)
            .map(String::as_str)
            .or_else(|| Self::builtin(&key))
            .or_else(|| self.overrides.get(FALLBACK_THEME).map(String::as_str))
            .or_else(|| Self::builtin(FALLBACK_THEME))
            .unwrap_or_default();
        Quote {
            text: text.to_string(),
        }
    }

    fn final_note(&self) -> String {
        self.final_note
            .clone()
            .unwrap_or_else(|| FINAL_BIRTHDAY_NOTE.to_string())
    }

    fn latency_ms(&self) -> f64 {
        self.latency_ms
    }
}

/// What the stage controller is waiting for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentRequest {
    Quote(String),
    FinalNote,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Quote(Quote),
    FinalNote(String),
}

/// An in-flight fetch: resolves on the first poll at or after `ready_at_ms`.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingContent {
    pub request: ContentRequest,
    pub ready_at_ms: f64,
}

impl PendingContent {
    /// Start a fetch at `now_ms`; `extra_delay_ms` is added on top of the source's latency.
    pub fn start(
        source: &dyn ContentSource,
        request: ContentRequest,
        now_ms: f64,
        extra_delay_ms: f64,
    ) -> Self {
        Self {
            request,
            ready_at_ms: now_ms + extra_delay_ms.max(0.0) + source.latency_ms().max(0.0),
        }
    }

    pub fn poll(&self, source: &dyn ContentSource, now_ms: f64) -> Option<Content> {
        if now_ms < self.ready_at_ms {
            return None;
        }
        Some(match &self.request {
            ContentRequest::Quote(key) => Content::Quote(source.quote(key)),
            ContentRequest::FinalNote => Content::FinalNote(source.final_note()),
        })
    }
}

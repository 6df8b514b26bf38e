//! Tunables for the greeting. Every value has a default matching the shipped
//! pacing; with the `serde` feature a partial JSON document can override any
//! subset of them (`start_greeting_with_config`).

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Top-level configuration handed to the stage controller.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GreetingConfig {
    /// Cosmetic pause between a game finishing and its quote being requested.
    pub transition_delay_ms: f64,
    pub content: ContentConfig,
    pub memory: MemoryConfig,
    pub balloons: BalloonConfig,
    pub hearts: HeartsConfig,
    pub simon: SimonConfig,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            transition_delay_ms: 800.0,
            content: ContentConfig::default(),
            memory: MemoryConfig::default(),
            balloons: BalloonConfig::default(),
            hearts: HeartsConfig::default(),
            simon: SimonConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContentConfig {
    /// Artificial latency of each content fetch.
    pub latency_ms: f64,
    /// Replacement quote text keyed by theme (case-insensitive).
    pub quotes: BTreeMap<String, String>,
    pub final_note: Option<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            latency_ms: 800.0,
            quotes: BTreeMap::new(),
            final_note: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MemoryConfig {
    pub match_delay_ms: f64,
    pub mismatch_delay_ms: f64,
    pub finish_delay_ms: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            match_delay_ms: 500.0,
            mismatch_delay_ms: 1000.0,
            finish_delay_ms: 1000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BalloonConfig {
    pub target: u32,
    /// Spawning pauses while this many balloons are on screen.
    pub max_alive: usize,
    pub spawn_interval_ms: f64,
    pub finish_delay_ms: f64,
}

impl Default for BalloonConfig {
    fn default() -> Self {
        Self {
            target: 10,
            max_alive: 8,
            spawn_interval_ms: 1000.0,
            finish_delay_ms: 1000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeartsConfig {
    pub target: u32,
    /// Open interval of heart heights that count as "in the basket".
    pub catch_band: (f64, f64),
    /// Horizontal distance to the basket must be strictly below this.
    pub catch_radius: f64,
    pub finish_delay_ms: f64,
}

impl Default for HeartsConfig {
    fn default() -> Self {
        Self {
            target: 10,
            catch_band: (85.0, 95.0),
            catch_radius: 10.0,
            finish_delay_ms: 500.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimonConfig {
    pub win_length: usize,
    /// Dark gap before each colour during playback.
    pub pause_ms: f64,
    /// Time each colour stays lit during playback.
    pub highlight_ms: f64,
    /// Delay before a new colour is appended (after mount, a cleared round or a reset).
    pub round_delay_ms: f64,
    pub press_flash_ms: f64,
    pub finish_delay_ms: f64,
}

impl Default for SimonConfig {
    fn default() -> Self {
        Self {
            win_length: 5,
            pause_ms: 600.0,
            highlight_ms: 400.0,
            round_delay_ms: 1000.0,
            press_flash_ms: 200.0,
            finish_delay_ms: 1000.0,
        }
    }
}

#[cfg(feature = "serde_json")]
impl GreetingConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_pacing() {
        let cfg = GreetingConfig::default();
        assert_eq!(cfg.balloons.target, 10);
        assert_eq!(cfg.balloons.max_alive, 8);
        assert_eq!(cfg.hearts.catch_band, (85.0, 95.0));
        assert_eq!(cfg.simon.win_length, 5);
        assert_eq!(cfg.content.latency_ms, 800.0);
        assert!(cfg.content.quotes.is_empty());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GreetingConfig::from_json(
            r#"{ "balloons": { "target": 3 }, "content": { "final_note": "hi" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.balloons.target, 3);
        assert_eq!(cfg.balloons.max_alive, 8);
        assert_eq!(cfg.content.final_note.as_deref(), Some("hi"));
        assert_eq!(cfg.hearts, HeartsConfig::default());
    }
}

//! Keyboard input to per-tick intents
//!
//! Shift and rotate are one-shot: each key press feeds the next tick.
//! Boost is held: it stays on while press/repeat events keep arriving,
//! because key release events are unreliable on Linux terminals.

use crate::figure::ShiftDirection;
use crate::game::Intent;
use crate::settings::Settings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Time after which boost counts as released if no repeat arrived.
/// Longer than the usual initial auto-repeat delay
const BOOST_TIMEOUT: Duration = Duration::from_millis(400);

/// Key bindings - supports multiple keys per intent
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub shift_left: Vec<KeyCode>,
    pub shift_right: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub boost: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode.
    /// Unknown names yield None and are dropped
    fn parse_key(s: &str) -> Option<KeyCode> {
        let code = match s.to_lowercase().as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    tracing::warn!("Ignoring unknown key name '{}'", s);
                }
                code
            })
            .collect()
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            shift_left: Self::parse_keys(&settings.keys.shift_left),
            shift_right: Self::parse_keys(&settings.keys.shift_right),
            rotate: Self::parse_keys(&settings.keys.rotate),
            boost: Self::parse_keys(&settings.keys.boost),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Collects key events between ticks
pub struct InputHandler {
    bindings: KeyBindings,
    shift: Option<ShiftDirection>,
    rotate: bool,
    quit: bool,
    /// Last press or repeat of a boost key
    boost_seen: Option<Instant>,
}

impl InputHandler {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            shift: None,
            rotate: false,
            quit: false,
            boost_seen: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(KeyBindings::from_settings(settings))
    }

    /// Handle a key press or repeat
    pub fn key_down(&mut self, key: KeyEvent) {
        self.key_down_at(key, Instant::now());
    }

    fn key_down_at(&mut self, key: KeyEvent, now: Instant) {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        let code = normalize_key(key.code);

        if self.bindings.shift_left.contains(&code) {
            self.shift = Some(ShiftDirection::Left);
        } else if self.bindings.shift_right.contains(&code) {
            self.shift = Some(ShiftDirection::Right);
        } else if self.bindings.rotate.contains(&code) {
            self.rotate = true;
        } else if self.bindings.boost.contains(&code) {
            self.boost_seen = Some(now);
        } else if self.bindings.quit.contains(&code) {
            self.quit = true;
        }
    }

    /// Handle a key release (may not be reported on Linux)
    pub fn key_up(&mut self, key: KeyEvent) {
        if self.bindings.boost.contains(&normalize_key(key.code)) {
            self.boost_seen = None;
        }
    }

    /// Intent for the coming tick; clears the one-shot requests
    pub fn take_intent(&mut self) -> Intent {
        self.take_intent_at(Instant::now())
    }

    fn take_intent_at(&mut self, now: Instant) -> Intent {
        if let Some(seen) = self.boost_seen {
            if now.duration_since(seen) > BOOST_TIMEOUT {
                self.boost_seen = None;
            }
        }

        Intent {
            shift: self.shift.take(),
            rotate: std::mem::take(&mut self.rotate),
            boost: self.boost_seen.is_some(),
            quit: self.quit,
        }
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn handler() -> InputHandler {
        InputHandler::new(KeyBindings::default())
    }

    #[test]
    fn test_no_keys_no_intent() {
        assert_eq!(handler().take_intent(), Intent::default());
    }

    #[test]
    fn test_shift_is_one_shot() {
        let mut input = handler();
        input.key_down(press(KeyCode::Left));
        assert_eq!(input.take_intent().shift, Some(ShiftDirection::Left));
        assert_eq!(input.take_intent().shift, None);
    }

    #[test]
    fn test_latest_shift_wins() {
        let mut input = handler();
        input.key_down(press(KeyCode::Left));
        input.key_down(press(KeyCode::Char('D')));
        assert_eq!(input.take_intent().shift, Some(ShiftDirection::Right));
    }

    #[test]
    fn test_rotate_is_one_shot() {
        let mut input = handler();
        input.key_down(press(KeyCode::Up));
        assert!(input.take_intent().rotate);
        assert!(!input.take_intent().rotate);
    }

    #[test]
    fn test_boost_held_until_release() {
        let mut input = handler();
        input.key_down(press(KeyCode::Down));
        assert!(input.take_intent().boost);
        assert!(input.take_intent().boost);
        input.key_up(press(KeyCode::Down));
        assert!(!input.take_intent().boost);
    }

    #[test]
    fn test_boost_times_out_without_repeats() {
        let mut input = handler();
        let start = Instant::now();
        input.key_down_at(press(KeyCode::Down), start);
        assert!(input.take_intent_at(start + BOOST_TIMEOUT / 2).boost);
        assert!(!input.take_intent_at(start + BOOST_TIMEOUT * 2).boost);
    }

    #[test]
    fn test_quit_keys() {
        let mut input = handler();
        input.key_down(press(KeyCode::Esc));
        assert!(input.take_intent().quit);

        let mut input = handler();
        input.key_down(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(input.take_intent().quit);
    }

    #[test]
    fn test_custom_bindings_from_settings() {
        let settings = Settings::from_toml_str("[keys]\nrotate = [\"x\", \"nonsense\"]").unwrap();
        let bindings = KeyBindings::from_settings(&settings);
        assert_eq!(bindings.rotate, vec![KeyCode::Char('x')]);

        let mut input = InputHandler::from_settings(&settings);
        input.key_down(press(KeyCode::Up));
        assert!(!input.take_intent().rotate);
        input.key_down(press(KeyCode::Char('X')));
        assert!(input.take_intent().rotate);
    }
}

//! Keyboard state with chord queries
//!
//! Keys are described by name and joined with `+`, e.g. `"shift+a"` or
//! `"ctrl+left"`. Recognised names:
//! - Aliases: left, up, right, down, space, tab, escape
//! - Modifiers: shift, ctrl, alt, meta
//! - Single letters `a`-`z` and digits `0`-`9`
//!
//! An unknown name never matches, so a chord containing one is never pressed.

use std::collections::HashSet;

use bitflags::bitflags;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

bitflags! {
    /// Modifier keys held during a key event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

impl From<ModifiersState> for KeyModifiers {
    fn from(state: ModifiersState) -> Self {
        let mut modifiers = KeyModifiers::empty();
        modifiers.set(KeyModifiers::SHIFT, state.shift_key());
        modifiers.set(KeyModifiers::CTRL, state.control_key());
        modifiers.set(KeyModifiers::ALT, state.alt_key());
        modifiers.set(KeyModifiers::META, state.super_key());
        modifiers
    }
}

/// One key press together with the modifiers held at the time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyStroke {
    pub fn new(key: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Build a stroke from a winit event; keys without a physical code are skipped
    pub fn from_event(event: &KeyEvent, modifiers: ModifiersState) -> Option<Self> {
        match event.physical_key {
            PhysicalKey::Code(key) => Some(Self::new(key, modifiers.into())),
            PhysicalKey::Unidentified(_) => None,
        }
    }
}

/// A resolved key name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyName {
    Key(KeyCode),
    Modifier(KeyModifiers),
}

fn resolve(name: &str) -> Option<KeyName> {
    let name = name.trim().to_ascii_lowercase();
    let key = match name.as_str() {
        "shift" => return Some(KeyName::Modifier(KeyModifiers::SHIFT)),
        "ctrl" => return Some(KeyName::Modifier(KeyModifiers::CTRL)),
        "alt" => return Some(KeyName::Modifier(KeyModifiers::ALT)),
        "meta" => return Some(KeyName::Modifier(KeyModifiers::META)),
        "left" => KeyCode::ArrowLeft,
        "up" => KeyCode::ArrowUp,
        "right" => KeyCode::ArrowRight,
        "down" => KeyCode::ArrowDown,
        "space" => KeyCode::Space,
        "tab" => KeyCode::Tab,
        "escape" => KeyCode::Escape,
        single if single.len() == 1 => single_char_key(single.as_bytes()[0])?,
        _ => return None,
    };
    Some(KeyName::Key(key))
}

fn single_char_key(c: u8) -> Option<KeyCode> {
    const LETTERS: [KeyCode; 26] = [
        KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE, KeyCode::KeyF,
        KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ, KeyCode::KeyK, KeyCode::KeyL,
        KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO, KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR,
        KeyCode::KeyS, KeyCode::KeyT, KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX,
        KeyCode::KeyY, KeyCode::KeyZ,
    ];
    const DIGITS: [KeyCode; 10] = [
        KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
        KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
    ];
    match c {
        b'a'..=b'z' => Some(LETTERS[(c - b'a') as usize]),
        b'0'..=b'9' => Some(DIGITS[(c - b'0') as usize]),
        _ => None,
    }
}

fn modifier_keys(modifier: KeyModifiers) -> [KeyCode; 2] {
    if modifier == KeyModifiers::SHIFT {
        [KeyCode::ShiftLeft, KeyCode::ShiftRight]
    } else if modifier == KeyModifiers::CTRL {
        [KeyCode::ControlLeft, KeyCode::ControlRight]
    } else if modifier == KeyModifiers::ALT {
        [KeyCode::AltLeft, KeyCode::AltRight]
    } else {
        [KeyCode::SuperLeft, KeyCode::SuperRight]
    }
}

/// Tracks which keys are currently held
#[derive(Debug, Default, Clone)]
pub struct Keyboard {
    down: HashSet<KeyCode>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key going down or up
    pub fn on_key_change(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.down.insert(key);
        } else {
            self.down.remove(&key);
        }
    }

    /// Feed a winit key event
    pub fn process_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key) = event.physical_key {
            self.on_key_change(key, event.state == ElementState::Pressed);
        }
    }

    /// Release every key (window lost focus)
    pub fn on_blur(&mut self) {
        self.down.clear();
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.down.contains(&key)
    }

    /// Whether every key in the chord is held
    pub fn pressed(&self, desc: &str) -> bool {
        desc.split('+').all(|name| match resolve(name) {
            Some(KeyName::Key(key)) => self.is_down(key),
            Some(KeyName::Modifier(modifier)) => modifier_keys(modifier).iter().any(|k| self.is_down(*k)),
            None => false,
        })
    }

    /// Whether a single key stroke matches the chord
    ///
    /// Modifier names are checked against the stroke's modifier state, all
    /// other names against the stroke's key. A winit `KeyEvent` is matched by
    /// converting it first with [`KeyStroke::from_event`] and the
    /// `ModifiersState` from the latest `WindowEvent::ModifiersChanged`.
    pub fn event_matches(stroke: &KeyStroke, desc: &str) -> bool {
        desc.split('+').all(|name| match resolve(name) {
            Some(KeyName::Key(key)) => stroke.key == key,
            Some(KeyName::Modifier(modifier)) => stroke.modifiers.contains(modifier),
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_keys_and_aliases() {
        let mut keyboard = Keyboard::new();
        keyboard.on_key_change(KeyCode::KeyA, true);
        keyboard.on_key_change(KeyCode::ArrowUp, true);

        assert!(keyboard.pressed("a"));
        assert!(keyboard.pressed("A"));
        assert!(keyboard.pressed("up"));
        assert!(!keyboard.pressed("down"));

        keyboard.on_key_change(KeyCode::KeyA, false);
        assert!(!keyboard.pressed("a"));
    }

    #[test]
    fn test_chords_need_every_key() {
        let mut keyboard = Keyboard::new();
        keyboard.on_key_change(KeyCode::ShiftRight, true);
        assert!(!keyboard.pressed("shift+up"));

        keyboard.on_key_change(KeyCode::ArrowUp, true);
        assert!(keyboard.pressed("shift+up"));
        assert!(keyboard.pressed("up+shift"));
        assert!(!keyboard.pressed("ctrl+up"));
    }

    #[test]
    fn test_digits() {
        let mut keyboard = Keyboard::new();
        keyboard.on_key_change(KeyCode::Digit7, true);
        assert!(keyboard.pressed("7"));
        assert!(!keyboard.pressed("8"));
    }

    #[test]
    fn test_unknown_names_never_match() {
        let mut keyboard = Keyboard::new();
        keyboard.on_key_change(KeyCode::KeyA, true);
        assert!(!keyboard.pressed(""));
        assert!(!keyboard.pressed("banana"));
        assert!(!keyboard.pressed("a+banana"));
        assert!(!keyboard.pressed("!"));
    }

    #[test]
    fn test_blur_releases_everything() {
        let mut keyboard = Keyboard::new();
        keyboard.on_key_change(KeyCode::Space, true);
        keyboard.on_key_change(KeyCode::Tab, true);
        keyboard.on_blur();
        assert!(!keyboard.pressed("space"));
        assert!(!keyboard.pressed("tab"));
    }

    #[test]
    fn test_event_matches_uses_modifier_state() {
        let stroke = KeyStroke::new(KeyCode::KeyS, KeyModifiers::CTRL | KeyModifiers::SHIFT);
        assert!(Keyboard::event_matches(&stroke, "ctrl+s"));
        assert!(Keyboard::event_matches(&stroke, "shift+ctrl+s"));
        assert!(!Keyboard::event_matches(&stroke, "alt+s"));
        assert!(!Keyboard::event_matches(&stroke, "ctrl+d"));

        let escape = KeyStroke::new(KeyCode::Escape, KeyModifiers::empty());
        assert!(Keyboard::event_matches(&escape, "escape"));
        assert!(!Keyboard::event_matches(&escape, "meta+escape"));
    }

    #[test]
    fn test_stroke_with_winit_modifiers_matches() {
        let stroke = KeyStroke::new(KeyCode::KeyR, (ModifiersState::CONTROL | ModifiersState::ALT).into());
        assert!(Keyboard::event_matches(&stroke, "ctrl+alt+r"));
        assert!(!Keyboard::event_matches(&stroke, "shift+r"));
        assert!(!Keyboard::event_matches(&stroke, "ctrl+alt+bogus"));
    }

    #[test]
    fn test_modifiers_from_winit_state() {
        let state = ModifiersState::SHIFT | ModifiersState::SUPER;
        let modifiers = KeyModifiers::from(state);
        assert_eq!(modifiers, KeyModifiers::SHIFT | KeyModifiers::META);
    }
}

//! OS side of the hotkey hook
//!
//! Registering a combination with the OS takes the keystroke away from
//! every other application. Each grabbed step is typed back into the
//! focused application so hotkeys observe keys without consuming them.

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use global_hotkey::GlobalHotKeyManager;

use super::chord::{ChordStep, ModifierSet};

/// Failure reported by the OS hook or the key typist
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BackendError(pub(crate) String);

/// Registers single chord steps with the OS and types them back
pub trait KeyBackend {
    /// Grab a step system-wide
    fn register(&mut self, step: &ChordStep) -> Result<(), BackendError>;

    /// Release a grabbed step
    fn unregister(&mut self, step: &ChordStep) -> Result<(), BackendError>;

    /// Type `step` into the focused application
    fn replay(&mut self, step: &ChordStep) -> Result<(), BackendError>;
}

/// [`KeyBackend`] over `global-hotkey` and `enigo`
pub struct SystemKeys {
    manager: GlobalHotKeyManager,
    typist: Enigo,
}

impl SystemKeys {
    /// Create the OS hotkey manager and input injector
    pub fn new() -> Result<Self, BackendError> {
        let manager = GlobalHotKeyManager::new().map_err(|e| BackendError(e.to_string()))?;
        let typist = Enigo::new(&Settings::default()).map_err(|e| BackendError(e.to_string()))?;
        Ok(Self { manager, typist })
    }

    fn press(&mut self, key: Key, direction: Direction) -> Result<(), BackendError> {
        self.typist
            .key(key, direction)
            .map_err(|e| BackendError(e.to_string()))
    }
}

impl KeyBackend for SystemKeys {
    fn register(&mut self, step: &ChordStep) -> Result<(), BackendError> {
        self.manager
            .register(step.hotkey())
            .map_err(|e| BackendError(e.to_string()))
    }

    fn unregister(&mut self, step: &ChordStep) -> Result<(), BackendError> {
        self.manager
            .unregister(step.hotkey())
            .map_err(|e| BackendError(e.to_string()))
    }

    fn replay(&mut self, step: &ChordStep) -> Result<(), BackendError> {
        let key = typed_key(step.key())
            .ok_or_else(|| BackendError(format!("cannot type key '{}'", step.key())))?;
        let modifiers = modifier_keys(step.modifiers);

        for modifier in &modifiers {
            self.press(*modifier, Direction::Press)?;
        }
        let clicked = self.press(key, Direction::Click);
        // Release modifiers even if the click failed
        for modifier in modifiers.iter().rev() {
            self.press(*modifier, Direction::Release)?;
        }
        clicked
    }
}

/// Modifier keys to hold while typing a step, in press order
fn modifier_keys(modifiers: ModifierSet) -> Vec<Key> {
    [
        (modifiers.ctrl, Key::Control),
        (modifiers.alt, Key::Alt),
        (modifiers.shift, Key::Shift),
        (modifiers.super_key, Key::Meta),
    ]
    .into_iter()
    .filter_map(|(held, key)| held.then_some(key))
    .collect()
}

/// Key to type for a canonical chord key name
fn typed_key(name: &str) -> Option<Key> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(Key::Unicode(c));
    }

    let key = match name {
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        "space" => Key::Space,
        "enter" => Key::Return,
        "tab" => Key::Tab,
        "esc" => Key::Escape,
        "backspace" => Key::Backspace,
        "delete" => Key::Delete,
        "home" => Key::Home,
        "end" => Key::End,
        "page up" => Key::PageUp,
        "page down" => Key::PageDown,
        "up" => Key::UpArrow,
        "down" => Key::DownArrow,
        "left" => Key::LeftArrow,
        "right" => Key::RightArrow,
        "comma" => Key::Unicode(','),
        "period" => Key::Unicode('.'),
        "slash" => Key::Unicode('/'),
        "backslash" => Key::Unicode('\\'),
        "semicolon" => Key::Unicode(';'),
        "quote" => Key::Unicode('\''),
        "minus" => Key::Unicode('-'),
        "equal" => Key::Unicode('='),
        "backquote" => Key::Unicode('`'),
        "left bracket" => Key::Unicode('['),
        "right bracket" => Key::Unicode(']'),
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::Chord;

    #[test]
    fn test_typed_key_letters_and_names() {
        assert_eq!(typed_key("c"), Some(Key::Unicode('c')));
        assert_eq!(typed_key("7"), Some(Key::Unicode('7')));
        assert_eq!(typed_key("page up"), Some(Key::PageUp));
        assert_eq!(typed_key("comma"), Some(Key::Unicode(',')));
        assert_eq!(typed_key("insert"), None);
    }

    #[test]
    fn test_modifier_keys_in_canonical_order() {
        let chord = Chord::parse("super+shift+alt+ctrl+x").unwrap();
        assert_eq!(
            modifier_keys(chord.first().modifiers),
            vec![Key::Control, Key::Alt, Key::Shift, Key::Meta]
        );
    }
}

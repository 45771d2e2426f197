//! Chord parsing and canonical formatting
//!
//! A chord is one or more key steps pressed in sequence, written as
//! `"ctrl+g, g"`: steps are separated by `,`, and each step is a
//! `+`-joined list of modifiers ending in exactly one key.

use std::fmt;

use global_hotkey::hotkey::{Code, HotKey, Modifiers};

use super::facility::HotkeyError;

/// Delimiter between the steps of a multi-step chord
const STEP_DELIMITER: char = ',';

/// Delimiter between the modifiers and key of a single step
const KEY_DELIMITER: char = '+';

/// Keys accepted in a chord step, by canonical name
const KEYS: &[(&str, Code)] = &[
    ("a", Code::KeyA),
    ("b", Code::KeyB),
    ("c", Code::KeyC),
    ("d", Code::KeyD),
    ("e", Code::KeyE),
    ("f", Code::KeyF),
    ("g", Code::KeyG),
    ("h", Code::KeyH),
    ("i", Code::KeyI),
    ("j", Code::KeyJ),
    ("k", Code::KeyK),
    ("l", Code::KeyL),
    ("m", Code::KeyM),
    ("n", Code::KeyN),
    ("o", Code::KeyO),
    ("p", Code::KeyP),
    ("q", Code::KeyQ),
    ("r", Code::KeyR),
    ("s", Code::KeyS),
    ("t", Code::KeyT),
    ("u", Code::KeyU),
    ("v", Code::KeyV),
    ("w", Code::KeyW),
    ("x", Code::KeyX),
    ("y", Code::KeyY),
    ("z", Code::KeyZ),
    ("0", Code::Digit0),
    ("1", Code::Digit1),
    ("2", Code::Digit2),
    ("3", Code::Digit3),
    ("4", Code::Digit4),
    ("5", Code::Digit5),
    ("6", Code::Digit6),
    ("7", Code::Digit7),
    ("8", Code::Digit8),
    ("9", Code::Digit9),
    ("f1", Code::F1),
    ("f2", Code::F2),
    ("f3", Code::F3),
    ("f4", Code::F4),
    ("f5", Code::F5),
    ("f6", Code::F6),
    ("f7", Code::F7),
    ("f8", Code::F8),
    ("f9", Code::F9),
    ("f10", Code::F10),
    ("f11", Code::F11),
    ("f12", Code::F12),
    ("space", Code::Space),
    ("enter", Code::Enter),
    ("tab", Code::Tab),
    ("esc", Code::Escape),
    ("backspace", Code::Backspace),
    ("delete", Code::Delete),
    ("insert", Code::Insert),
    ("home", Code::Home),
    ("end", Code::End),
    ("page up", Code::PageUp),
    ("page down", Code::PageDown),
    ("up", Code::ArrowUp),
    ("down", Code::ArrowDown),
    ("left", Code::ArrowLeft),
    ("right", Code::ArrowRight),
    ("comma", Code::Comma),
    ("period", Code::Period),
    ("slash", Code::Slash),
    ("backslash", Code::Backslash),
    ("semicolon", Code::Semicolon),
    ("quote", Code::Quote),
    ("minus", Code::Minus),
    ("equal", Code::Equal),
    ("backquote", Code::Backquote),
    ("left bracket", Code::BracketLeft),
    ("right bracket", Code::BracketRight),
];

/// Alternate spellings mapped to their canonical key name
const KEY_ALIASES: &[(&str, &str)] = &[
    ("escape", "esc"),
    ("return", "enter"),
    ("del", "delete"),
    ("ins", "insert"),
    ("pageup", "page up"),
    ("pgup", "page up"),
    ("pagedown", "page down"),
    ("pgdn", "page down"),
    ("arrowup", "up"),
    ("arrowdown", "down"),
    ("arrowleft", "left"),
    ("arrowright", "right"),
    ("dot", "period"),
    ("grave", "backquote"),
    ("`", "backquote"),
    (".", "period"),
    ("/", "slash"),
    ("\\", "backslash"),
    (";", "semicolon"),
    ("'", "quote"),
    ("-", "minus"),
    ("=", "equal"),
    ("[", "left bracket"),
    ("]", "right bracket"),
];

/// Modifier keys held during a chord step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierSet {
    /// Control key is held
    pub ctrl: bool,
    /// Alt/Option key is held
    pub alt: bool,
    /// Shift key is held
    pub shift: bool,
    /// Super/Command/Windows key is held
    pub super_key: bool,
}

impl ModifierSet {
    /// Add the modifier named by `token`, returning false if it is not a modifier
    fn insert(&mut self, token: &str) -> bool {
        match token {
            "ctrl" | "control" => self.ctrl = true,
            "alt" | "option" | "opt" => self.alt = true,
            "shift" => self.shift = true,
            "super" | "cmd" | "command" | "win" | "windows" | "meta" => self.super_key = true,
            _ => return false,
        }
        true
    }

    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.super_key
    }

    /// Convert to the hook library's modifier flags
    fn to_modifiers(self) -> Modifiers {
        let mut mods = Modifiers::empty();
        if self.ctrl {
            mods |= Modifiers::CONTROL;
        }
        if self.alt {
            mods |= Modifiers::ALT;
        }
        if self.shift {
            mods |= Modifiers::SHIFT;
        }
        if self.super_key {
            mods |= Modifiers::SUPER;
        }
        mods
    }

    /// Canonical names, in fixed order
    fn names(&self) -> impl Iterator<Item = &'static str> {
        [
            (self.ctrl, "ctrl"),
            (self.alt, "alt"),
            (self.shift, "shift"),
            (self.super_key, "super"),
        ]
        .into_iter()
        .filter_map(|(held, name)| held.then_some(name))
    }
}

/// A single step of a chord: modifiers plus one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChordStep {
    /// Modifiers held for this step
    pub modifiers: ModifierSet,
    /// Canonical key name
    key: &'static str,
    /// Physical key code
    code: Code,
}

impl ChordStep {
    /// Parse one step such as `"ctrl+shift+g"`
    fn parse(input: &str, step: &str) -> Result<Self, HotkeyError> {
        let tokens: Vec<String> = step
            .split(KEY_DELIMITER)
            .map(|t| t.trim().to_lowercase())
            .collect();

        let mut modifiers = ModifierSet::default();
        let mut key: Option<(&'static str, Code)> = None;

        for token in &tokens {
            if token.is_empty() {
                return Err(invalid(input, format!("empty key name in '{}'", step.trim())));
            }
            if modifiers.insert(token) {
                continue;
            }
            let found = lookup_key(token)
                .ok_or_else(|| invalid(input, format!("unknown key '{}'", token)))?;
            if key.replace(found).is_some() {
                return Err(invalid(
                    input,
                    format!("step '{}' names more than one key", step.trim()),
                ));
            }
        }

        let (key, code) =
            key.ok_or_else(|| invalid(input, format!("step '{}' has no key", step.trim())))?;

        Ok(Self {
            modifiers,
            key,
            code,
        })
    }

    /// Canonical key name of this step
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Build the hotkey the OS hook registers for this step
    pub fn hotkey(&self) -> HotKey {
        let mods = self.modifiers.to_modifiers();
        HotKey::new((!mods.is_empty()).then_some(mods), self.code)
    }
}

impl fmt::Display for ChordStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.modifiers.names() {
            write!(f, "{}{}", name, KEY_DELIMITER)?;
        }
        write!(f, "{}", self.key)
    }
}

/// A shortcut: one or more steps pressed in order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    steps: Vec<ChordStep>,
}

impl Chord {
    /// Parse a chord such as `"ctrl+g, g"`
    ///
    /// Names are case-insensitive and aliases are accepted; the result
    /// always formats to its canonical form.
    pub fn parse(input: &str) -> Result<Self, HotkeyError> {
        if input.trim().is_empty() {
            return Err(invalid(input, "hotkey is empty".to_string()));
        }

        let steps = input
            .split(STEP_DELIMITER)
            .map(|step| {
                if step.trim().is_empty() {
                    Err(invalid(input, "empty step between ','".to_string()))
                } else {
                    ChordStep::parse(input, step)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { steps })
    }

    /// Steps in press order
    pub fn steps(&self) -> &[ChordStep] {
        &self.steps
    }

    /// The step that starts the sequence
    pub fn first(&self) -> &ChordStep {
        // parse guarantees at least one step
        &self.steps[0]
    }

    /// Check whether `prefix` is a proper prefix of this chord
    pub fn starts_with(&self, prefix: &[ChordStep]) -> bool {
        prefix.len() < self.steps.len() && self.steps[..prefix.len()] == *prefix
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, "{} ", STEP_DELIMITER)?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

fn lookup_key(token: &str) -> Option<(&'static str, Code)> {
    let canonical = KEY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map_or(token, |(_, name)| *name);
    KEYS.iter()
        .find(|(name, _)| *name == canonical)
        .map(|(name, code)| (*name, *code))
}

fn invalid(input: &str, reason: String) -> HotkeyError {
    HotkeyError::InvalidChord {
        input: input.to_string(),
        reason,
    }
}

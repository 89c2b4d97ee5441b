use crate::types::KeyCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single physical key inside a hot key. Identity is the key code; the label
/// is resolved once when the key is captured and only used for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Key {
    pub code: KeyCode,
    pub label: String,
    #[serde(skip)]
    pub pressed: bool,
}

impl Key {
    pub fn new(code: KeyCode, label: impl Into<String>, pressed: bool) -> Self {
        Self {
            code,
            label: label.into(),
            pressed,
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Key {}

/// An unordered chord of up to three keys bound to a slot.
///
/// `pressed` and `held_down` track the chord across key events: `pressed` goes
/// up on the event that completes the chord, `held_down` on the next press
/// event while the chord stays complete. The gap between the two is the rising
/// edge the dispatcher fires on. `changing` marks the one hot key app-wide that
/// is currently being recaptured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HotKey {
    keys: Vec<Key>,
    #[serde(skip)]
    pressed: bool,
    #[serde(skip)]
    held_down: bool,
    #[serde(skip)]
    changing: bool,
}

impl HotKey {
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains_code(&self, code: KeyCode) -> bool {
        self.keys.iter().any(|key| key.code == code)
    }

    /// Every key of `other` also appears in this hot key, by code.
    pub fn contains_all(&self, other: &HotKey) -> bool {
        other.keys.iter().all(|key| self.contains_code(key.code))
    }

    /// Both hot keys bind exactly the same set of codes.
    pub fn same_keys(&self, other: &HotKey) -> bool {
        self.keys.len() == other.keys.len() && self.contains_all(other)
    }

    /// False for an empty hot key: no keys means nothing to press.
    pub fn all_pressed(&self) -> bool {
        !self.keys.is_empty() && self.keys.iter().all(|key| key.pressed)
    }

    pub fn any_pressed(&self) -> bool {
        self.keys.iter().any(|key| key.pressed)
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_held_down(&self) -> bool {
        self.held_down
    }

    pub fn is_changing(&self) -> bool {
        self.changing
    }

    pub fn set_changing(&mut self, changing: bool) {
        self.changing = changing;
    }

    /// Appends a captured key. Callers enforce the size cap and uniqueness; the
    /// debug assertions only guard against misuse.
    pub fn push_key(&mut self, key: Key) {
        debug_assert!(self.keys.len() < crate::types::MAX_KEY_COUNT);
        debug_assert!(!self.contains_code(key.code));
        self.keys.push(key);
    }

    /// Replaces the whole key set, dropping any transient press state.
    pub fn set_keys(&mut self, keys: Vec<Key>) {
        self.keys = keys;
        self.pressed = false;
        self.held_down = false;
    }

    pub fn clear_keys(&mut self) {
        self.keys.clear();
        self.pressed = false;
        self.held_down = false;
    }

    /// Records a press or release of the matching key, if this hot key has one.
    pub fn apply_key_state(&mut self, code: KeyCode, pressed: bool) {
        for key in &mut self.keys {
            if key.code == code {
                key.pressed = pressed;
            }
        }
    }

    /// Re-derives the chord-level flags after a key event. Returns whether the
    /// chord is currently complete.
    pub fn update_state(&mut self) -> bool {
        let all_pressed = self.all_pressed();

        if all_pressed && self.pressed {
            self.held_down = true;
        } else if all_pressed && !self.pressed {
            self.pressed = true;
        } else {
            self.pressed = false;
            self.held_down = false;
        }

        all_pressed
    }
}

impl fmt::Display for HotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            return f.write_str("Not Set");
        }

        for (index, key) in self.keys.iter().enumerate() {
            if index > 0 {
                f.write_str(" + ")?;
            }
            f.write_str(&key.label)?;
        }

        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform-assigned virtual-key code as delivered by the global hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Press(KeyCode),
    Release(KeyCode),
}

impl KeyEvent {
    pub fn code(&self) -> KeyCode {
        match self {
            KeyEvent::Press(code) | KeyEvent::Release(code) => *code,
        }
    }

    pub fn is_press(&self) -> bool {
        matches!(self, KeyEvent::Press(_))
    }
}

/// Status text shown on a slot's capture control. The strings are a UI contract,
/// not debug output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    ChangeHotKey,
    PressHotKey,
    ReleaseToSet,
    NoSubsets,
    HotKeySet,
    HotKeyNotSet,
}

impl SlotStatus {
    pub fn text(&self) -> &'static str {
        match self {
            SlotStatus::ChangeHotKey => "Change Hot Key",
            SlotStatus::PressHotKey => "Press Hot Key",
            SlotStatus::ReleaseToSet => "Release To Set",
            SlotStatus::NoSubsets => "No Subsets",
            SlotStatus::HotKeySet => "Hot Key Set",
            SlotStatus::HotKeyNotSet => "Hot Key Not Set",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A hot key never holds more than this many keys.
pub const MAX_KEY_COUNT: usize = 3;

/// The global hook reports this code for some extended keys; it must never end
/// up inside a hot key.
pub const RESERVED_KEY_CODE: KeyCode = KeyCode(255);

pub const IDLE_INPUT_TIMEOUT_MS: u64 = 2500;
pub const RELEASE_MESSAGE_TIMEOUT_MS: u64 = 1500;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text_contract() {
        assert_eq!(SlotStatus::ChangeHotKey.text(), "Change Hot Key");
        assert_eq!(SlotStatus::PressHotKey.text(), "Press Hot Key");
        assert_eq!(SlotStatus::ReleaseToSet.text(), "Release To Set");
        assert_eq!(SlotStatus::NoSubsets.text(), "No Subsets");
        assert_eq!(SlotStatus::HotKeySet.text(), "Hot Key Set");
        assert_eq!(SlotStatus::HotKeyNotSet.text(), "Hot Key Not Set");
    }

    #[test]
    fn test_key_event_accessors() {
        assert_eq!(KeyEvent::Press(KeyCode(65)).code(), KeyCode(65));
        assert!(KeyEvent::Press(KeyCode(65)).is_press());
        assert!(!KeyEvent::Release(KeyCode(65)).is_press());
    }
}

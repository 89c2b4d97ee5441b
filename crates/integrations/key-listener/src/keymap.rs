//! Translation between the hook's key identities and the raw virtual-key
//! codes the engine works with, plus the default label resolver.

use hotkey_engine::{KeyCode, KeyLabelResolver};
use rdev::Key;

/// Maps a hook key to its Windows-style virtual-key code. Keys with no stable
/// code are dropped before they reach the engine.
pub fn key_code(key: Key) -> Option<KeyCode> {
    let code = match key {
        Key::Backspace => 8,
        Key::Tab => 9,
        Key::Return | Key::KpReturn => 13,
        Key::Pause => 19,
        Key::CapsLock => 20,
        Key::Escape => 27,
        Key::Space => 32,
        Key::PageUp => 33,
        Key::PageDown => 34,
        Key::End => 35,
        Key::Home => 36,
        Key::LeftArrow => 37,
        Key::UpArrow => 38,
        Key::RightArrow => 39,
        Key::DownArrow => 40,
        Key::PrintScreen => 44,
        Key::Insert => 45,
        Key::Delete => 46,
        Key::Num0 => 48,
        Key::Num1 => 49,
        Key::Num2 => 50,
        Key::Num3 => 51,
        Key::Num4 => 52,
        Key::Num5 => 53,
        Key::Num6 => 54,
        Key::Num7 => 55,
        Key::Num8 => 56,
        Key::Num9 => 57,
        Key::KeyA => 65,
        Key::KeyB => 66,
        Key::KeyC => 67,
        Key::KeyD => 68,
        Key::KeyE => 69,
        Key::KeyF => 70,
        Key::KeyG => 71,
        Key::KeyH => 72,
        Key::KeyI => 73,
        Key::KeyJ => 74,
        Key::KeyK => 75,
        Key::KeyL => 76,
        Key::KeyM => 77,
        Key::KeyN => 78,
        Key::KeyO => 79,
        Key::KeyP => 80,
        Key::KeyQ => 81,
        Key::KeyR => 82,
        Key::KeyS => 83,
        Key::KeyT => 84,
        Key::KeyU => 85,
        Key::KeyV => 86,
        Key::KeyW => 87,
        Key::KeyX => 88,
        Key::KeyY => 89,
        Key::KeyZ => 90,
        Key::MetaLeft => 91,
        Key::MetaRight => 92,
        Key::Kp0 => 96,
        Key::Kp1 => 97,
        Key::Kp2 => 98,
        Key::Kp3 => 99,
        Key::Kp4 => 100,
        Key::Kp5 => 101,
        Key::Kp6 => 102,
        Key::Kp7 => 103,
        Key::Kp8 => 104,
        Key::Kp9 => 105,
        Key::KpMultiply => 106,
        Key::KpPlus => 107,
        Key::KpMinus => 109,
        Key::KpDelete => 110,
        Key::KpDivide => 111,
        Key::F1 => 112,
        Key::F2 => 113,
        Key::F3 => 114,
        Key::F4 => 115,
        Key::F5 => 116,
        Key::F6 => 117,
        Key::F7 => 118,
        Key::F8 => 119,
        Key::F9 => 120,
        Key::F10 => 121,
        Key::F11 => 122,
        Key::F12 => 123,
        Key::NumLock => 144,
        Key::ScrollLock => 145,
        Key::ShiftLeft => 160,
        Key::ShiftRight => 161,
        Key::ControlLeft => 162,
        Key::ControlRight => 163,
        Key::Alt => 164,
        Key::AltGr => 165,
        Key::SemiColon => 186,
        Key::Equal => 187,
        Key::Comma => 188,
        Key::Minus => 189,
        Key::Dot => 190,
        Key::Slash => 191,
        Key::BackQuote => 192,
        Key::LeftBracket => 219,
        Key::BackSlash => 220,
        Key::RightBracket => 221,
        Key::Quote => 222,
        Key::IntlBackslash => 226,
        Key::Unknown(code) => code,
        Key::Function => return None,
    };

    Some(KeyCode(code))
}

fn label_text(code: u32) -> String {
    let fixed = match code {
        8 => "Backspace",
        9 => "Tab",
        13 => "Enter",
        19 => "Pause",
        20 => "Caps Lock",
        27 => "Escape",
        32 => "Space",
        33 => "Page Up",
        34 => "Page Down",
        35 => "End",
        36 => "Home",
        37 => "Left",
        38 => "Up",
        39 => "Right",
        40 => "Down",
        44 => "Print Screen",
        45 => "Insert",
        46 => "Delete",
        48..=57 => return char::from(code as u8).to_string(),
        65..=90 => return char::from(code as u8).to_string(),
        91 => "Windows",
        92 => "Right Windows",
        93 => "Menu",
        96..=105 => return format!("Num {}", code - 96),
        106 => "Num *",
        107 => "Num +",
        109 => "Num -",
        110 => "Num .",
        111 => "Num /",
        112..=123 => return format!("F{}", code - 111),
        144 => "Num Lock",
        145 => "Scroll Lock",
        160 => "Shift",
        161 => "Right Shift",
        162 => "Ctrl",
        163 => "Right Ctrl",
        164 => "Alt",
        165 => "Right Alt",
        186 => "Semicolon",
        187 => "Equal",
        188 => "Comma",
        189 => "Minus",
        190 => "Period",
        191 => "Forward Slash",
        192 => "Back Quote",
        219 => "Open Bracket",
        220 => "Back Slash",
        221 => "Close Bracket",
        222 => "Apostrophe",
        other => return format!("Key {other}"),
    };

    fixed.to_string()
}

/// Default label resolver over the virtual-key table.
pub struct VirtualKeyLabels;

impl KeyLabelResolver for VirtualKeyLabels {
    fn label_for(&self, code: KeyCode) -> String {
        label_text(code.0)
    }
}

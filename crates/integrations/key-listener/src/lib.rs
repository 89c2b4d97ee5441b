mod key_listener;
mod keymap;

pub use key_listener::{EngineCommand, HotKeyListener, ListenerControl, ListenerHandle};
pub use keymap::{key_code, VirtualKeyLabels};

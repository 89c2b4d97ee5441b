mod dispatch;
mod error;
mod hotkey;
mod scheduler;
mod session;
mod slot;
mod types;

pub mod conflict;
pub mod engine;
pub mod traits;

pub use engine::HotKeyEngine;
pub use error::EngineError;
pub use hotkey::{HotKey, Key};
pub use scheduler::ScheduledTask;
pub use slot::{
    DisplayId, DisplayInfo, DisplayMode, DisplaySettings, Orientation, ScalingMode, Slot,
    SlotArena, SlotId,
};
pub use traits::{
    DisplayApplier, DisplayTopology, EngineHooks, HotKeyStore, InteractionLock, KeyLabelResolver,
    StatusListener,
};
pub use types::{
    KeyCode, KeyEvent, SlotStatus, IDLE_INPUT_TIMEOUT_MS, MAX_KEY_COUNT,
    RELEASE_MESSAGE_TIMEOUT_MS, RESERVED_KEY_CODE,
};

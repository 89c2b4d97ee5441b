use crate::hotkey::HotKey;
use crate::slot::{DisplayId, DisplaySettings, SlotId};
use crate::types::{KeyCode, SlotStatus};
use std::sync::Arc;

/// Applies a saved display configuration. Fire-and-forget: failures stay with
/// the collaborator, the engine never observes them.
pub trait DisplayApplier: Send + Sync {
    fn apply_display_settings(&self, display: &DisplayId, settings: &DisplaySettings);
}

/// Answers whether a display is still part of the connected topology. Checked
/// right before a trigger fires; a hot key for a display that disappeared is
/// simply dropped.
pub trait DisplayTopology: Send + Sync {
    fn is_present(&self, display: &DisplayId) -> bool;
}

/// Persists a slot's hot key. Called exactly once per capture resolution
/// (commit and revert both write the value that is now live) and on every
/// clear.
pub trait HotKeyStore: Send + Sync {
    fn save_hot_key(&self, display: &DisplayId, slot_index: usize, hot_key: &HotKey);
}

/// Resolves a raw key code to the label shown in hot key strings. Only used
/// for display; containment and conflict checks go by code.
pub trait KeyLabelResolver: Send + Sync {
    fn label_for(&self, code: KeyCode) -> String;
}

/// App-wide interaction sweep around a capture session, so no other control
/// can race the hot key being redefined.
pub trait InteractionLock: Send + Sync {
    fn lock(&self);
    fn unlock(&self);
}

/// Receives status-text transitions and hot key label refreshes for a slot.
pub trait StatusListener: Send + Sync {
    fn status_changed(&self, slot: SlotId, status: SlotStatus);
    fn hot_key_changed(&self, slot: SlotId, hot_key: &HotKey);
}

/// The engine's external collaborators, shared with whatever thread hosts the
/// event loop.
#[derive(Clone)]
pub struct EngineHooks {
    pub applier: Arc<dyn DisplayApplier>,
    pub topology: Arc<dyn DisplayTopology>,
    pub store: Arc<dyn HotKeyStore>,
    pub labels: Arc<dyn KeyLabelResolver>,
    pub lock: Arc<dyn InteractionLock>,
    pub status: Arc<dyn StatusListener>,
}

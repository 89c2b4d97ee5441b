// Shared by every test binary; each one uses a different subset of helpers.
#![allow(dead_code)]

use hotkey_engine::{
    DisplayApplier, DisplayId, DisplaySettings, DisplayTopology, EngineError, EngineHooks, HotKey,
    HotKeyEngine, HotKeyStore, InteractionLock, Key, KeyCode, KeyEvent, KeyLabelResolver,
    SlotArena, SlotId, SlotStatus, StatusListener,
};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub fn slot(display: usize, index: usize) -> SlotId {
    SlotId { display, index }
}

pub fn test_label(code: u32) -> String {
    match code {
        65..=90 => char::from(code as u8).to_string(),
        other => format!("Key {other}"),
    }
}

/// Records every collaborator call the engine makes.
#[derive(Default)]
pub struct RecordingHooks {
    pub dispatches: Mutex<Vec<(DisplayId, DisplaySettings)>>,
    pub saves: Mutex<Vec<(DisplayId, usize, HotKey)>>,
    pub statuses: Mutex<Vec<(SlotId, SlotStatus)>>,
    pub hot_key_texts: Mutex<Vec<(SlotId, String)>>,
    pub lock_calls: Mutex<Vec<&'static str>>,
    missing_displays: Mutex<HashSet<String>>,
}

impl RecordingHooks {
    pub fn set_display_missing(&self, id: &str) {
        self.missing_displays.lock().insert(id.to_string());
    }

    pub fn dispatch_count(&self) -> usize {
        self.dispatches.lock().len()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().len()
    }

    pub fn last_status(&self, slot: SlotId) -> Option<SlotStatus> {
        self.statuses
            .lock()
            .iter()
            .rev()
            .find(|(id, _)| *id == slot)
            .map(|(_, status)| *status)
    }

    pub fn statuses_for(&self, slot: SlotId) -> Vec<SlotStatus> {
        self.statuses
            .lock()
            .iter()
            .filter(|(id, _)| *id == slot)
            .map(|(_, status)| *status)
            .collect()
    }

    /// Forgets everything recorded so far. Handy after scripted setup.
    pub fn reset(&self) {
        self.dispatches.lock().clear();
        self.saves.lock().clear();
        self.statuses.lock().clear();
        self.hot_key_texts.lock().clear();
        self.lock_calls.lock().clear();
    }
}

impl DisplayApplier for RecordingHooks {
    fn apply_display_settings(&self, display: &DisplayId, settings: &DisplaySettings) {
        self.dispatches
            .lock()
            .push((display.clone(), settings.clone()));
    }
}

impl DisplayTopology for RecordingHooks {
    fn is_present(&self, display: &DisplayId) -> bool {
        !self.missing_displays.lock().contains(&display.0)
    }
}

impl HotKeyStore for RecordingHooks {
    fn save_hot_key(&self, display: &DisplayId, slot_index: usize, hot_key: &HotKey) {
        self.saves
            .lock()
            .push((display.clone(), slot_index, hot_key.clone()));
    }
}

impl KeyLabelResolver for RecordingHooks {
    fn label_for(&self, code: KeyCode) -> String {
        test_label(code.0)
    }
}

impl InteractionLock for RecordingHooks {
    fn lock(&self) {
        self.lock_calls.lock().push("lock");
    }

    fn unlock(&self) {
        self.lock_calls.lock().push("unlock");
    }
}

impl StatusListener for RecordingHooks {
    fn status_changed(&self, slot: SlotId, status: SlotStatus) {
        self.statuses.lock().push((slot, status));
    }

    fn hot_key_changed(&self, slot: SlotId, hot_key: &HotKey) {
        self.hot_key_texts.lock().push((slot, hot_key.to_string()));
    }
}

/// Drives a `HotKeyEngine` with scripted events on a virtual clock, so timer
/// behavior is exercised without sleeping.
pub struct TestEngine {
    pub engine: HotKeyEngine,
    pub hooks: Arc<RecordingHooks>,
    now: Instant,
}

impl TestEngine {
    pub fn new(display_ids: &[&str], slots_per_display: usize) -> Self {
        let arena = SlotArena::new(
            display_ids.iter().map(|&id| DisplayId::from(id)).collect(),
            slots_per_display,
        );
        Self::with_arena(arena)
    }

    pub fn with_arena(arena: SlotArena) -> Self {
        test_utils::initialize_for_test(2500, 1500);

        let hooks = Arc::new(RecordingHooks::default());
        let engine_hooks = EngineHooks {
            applier: hooks.clone(),
            topology: hooks.clone(),
            store: hooks.clone(),
            labels: hooks.clone(),
            lock: hooks.clone(),
            status: hooks.clone(),
        };

        Self {
            engine: HotKeyEngine::new(arena, engine_hooks),
            hooks,
            now: Instant::now(),
        }
    }

    pub fn press(&mut self, code: u32) {
        self.engine
            .process_event_with_time(KeyEvent::Press(KeyCode(code)), self.now);
    }

    pub fn release(&mut self, code: u32) {
        self.engine
            .process_event_with_time(KeyEvent::Release(KeyCode(code)), self.now);
    }

    pub fn begin_capture(&mut self, display: usize, index: usize) {
        self.try_begin_capture(display, index)
            .expect("begin_capture failed");
    }

    pub fn try_begin_capture(&mut self, display: usize, index: usize) -> Result<(), EngineError> {
        self.engine
            .begin_capture_with_time(slot(display, index), self.now)
    }

    /// Moves the virtual clock forward and polls the session timers.
    pub fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
        self.engine.poll_timers_with_time(self.now);
    }

    /// Runs a full capture session committing `codes` on the slot, then lets
    /// the release-message window elapse.
    pub fn commit_hot_key(&mut self, display: usize, index: usize, codes: &[u32]) {
        self.begin_capture(display, index);
        for &code in codes {
            self.press(code);
        }
        for &code in codes {
            self.release(code);
        }
        self.advance(1500);
        assert_eq!(
            self.hot_key_codes(display, index),
            codes.to_vec(),
            "scripted commit did not stick"
        );
    }

    /// Binds a hot key directly on the arena, bypassing the capture flow.
    pub fn set_hot_key(&mut self, display: usize, index: usize, codes: &[u32]) {
        let slot = self
            .engine
            .arena_mut()
            .slot_mut(slot(display, index))
            .expect("slot outside arena");
        slot.hot_key.set_keys(
            codes
                .iter()
                .map(|&code| Key::new(KeyCode(code), test_label(code), false))
                .collect(),
        );
    }

    pub fn hot_key_codes(&self, display: usize, index: usize) -> Vec<u32> {
        self.engine
            .arena()
            .slot(slot(display, index))
            .map(|slot| slot.hot_key.keys().iter().map(|key| key.code.0).collect())
            .unwrap_or_default()
    }
}

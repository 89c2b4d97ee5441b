use hotkey_engine::{DisplayId, HotKey, HotKeyStore, SlotArena, SlotId, MAX_KEY_COUNT};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

/// On-disk shape: display ID -> slot number (1-based) -> hot key.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredHotKeys {
    displays: HashMap<String, BTreeMap<usize, HotKey>>,
}

/// File-backed hot key store. Persistence failures are logged and swallowed:
/// the engine treats saving as fire-and-forget.
pub struct JsonHotKeyStore {
    path: PathBuf,
    state: Mutex<StoredHotKeys>,
}

impl JsonHotKeyStore {
    pub fn open(path: PathBuf) -> Self {
        let state = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!(
                    "Could not parse {}: {}, starting with empty bindings",
                    path.display(),
                    e
                );
                StoredHotKeys::default()
            }),
            Err(_) => StoredHotKeys::default(),
        };

        Self {
            path,
            state: Mutex::new(state),
        }
    }

    /// Applies the persisted bindings onto a freshly built arena. Stored hot
    /// keys that violate the hot key shape are dropped with a warning.
    pub fn populate(&self, arena: &mut SlotArena) {
        let state = self.state.lock();

        for display in 0..arena.display_count() {
            let Some(display_id) = arena.display(display).map(|info| info.id.clone()) else {
                continue;
            };
            let Some(stored_slots) = state.displays.get(&display_id.0) else {
                continue;
            };

            for index in 0..arena.slots_per_display() {
                let Some(stored) = stored_slots.get(&(index + 1)) else {
                    continue;
                };
                if !valid_shape(stored) {
                    log::warn!(
                        "Stored hot key for {} slot {} is malformed, ignoring",
                        display_id,
                        index + 1
                    );
                    continue;
                }
                if let Some(slot) = arena.slot_mut(SlotId { display, index }) {
                    slot.hot_key.set_keys(stored.keys().to_vec());
                }
            }
        }
    }

    fn persist(&self, state: &StoredHotKeys) {
        match serde_json::to_string_pretty(state) {
            Ok(contents) => {
                if let Err(e) = fs::write(&self.path, contents) {
                    log::error!("Could not write {}: {}", self.path.display(), e);
                }
            }
            Err(e) => log::error!("Could not serialize hot keys: {}", e),
        }
    }
}

fn valid_shape(hot_key: &HotKey) -> bool {
    let keys = hot_key.keys();
    if keys.len() > MAX_KEY_COUNT {
        return false;
    }
    keys.iter()
        .enumerate()
        .all(|(i, key)| keys[..i].iter().all(|earlier| earlier.code != key.code))
}

impl HotKeyStore for JsonHotKeyStore {
    fn save_hot_key(&self, display: &DisplayId, slot_index: usize, hot_key: &HotKey) {
        let mut state = self.state.lock();
        state
            .displays
            .entry(display.0.clone())
            .or_default()
            .insert(slot_index + 1, hot_key.clone());
        self.persist(&state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotkey_engine::{Key, KeyCode};

    fn hot_key(codes: &[u32]) -> HotKey {
        let mut hot_key = HotKey::default();
        hot_key.set_keys(
            codes
                .iter()
                .map(|&code| Key::new(KeyCode(code), format!("K{code}"), false))
                .collect(),
        );
        hot_key
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bindings.json");

        let store = JsonHotKeyStore::open(path.clone());
        store.save_hot_key(&DisplayId::from("DISPLAY1"), 0, &hot_key(&[162, 65]));
        store.save_hot_key(&DisplayId::from("DISPLAY2"), 2, &hot_key(&[113]));

        let reopened = JsonHotKeyStore::open(path);
        let mut arena = SlotArena::new(vec!["DISPLAY1".into(), "DISPLAY2".into()], 4);
        reopened.populate(&mut arena);

        let first = arena.slot(SlotId { display: 0, index: 0 }).unwrap();
        let codes: Vec<u32> = first.hot_key.keys().iter().map(|k| k.code.0).collect();
        assert_eq!(codes, vec![162, 65]);

        let second = arena.slot(SlotId { display: 1, index: 2 }).unwrap();
        let codes: Vec<u32> = second.hot_key.keys().iter().map(|k| k.code.0).collect();
        assert_eq!(codes, vec![113]);

        assert!(arena.slot(SlotId { display: 0, index: 1 }).unwrap().hot_key.is_empty());
    }

    #[test]
    fn test_saving_empty_binding_clears_the_stored_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bindings.json");

        let store = JsonHotKeyStore::open(path.clone());
        store.save_hot_key(&DisplayId::from("DISPLAY1"), 0, &hot_key(&[65]));
        store.save_hot_key(&DisplayId::from("DISPLAY1"), 0, &HotKey::default());

        let reopened = JsonHotKeyStore::open(path);
        let mut arena = SlotArena::new(vec!["DISPLAY1".into()], 4);
        reopened.populate(&mut arena);

        assert!(arena.slot(SlotId { display: 0, index: 0 }).unwrap().hot_key.is_empty());
    }

    #[test]
    fn test_malformed_stored_hot_keys_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bindings.json");

        let store = JsonHotKeyStore::open(path.clone());
        store.save_hot_key(&DisplayId::from("DISPLAY1"), 0, &hot_key(&[65, 65]));
        store.save_hot_key(&DisplayId::from("DISPLAY1"), 1, &hot_key(&[65, 66, 67, 68]));

        let reopened = JsonHotKeyStore::open(path);
        let mut arena = SlotArena::new(vec!["DISPLAY1".into()], 4);
        reopened.populate(&mut arena);

        assert!(arena.slot(SlotId { display: 0, index: 0 }).unwrap().hot_key.is_empty());
        assert!(arena.slot(SlotId { display: 0, index: 1 }).unwrap().hot_key.is_empty());
    }

    #[test]
    fn test_unreadable_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bindings.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonHotKeyStore::open(path);
        let mut arena = SlotArena::new(vec!["DISPLAY1".into()], 4);
        store.populate(&mut arena);

        assert!(arena.slot(SlotId { display: 0, index: 0 }).unwrap().hot_key.is_empty());
    }
}

//! Per-event flag maintenance and the edge-triggered dispatch sweep.

use crate::slot::SlotArena;
use crate::traits::EngineHooks;
use crate::types::KeyCode;

/// First pass over every slot for a key event: record the per-key press state,
/// then re-derive each hot key's chord-level flags. Runs for all slots, active
/// or not, and regardless of engine phase, so release detection during capture
/// and edge detection afterwards both see consistent state.
pub(crate) fn update_key_flags(arena: &mut SlotArena, code: KeyCode, pressed: bool) {
    for (_, slot) in arena.iter_mut() {
        slot.hot_key.apply_key_state(code, pressed);
        slot.hot_key.update_state();
    }
}

/// Fires the display change for every active slot whose hot key just
/// transitioned into the fully-pressed state. `pressed` without `held_down`
/// only holds on the press event that completed the chord, so a chord fires at
/// most once per press-and-hold cycle. The caller runs this sweep only while
/// no capture session or release window is open.
pub(crate) fn sweep_rising_edges(arena: &SlotArena, hooks: &EngineHooks) {
    for (id, slot) in arena.iter() {
        if !arena.is_active(id) {
            continue;
        }
        if !slot.hot_key.is_pressed() || slot.hot_key.is_held_down() {
            continue;
        }

        let Some(info) = arena.display(id.display) else {
            continue;
        };

        if !hooks.topology.is_present(&info.id) {
            log::warn!(
                "display {} is no longer connected, dropping hot key {}",
                info.id,
                slot.hot_key
            );
            continue;
        }

        log::info!("hot key {} fired for {}", slot.hot_key, id);
        hooks
            .applier
            .apply_display_settings(&info.id, &slot.settings);
    }
}

//! Pure subset checks over the slot arena. Re-run after every key added during
//! capture so the UI can show live feedback, and again when the session
//! resolves.

use crate::slot::{SlotArena, SlotId};

/// Whether any hot key on the capture display conflicts with another hot key
/// anywhere. Every slot of the display is checked, so containment in either
/// direction between the candidate and a committed hot key is caught.
pub fn any_hot_key_subset(arena: &SlotArena, capture_display: usize) -> bool {
    (0..arena.slots_per_display()).any(|index| {
        let id = SlotId {
            display: capture_display,
            index,
        };
        subset_within_display(arena, id) || subset_across_displays(arena, id)
    })
}

/// Whether the slot's hot key is contained in another hot key on the same
/// display. Equal hot keys on one display are caught here too, since a hot key
/// trivially contains an identical one.
pub fn subset_within_display(arena: &SlotArena, id: SlotId) -> bool {
    let Some(slot) = arena.slot(id) else {
        return false;
    };
    if slot.hot_key.is_empty() {
        return false;
    }

    (0..arena.slots_per_display())
        .filter(|&index| index != id.index)
        .any(|index| {
            arena
                .slot(SlotId {
                    display: id.display,
                    index,
                })
                .map(|other| {
                    !other.hot_key.is_empty() && other.hot_key.contains_all(&slot.hot_key)
                })
                .unwrap_or(false)
        })
}

/// Whether the slot's hot key is a strict subset or superset of a hot key on a
/// different display. Identical hot keys are allowed across displays so one
/// chord can drive several monitors at once.
pub fn subset_across_displays(arena: &SlotArena, id: SlotId) -> bool {
    let Some(slot) = arena.slot(id) else {
        return false;
    };
    if slot.hot_key.is_empty() {
        return false;
    }

    arena
        .iter()
        .filter(|(other_id, _)| other_id.display != id.display)
        .any(|(_, other)| {
            !other.hot_key.is_empty()
                && !slot.hot_key.same_keys(&other.hot_key)
                && (other.hot_key.contains_all(&slot.hot_key)
                    || slot.hot_key.contains_all(&other.hot_key))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::{HotKey, Key};
    use crate::types::KeyCode;

    fn arena_with(bindings: &[(usize, usize, &[u32])]) -> SlotArena {
        let mut arena = SlotArena::new(vec!["DISPLAY1".into(), "DISPLAY2".into()], 4);
        for &(display, index, codes) in bindings {
            let slot = arena
                .slot_mut(SlotId { display, index })
                .expect("binding outside arena");
            let mut hot_key = HotKey::default();
            hot_key.set_keys(
                codes
                    .iter()
                    .map(|&code| Key::new(KeyCode(code), format!("K{code}"), false))
                    .collect(),
            );
            slot.hot_key = hot_key;
        }
        arena
    }

    #[test]
    fn test_empty_hot_keys_never_conflict() {
        let arena = arena_with(&[(0, 0, &[65, 66])]);
        assert!(!any_hot_key_subset(&arena, 0));
    }

    #[test]
    fn test_subset_within_display_both_directions() {
        let subset = arena_with(&[(0, 0, &[65, 66]), (0, 1, &[65])]);
        assert!(subset_within_display(&subset, SlotId { display: 0, index: 1 }));
        assert!(any_hot_key_subset(&subset, 0));

        let superset = arena_with(&[(0, 0, &[65, 66]), (0, 1, &[65, 66, 67])]);
        // The superset slot itself is contained in nothing, but the sweep over
        // every slot of the display catches the pair anyway.
        assert!(!subset_within_display(&superset, SlotId { display: 0, index: 1 }));
        assert!(subset_within_display(&superset, SlotId { display: 0, index: 0 }));
        assert!(any_hot_key_subset(&superset, 0));
    }

    #[test]
    fn test_equal_within_display_conflicts() {
        let arena = arena_with(&[(0, 0, &[65, 66]), (0, 1, &[66, 65])]);
        assert!(any_hot_key_subset(&arena, 0));
    }

    #[test]
    fn test_equal_across_displays_is_allowed() {
        let arena = arena_with(&[(0, 0, &[65, 66]), (1, 0, &[66, 65])]);
        assert!(!subset_across_displays(&arena, SlotId { display: 0, index: 0 }));
        assert!(!any_hot_key_subset(&arena, 0));
        assert!(!any_hot_key_subset(&arena, 1));
    }

    #[test]
    fn test_strict_containment_across_displays_conflicts() {
        let arena = arena_with(&[(0, 0, &[65, 66]), (1, 0, &[65])]);
        assert!(subset_across_displays(&arena, SlotId { display: 1, index: 0 }));
        assert!(subset_across_displays(&arena, SlotId { display: 0, index: 0 }));
        assert!(any_hot_key_subset(&arena, 1));
    }

    #[test]
    fn test_disjoint_hot_keys_do_not_conflict() {
        let arena = arena_with(&[(0, 0, &[65, 66]), (0, 1, &[67, 68]), (1, 0, &[69])]);
        assert!(!any_hot_key_subset(&arena, 0));
        assert!(!any_hot_key_subset(&arena, 1));
    }

    #[test]
    fn test_overlap_without_containment_is_fine() {
        let arena = arena_with(&[(0, 0, &[65, 66]), (0, 1, &[66, 67])]);
        assert!(!any_hot_key_subset(&arena, 0));
    }
}

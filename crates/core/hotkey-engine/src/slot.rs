use crate::hotkey::HotKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a connected display, as reported by the display
/// enumeration layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayId(pub String);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DisplayId {
    fn from(id: &str) -> Self {
        DisplayId(id.to_string())
    }
}

/// Composite identity of a slot: the display it belongs to (by topology index)
/// and its position on that display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    pub display: usize,
    pub index: usize,
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "display {} slot {}", self.display + 1, self.index + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u32,
    pub refresh_rate: u32,
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            bit_depth: 32,
            refresh_rate: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScalingMode {
    #[default]
    Preserved,
    Stretched,
    Centered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
    InvertedLandscape,
    InvertedPortrait,
}

/// The display configuration a slot applies when its hot key fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub mode: DisplayMode,
    pub scaling_mode: ScalingMode,
    pub dpi_scale_percent: u32,
    pub orientation: Orientation,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            mode: DisplayMode::default(),
            scaling_mode: ScalingMode::default(),
            dpi_scale_percent: 100,
            orientation: Orientation::default(),
        }
    }
}

/// A saved display configuration plus the hot key that applies it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slot {
    pub hot_key: HotKey,
    pub settings: DisplaySettings,
}

#[derive(Debug, Clone)]
pub struct DisplayInfo {
    pub id: DisplayId,
    /// Slots up to this index participate in capture and dispatch; the rest
    /// only track state until the user raises the active count.
    pub active_slots: usize,
}

/// Flat, display-major storage for every slot the application knows about.
/// A slot is addressed by its composite `SlotId`; at most one slot at a time
/// has its hot key marked `changing`.
#[derive(Debug, Clone)]
pub struct SlotArena {
    displays: Vec<DisplayInfo>,
    slots_per_display: usize,
    slots: Vec<Slot>,
}

impl SlotArena {
    pub fn new(display_ids: Vec<DisplayId>, slots_per_display: usize) -> Self {
        assert!(slots_per_display > 0, "an arena needs at least one slot per display");

        let slots = vec![Slot::default(); display_ids.len() * slots_per_display];
        let displays = display_ids
            .into_iter()
            .map(|id| DisplayInfo {
                id,
                active_slots: slots_per_display,
            })
            .collect();

        Self {
            displays,
            slots_per_display,
            slots,
        }
    }

    pub fn display_count(&self) -> usize {
        self.displays.len()
    }

    pub fn slots_per_display(&self) -> usize {
        self.slots_per_display
    }

    pub fn display(&self, display: usize) -> Option<&DisplayInfo> {
        self.displays.get(display)
    }

    pub fn set_active_slots(&mut self, display: usize, count: usize) {
        if let Some(info) = self.displays.get_mut(display) {
            info.active_slots = count.min(self.slots_per_display);
        }
    }

    fn offset(&self, id: SlotId) -> Option<usize> {
        (id.display < self.displays.len() && id.index < self.slots_per_display)
            .then(|| id.display * self.slots_per_display + id.index)
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.offset(id).map(|offset| &self.slots[offset])
    }

    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.offset(id).map(move |offset| &mut self.slots[offset])
    }

    pub fn is_active(&self, id: SlotId) -> bool {
        self.displays
            .get(id.display)
            .map(|info| id.index < info.active_slots)
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Slot)> {
        let per_display = self.slots_per_display;
        self.slots.iter().enumerate().map(move |(offset, slot)| {
            (
                SlotId {
                    display: offset / per_display,
                    index: offset % per_display,
                },
                slot,
            )
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut Slot)> {
        let per_display = self.slots_per_display;
        self.slots.iter_mut().enumerate().map(move |(offset, slot)| {
            (
                SlotId {
                    display: offset / per_display,
                    index: offset % per_display,
                },
                slot,
            )
        })
    }
}

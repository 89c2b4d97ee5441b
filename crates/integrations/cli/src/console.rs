use hotkey_engine::{DisplayId, HotKey, InteractionLock, SlotId, SlotStatus, StatusListener};

/// Status surface of the GUI-less build: slot transitions and the interaction
/// sweep land in the log instead of on buttons.
pub struct ConsoleStatus {
    displays: Vec<DisplayId>,
}

impl ConsoleStatus {
    pub fn new(displays: Vec<DisplayId>) -> Self {
        Self { displays }
    }

    fn display_name(&self, slot: SlotId) -> &str {
        self.displays
            .get(slot.display)
            .map(|id| id.0.as_str())
            .unwrap_or("?")
    }
}

impl StatusListener for ConsoleStatus {
    fn status_changed(&self, slot: SlotId, status: SlotStatus) {
        log::info!(
            "[{} slot {}] {}",
            self.display_name(slot),
            slot.index + 1,
            status
        );
    }

    fn hot_key_changed(&self, slot: SlotId, hot_key: &HotKey) {
        log::info!(
            "[{} slot {}] hot key: {}",
            self.display_name(slot),
            slot.index + 1,
            hot_key
        );
    }
}

impl InteractionLock for ConsoleStatus {
    fn lock(&self) {
        log::debug!("Controls locked while a hot key is captured");
    }

    fn unlock(&self) {
        log::debug!("Controls unlocked");
    }
}

use hotkey_engine::{DisplayApplier, DisplayId, DisplaySettings, DisplayTopology};

/// Topology backed by the configured display list. Real enumeration belongs to
/// the OS layer; this keeps the dispatcher's presence check honest in the
/// meantime.
pub struct ConfiguredTopology {
    displays: Vec<DisplayId>,
}

impl ConfiguredTopology {
    pub fn new(displays: Vec<DisplayId>) -> Self {
        Self { displays }
    }
}

impl DisplayTopology for ConfiguredTopology {
    fn is_present(&self, display: &DisplayId) -> bool {
        self.displays.contains(display)
    }
}

/// Stands in for the OS mode-set call: logs exactly what would be applied.
pub struct LoggingDisplayApplier;

impl DisplayApplier for LoggingDisplayApplier {
    fn apply_display_settings(&self, display_id: &DisplayId, settings: &DisplaySettings) {
        log::info!(
            "Applying {}x{} {}bit @{}Hz, {:?} scaling, {}% DPI, {:?} to {}",
            settings.mode.width,
            settings.mode.height,
            settings.mode.bit_depth,
            settings.mode.refresh_rate,
            settings.scaling_mode,
            settings.dpi_scale_percent,
            settings.orientation,
            display_id
        );
    }
}

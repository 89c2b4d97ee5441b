use clap::Parser;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

static CONFIG: OnceLock<Arc<Config>> = OnceLock::new();

#[cfg(test)]
use std::sync::Mutex;
#[cfg(test)]
thread_local! {
    static TEST_CONFIG: Mutex<Option<Arc<Config>>> = const { Mutex::new(None) };
}

#[derive(Parser, Debug, Clone)]
#[command(name = "display-hotkeys")]
#[command(about = "Hot-key driven display configuration switcher", long_about = None)]
#[command(version)]
pub struct Config {
    #[arg(short = 'd', long, env = "DHK_DEBUG", help = "Enable debug mode")]
    pub debug: bool,

    #[arg(
        long = "idle-timeout-ms",
        env = "DHK_IDLE_TIMEOUT_MS",
        help = "How long a capture session waits for the first key before reverting (default: 2500ms)"
    )]
    pub idle_timeout_ms: Option<u64>,

    #[arg(
        long = "release-message-timeout-ms",
        env = "DHK_RELEASE_MESSAGE_TIMEOUT_MS",
        help = "How long the terminal status stays visible after a capture resolves (default: 1500ms)"
    )]
    pub release_message_timeout_ms: Option<u64>,

    #[arg(
        long = "slots-per-display",
        env = "DHK_SLOTS_PER_DISPLAY",
        help = "Number of configuration slots per display (default: 4)"
    )]
    pub slots_per_display: Option<usize>,

    #[arg(
        long = "displays",
        env = "DHK_DISPLAYS",
        value_delimiter = ';',
        required = false,
        help = "Semicolon-separated list of display IDs making up the topology"
    )]
    pub displays: Vec<String>,

    #[arg(
        long = "settings-path",
        env = "DHK_SETTINGS_PATH",
        help = "Path of the file the hot key bindings are persisted to"
    )]
    pub settings_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        let _ = dotenv::dotenv();
        let _ = dotenv::from_filename(".env.local");

        let mut config = Config::parse();

        if config.idle_timeout_ms.is_none() {
            config.idle_timeout_ms = Some(2500);
        }

        if config.release_message_timeout_ms.is_none() {
            config.release_message_timeout_ms = Some(1500);
        }

        if config.slots_per_display.is_none() {
            config.slots_per_display = Some(4);
        }

        if config.displays.is_empty() {
            config.displays = vec!["DISPLAY1".to_string()];
        }

        if config.settings_path.is_none() {
            config.settings_path = Some(PathBuf::from("display-hotkeys.json"));
        }

        config.validate();
        config
    }

    pub fn new_for_test(idle_timeout_ms: u64, release_message_timeout_ms: u64) -> Self {
        Config {
            debug: false,
            idle_timeout_ms: Some(idle_timeout_ms),
            release_message_timeout_ms: Some(release_message_timeout_ms),
            slots_per_display: Some(4),
            displays: vec!["DISPLAY1".to_string(), "DISPLAY2".to_string()],
            settings_path: None,
        }
    }

    pub fn initialize() -> Arc<Config> {
        let config = Arc::new(Config::new());
        CONFIG.set(config.clone()).unwrap_or_else(|_| {
            log::error!("Config already initialized - this should not happen");
        });
        CONFIG.get().unwrap().clone()
    }

    pub fn global() -> Arc<Config> {
        #[cfg(test)]
        {
            TEST_CONFIG.with(|test_config| {
                if let Ok(config_lock) = test_config.lock() {
                    if let Some(config) = config_lock.as_ref() {
                        return config.clone();
                    }
                }

                match CONFIG.get() {
                    Some(config) => config.clone(),
                    None => Arc::new(Config::new_for_test(2500, 1500)),
                }
            })
        }

        #[cfg(not(test))]
        {
            CONFIG.get().cloned().unwrap_or_else(|| {
                log::error!("Config not initialized, using default");
                Arc::new(Config::new())
            })
        }
    }

    pub fn set_global_for_test(config: Arc<Config>) -> Result<(), Arc<Config>> {
        #[cfg(test)]
        {
            TEST_CONFIG.with(|test_config| {
                if let Ok(mut config_lock) = test_config.lock() {
                    *config_lock = Some(config);
                    Ok(())
                } else {
                    Err(config)
                }
            })
        }

        #[cfg(not(test))]
        {
            CONFIG.set(config)
        }
    }

    fn validate(&mut self) {
        if self.slots_per_display == Some(0) {
            log::warn!("slots-per-display of 0 is not usable, falling back to 4");
            self.slots_per_display = Some(4);
        }

        if self.idle_timeout_ms == Some(0) {
            log::warn!("idle-timeout-ms of 0 would end every capture instantly, falling back to 2500");
            self.idle_timeout_ms = Some(2500);
        }

        let mut seen = Vec::new();
        self.displays.retain(|id| {
            if seen.contains(id) {
                log::warn!("duplicate display ID '{}' in topology, ignoring", id);
                false
            } else {
                seen.push(id.clone());
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_for_test() {
        let config = Config::new_for_test(2500, 1500);
        assert_eq!(config.idle_timeout_ms, Some(2500));
        assert_eq!(config.release_message_timeout_ms, Some(1500));
        assert_eq!(config.slots_per_display, Some(4));
        assert_eq!(config.displays.len(), 2);
    }

    #[test]
    fn test_validate_rejects_zero_slots() {
        let mut config = Config::new_for_test(2500, 1500);
        config.slots_per_display = Some(0);
        config.validate();
        assert_eq!(config.slots_per_display, Some(4));
    }

    #[test]
    fn test_validate_drops_duplicate_displays() {
        let mut config = Config::new_for_test(2500, 1500);
        config.displays = vec!["DISPLAY1".into(), "DISPLAY1".into(), "DISPLAY2".into()];
        config.validate();
        assert_eq!(config.displays, vec!["DISPLAY1".to_string(), "DISPLAY2".to_string()]);
    }
}

use config::Config;
use std::sync::Arc;

pub fn initialize_for_test(idle_timeout_ms: u64, release_message_timeout_ms: u64) -> Arc<Config> {
    let config = Arc::new(Config::new_for_test(
        idle_timeout_ms,
        release_message_timeout_ms,
    ));

    let _ = Config::set_global_for_test(config.clone());

    config
}

use config::Config;
use display_hotkeys_cli::{panic_handler, DisplayHotKeysApp};

fn main() {
    let config = Config::initialize();

    panic_handler::setup_full_backtrace_for_dev();
    panic_handler::install_panic_handler();

    log::init(config.debug);

    log::info!("Configuration: {:?}", config);

    let app = DisplayHotKeysApp::new();
    if let Err(e) = app.run() {
        let error_chain = e
            .chain()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(": ");

        eprintln!("\n❌ Error: {}\n", error_chain);
        if config.debug {
            eprintln!("Debug backtrace:\n{:?}", e);
        }
        std::process::exit(1);
    }
}

use log::error;
use std::backtrace::Backtrace;
use std::panic::{self, PanicHookInfo as PanicInfo};
use std::sync::atomic::{AtomicBool, Ordering};

static PANIC_HANDLER_INSTALLED: AtomicBool = AtomicBool::new(false);

pub fn install_panic_handler() {
    if PANIC_HANDLER_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    panic::set_hook(Box::new(|panic_info| {
        handle_panic(panic_info);
    }));

    log::info!("Panic handler installed");
}

fn handle_panic(panic_info: &PanicInfo) {
    let backtrace = Backtrace::force_capture();
    let thread = std::thread::current();
    let thread_name = thread.name().unwrap_or("<unnamed>");

    let payload = panic_info.payload();
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic payload".to_string()
    };

    let location = panic_info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "Unknown location".to_string());

    error!("PANIC in thread '{}': {} at {}", thread_name, message, location);
    error!("Backtrace:\n{}", backtrace);

    std::process::exit(1);
}

pub fn setup_full_backtrace_for_dev() {
    let config = config::Config::global();
    if config.debug {
        std::env::set_var("RUST_BACKTRACE", "full");
    } else {
        std::env::set_var("RUST_BACKTRACE", "1");
    }
}

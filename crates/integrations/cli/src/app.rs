use crate::console::ConsoleStatus;
use crate::display::{ConfiguredTopology, LoggingDisplayApplier};
use crate::store::JsonHotKeyStore;
use anyhow::Result;
use config::Config;
use hotkey_engine::{DisplayId, EngineHooks, HotKeyEngine, SlotArena, SlotId};
use key_listener::{HotKeyListener, ListenerControl, ListenerHandle, VirtualKeyLabels};
use log::{error, info};
use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

enum MainEvent {
    Shutdown,
}

/// Line commands standing in for the GUI's per-slot buttons.
enum Command {
    Capture(SlotId),
    Clear(SlotId),
    ClearAll,
    Quit,
}

pub struct DisplayHotKeysApp;

impl Default for DisplayHotKeysApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayHotKeysApp {
    pub fn new() -> Self {
        Self
    }

    pub fn run(self) -> Result<()> {
        info!("Starting display-hotkeys ...");

        let config = Config::global();
        let displays: Vec<DisplayId> = config
            .displays
            .iter()
            .map(|id| DisplayId(id.clone()))
            .collect();
        let slots_per_display = config.slots_per_display.unwrap_or(4);

        let settings_path = config
            .settings_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("display-hotkeys.json"));
        let store = Arc::new(JsonHotKeyStore::open(settings_path));

        let mut arena = SlotArena::new(displays.clone(), slots_per_display);
        store.populate(&mut arena);

        let status = Arc::new(ConsoleStatus::new(displays.clone()));
        let hooks = EngineHooks {
            applier: Arc::new(LoggingDisplayApplier),
            topology: Arc::new(ConfiguredTopology::new(displays)),
            store,
            labels: Arc::new(VirtualKeyLabels),
            lock: status.clone(),
            status,
        };

        let engine = HotKeyEngine::new(arena, hooks);
        let listener = HotKeyListener::new(engine);
        let (listener_handle, control) = listener.spawn();

        let (event_tx, event_rx) = mpsc::channel();

        let signal_tx = event_tx.clone();
        thread::spawn(move || {
            if let Err(e) = Self::setup_signal_handlers(signal_tx) {
                error!("Failed to setup signal handlers: {}", e);
            }
        });

        Self::spawn_command_reader(event_tx, control.clone());

        info!("display-hotkeys is running");
        info!("Commands: capture <display> <slot> | clear <display> <slot> | clear-all | quit");

        self.run_main_event_loop(event_rx, control, listener_handle)?;

        info!("Shutdown complete");
        Ok(())
    }

    fn run_main_event_loop(
        &self,
        event_rx: mpsc::Receiver<MainEvent>,
        control: ListenerControl,
        listener_handle: ListenerHandle,
    ) -> Result<()> {
        loop {
            match event_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(MainEvent::Shutdown) => {
                    info!("Received shutdown request - the global hook cannot exit cleanly, forcing process exit");

                    if let Err(e) = control.stop() {
                        error!("Failed to send stop signal to engine loop: {}", e);
                    }

                    break;
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if listener_handle.is_finished() {
                        error!("Engine loop thread died unexpectedly");
                        break;
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Event channel disconnected unexpectedly");
                    if let Err(e) = control.stop() {
                        error!("Failed to stop engine loop after channel disconnect: {}", e);
                    }
                    break;
                }
            }
        }

        if let Err(e) = listener_handle.join_with_timeout(Duration::from_millis(500)) {
            error!("Engine loop did not shut down cleanly: {}", e);
        }

        Ok(())
    }

    fn spawn_command_reader(event_tx: mpsc::Sender<MainEvent>, control: ListenerControl) {
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };

                match parse_command(&line) {
                    Some(Command::Quit) => {
                        let _ = event_tx.send(MainEvent::Shutdown);
                        break;
                    }
                    Some(Command::Capture(slot)) => {
                        if let Err(e) = control.begin_capture(slot) {
                            error!("Capture request not delivered: {}", e);
                        }
                    }
                    Some(Command::Clear(slot)) => {
                        if let Err(e) = control.clear_hot_key(slot) {
                            error!("Clear request not delivered: {}", e);
                        }
                    }
                    Some(Command::ClearAll) => {
                        if let Err(e) = control.clear_all() {
                            error!("Clear-all request not delivered: {}", e);
                        }
                    }
                    None => {
                        if !line.trim().is_empty() {
                            info!("Unrecognized command: {}", line.trim());
                        }
                    }
                }
            }
        });
    }

    fn setup_signal_handlers(event_tx: mpsc::Sender<MainEvent>) -> Result<()> {
        let mut signals = Signals::new([SIGINT, SIGTERM, SIGQUIT, SIGHUP])?;

        if let Some(signal) = signals.forever().next() {
            info!("Received signal {}", signal);
            let _ = event_tx.send(MainEvent::Shutdown);
        }

        Ok(())
    }
}

/// Display and slot numbers on the command line are 1-based, matching how the
/// slots are presented.
fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();

    match parts.next()? {
        "quit" | "exit" => Some(Command::Quit),
        "clear-all" => Some(Command::ClearAll),
        verb @ ("capture" | "clear") => {
            let display = parts.next()?.parse::<usize>().ok()?.checked_sub(1)?;
            let index = parts.next()?.parse::<usize>().ok()?.checked_sub(1)?;
            let slot = SlotId { display, index };

            if verb == "capture" {
                Some(Command::Capture(slot))
            } else {
                Some(Command::Clear(slot))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_numbers_are_one_based() {
        match parse_command("capture 1 2") {
            Some(Command::Capture(slot)) => {
                assert_eq!(slot, SlotId { display: 0, index: 1 });
            }
            _ => panic!("expected a capture command"),
        }
    }

    #[test]
    fn test_parse_command_rejects_garbage() {
        assert!(parse_command("").is_none());
        assert!(parse_command("capture").is_none());
        assert!(parse_command("capture one two").is_none());
        assert!(parse_command("capture 0 1").is_none());
        assert!(parse_command("resize 1 1").is_none());
    }

    #[test]
    fn test_parse_command_verbs() {
        assert!(matches!(parse_command("quit"), Some(Command::Quit)));
        assert!(matches!(parse_command("exit"), Some(Command::Quit)));
        assert!(matches!(parse_command("clear-all"), Some(Command::ClearAll)));
        assert!(matches!(parse_command("clear 2 1"), Some(Command::Clear(_))));
    }
}

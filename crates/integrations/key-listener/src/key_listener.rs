use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use rdev::{listen, Event, EventType};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use hotkey_engine::{HotKeyEngine, KeyEvent, SlotId};

use crate::keymap;

/// How often the engine loop polls the session timers when no events arrive.
const TIMER_POLL_INTERVAL_MS: u64 = 10;

/// Everything the engine loop can be asked to do. Key events from the hook and
/// control requests from the UI funnel through the same channel, so the engine
/// only ever runs on its own thread.
#[derive(Debug, Clone, Copy)]
pub enum EngineCommand {
    Key(KeyEvent),
    BeginCapture(SlotId),
    ClearHotKey(SlotId),
    ClearAll,
    Shutdown,
}

/// Owns the engine until `spawn`, then hands it to the engine loop thread.
pub struct HotKeyListener {
    engine: HotKeyEngine,
}

pub struct ListenerHandle {
    handle: Option<JoinHandle<Result<(), String>>>,
}

impl ListenerHandle {
    pub fn join(mut self) -> Result<(), String> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .unwrap_or_else(|_| Err("Engine loop thread panicked".into()))
        } else {
            Ok(())
        }
    }

    pub fn join_with_timeout(mut self, timeout: Duration) -> Result<(), String> {
        if let Some(handle) = self.handle.take() {
            let start = std::time::Instant::now();
            while !handle.is_finished() {
                if start.elapsed() > timeout {
                    log::warn!("Engine loop did not stop within timeout, abandoning");
                    return Err("Engine loop timeout".into());
                }
                thread::sleep(Duration::from_millis(10));
            }
            handle
                .join()
                .unwrap_or_else(|_| Err("Engine loop thread panicked".into()))
        } else {
            Ok(())
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| h.is_finished())
            .unwrap_or(true)
    }
}

#[derive(Clone)]
pub struct ListenerControl {
    commands: Sender<EngineCommand>,
    should_stop: Arc<AtomicBool>,
}

impl HotKeyListener {
    pub fn new(engine: HotKeyEngine) -> Self {
        Self { engine }
    }

    /// Starts the hook thread and the engine loop thread. The hook thread only
    /// translates and forwards raw events; the engine loop thread is the sole
    /// owner of the engine.
    pub fn spawn(self) -> (ListenerHandle, ListenerControl) {
        let (commands, command_rx) = unbounded();
        let should_stop = Arc::new(AtomicBool::new(false));

        let loop_stop = should_stop.clone();
        let handle =
            thread::spawn(move || Self::run_engine_loop(self.engine, command_rx, loop_stop));

        let hook_tx = commands.clone();
        let hook_stop = should_stop.clone();
        thread::spawn(move || {
            let callback = move |event: Event| {
                if hook_stop.load(Ordering::SeqCst) {
                    return;
                }

                let key_event = match event.event_type {
                    EventType::KeyPress(key) => keymap::key_code(key).map(KeyEvent::Press),
                    EventType::KeyRelease(key) => keymap::key_code(key).map(KeyEvent::Release),
                    _ => None,
                };

                if let Some(key_event) = key_event {
                    let _ = hook_tx.send(EngineCommand::Key(key_event));
                }
            };

            if let Err(e) = listen(callback) {
                log::error!("Global key hook failed: {:?}", e);
            } else {
                log::info!("Global key hook stopped cleanly");
            }
        });

        let control = ListenerControl {
            commands,
            should_stop,
        };

        (
            ListenerHandle {
                handle: Some(handle),
            },
            control,
        )
    }

    fn run_engine_loop(
        mut engine: HotKeyEngine,
        command_rx: Receiver<EngineCommand>,
        should_stop: Arc<AtomicBool>,
    ) -> Result<(), String> {
        loop {
            match command_rx.recv_timeout(Duration::from_millis(TIMER_POLL_INTERVAL_MS)) {
                Ok(EngineCommand::Shutdown) => {
                    should_stop.store(true, Ordering::SeqCst);
                    break;
                }
                Ok(command) => Self::run_command(&mut engine, command),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err("Command channel disconnected".into());
                }
            }

            engine.poll_timers();

            if should_stop.load(Ordering::SeqCst) {
                break;
            }
        }

        log::info!("Engine loop stopped cleanly");
        Ok(())
    }

    fn run_command(engine: &mut HotKeyEngine, command: EngineCommand) {
        match command {
            EngineCommand::Key(event) => engine.process_event(event),
            EngineCommand::BeginCapture(slot) => {
                if let Err(error) = engine.begin_capture(slot) {
                    log::error!("Capture request rejected: {}", error);
                }
            }
            EngineCommand::ClearHotKey(slot) => {
                if let Err(error) = engine.clear_hot_key(slot) {
                    log::error!("Clear request rejected: {}", error);
                }
            }
            EngineCommand::ClearAll => engine.clear_all_hot_keys(),
            EngineCommand::Shutdown => {}
        }
    }
}

impl ListenerControl {
    pub fn begin_capture(&self, slot: SlotId) -> Result<(), String> {
        self.send(EngineCommand::BeginCapture(slot))
    }

    pub fn clear_hot_key(&self, slot: SlotId) -> Result<(), String> {
        self.send(EngineCommand::ClearHotKey(slot))
    }

    pub fn clear_all(&self) -> Result<(), String> {
        self.send(EngineCommand::ClearAll)
    }

    pub fn stop(&self) -> Result<(), String> {
        log::info!("Initiating listener shutdown");

        // The hook callback cannot unhook itself; it goes quiet instead and
        // the process exits with the main thread.
        self.should_stop.store(true, Ordering::SeqCst);
        self.send(EngineCommand::Shutdown)
    }

    pub fn is_stopping(&self) -> bool {
        self.should_stop.load(Ordering::SeqCst)
    }

    fn send(&self, command: EngineCommand) -> Result<(), String> {
        self.commands
            .send(command)
            .map_err(|_| "Engine loop already stopped".to_string())
    }
}

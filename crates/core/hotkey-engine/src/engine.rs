use crate::conflict;
use crate::dispatch;
use crate::error::EngineError;
use crate::hotkey::Key;
use crate::scheduler::ScheduledTask;
use crate::session::{CaptureSession, EnginePhase, ReleaseWindow};
use crate::slot::{SlotArena, SlotId};
use crate::traits::EngineHooks;
use crate::types::{
    KeyCode, KeyEvent, SlotStatus, IDLE_INPUT_TIMEOUT_MS, MAX_KEY_COUNT,
    RELEASE_MESSAGE_TIMEOUT_MS, RESERVED_KEY_CODE,
};
use config::Config;
use std::time::{Duration, Instant};

/// How a resolving capture session hands the UI back.
enum SessionExit {
    /// Show the terminal status for the release-message window first.
    ReleaseWindow,
    /// Idle timeout: restore the idle status and unlock right away.
    Immediate,
}

enum TimerFired {
    Idle,
    ReleaseMessage,
}

/// The hot key capture and dispatch engine.
///
/// Owns the slot arena and the single app-wide capture session, and reacts to
/// marshaled key events and timer polls. Not thread-safe on purpose: every
/// entry point must be called from one event loop, which is also what makes
/// the timer callbacks race-free.
pub struct HotKeyEngine {
    arena: SlotArena,
    phase: EnginePhase,
    hooks: EngineHooks,
    idle_timeout: Duration,
    release_message_timeout: Duration,
}

impl HotKeyEngine {
    /// Timeouts come from the global configuration.
    pub fn new(arena: SlotArena, hooks: EngineHooks) -> Self {
        let config = Config::global();

        Self::with_timeouts(
            arena,
            hooks,
            config.idle_timeout_ms.unwrap_or(IDLE_INPUT_TIMEOUT_MS),
            config
                .release_message_timeout_ms
                .unwrap_or(RELEASE_MESSAGE_TIMEOUT_MS),
        )
    }

    pub fn with_timeouts(
        arena: SlotArena,
        hooks: EngineHooks,
        idle_timeout_ms: u64,
        release_message_timeout_ms: u64,
    ) -> Self {
        Self {
            arena,
            phase: EnginePhase::Idle,
            hooks,
            idle_timeout: Duration::from_millis(idle_timeout_ms),
            release_message_timeout: Duration::from_millis(release_message_timeout_ms),
        }
    }

    pub fn arena(&self) -> &SlotArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut SlotArena {
        &mut self.arena
    }

    pub fn is_capturing(&self) -> bool {
        self.phase.is_capturing()
    }

    pub fn process_event(&mut self, event: KeyEvent) {
        self.process_event_with_time(event, Instant::now());
    }

    pub fn process_event_with_time(&mut self, event: KeyEvent, now: Instant) {
        match event {
            KeyEvent::Press(code) => self.on_key_press(code),
            KeyEvent::Release(code) => self.on_key_release(code, now),
        }
    }

    /// Starts a capture session for the slot. A no-op while any session or
    /// release window is open: only one hot key may change at a time.
    pub fn begin_capture(&mut self, slot: SlotId) -> Result<(), EngineError> {
        self.begin_capture_with_time(slot, Instant::now())
    }

    pub fn begin_capture_with_time(
        &mut self,
        slot_id: SlotId,
        now: Instant,
    ) -> Result<(), EngineError> {
        if !self.phase.is_idle() {
            log::debug!("capture request for {} ignored, another session is active", slot_id);
            return Ok(());
        }

        if self.arena.slot(slot_id).is_none() {
            return Err(EngineError::UnknownSlot(slot_id));
        }
        if !self.arena.is_active(slot_id) {
            return Err(EngineError::InactiveSlot(slot_id));
        }

        let Some(slot) = self.arena.slot_mut(slot_id) else {
            return Err(EngineError::UnknownSlot(slot_id));
        };

        let backup = slot.hot_key.clone();
        slot.hot_key.clear_keys();
        slot.hot_key.set_changing(true);

        self.hooks.status.status_changed(slot_id, SlotStatus::PressHotKey);
        self.hooks.lock.lock();

        log::debug!("capture session started for {}", slot_id);
        self.phase = EnginePhase::Capturing(CaptureSession {
            slot: slot_id,
            backup,
            candidate_conflicts: false,
            idle_timer: ScheduledTask::scheduled(now + self.idle_timeout),
        });

        Ok(())
    }

    /// Clears a slot's hot key and persists the empty binding. Ignored while a
    /// capture session or release window holds the interaction lock.
    pub fn clear_hot_key(&mut self, slot_id: SlotId) -> Result<(), EngineError> {
        if !self.phase.is_idle() {
            return Ok(());
        }

        let display_id = self
            .arena
            .display(slot_id.display)
            .map(|info| info.id.clone())
            .ok_or(EngineError::UnknownSlot(slot_id))?;
        let slot = self
            .arena
            .slot_mut(slot_id)
            .ok_or(EngineError::UnknownSlot(slot_id))?;

        if slot.hot_key.is_empty() {
            return Ok(());
        }

        slot.hot_key.clear_keys();
        self.hooks.status.hot_key_changed(slot_id, &slot.hot_key);
        self.hooks
            .store
            .save_hot_key(&display_id, slot_id.index, &slot.hot_key);

        Ok(())
    }

    /// Clears every bound hot key. Same locking rule as `clear_hot_key`.
    pub fn clear_all_hot_keys(&mut self) {
        if !self.phase.is_idle() {
            return;
        }

        for display in 0..self.arena.display_count() {
            for index in 0..self.arena.slots_per_display() {
                let slot_id = SlotId { display, index };
                if let Err(error) = self.clear_hot_key(slot_id) {
                    log::error!("failed to clear {}: {}", slot_id, error);
                }
            }
        }
    }

    /// Drives the session timers. Called from the same loop that delivers key
    /// events, so a timer can never race the session it belongs to.
    pub fn poll_timers(&mut self) {
        self.poll_timers_with_time(Instant::now());
    }

    pub fn poll_timers_with_time(&mut self, now: Instant) {
        let fired = match &mut self.phase {
            EnginePhase::Capturing(session) => session
                .idle_timer
                .fire_if_due(now)
                .then_some(TimerFired::Idle),
            EnginePhase::ReleasePending(window) => window
                .timer
                .fire_if_due(now)
                .then_some(TimerFired::ReleaseMessage),
            EnginePhase::Idle => None,
        };

        match fired {
            Some(TimerFired::Idle) => {
                log::debug!("capture session timed out with no input");
                self.resolve_session(now, SessionExit::Immediate);
            }
            Some(TimerFired::ReleaseMessage) => self.finish_release_window(),
            None => {}
        }
    }

    fn on_key_press(&mut self, code: KeyCode) {
        dispatch::update_key_flags(&mut self.arena, code, true);

        // The terminal status window swallows everything but flag updates.
        if matches!(self.phase, EnginePhase::ReleasePending(_)) {
            return;
        }

        if self.phase.is_capturing() {
            self.build_candidate(code);
        } else {
            dispatch::sweep_rising_edges(&self.arena, &self.hooks);
        }
    }

    fn on_key_release(&mut self, code: KeyCode, now: Instant) {
        dispatch::update_key_flags(&mut self.arena, code, false);

        let EnginePhase::Capturing(session) = &self.phase else {
            return;
        };
        let slot_id = session.slot;

        let released_everything = self
            .arena
            .slot(slot_id)
            .map(|slot| !slot.hot_key.any_pressed())
            .unwrap_or(false);

        if released_everything {
            self.resolve_session(now, SessionExit::ReleaseWindow);
        }
    }

    /// One press event while a capture session is open: maybe extend the
    /// candidate, then re-run the conflict detector for live feedback.
    fn build_candidate(&mut self, code: KeyCode) {
        let EnginePhase::Capturing(session) = &mut self.phase else {
            return;
        };
        // The first key of the session supersedes the idle timer; release
        // handling takes over from here.
        session.idle_timer.cancel();
        let slot_id = session.slot;

        let Some(slot) = self.arena.slot_mut(slot_id) else {
            return;
        };

        if slot.hot_key.len() < MAX_KEY_COUNT
            && code != RESERVED_KEY_CODE
            && !slot.hot_key.contains_code(code)
        {
            let label = self.hooks.labels.label_for(code);
            slot.hot_key.push_key(Key::new(code, label, true));
            self.hooks.status.hot_key_changed(slot_id, &slot.hot_key);
        }

        let conflicts = conflict::any_hot_key_subset(&self.arena, slot_id.display);
        if let EnginePhase::Capturing(session) = &mut self.phase {
            session.candidate_conflicts = conflicts;
        }

        let status = if conflicts {
            SlotStatus::NoSubsets
        } else {
            SlotStatus::ReleaseToSet
        };
        self.hooks.status.status_changed(slot_id, status);
    }

    /// Ends the open capture session: commit the candidate or revert to the
    /// backup, persist the now-live hot key, then either open the
    /// release-message window or hand the UI back immediately.
    fn resolve_session(&mut self, now: Instant, exit: SessionExit) {
        let session = match std::mem::replace(&mut self.phase, EnginePhase::Idle) {
            EnginePhase::Capturing(session) => session,
            other => {
                self.phase = other;
                return;
            }
        };

        let slot_id = session.slot;
        let Some(display_id) = self
            .arena
            .display(slot_id.display)
            .map(|info| info.id.clone())
        else {
            return;
        };
        let Some(slot) = self.arena.slot_mut(slot_id) else {
            return;
        };

        let committed = !slot.hot_key.is_empty() && !session.candidate_conflicts;
        if committed {
            slot.hot_key.set_changing(false);
            log::info!("hot key for {} set to {}", slot_id, slot.hot_key);
        } else {
            let mut restored = session.backup;
            restored.set_changing(false);
            slot.hot_key = restored;
            self.hooks.status.hot_key_changed(slot_id, &slot.hot_key);
            log::info!("hot key for {} reverted to {}", slot_id, slot.hot_key);
        }

        self.hooks
            .store
            .save_hot_key(&display_id, slot_id.index, &slot.hot_key);

        match exit {
            SessionExit::ReleaseWindow => {
                let status = if committed {
                    SlotStatus::HotKeySet
                } else {
                    SlotStatus::HotKeyNotSet
                };
                self.hooks.status.status_changed(slot_id, status);

                self.phase = EnginePhase::ReleasePending(ReleaseWindow {
                    slot: slot_id,
                    timer: ScheduledTask::scheduled(now + self.release_message_timeout),
                });
            }
            SessionExit::Immediate => {
                self.hooks
                    .status
                    .status_changed(slot_id, SlotStatus::ChangeHotKey);
                self.hooks.lock.unlock();
            }
        }
    }

    /// The release-message window elapsed: restore the idle status text and
    /// hand interaction back to the UI.
    fn finish_release_window(&mut self) {
        let slot_id = match std::mem::replace(&mut self.phase, EnginePhase::Idle) {
            EnginePhase::ReleasePending(window) => window.slot,
            other => {
                self.phase = other;
                return;
            }
        };

        self.hooks
            .status
            .status_changed(slot_id, SlotStatus::ChangeHotKey);
        self.hooks.lock.unlock();
    }
}

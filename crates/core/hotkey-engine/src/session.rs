use crate::hotkey::HotKey;
use crate::scheduler::ScheduledTask;
use crate::slot::SlotId;

/// The single app-wide capture session. Holds the pre-capture snapshot used
/// for revert, the conflict verdict recorded at the last press event, and the
/// idle timer bounding a session that never sees a key.
#[derive(Debug)]
pub struct CaptureSession {
    pub slot: SlotId,
    pub backup: HotKey,
    pub candidate_conflicts: bool,
    pub idle_timer: ScheduledTask,
}

/// Post-resolution window during which the terminal status stays visible and
/// the interaction lock is still held.
#[derive(Debug)]
pub struct ReleaseWindow {
    pub slot: SlotId,
    pub timer: ScheduledTask,
}

/// Lifecycle of the capture engine. Timers live inside their phase, so
/// resolving a session structurally cancels anything it had pending.
#[derive(Debug)]
pub enum EnginePhase {
    Idle,
    Capturing(CaptureSession),
    ReleasePending(ReleaseWindow),
}

impl EnginePhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, EnginePhase::Idle)
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, EnginePhase::Capturing(_))
    }
}

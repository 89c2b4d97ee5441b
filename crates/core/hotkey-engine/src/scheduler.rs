use std::time::Instant;

/// Single-shot, cancellable deadline, polled from the same loop that delivers
/// key events. There is no callback thread: the owner of the task decides what
/// firing means, which keeps timer work from ever racing the session it
/// belongs to.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledTask {
    deadline: Option<Instant>,
}

impl ScheduledTask {
    pub fn scheduled(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consumes the deadline once it has passed. A fired or cancelled task
    /// never fires again.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fires_exactly_once() {
        let start = Instant::now();
        let mut task = ScheduledTask::scheduled(start + Duration::from_millis(100));

        assert!(!task.fire_if_due(start));
        assert!(!task.fire_if_due(start + Duration::from_millis(99)));
        assert!(task.fire_if_due(start + Duration::from_millis(100)));
        assert!(!task.fire_if_due(start + Duration::from_millis(500)));
        assert!(!task.is_scheduled());
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let start = Instant::now();
        let mut task = ScheduledTask::scheduled(start + Duration::from_millis(100));

        task.cancel();
        assert!(!task.fire_if_due(start + Duration::from_secs(10)));
    }
}

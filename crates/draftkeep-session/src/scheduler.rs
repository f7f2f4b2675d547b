//! Inactivity-debounced autosave scheduling.
//!
//! Each change pushes the deadline out to `now + window`; the save fires only
//! once the document has been quiet for a full window. The scheduler owns no
//! task: the host waits on [`sleep_until_deadline`] and then asks
//! [`AutosaveScheduler::take_due`] for the state to save.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct AutosaveScheduler {
    window: Duration,
    enabled: bool,
    deadline: Option<Instant>,
    latest_state: Option<String>,
}

impl AutosaveScheduler {
    pub fn new(window: Duration, enabled: bool) -> Self {
        Self {
            window,
            enabled,
            deadline: None,
            latest_state: None,
        }
    }

    pub fn on_change(&mut self, state: String) {
        self.on_change_at(state, Instant::now());
    }

    /// Record the newest state and, when enabled, restart the window at `now`.
    pub fn on_change_at(&mut self, state: String, now: Instant) {
        self.latest_state = Some(state);
        if self.enabled {
            self.deadline = Some(now + self.window);
        }
    }

    /// Turning autosave off drops the pending deadline. Turning it on arms
    /// nothing until the next change.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.deadline = None;
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// State to save if the window has elapsed. Clears the deadline.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        if !self.enabled {
            return None;
        }
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                self.latest_state.clone()
            }
            _ => None,
        }
    }

    /// Replace the captured state without arming a save (after a revert or load)
    pub fn reset_latest(&mut self, state: Option<String>) {
        self.latest_state = state;
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn latest_state(&self) -> Option<&str> {
        self.latest_state.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Wait for an autosave deadline; never completes when there is none.
pub async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    const WINDOW: Duration = Duration::from_secs(300);

    #[test]
    fn burst_fires_once_from_last_change() {
        let start = Instant::now();
        let mut scheduler = AutosaveScheduler::new(WINDOW, true);

        for i in 0..5u64 {
            let at = start + Duration::from_secs(i * 60);
            scheduler.on_change_at(format!("state-{i}"), at);
            assert_eq!(scheduler.take_due(at), None);
        }
        let last = start + Duration::from_secs(240);

        // A window after the first change is not enough
        assert_eq!(scheduler.take_due(start + WINDOW), None);
        assert_eq!(scheduler.take_due(last + WINDOW - Duration::from_millis(1)), None);

        assert_eq!(scheduler.take_due(last + WINDOW).as_deref(), Some("state-4"));
        assert_eq!(scheduler.take_due(last + WINDOW * 2), None);
    }

    #[test]
    fn disabling_drops_pending_deadline() {
        let start = Instant::now();
        let mut scheduler = AutosaveScheduler::new(WINDOW, true);
        scheduler.on_change_at("a".to_string(), start);
        scheduler.set_enabled(false);
        scheduler.on_change_at("b".to_string(), start + Duration::from_secs(1));

        assert_eq!(scheduler.deadline(), None);
        assert_eq!(scheduler.take_due(start + WINDOW * 3), None);
        assert_eq!(scheduler.latest_state(), Some("b"));
    }

    #[test]
    fn enabling_does_not_arm_by_itself() {
        let start = Instant::now();
        let mut scheduler = AutosaveScheduler::new(WINDOW, false);
        scheduler.on_change_at("a".to_string(), start);
        scheduler.set_enabled(true);
        assert_eq!(scheduler.deadline(), None);

        scheduler.on_change_at("b".to_string(), start + Duration::from_secs(10));
        assert_eq!(
            scheduler.deadline(),
            Some(start + Duration::from_secs(10) + WINDOW)
        );
    }

    #[test]
    fn cancel_clears_deadline_but_keeps_state() {
        let start = Instant::now();
        let mut scheduler = AutosaveScheduler::new(WINDOW, true);
        scheduler.on_change_at("a".to_string(), start);
        scheduler.cancel();
        assert_eq!(scheduler.take_due(start + WINDOW), None);
        assert_eq!(scheduler.latest_state(), Some("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn sleeping_without_deadline_never_wakes() {
        let mut sleep = task::spawn(sleep_until_deadline(None));
        assert_pending!(sleep.poll());
        tokio::time::advance(WINDOW * 10).await;
        assert_pending!(sleep.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn sleeping_wakes_at_deadline() {
        let deadline = Instant::now() + WINDOW;
        let mut sleep = task::spawn(sleep_until_deadline(Some(deadline)));
        assert_pending!(sleep.poll());
        tokio::time::advance(WINDOW).await;
        assert_ready!(sleep.poll());
    }
}

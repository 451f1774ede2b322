//! Search input debouncing.
//!
//! Keystrokes update the raw term immediately; the term is only committed
//! (and the catalog re-filtered) once input has been quiet for the configured
//! delay. Each change cancels the pending commit and schedules a new one, so
//! only the last keystroke of a burst is committed.
//!
//! The debouncer is clock-driven: hosts call [`SearchDebouncer::poll`] from
//! their event loop tick, or await [`SearchDebouncer::settle`].

use std::time::Duration;

use tokio::time::Instant;

use super::search_engine::MIN_SEARCH_LENGTH;

/// Default quiet period before a typed term is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    min_length: usize,
    raw: String,
    committed: String,
    deadline: Option<Instant>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration, min_length: usize) -> Self {
        Self {
            delay,
            min_length,
            raw: String::new(),
            committed: String::new(),
            deadline: None,
        }
    }

    /// Records a keystroke. A term matching the pending one (or, with nothing
    /// pending, the committed one) leaves the schedule alone.
    pub fn input(&mut self, term: &str, now: Instant) {
        let current = if self.deadline.is_some() { &self.raw } else { &self.committed };
        let unchanged = term == current.as_str();
        self.raw = term.to_string();
        if !unchanged {
            self.deadline = Some(now + self.delay);
        }
    }

    /// Commits the raw term if the quiet period has elapsed.
    ///
    /// Returns the newly committed term exactly once per scheduled commit.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.committed = self.raw.clone();
                tracing::debug!(term = %self.committed, "search term committed");
                Some(self.committed.clone())
            }
            _ => None,
        }
    }

    /// Waits for the pending commit, if any, and performs it.
    pub async fn settle(&mut self) -> Option<String> {
        let deadline = self.deadline?;
        tokio::time::sleep_until(deadline).await;
        self.poll(Instant::now())
    }

    /// Drops any pending commit without touching the committed term.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Clears both terms and any pending commit.
    pub fn reset(&mut self) {
        self.raw.clear();
        self.committed.clear();
        self.deadline = None;
    }

    /// True while a commit is pending for a term long enough to search.
    pub fn is_searching(&self) -> bool {
        self.deadline.is_some() && self.raw.chars().count() >= self.min_length
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before the pending commit fires.
    pub fn time_until_commit(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    pub fn raw_term(&self) -> &str {
        &self.raw
    }

    pub fn committed_term(&self) -> &str {
        &self.committed
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, MIN_SEARCH_LENGTH)
    }
}

use std::sync::{Arc, Mutex, PoisonError};

use leash::LineObserver;

/// Observer that records every line it is shown, for assertions.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    seen: Arc<Mutex<Vec<(String, bool)>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(line, is_stderr)` pairs observed so far, in arrival order.
    pub fn seen(&self) -> Vec<(String, bool)> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LineObserver for RecordingObserver {
    fn on_line(&self, line: &str, is_stderr: bool) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        seen.push((line.to_string(), is_stderr));
        true
    }
}

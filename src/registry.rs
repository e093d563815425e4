// src/registry.rs

//! Registry of in-flight processes, keyed by pid.
//!
//! Every successfully started process is registered with the literal command
//! line that started it, and unregistered on normal completion or once a
//! kill attempt has confirmed the whole tree dead. The registry exists for
//! the shutdown sweep in [`crate::manager`]; nothing else reads it.
//!
//! Concurrency: inserts and removals arrive from any number of invocation
//! tasks plus the sweep. The sweep iterates over a snapshot, so entries
//! removed concurrently are simply gone by the time it looks at them.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Default)]
pub struct ProcessRegistry {
    entries: RwLock<HashMap<u32, String>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a started process. A pid is registered at most once at a time;
    /// re-registering an existing pid replaces its command line (pids are
    /// only reused by the OS after the previous holder died).
    pub fn register(&self, pid: u32, command: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(pid, command.to_string());
    }

    /// Stop tracking a process. Returns whether an entry was present; a
    /// second removal of the same pid is a no-op.
    pub fn unregister(&self, pid: u32) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&pid).is_some()
    }

    /// Point-in-time copy of all entries, for the sweep and for logging.
    pub fn snapshot(&self) -> Vec<(u32, String)> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut snapshot: Vec<_> = entries.iter().map(|(pid, cmd)| (*pid, cmd.clone())).collect();
        snapshot.sort_unstable_by_key(|(pid, _)| *pid);
        snapshot
    }

    pub fn is_empty(&self) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.is_empty()
    }
}

// src/tree.rs

//! Live process-tree enumeration.
//!
//! A [`ProcessTree`] is a root pid plus whatever descendants exist *right
//! now*. Children can be forked at any time after the root starts, so the
//! tree is re-walked from a fresh process-table snapshot on every query —
//! nothing here is cached across calls. Zombies (exited but not yet reaped)
//! count as dead.

use std::collections::{BTreeSet, HashMap, VecDeque};

use sysinfo::{Pid, Process, ProcessesToUpdate, System};

#[cfg(unix)]
fn process_is_live(process: &Process) -> bool {
    !matches!(process.status(), sysinfo::ProcessStatus::Zombie)
}

#[cfg(not(unix))]
fn process_is_live(_process: &Process) -> bool {
    true
}

/// Check a single pid without walking the tree.
pub fn is_alive(pid: u32) -> bool {
    let target = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[target]), true);
    sys.process(target).map(process_is_live).unwrap_or(false)
}

/// A root process handle together with its on-demand descendant set.
pub struct ProcessTree {
    root: u32,
    sys: System,
}

impl ProcessTree {
    pub fn new(root: u32) -> Self {
        Self {
            root,
            sys: System::new(),
        }
    }

    pub fn root(&self) -> u32 {
        self.root
    }

    /// All currently-live members of the tree rooted at `root`, parents
    /// before children.
    pub fn live_pids(&mut self) -> Vec<u32> {
        let mut seeds = BTreeSet::new();
        seeds.insert(self.root);
        self.live_members(&seeds)
    }

    /// All currently-live processes reachable from the given seed pids
    /// through parent links, parents before children, each pid at most once.
    ///
    /// Seeds that have died are skipped but still walked through, so a
    /// descendant observed under a now-dead seed is found via the seed set
    /// rather than lost.
    pub fn live_members(&mut self, seeds: &BTreeSet<u32>) -> Vec<u32> {
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        let processes = self.sys.processes();

        let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
        for (pid, process) in processes {
            if !process_is_live(process) {
                continue;
            }
            if let Some(parent) = process.parent() {
                children.entry(parent.as_u32()).or_default().push(pid.as_u32());
            }
        }
        for kids in children.values_mut() {
            kids.sort_unstable();
        }

        let mut live = Vec::new();
        let mut visited = BTreeSet::new();
        let mut queue: VecDeque<u32> = seeds.iter().copied().collect();
        while let Some(pid) = queue.pop_front() {
            if !visited.insert(pid) {
                continue;
            }
            let alive = processes
                .get(&Pid::from_u32(pid))
                .map(process_is_live)
                .unwrap_or(false);
            if alive {
                live.push(pid);
            }
            if let Some(kids) = children.get(&pid) {
                queue.extend(kids.iter().copied());
            }
        }
        live
    }

    /// True once no member of the tree is alive.
    pub fn is_dead(&mut self) -> bool {
        self.live_pids().is_empty()
    }
}

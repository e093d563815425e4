// src/kill/mod.rs

//! Escalating process-tree termination.
//!
//! [`kill_tree`] drives a [`KillAttempt`] through the fixed stage table in
//! [`stage`] until either every member of the tree is dead or the table is
//! exhausted, and reports which. It never fails: individual signal errors
//! are swallowed by the stage actions, and the worst possible outcome is
//! `false`.
//!
//! The live set is recomputed from a fresh process snapshot before every
//! stage. Every pid the attempt has ever observed stays in the seed set, so
//! a child orphaned when its parent died in an earlier stage is still
//! targeted by the later, more forceful ones.

pub mod stage;

use std::collections::BTreeSet;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::tree::ProcessTree;

pub use stage::{stages, StageKind, TerminationStage, Traversal};

/// One forward-only walk of the termination table for a single root handle.
pub struct KillAttempt {
    tree: ProcessTree,
    observed: BTreeSet<u32>,
    next_stage: usize,
}

impl KillAttempt {
    pub fn new(root: u32) -> Self {
        let mut attempt = Self {
            tree: ProcessTree::new(root),
            observed: BTreeSet::from([root]),
            next_stage: 0,
        };
        // Seed with whatever descendants exist before the first stage runs.
        attempt.live_targets();
        attempt
    }

    /// Currently-live members, parents first, folding every newly seen pid
    /// into the seed set for later stages.
    fn live_targets(&mut self) -> Vec<u32> {
        let live = self.tree.live_members(&self.observed);
        self.observed.extend(live.iter().copied());
        live
    }

    /// True once every observed member of the tree is dead. Rechecked after
    /// every stage without re-running earlier stages.
    pub fn succeeded(&mut self) -> bool {
        self.live_targets().is_empty()
    }

    /// True once the attempt is over: full death, or no stages left to try.
    pub fn finished(&mut self) -> bool {
        self.next_stage >= stages().len() || self.succeeded()
    }

    /// Run the next stage: apply its action to each live member in the
    /// stage's traversal order, then wait the validation delay.
    pub async fn advance(&mut self) {
        let Some(stage) = stages().get(self.next_stage) else {
            return;
        };
        self.next_stage += 1;

        let mut targets = self.live_targets();
        if targets.is_empty() {
            return;
        }
        if stage.order == Traversal::Reverse {
            targets.reverse();
        }

        debug!(
            stage = stage.kind.name(),
            root = self.tree.root(),
            ?targets,
            "applying termination stage"
        );
        for pid in targets {
            stage.kind.apply(pid).await;
        }
        sleep(stage.delay).await;
    }
}

/// Kill a process and all of its descendants, escalating until everything
/// is dead or the stage table runs out.
///
/// Returns whether every member of the (re-enumerated) tree ended up dead.
/// Idempotent: a handle whose tree is already dead returns `true` without
/// any stage action being taken.
pub async fn kill_tree(root: u32) -> bool {
    let mut attempt = KillAttempt::new(root);
    while !attempt.finished() {
        attempt.advance().await;
    }
    let dead = attempt.succeeded();
    if dead {
        info!(root, "process tree confirmed dead");
    } else {
        info!(root, "termination sequence exhausted with survivors");
    }
    dead
}

//! `BehaviorStack` — hierarchical, suspendable actions.
//!
//! # Shape
//!
//! The stack is a chain of levels, outermost (the root) first.  Each level
//! holds one active node, which contains the next level's node.  A level
//! also keeps the chains buried there by `SuspendFor`, most recent last.
//!
//! # Update
//!
//! Nodes update outermost to innermost.  The first result other than
//! `Continue` is applied at its level and the deeper levels skip this tick:
//!
//! | Result          | Effect at level `d`                                              |
//! |-----------------|------------------------------------------------------------------|
//! | `ChangeTo(n)`   | end `d..`, innermost first; start `n` at `d`                      |
//! | `SuspendFor(n)` | suspend `d..` and bury them at `d`; start `n` at `d`              |
//! | `Done`          | end `d..`; resume the most recently buried chain at `d`, if any   |
//! | `Abort(_)`      | end everything and restart from a fresh root                      |
//!
//! A container left without a child (its child finished and nothing was
//! buried) rebuilds its initial child at the start of the next update.
//!
//! # Queries
//!
//! Answered innermost to outermost; the first answer other than `Abstain`
//! wins.  Buried nodes do not answer.

use crate::action::{ActionNode, ActionResult, Query, QueryAnswer};
use crate::brain::Brain;
use crate::context::BotContext;
use crate::state::StateMachine;

#[derive(Clone, Debug)]
struct Level {
    active: ActionNode,
    buried: Vec<Vec<Level>>,
}

impl Level {
    fn new(active: ActionNode) -> Self {
        Self { active, buried: Vec::new() }
    }
}

#[derive(Clone, Debug, Default)]
pub struct BehaviorStack {
    levels: Vec<Level>,
}

impl BehaviorStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_started(&self) -> bool {
        !self.levels.is_empty()
    }

    /// Active levels, root included.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Active node names, outermost first.
    pub fn names(&self) -> Vec<&'static str> {
        self.levels.iter().map(|l| l.active.name()).collect()
    }

    pub fn node(&self, depth: usize) -> Option<&ActionNode> {
        self.levels.get(depth).map(|l| &l.active)
    }

    pub fn innermost(&self) -> Option<&ActionNode> {
        self.levels.last().map(|l| &l.active)
    }

    /// Chains buried at `depth`.
    pub fn buried_at(&self, depth: usize) -> usize {
        self.levels.get(depth).map_or(0, |l| l.buried.len())
    }

    /// The active finite state layer, if `Behave` is on the active chain.
    pub fn state_machine(&self) -> Option<&StateMachine> {
        self.levels.iter().find_map(|l| l.active.state_machine())
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// End whatever runs and start over from `root`.
    pub fn start(&mut self, root: ActionNode, brain: &mut Brain, ctx: &BotContext<'_>) {
        let old = std::mem::take(&mut self.levels);
        for level in old.into_iter().rev() {
            end_level(level, brain, ctx);
        }
        let mut level = Level::new(root);
        level.active.on_start(brain, ctx);
        self.levels.push(level);
        self.build_children(brain, ctx);
    }

    pub fn update(&mut self, brain: &mut Brain, ctx: &BotContext<'_>) {
        if self.levels.is_empty() {
            self.start(ActionNode::root(), brain, ctx);
        }
        self.build_children(brain, ctx);

        for depth in 0..self.levels.len() {
            let result = self.levels[depth].active.update(brain, ctx);
            if !matches!(result, ActionResult::Continue) {
                self.apply(depth, result, brain, ctx);
                break;
            }
        }
    }

    pub fn query(&self, q: Query, brain: &Brain, ctx: &BotContext<'_>) -> QueryAnswer {
        self.levels
            .iter()
            .rev()
            .map(|l| l.active.query(q, brain, ctx))
            .find(|a| *a != QueryAnswer::Abstain)
            .unwrap_or_default()
    }

    /// Apply `result` as if the node at `depth` had returned it.
    pub(crate) fn apply(&mut self, depth: usize, result: ActionResult, brain: &mut Brain, ctx: &BotContext<'_>) {
        if depth >= self.levels.len() {
            return;
        }
        match result {
            ActionResult::Continue => {}

            ActionResult::ChangeTo(mut next) => {
                self.end_below(depth, brain, ctx);
                let level = &mut self.levels[depth];
                tracing::debug!(agent = %brain.me, from = level.active.name(), to = next.name(), depth, "action change");
                level.active.on_end(brain, ctx);
                next.on_start(brain, ctx);
                level.active = next;
                self.build_children(brain, ctx);
            }

            ActionResult::SuspendFor(next) => {
                let mut chain = self.levels.split_off(depth);
                for level in chain.iter_mut().rev() {
                    level.active.on_suspend(brain, ctx);
                }
                tracing::debug!(agent = %brain.me, suspended = chain[0].active.name(), by = next.name(), depth, "action suspended");
                let mut buried = std::mem::take(&mut chain[0].buried);
                buried.push(chain);
                let mut level = Level { active: next, buried };
                level.active.on_start(brain, ctx);
                self.levels.push(level);
                self.build_children(brain, ctx);
            }

            ActionResult::Done => {
                self.end_below(depth, brain, ctx);
                let Some(mut level) = self.levels.pop() else { return };
                level.active.on_end(brain, ctx);
                match level.buried.pop() {
                    Some(mut chain) => {
                        if let Some(first) = chain.first_mut() {
                            first.buried = level.buried;
                            tracing::debug!(agent = %brain.me, resumed = first.active.name(), depth, "action resumed");
                        }
                        for l in chain.iter_mut() {
                            l.active.on_resume(brain, ctx);
                        }
                        self.levels.extend(chain);
                    }
                    None if depth == 0 => {
                        tracing::debug!(agent = %brain.me, "root finished; restarting");
                        self.start(ActionNode::root(), brain, ctx);
                    }
                    None => {}
                }
            }

            ActionResult::Abort(reason) => {
                let node = self.levels[depth].active.name();
                tracing::warn!(agent = %brain.me, node, reason, "behavior aborted; restarting");
                self.start(ActionNode::root(), brain, ctx);
            }
        }
    }

    /// End every level deeper than `depth`, innermost first.
    fn end_below(&mut self, depth: usize, brain: &mut Brain, ctx: &BotContext<'_>) {
        let tail = self.levels.split_off(depth + 1);
        for level in tail.into_iter().rev() {
            end_level(level, brain, ctx);
        }
    }

    /// Start initial children below the innermost node until a leaf.
    fn build_children(&mut self, brain: &mut Brain, ctx: &BotContext<'_>) {
        while let Some(mut child) = self.levels.last().and_then(|l| l.active.initial_child()) {
            child.on_start(brain, ctx);
            self.levels.push(Level::new(child));
        }
    }
}

fn end_level(mut level: Level, brain: &mut Brain, ctx: &BotContext<'_>) {
    level.active.on_end(brain, ctx);
    while let Some(chain) = level.buried.pop() {
        for l in chain.into_iter().rev() {
            end_level(l, brain, ctx);
        }
    }
}

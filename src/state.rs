//! Per-directory mutable state.

use crate::rule::RuleSpec;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Counters, skip set and rename budget for one directory.
///
/// Built fresh from the rule for every directory, so nothing leaks from one
/// batch into the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchState {
    pub renamed_count: usize,
    pub rename_budget: Option<usize>,
    pub counters: Vec<i64>,
    pub counter_maxima: Vec<Option<i64>>,
    /// Slots whose counter cannot step past `i64::MAX`.
    pub overflowed: HashSet<usize>,
    pub skip_set: HashSet<PathBuf>,
}

impl BatchState {
    pub fn new(rule: &RuleSpec) -> Self {
        Self {
            renamed_count: 0,
            rename_budget: rule.insert.rename_budget(),
            counters: rule.insert.initial_counters(),
            counter_maxima: rule.insert.counter_maxima(),
            overflowed: HashSet::new(),
            skip_set: HashSet::new(),
        }
    }

    pub fn counter(&self, slot: usize) -> i64 {
        self.counters.get(slot).copied().unwrap_or_default()
    }

    /// True once the slot's counter has passed its configured end or
    /// would overflow.
    pub fn is_exhausted(&self, slot: usize) -> bool {
        if self.overflowed.contains(&slot) {
            return true;
        }
        match self.counter_maxima.get(slot).copied().flatten() {
            Some(max) => self.counter(slot) > max,
            None => false,
        }
    }

    /// Advances a slot's counter by one step. A counter already at
    /// `i64::MAX` stays put and the slot reports exhausted.
    pub fn advance(&mut self, slot: usize) {
        if let Some(counter) = self.counters.get_mut(slot) {
            match counter.checked_add(1) {
                Some(next) => *counter = next,
                None => {
                    self.overflowed.insert(slot);
                }
            }
        }
    }

    /// Records a successful rename that consumed `slot`.
    pub fn record_rename(&mut self, slot: Option<usize>) {
        self.renamed_count += 1;
        if let Some(slot) = slot {
            self.advance(slot);
        }
    }

    pub fn budget_reached(&self) -> bool {
        self.rename_budget
            .is_some_and(|budget| self.renamed_count >= budget)
    }

    pub fn skip(&mut self, path: impl Into<PathBuf>) {
        self.skip_set.insert(path.into());
    }

    pub fn is_skipped(&self, path: &Path) -> bool {
        self.skip_set.contains(path)
    }
}

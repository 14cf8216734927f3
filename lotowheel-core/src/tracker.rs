use std::borrow::Cow;
use std::collections::HashSet;

use crate::combinations::{combinations, for_each_combination};

/// A t-subset of the pool in ascending order.
pub type TargetTuple = Vec<u32>;

/// Target tuples not yet covered by any chosen ticket. Only ever shrinks.
#[derive(Debug, Clone, Default)]
pub struct CoverageTracker {
    uncovered: HashSet<TargetTuple>,
}

impl CoverageTracker {
    /// Tracks every `guarantee`-subset of `pool`.
    pub fn for_pool(pool: &[u32], guarantee: usize) -> Self {
        Self::from_tuples(combinations(pool, guarantee))
    }

    pub fn from_tuples<I>(tuples: I) -> Self
    where
        I: IntoIterator<Item = TargetTuple>,
    {
        let uncovered = tuples.into_iter().map(canonical).collect();
        Self { uncovered }
    }

    pub fn remaining_count(&self) -> usize {
        self.uncovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uncovered.is_empty()
    }

    pub fn contains(&self, tuple: &[u32]) -> bool {
        self.uncovered.contains(tuple)
    }

    /// The `guarantee`-subsets of `ticket` that are still uncovered.
    pub fn covers(&self, ticket: &[u32], guarantee: usize) -> Vec<TargetTuple> {
        let ticket = sorted(ticket);
        let mut covered = Vec::new();
        for_each_combination(&*ticket, guarantee, |tuple| {
            if self.uncovered.contains(tuple) {
                covered.push(tuple.to_vec());
            }
        });
        covered
    }

    /// Same count as `covers(..).len()`, without allocating per tuple.
    pub fn coverage_count(&self, ticket: &[u32], guarantee: usize) -> usize {
        let ticket = sorted(ticket);
        let mut count = 0;
        for_each_combination(&*ticket, guarantee, |tuple| {
            if self.uncovered.contains(tuple) {
                count += 1;
            }
        });
        count
    }

    /// Absent tuples are ignored.
    pub fn remove<'a, I>(&mut self, tuples: I)
    where
        I: IntoIterator<Item = &'a TargetTuple>,
    {
        for tuple in tuples {
            if tuple.is_sorted() {
                self.uncovered.remove(tuple);
            } else {
                self.uncovered.remove(&canonical(tuple.clone()));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetTuple> {
        self.uncovered.iter()
    }
}

fn canonical(mut tuple: TargetTuple) -> TargetTuple {
    tuple.sort_unstable();
    tuple
}

fn sorted(ticket: &[u32]) -> Cow<'_, [u32]> {
    if ticket.is_sorted() {
        Cow::Borrowed(ticket)
    } else {
        let mut owned = ticket.to_vec();
        owned.sort_unstable();
        Cow::Owned(owned)
    }
}

//! Greedy covering-design ("wheel") generator.
//!
//! Given a pool of numbers, a ticket size `k` and a guarantee `t`, picks `k`-subsets of the
//! pool until every `t`-subset of the pool sits inside at least one picked ticket. Each round
//! takes the candidate covering the most still-uncovered tuples; ties go to the candidate
//! enumerated first, so identical inputs always give identical wheels.
//!
//! Cost is exponential in the pool size: both C(n, k) candidates and C(n, t) targets are
//! materialized up front and every round rescans the remaining candidates. Pools larger than
//! [`WheelConfig::max_pool_size`] are refused before any enumeration.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combinations::{binomial, combinations};
use crate::tracker::{CoverageTracker, TargetTuple};

pub const DEFAULT_MAX_POOL_SIZE: usize = 25;

/// An ascending `k`-subset of the pool.
pub type Ticket = Vec<u32>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WheelError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("pool of {size} numbers exceeds the limit of {bound}, reduce the pool and retry")]
    PoolTooLarge { size: usize, bound: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub max_pool_size: usize,
    /// Score candidates on the rayon pool. Selection stays sequential either way.
    pub parallel: bool,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WheelParams {
    pub ticket_size: usize,
    pub guarantee: usize,
    /// Draw size that triggers the guarantee. Informational only.
    pub condition: Option<usize>,
}

impl WheelParams {
    pub fn new(ticket_size: usize, guarantee: usize) -> Self {
        Self {
            ticket_size,
            guarantee,
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: usize) -> Self {
        self.condition = Some(condition);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WheelResult {
    /// Tickets in the order they were picked.
    pub tickets: Vec<Ticket>,
    /// False when the search stalled with tuples left uncovered.
    pub complete: bool,
    pub target_count: usize,
    pub uncovered: usize,
    pub params: WheelParams,
}

/// Progress notification sent after each pick.
#[derive(Debug, Clone, Copy)]
pub struct WheelStep<'a> {
    pub iteration: usize,
    pub ticket: &'a [u32],
    pub newly_covered: usize,
    pub remaining: usize,
    pub target_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct WheelGenerator {
    config: WheelConfig,
}

/// Wheel with the default pool bound.
pub fn generate_wheel(
    pool: &[u32],
    ticket_size: usize,
    guarantee: usize,
) -> Result<WheelResult, WheelError> {
    WheelGenerator::default().generate(pool, WheelParams::new(ticket_size, guarantee))
}

impl WheelGenerator {
    pub fn new(config: WheelConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, pool: &[u32], params: WheelParams) -> Result<WheelResult, WheelError> {
        self.generate_with(pool, params, |_| {})
    }

    pub fn generate_with<F>(
        &self,
        pool: &[u32],
        params: WheelParams,
        on_step: F,
    ) -> Result<WheelResult, WheelError>
    where
        F: FnMut(&WheelStep<'_>),
    {
        validate(pool, &params)?;
        let k = params.ticket_size;
        let t = params.guarantee;

        let mut pool = pool.to_vec();
        pool.sort_unstable();

        if pool.len() == k {
            return Ok(WheelResult {
                tickets: vec![pool],
                complete: true,
                target_count: binomial(k, t) as usize,
                uncovered: 0,
                params,
            });
        }

        if pool.len() > self.config.max_pool_size {
            return Err(WheelError::PoolTooLarge {
                size: pool.len(),
                bound: self.config.max_pool_size,
            });
        }

        log::debug!(
            "wheel n={} k={} t={}: {} candidates, {} targets",
            pool.len(),
            k,
            t,
            binomial(pool.len(), k),
            binomial(pool.len(), t),
        );

        let tracker = CoverageTracker::for_pool(&pool, t);
        let candidates: Vec<Ticket> = combinations(&pool, k).collect();
        Ok(self.cover(tracker, candidates, params, on_step))
    }

    /// Greedy loop: picks candidates until `tracker` is empty or nothing left covers a
    /// remaining tuple.
    fn cover<F>(
        &self,
        mut tracker: CoverageTracker,
        mut candidates: Vec<Ticket>,
        params: WheelParams,
        mut on_step: F,
    ) -> WheelResult
    where
        F: FnMut(&WheelStep<'_>),
    {
        let t = params.guarantee;
        let target_count = tracker.remaining_count();
        let mut tickets: Vec<Ticket> = Vec::new();

        while !tracker.is_empty() && !candidates.is_empty() {
            let counts = self.score_candidates(&tracker, &candidates, t);
            let (best_idx, best_count) = match select_best(&counts) {
                Some(best) => best,
                None => break,
            };
            if best_count == 0 {
                log::debug!("no candidate covers a remaining tuple, stopping");
                break;
            }

            let ticket = candidates.remove(best_idx);
            let covered = tracker.covers(&ticket, t);
            tracker.remove(&covered);

            log::debug!(
                "pick {}: {:?} covers {} ({} left)",
                tickets.len() + 1,
                ticket,
                covered.len(),
                tracker.remaining_count(),
            );
            on_step(&WheelStep {
                iteration: tickets.len() + 1,
                ticket: &ticket,
                newly_covered: covered.len(),
                remaining: tracker.remaining_count(),
                target_count,
            });
            tickets.push(ticket);
        }

        let uncovered = tracker.remaining_count();
        let complete = uncovered == 0;
        if complete {
            log::info!("wheel complete: {} tickets cover {} tuples", tickets.len(), target_count);
        } else {
            log::warn!("wheel incomplete: {} of {} tuples uncovered", uncovered, target_count);
        }

        WheelResult {
            tickets,
            complete,
            target_count,
            uncovered,
            params,
        }
    }

    fn score_candidates(&self, tracker: &CoverageTracker, candidates: &[Ticket], guarantee: usize) -> Vec<usize> {
        if self.config.parallel {
            candidates
                .par_iter()
                .map(|c| tracker.coverage_count(c, guarantee))
                .collect()
        } else {
            candidates
                .iter()
                .map(|c| tracker.coverage_count(c, guarantee))
                .collect()
        }
    }
}

/// Index and value of the first strict maximum.
fn select_best(counts: &[usize]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for (i, &count) in counts.iter().enumerate() {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((i, count)),
        }
    }
    best
}

fn validate(pool: &[u32], params: &WheelParams) -> Result<(), WheelError> {
    let k = params.ticket_size;
    let t = params.guarantee;

    if k == 0 {
        return Err(WheelError::InvalidParameter("ticket size must be at least 1".into()));
    }
    if t == 0 {
        return Err(WheelError::InvalidParameter("guarantee must be at least 1".into()));
    }
    if t > k {
        return Err(WheelError::InvalidParameter(format!(
            "guarantee {t} is larger than ticket size {k}"
        )));
    }
    if k > pool.len() {
        return Err(WheelError::InvalidParameter(format!(
            "ticket size {k} is larger than the pool ({} numbers)",
            pool.len()
        )));
    }
    if let Some(m) = params.condition {
        if m < t {
            return Err(WheelError::InvalidParameter(format!(
                "condition {m} is smaller than guarantee {t}"
            )));
        }
    }
    if pool.contains(&0) {
        return Err(WheelError::InvalidParameter("pool numbers must be positive".into()));
    }
    let mut seen = HashSet::with_capacity(pool.len());
    for &n in pool {
        if !seen.insert(n) {
            return Err(WheelError::InvalidParameter(format!("duplicate number {n} in pool")));
        }
    }
    Ok(())
}

/// `guarantee`-subsets of `pool` that no ticket contains.
pub fn uncovered_tuples(pool: &[u32], tickets: &[Ticket], guarantee: usize) -> Vec<TargetTuple> {
    let mut pool = pool.to_vec();
    pool.sort_unstable();
    let mut tracker = CoverageTracker::for_pool(&pool, guarantee);
    for ticket in tickets {
        let covered = tracker.covers(ticket, guarantee);
        tracker.remove(&covered);
    }
    let mut left: Vec<TargetTuple> = tracker.iter().cloned().collect();
    left.sort();
    left
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn test_pool_equal_to_ticket_size() {
        let result = generate_wheel(&[6, 2, 4, 1, 5, 3], 6, 4).unwrap();
        assert_eq!(result.tickets, vec![vec![1, 2, 3, 4, 5, 6]]);
        assert!(result.complete);
    }

    #[test]
    fn test_minimal_case() {
        let result = generate_wheel(&pool(6), 6, 6).unwrap();
        assert_eq!(result.tickets, vec![vec![1, 2, 3, 4, 5, 6]]);
    }

    #[test]
    fn test_ten_numbers_guarantee_four() {
        let p = pool(10);
        let result = generate_wheel(&p, 6, 4).unwrap();
        assert!(result.complete);
        assert_eq!(result.target_count, 210);
        assert!(uncovered_tuples(&p, &result.tickets, 4).is_empty());
        assert!(result.tickets.len() < 210 / 2, "{} tickets", result.tickets.len());
        assert!(result.tickets.len() >= 14, "C(10,4)/C(6,4) = 14 is a lower bound");
        for ticket in &result.tickets {
            assert_eq!(ticket.len(), 6);
            assert!(ticket.is_sorted());
        }
    }

    #[test]
    fn test_first_pick_is_first_candidate() {
        let result = generate_wheel(&pool(8), 5, 3).unwrap();
        assert_eq!(result.tickets[0], vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_full_coverage_grid() {
        for n in 4..=9u32 {
            for k in 1..=(n as usize) {
                for t in 1..=k {
                    let p = pool(n);
                    let result = generate_wheel(&p, k, t).unwrap();
                    assert!(result.complete, "n={n} k={k} t={t}");
                    assert!(uncovered_tuples(&p, &result.tickets, t).is_empty(), "n={n} k={k} t={t}");
                }
            }
        }
    }

    #[test]
    fn test_no_duplicate_tickets() {
        let result = generate_wheel(&pool(12), 6, 3).unwrap();
        let unique: HashSet<&Ticket> = result.tickets.iter().collect();
        assert_eq!(unique.len(), result.tickets.len());
    }

    #[test]
    fn test_deterministic() {
        let p = vec![3, 17, 22, 8, 41, 5, 13, 30, 9];
        let a = generate_wheel(&p, 5, 3).unwrap();
        let b = generate_wheel(&p, 5, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let p = pool(11);
        let params = WheelParams::new(5, 3);
        let parallel = WheelGenerator::default().generate(&p, params).unwrap();
        let sequential = WheelGenerator::new(WheelConfig { parallel: false, ..WheelConfig::default() })
            .generate(&p, params)
            .unwrap();
        assert_eq!(parallel.tickets, sequential.tickets);
    }

    #[test]
    fn test_remaining_strictly_decreases() {
        let mut remaining = Vec::new();
        let result = WheelGenerator::default()
            .generate_with(&pool(10), WheelParams::new(5, 3), |step| {
                assert!(step.newly_covered > 0);
                remaining.push(step.remaining);
            })
            .unwrap();
        assert_eq!(remaining.len(), result.tickets.len());
        assert!(remaining.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(remaining.last(), Some(&0));
    }

    #[test]
    fn test_ticket_size_larger_than_pool() {
        let err = generate_wheel(&[1, 2, 3], 5, 2).unwrap_err();
        assert!(matches!(err, WheelError::InvalidParameter(_)));
    }

    #[test]
    fn test_guarantee_larger_than_ticket() {
        let err = generate_wheel(&[1, 2, 3], 2, 3).unwrap_err();
        assert!(matches!(err, WheelError::InvalidParameter(_)));
    }

    #[test]
    fn test_zero_parameters() {
        assert!(matches!(generate_wheel(&pool(5), 0, 0), Err(WheelError::InvalidParameter(_))));
        assert!(matches!(generate_wheel(&pool(5), 3, 0), Err(WheelError::InvalidParameter(_))));
    }

    #[test]
    fn test_duplicates_and_zero_rejected() {
        assert!(matches!(generate_wheel(&[1, 2, 2, 4, 5], 3, 2), Err(WheelError::InvalidParameter(_))));
        assert!(matches!(generate_wheel(&[0, 1, 2, 3, 4], 3, 2), Err(WheelError::InvalidParameter(_))));
    }

    #[test]
    fn test_condition_below_guarantee() {
        let params = WheelParams::new(6, 4).with_condition(3);
        let err = WheelGenerator::default().generate(&pool(10), params).unwrap_err();
        assert!(matches!(err, WheelError::InvalidParameter(_)));

        let params = WheelParams::new(6, 4).with_condition(6);
        assert!(WheelGenerator::default().generate(&pool(8), params).is_ok());
    }

    #[test]
    fn test_pool_too_large() {
        let err = generate_wheel(&pool(30), 6, 4).unwrap_err();
        assert_eq!(err, WheelError::PoolTooLarge { size: 30, bound: 25 });
    }

    #[test]
    fn test_configurable_bound() {
        let generator = WheelGenerator::new(WheelConfig { max_pool_size: 8, ..WheelConfig::default() });
        assert!(matches!(
            generator.generate(&pool(9), WheelParams::new(3, 2)),
            Err(WheelError::PoolTooLarge { size: 9, bound: 8 })
        ));
        assert!(generator.generate(&pool(8), WheelParams::new(3, 2)).is_ok());
    }

    #[test]
    fn test_parameter_errors_checked_before_bound() {
        let err = generate_wheel(&pool(30), 4, 5).unwrap_err();
        assert!(matches!(err, WheelError::InvalidParameter(_)));
    }

    #[test]
    fn test_select_best_first_wins() {
        assert_eq!(select_best(&[2, 5, 5, 1]), Some((1, 5)));
        assert_eq!(select_best(&[0, 0]), Some((0, 0)));
        assert_eq!(select_best(&[]), None);
    }

    #[test]
    fn test_stall_returns_incomplete_result() {
        let p = pool(6);
        let mut tuples: Vec<TargetTuple> = combinations(&p, 2).collect();
        tuples.push(vec![40, 41]);
        let tracker = CoverageTracker::from_tuples(tuples);
        let candidates: Vec<Ticket> = combinations(&p, 4).collect();

        let mut steps = 0;
        let result = WheelGenerator::default().cover(tracker, candidates, WheelParams::new(4, 2), |_| steps += 1);

        assert!(!result.complete);
        assert_eq!(result.target_count, 16);
        assert_eq!(result.uncovered, 1);
        assert_eq!(result.tickets.len(), steps);
        assert_eq!(uncovered_tuples(&p, &result.tickets, 2), Vec::<TargetTuple>::new());
    }

    #[test]
    fn test_stall_with_no_useful_candidate() {
        let tracker = CoverageTracker::from_tuples(vec![vec![7, 8]]);
        let candidates = vec![vec![1, 2, 3]];
        let result = WheelGenerator::default().cover(tracker, candidates, WheelParams::new(3, 2), |_| {});
        assert!(result.tickets.is_empty());
        assert!(!result.complete);
        assert_eq!(result.uncovered, 1);
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: WheelConfig = serde_json::from_str(r#"{"max_pool_size": 30}"#).unwrap();
        assert_eq!(config.max_pool_size, 30);
        assert!(config.parallel);
    }
}

//! Game generation: rejection sampling scored by the strategies, plus matrix mode which wheels
//! a pool of numbers and scores every ticket.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

use lotowheel_db::models::{LotteryConfig, LotteryKind};

use crate::stats::GameStats;
use crate::strategies::{
    all_strategies, Strategy, StrategyKind, StrategyResult, DELTA_ID, PARITY_ID, SUM_ID,
};
use crate::wheel::{WheelConfig, WheelError, WheelGenerator, WheelParams, WheelResult};

const RANDOM_ATTEMPTS_PER_GAME: usize = 100;
const STATISTICAL_ATTEMPTS_PER_GAME: usize = 200;
const RANDOM_MIN_SCORE: u32 = 50;
const STATISTICAL_MIN_SCORE: u32 = 75;
const SNIPER_SCORE: u32 = 90;
const HOT_PICKS: usize = 3;
/// Share of statistical attempts that start from hot numbers.
const HOT_BIAS: f64 = 0.7;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("matrix mode needs a matrix request")]
    MissingMatrixRequest,
    #[error("{fixed} fixed numbers do not fit a game of {size}")]
    TooManyFixed { fixed: usize, size: usize },
    #[error("number {number} is outside 1-{total}")]
    OutOfRange { number: u32, total: u32 },
    #[error("only {available} numbers left after exclusions, {needed} needed")]
    ExhaustedRange { available: usize, needed: usize },
    #[error("number {number} is excluded but would be wheeled")]
    ExcludedInPool { number: u32 },
    #[error("strategy '{0}' is not registered")]
    MissingStrategy(&'static str),
    #[error(transparent)]
    Wheel(#[from] WheelError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    /// Uniform games, basic filters only.
    Random,
    /// Hot-number bias, every filter, stricter threshold.
    Statistical,
    Delta,
    Matrix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Sniper,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub lottery: LotteryKind,
    pub numbers: Vec<u32>,
    pub total_score: u32,
    pub results: Vec<StrategyResult>,
    pub category: Category,
}

#[derive(Debug, Clone, Default)]
pub struct MatrixRequest {
    /// Numbers to wheel. Drawn from the stats or at random when absent.
    pub pool: Option<Vec<u32>>,
    pub pool_size: usize,
    pub guarantee: usize,
    pub condition: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct EngineRequest {
    pub lottery: LotteryKind,
    pub mode: Mode,
    pub count: usize,
    pub fixed: Vec<u32>,
    pub excluded: Vec<u32>,
    pub stats: Option<GameStats>,
    pub matrix: Option<MatrixRequest>,
    pub seed: u64,
}

impl EngineRequest {
    pub fn new(lottery: LotteryKind, mode: Mode, count: usize, seed: u64) -> Self {
        Self {
            lottery,
            mode,
            count,
            fixed: Vec::new(),
            excluded: Vec::new(),
            stats: None,
            matrix: None,
            seed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Generation {
    /// Sorted by score, best first.
    pub games: Vec<Game>,
    /// Set in matrix mode.
    pub wheel: Option<WheelResult>,
    pub attempts: usize,
}

pub struct Engine {
    strategies: Vec<Box<dyn Strategy>>,
    wheel: WheelGenerator,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(all_strategies(), WheelConfig::default())
    }
}

impl Engine {
    pub fn new(strategies: Vec<Box<dyn Strategy>>, wheel_config: WheelConfig) -> Self {
        Self {
            strategies,
            wheel: WheelGenerator::new(wheel_config),
        }
    }

    pub fn generate(&self, request: &EngineRequest) -> Result<Generation, EngineError> {
        let config = request.lottery.config();
        let mut rng = StdRng::seed_from_u64(request.seed);

        let mut generation = match request.mode {
            Mode::Random => self.generate_random(&config, request, &mut rng)?,
            Mode::Statistical => self.generate_statistical(&config, request, &mut rng)?,
            Mode::Delta => self.generate_delta(&config, request, &mut rng)?,
            Mode::Matrix => self.generate_matrix(&config, request, &mut rng)?,
        };

        // Stable: equal scores keep their generation order.
        generation.games.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        Ok(generation)
    }

    fn generate_random(
        &self,
        config: &LotteryConfig,
        request: &EngineRequest,
        rng: &mut StdRng,
    ) -> Result<Generation, EngineError> {
        let basic = |s: &dyn Strategy| s.id() == SUM_ID || s.id() == PARITY_ID;
        let max_attempts = attempt_cap(request.count, RANDOM_ATTEMPTS_PER_GAME);
        let mut games = Vec::new();
        let mut attempts = 0;

        while games.len() < request.count && attempts < max_attempts {
            attempts += 1;
            let numbers = random_numbers(config, &request.fixed, &request.excluded, config.picked_numbers, rng)?;
            let game = self.score_game(numbers, config, basic);
            if game.total_score >= RANDOM_MIN_SCORE && game.results.iter().all(|r| r.is_valid) {
                games.push(game);
            }
        }

        log::debug!("random: {} games accepted out of {} attempts", games.len(), attempts);
        Ok(Generation { games, wheel: None, attempts })
    }

    fn generate_statistical(
        &self,
        config: &LotteryConfig,
        request: &EngineRequest,
        rng: &mut StdRng,
    ) -> Result<Generation, EngineError> {
        let max_attempts = attempt_cap(request.count, STATISTICAL_ATTEMPTS_PER_GAME);
        let mut games = Vec::new();
        let mut attempts = 0;
        let mut already_drawn = 0;

        while games.len() < request.count && attempts < max_attempts {
            attempts += 1;
            let numbers = match &request.stats {
                Some(stats) if rng.random::<f64>() < HOT_BIAS => {
                    biased_numbers(config, stats, &request.fixed, &request.excluded, rng)?
                }
                _ => random_numbers(config, &request.fixed, &request.excluded, config.picked_numbers, rng)?,
            };

            if request.stats.as_ref().is_some_and(|s| s.was_drawn(&numbers)) {
                already_drawn += 1;
                continue;
            }

            let game = self.score_game(numbers, config, |_| true);
            if game.total_score > STATISTICAL_MIN_SCORE {
                games.push(game);
            }
        }

        log::debug!(
            "statistical: {} games accepted out of {} attempts ({} already drawn)",
            games.len(),
            attempts,
            already_drawn,
        );
        Ok(Generation { games, wheel: None, attempts })
    }

    fn generate_delta(
        &self,
        config: &LotteryConfig,
        request: &EngineRequest,
        rng: &mut StdRng,
    ) -> Result<Generation, EngineError> {
        let delta = self
            .strategies
            .iter()
            .find(|s| s.id() == DELTA_ID)
            .ok_or(EngineError::MissingStrategy(DELTA_ID))?;

        let mut games = Vec::new();
        for _ in 0..request.count {
            let numbers = delta
                .generate(config, config.picked_numbers, rng)
                .ok_or(EngineError::ExhaustedRange {
                    available: config.total_numbers as usize,
                    needed: config.picked_numbers,
                })?;
            games.push(self.score_game(numbers, config, |_| true));
        }

        Ok(Generation { games, wheel: None, attempts: request.count })
    }

    fn generate_matrix(
        &self,
        config: &LotteryConfig,
        request: &EngineRequest,
        rng: &mut StdRng,
    ) -> Result<Generation, EngineError> {
        let matrix = request.matrix.as_ref().ok_or(EngineError::MissingMatrixRequest)?;

        let pool = matrix_pool(config, request, matrix, rng)?;

        let mut params = WheelParams::new(config.picked_numbers, matrix.guarantee);
        if let Some(condition) = matrix.condition {
            params = params.with_condition(condition);
        }
        let wheel = self.wheel.generate(&pool, params)?;
        if !wheel.complete {
            log::warn!("matrix wheel left {} tuples uncovered", wheel.uncovered);
        }

        let games = wheel
            .tickets
            .iter()
            .map(|ticket| self.score_game(ticket.clone(), config, |_| true))
            .collect();

        Ok(Generation { games, wheel: Some(wheel), attempts: 1 })
    }

    /// Weighted average of the selected filter strategies, rounded.
    fn score_game<F>(&self, numbers: Vec<u32>, config: &LotteryConfig, select: F) -> Game
    where
        F: Fn(&dyn Strategy) -> bool,
    {
        let mut weighted_sum = 0u32;
        let mut total_weight = 0u32;
        let mut results = Vec::new();

        for strategy in self.strategies.iter().filter(|s| s.kind() == StrategyKind::Filter) {
            if !select(&**strategy) {
                continue;
            }
            if let Some(result) = strategy.validate(&numbers, config) {
                weighted_sum += result.score * strategy.weight();
                total_weight += strategy.weight();
                results.push(result);
            }
        }

        let total_score = if total_weight > 0 {
            (weighted_sum as f64 / total_weight as f64).round() as u32
        } else {
            0
        };

        Game {
            lottery: config.kind,
            numbers,
            total_score,
            results,
            category: if total_score > SNIPER_SCORE { Category::Sniper } else { Category::Balanced },
        }
    }
}

fn attempt_cap(count: usize, per_game: usize) -> usize {
    count.saturating_mul(per_game)
}

/// Pool to wheel: the caller's pool, the hottest numbers or random ones, always holding the
/// fixed numbers and never an excluded one.
fn matrix_pool(
    config: &LotteryConfig,
    request: &EngineRequest,
    matrix: &MatrixRequest,
    rng: &mut StdRng,
) -> Result<Vec<u32>, EngineError> {
    let mut fixed = request.fixed.clone();
    fixed.sort_unstable();
    fixed.dedup();
    check_range(&fixed, config)?;

    let pool = match (&matrix.pool, &request.stats) {
        (Some(given), _) => {
            check_range(given, config)?;
            let mut pool = given.clone();
            pool.extend(fixed.iter().filter(|n| !given.contains(n)));
            pool
        }
        (None, Some(stats)) => {
            if fixed.len() > matrix.pool_size {
                return Err(EngineError::TooManyFixed { fixed: fixed.len(), size: matrix.pool_size });
            }
            let needed = matrix.pool_size - fixed.len();
            let hot: Vec<u32> = stats
                .top_numbers(usize::MAX)
                .into_iter()
                .filter(|n| !fixed.contains(n) && !request.excluded.contains(n))
                .take(needed)
                .collect();
            if hot.len() < needed {
                return Err(EngineError::ExhaustedRange { available: hot.len(), needed });
            }
            let mut pool = fixed.clone();
            pool.extend(hot);
            pool
        }
        (None, None) => random_numbers(config, &fixed, &request.excluded, matrix.pool_size, rng)?,
    };

    match pool.iter().find(|n| request.excluded.contains(n)) {
        Some(&number) => Err(EngineError::ExcludedInPool { number }),
        None => Ok(pool),
    }
}

fn check_range(numbers: &[u32], config: &LotteryConfig) -> Result<(), EngineError> {
    match numbers.iter().find(|&&n| n < 1 || n > config.total_numbers) {
        Some(&number) => Err(EngineError::OutOfRange { number, total: config.total_numbers }),
        None => Ok(()),
    }
}

/// `fixed` plus uniformly drawn numbers, avoiding `excluded`, sorted ascending.
fn random_numbers(
    config: &LotteryConfig,
    fixed: &[u32],
    excluded: &[u32],
    size: usize,
    rng: &mut StdRng,
) -> Result<Vec<u32>, EngineError> {
    let mut picked = fixed.to_vec();
    picked.sort_unstable();
    picked.dedup();
    fill_random(config, picked, excluded, size, rng)
}

/// Up to three hot numbers on top of `fixed`, the rest uniform.
fn biased_numbers(
    config: &LotteryConfig,
    stats: &GameStats,
    fixed: &[u32],
    excluded: &[u32],
    rng: &mut StdRng,
) -> Result<Vec<u32>, EngineError> {
    let size = config.picked_numbers;
    let mut picked = fixed.to_vec();
    picked.sort_unstable();
    picked.dedup();

    let mut hot: Vec<u32> = stats
        .hot_numbers
        .iter()
        .copied()
        .filter(|n| !picked.contains(n) && !excluded.contains(n) && *n >= 1 && *n <= config.total_numbers)
        .collect();
    let to_pick = HOT_PICKS.min(hot.len()).min(size.saturating_sub(picked.len()));
    for _ in 0..to_pick {
        let idx = rng.random_range(0..hot.len());
        picked.push(hot.remove(idx));
    }

    fill_random(config, picked, excluded, size, rng)
}

fn fill_random(
    config: &LotteryConfig,
    mut picked: Vec<u32>,
    excluded: &[u32],
    size: usize,
    rng: &mut StdRng,
) -> Result<Vec<u32>, EngineError> {
    if picked.len() > size {
        return Err(EngineError::TooManyFixed { fixed: picked.len(), size });
    }
    check_range(&picked, config)?;

    let available: Vec<u32> = (1..=config.total_numbers)
        .filter(|n| !picked.contains(n) && !excluded.contains(n))
        .collect();
    let needed = size - picked.len();
    if available.len() < needed {
        return Err(EngineError::ExhaustedRange { available: available.len(), needed });
    }

    for idx in rand::seq::index::sample(rng, available.len(), needed) {
        picked.push(available[idx]);
    }
    picked.sort_unstable();
    Ok(picked)
}

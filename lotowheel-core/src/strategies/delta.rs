use rand::Rng;
use rand::rngs::StdRng;

use lotowheel_db::models::LotteryConfig;

use super::{Strategy, StrategyKind, StrategyResult, DELTA_ID};

const MAX_ATTEMPTS: usize = 100;

/// Builds games from small gaps between consecutive numbers.
pub struct DeltaStrategy;

fn sample_uniform(total: u32, size: usize, rng: &mut StdRng) -> Vec<u32> {
    let mut numbers: Vec<u32> = rand::seq::index::sample(rng, total as usize, size)
        .into_iter()
        .map(|i| i as u32 + 1)
        .collect();
    numbers.sort_unstable();
    numbers
}

impl Strategy for DeltaStrategy {
    fn id(&self) -> &'static str {
        DELTA_ID
    }

    fn name(&self) -> &'static str {
        "Delta system"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Generator
    }

    fn weight(&self) -> u32 {
        9
    }

    fn generate(&self, config: &LotteryConfig, size: usize, rng: &mut StdRng) -> Option<Vec<u32>> {
        let total = config.total_numbers;
        if size == 0 || size > total as usize {
            return None;
        }

        let spread = ((total as f64 / size as f64 * 1.5).floor() as u32).max(1);

        for _ in 0..MAX_ATTEMPTS {
            let deltas: Vec<u32> = (0..size).map(|_| rng.random_range(1..=spread)).collect();
            if deltas.iter().sum::<u32>() > total {
                continue;
            }
            // Deltas are at least 1, so prefix sums are strictly increasing.
            let numbers: Vec<u32> = deltas
                .iter()
                .scan(0u32, |acc, &d| {
                    *acc += d;
                    Some(*acc)
                })
                .collect();
            return Some(numbers);
        }

        log::debug!("delta generation fell back to uniform sampling");
        Some(sample_uniform(total, size, rng))
    }

    fn validate(&self, _numbers: &[u32], _config: &LotteryConfig) -> Option<StrategyResult> {
        Some(StrategyResult {
            name: self.name().to_string(),
            score: 85,
            is_valid: true,
            reason: None,
        })
    }
}

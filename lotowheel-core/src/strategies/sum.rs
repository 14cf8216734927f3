use lotowheel_db::models::LotteryConfig;

use super::{Strategy, StrategyKind, StrategyResult, SUM_ID};

/// Sum of the numbers against the lottery's usual range, 2 points lost per unit outside.
pub struct SumStrategy;

impl Strategy for SumStrategy {
    fn id(&self) -> &'static str {
        SUM_ID
    }

    fn name(&self) -> &'static str {
        "Sum range"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Filter
    }

    fn weight(&self) -> u32 {
        8
    }

    fn validate(&self, numbers: &[u32], config: &LotteryConfig) -> Option<StrategyResult> {
        let sum: u32 = numbers.iter().sum();
        let range = config.sum_range;

        if range.contains(sum) {
            return Some(StrategyResult {
                name: self.name().to_string(),
                score: 100,
                is_valid: true,
                reason: Some(format!("sum {sum} within {}-{}", range.min, range.max)),
            });
        }

        let dist = if sum < range.min { range.min - sum } else { sum - range.max };
        let penalty = dist.saturating_mul(2).min(100);

        Some(StrategyResult {
            name: self.name().to_string(),
            score: 100 - penalty,
            is_valid: penalty < 50,
            reason: Some(format!("sum {sum} outside {}-{}", range.min, range.max)),
        })
    }
}

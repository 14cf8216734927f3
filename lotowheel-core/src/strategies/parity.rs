use lotowheel_db::models::LotteryConfig;

use super::{Strategy, StrategyKind, StrategyResult, PARITY_ID};

pub struct ParityStrategy;

impl Strategy for ParityStrategy {
    fn id(&self) -> &'static str {
        PARITY_ID
    }

    fn name(&self) -> &'static str {
        "Even/odd balance"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Filter
    }

    fn weight(&self) -> u32 {
        7
    }

    fn validate(&self, numbers: &[u32], config: &LotteryConfig) -> Option<StrategyResult> {
        let even = numbers.iter().filter(|&&n| n % 2 == 0).count() as u32;
        let range = config.even_range;
        let in_range = range.contains(even);

        Some(StrategyResult {
            name: self.name().to_string(),
            score: if in_range { 100 } else { 40 },
            is_valid: in_range,
            reason: Some(format!("{even} even (ideal {}-{})", range.min, range.max)),
        })
    }
}

pub mod delta;
pub mod frame;
pub mod parity;
pub mod sum;

use rand::rngs::StdRng;
use serde::Serialize;

use lotowheel_db::models::LotteryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrategyKind {
    /// Checks an existing game.
    Filter,
    /// Builds games on its own.
    Generator,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyResult {
    pub name: String,
    /// 0 to 100.
    pub score: u32,
    pub is_valid: bool,
    pub reason: Option<String>,
}

pub trait Strategy: Send + Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn kind(&self) -> StrategyKind;
    /// Relative importance in the weighted game score (1-10).
    fn weight(&self) -> u32;

    fn validate(&self, _numbers: &[u32], _config: &LotteryConfig) -> Option<StrategyResult> {
        None
    }

    /// Ascending game of `size` numbers, or `None` when the strategy cannot build one.
    fn generate(&self, _config: &LotteryConfig, _size: usize, _rng: &mut StdRng) -> Option<Vec<u32>> {
        None
    }
}

pub const SUM_ID: &str = "sum-gauss";
pub const PARITY_ID: &str = "parity-balance";
pub const FRAME_ID: &str = "frame-border";
pub const DELTA_ID: &str = "delta-system";

pub fn all_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(sum::SumStrategy),
        Box::new(parity::ParityStrategy),
        Box::new(frame::FrameStrategy),
        Box::new(delta::DeltaStrategy),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_strategies_unique_ids() {
        let strategies = all_strategies();
        let mut ids: Vec<&str> = strategies.iter().map(|s| s.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), strategies.len());
    }

    #[test]
    fn test_weights_in_range() {
        for s in all_strategies() {
            assert!((1..=10).contains(&s.weight()), "{}: {}", s.id(), s.weight());
        }
    }

    #[test]
    fn test_only_delta_generates() {
        let generators: Vec<&str> = all_strategies()
            .iter()
            .filter(|s| s.kind() == StrategyKind::Generator)
            .map(|s| s.id())
            .collect();
        assert_eq!(generators, vec![DELTA_ID]);
    }
}

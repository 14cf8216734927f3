use lotowheel_db::models::{LotteryConfig, LotteryKind};

use super::{Strategy, StrategyKind, StrategyResult, FRAME_ID};

/// Counts numbers on the border of the betting slip grid.
pub struct FrameStrategy;

fn is_frame(n: u32, cols: u32, rows: u32) -> bool {
    n <= cols || n > (rows - 1) * cols || n % cols == 1 || n % cols == 0
}

fn ideal_range(config: &LotteryConfig) -> (usize, usize) {
    match config.kind {
        LotteryKind::Megasena => (1, 4),
        LotteryKind::Lotofacil => (8, 11),
        _ => {
            let picked = config.picked_numbers as f64;
            ((picked * 0.3).floor() as usize, (picked * 0.7).ceil() as usize)
        }
    }
}

impl Strategy for FrameStrategy {
    fn id(&self) -> &'static str {
        FRAME_ID
    }

    fn name(&self) -> &'static str {
        "Frame"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Filter
    }

    fn weight(&self) -> u32 {
        6
    }

    fn validate(&self, numbers: &[u32], config: &LotteryConfig) -> Option<StrategyResult> {
        if !config.has_frame || config.cols == 0 {
            return Some(StrategyResult {
                name: self.name().to_string(),
                score: 100,
                is_valid: true,
                reason: Some("N/A".to_string()),
            });
        }

        let cols = config.cols;
        let rows = config.total_numbers.div_ceil(cols).max(1);
        let on_frame = numbers.iter().filter(|&&n| is_frame(n, cols, rows)).count();
        let (min, max) = ideal_range(config);
        let in_range = on_frame >= min && on_frame <= max;

        // Off-range frames lower the score but never invalidate the game.
        Some(StrategyResult {
            name: self.name().to_string(),
            score: if in_range { 100 } else { 50 },
            is_valid: true,
            reason: Some(format!("{on_frame} on the frame (ideal {min}-{max})")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_cells_megasena() {
        // 10 columns, 6 rows
        assert!(is_frame(1, 10, 6));
        assert!(is_frame(10, 10, 6));
        assert!(is_frame(21, 10, 6));
        assert!(is_frame(30, 10, 6));
        assert!(is_frame(55, 10, 6));
        assert!(!is_frame(12, 10, 6));
        assert!(!is_frame(45, 10, 6));
    }

    #[test]
    fn test_in_range() {
        let config = LotteryKind::Megasena.config();
        let res = FrameStrategy.validate(&[1, 12, 23, 34, 45, 56], &config).unwrap();
        assert_eq!(res.score, 100);
    }

    #[test]
    fn test_out_of_range_still_valid() {
        let config = LotteryKind::Megasena.config();
        let res = FrameStrategy.validate(&[1, 2, 3, 4, 5, 6], &config).unwrap();
        assert_eq!(res.score, 50);
        assert!(res.is_valid);
    }

    #[test]
    fn test_no_frame_lottery() {
        let config = LotteryKind::Quina.config();
        let res = FrameStrategy.validate(&[1, 2, 3, 4, 5], &config).unwrap();
        assert_eq!(res.score, 100);
        assert_eq!(res.reason.as_deref(), Some("N/A"));
    }

    #[test]
    fn test_generic_range() {
        let config = LotteryKind::Timemania.config();
        assert_eq!(ideal_range(&config), (3, 7));
    }
}

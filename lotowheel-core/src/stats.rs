use std::collections::{BTreeMap, HashSet};

use lotowheel_db::models::{Draw, LotteryConfig, NumberStats};

const HOT_COLD_SIZE: usize = 10;

/// Aggregates over a draw history, consumed as opaque input by the generators.
#[derive(Debug, Clone, Default)]
pub struct GameStats {
    pub frequency: BTreeMap<u32, u32>,
    /// Draws since each number last appeared; the history length if it never did.
    pub delays: BTreeMap<u32, u32>,
    pub hot_numbers: Vec<u32>,
    pub cold_numbers: Vec<u32>,
    pub last_draw: Vec<u32>,
    drawn: HashSet<Vec<u32>>,
}

impl GameStats {
    /// `draws[0]` is the most recent draw.
    pub fn from_history(draws: &[Draw], config: &LotteryConfig) -> Self {
        let mut frequency: BTreeMap<u32, u32> = config.number_range().map(|n| (n, 0)).collect();
        let mut delays: BTreeMap<u32, u32> = config.number_range().map(|n| (n, draws.len() as u32)).collect();
        let mut drawn = HashSet::with_capacity(draws.len());

        for (i, draw) in draws.iter().enumerate() {
            for &n in &draw.numbers {
                if let Some(count) = frequency.get_mut(&n) {
                    *count += 1;
                }
                if let Some(delay) = delays.get_mut(&n) {
                    if *delay == draws.len() as u32 {
                        *delay = i as u32;
                    }
                }
            }
            drawn.insert(draw.sorted_numbers());
        }

        let mut by_frequency: Vec<(u32, u32)> = frequency.iter().map(|(&n, &f)| (n, f)).collect();
        by_frequency.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let hot_numbers = by_frequency.iter().take(HOT_COLD_SIZE).map(|&(n, _)| n).collect();

        by_frequency.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        let cold_numbers = by_frequency.iter().take(HOT_COLD_SIZE).map(|&(n, _)| n).collect();

        Self {
            frequency,
            delays,
            hot_numbers,
            cold_numbers,
            last_draw: draws.first().map(|d| d.sorted_numbers()).unwrap_or_default(),
            drawn,
        }
    }

    /// Whether this exact combination already came out.
    pub fn was_drawn(&self, numbers: &[u32]) -> bool {
        let mut sorted = numbers.to_vec();
        sorted.sort_unstable();
        self.drawn.contains(&sorted)
    }

    /// The `n` most frequent numbers, ties broken by the smaller number.
    pub fn top_numbers(&self, n: usize) -> Vec<u32> {
        let mut ranked: Vec<(u32, u32)> = self.frequency.iter().map(|(&num, &f)| (num, f)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.into_iter().take(n).map(|(num, _)| num).collect()
    }

    pub fn number_stats(&self) -> Vec<NumberStats> {
        self.frequency
            .iter()
            .map(|(&number, &frequency)| NumberStats {
                number,
                frequency,
                gap: self.delays.get(&number).copied().unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn make_test_draws(history: &[&[u32]]) -> Vec<Draw> {
    use lotowheel_db::models::LotteryKind;

    history
        .iter()
        .enumerate()
        .map(|(i, numbers)| Draw {
            lottery: LotteryKind::Megasena,
            contest: (history.len() - i) as u32,
            date: format!("2024-01-{:02}", history.len() - i),
            numbers: numbers.to_vec(),
            is_special: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotowheel_db::models::LotteryKind;

    #[test]
    fn test_frequency_and_delay() {
        let draws = make_test_draws(&[&[1, 2, 3, 4, 5, 6], &[1, 7, 8, 9, 10, 11], &[1, 2, 12, 13, 14, 15]]);
        let stats = GameStats::from_history(&draws, &LotteryKind::Megasena.config());

        assert_eq!(stats.frequency[&1], 3);
        assert_eq!(stats.frequency[&2], 2);
        assert_eq!(stats.frequency[&60], 0);

        assert_eq!(stats.delays[&1], 0);
        assert_eq!(stats.delays[&7], 1);
        assert_eq!(stats.delays[&12], 2);
        assert_eq!(stats.delays[&60], 3);
    }

    #[test]
    fn test_hot_and_cold() {
        let draws = make_test_draws(&[&[1, 2, 3, 4, 5, 6], &[1, 2, 8, 9, 10, 11]]);
        let stats = GameStats::from_history(&draws, &LotteryKind::Megasena.config());
        assert_eq!(&stats.hot_numbers[..3], &[1, 2, 3]);
        assert_eq!(stats.hot_numbers.len(), 10);
        assert_eq!(stats.cold_numbers[0], 7);
        assert!(!stats.cold_numbers.contains(&1));
    }

    #[test]
    fn test_was_drawn_ignores_order() {
        let draws = make_test_draws(&[&[41, 5, 4, 52, 30, 33]]);
        let stats = GameStats::from_history(&draws, &LotteryKind::Megasena.config());
        assert!(stats.was_drawn(&[4, 5, 30, 33, 41, 52]));
        assert!(stats.was_drawn(&[52, 41, 33, 30, 5, 4]));
        assert!(!stats.was_drawn(&[4, 5, 30, 33, 41, 53]));
        assert_eq!(stats.last_draw, vec![4, 5, 30, 33, 41, 52]);
    }

    #[test]
    fn test_top_numbers() {
        let draws = make_test_draws(&[&[10, 20, 30, 40, 50, 60], &[10, 20, 30, 1, 2, 3], &[10, 4, 5, 6, 7, 8]]);
        let stats = GameStats::from_history(&draws, &LotteryKind::Megasena.config());
        assert_eq!(stats.top_numbers(4), vec![10, 20, 30, 1]);
    }

    #[test]
    fn test_digit_columns_count_zero() {
        let draws = vec![Draw {
            lottery: LotteryKind::Supersete,
            contest: 1,
            date: "2020-10-02".to_string(),
            numbers: vec![0, 5, 5, 3, 9, 1, 2],
            is_special: false,
        }];
        let stats = GameStats::from_history(&draws, &LotteryKind::Supersete.config());
        assert_eq!(stats.frequency.len(), 10);
        assert_eq!(stats.frequency[&0], 1);
        assert_eq!(stats.frequency[&5], 2);
        assert_eq!(stats.delays[&4], 1);
    }

    #[test]
    fn test_empty_history() {
        let stats = GameStats::from_history(&[], &LotteryKind::Lotofacil.config());
        assert_eq!(stats.frequency.len(), 25);
        assert!(stats.last_draw.is_empty());
        assert!(stats.delays.values().all(|&d| d == 0));
        assert_eq!(stats.number_stats().len(), 25);
    }
}

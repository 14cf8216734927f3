use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub lottery: LotteryKind,
    pub contest: u32,
    pub date: String,
    pub numbers: Vec<u32>,
    pub is_special: bool,
}

impl Draw {
    /// Numbers sorted ascending, the canonical form used for history lookups.
    pub fn sorted_numbers(&self) -> Vec<u32> {
        let mut numbers = self.numbers.clone();
        numbers.sort_unstable();
        numbers
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LotteryKind {
    Megasena,
    Lotofacil,
    Quina,
    Lotomania,
    Timemania,
    Duplasena,
    Diadesorte,
    Maismilionaria,
    Supersete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// How the numbers of one draw relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawRule {
    /// Distinct numbers in `1..=total_numbers`.
    Distinct,
    /// Distinct numbers in `1..=total_numbers`, exports write the highest one as `00`.
    DistinctZeroIsMax,
    /// One digit `0..=9` per column, repeats allowed; exactly one number per column.
    DigitPerColumn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotteryConfig {
    pub kind: LotteryKind,
    pub name: &'static str,
    pub total_numbers: u32,
    pub picked_numbers: usize,
    pub cols: u32,
    pub sum_range: Bounds,
    pub even_range: Bounds,
    pub has_frame: bool,
    pub draw_rule: DrawRule,
}

impl LotteryConfig {
    /// Maps an exported value to the number it stands for.
    pub fn normalize(&self, raw: u32) -> u32 {
        match self.draw_rule {
            DrawRule::DistinctZeroIsMax if raw == 0 => self.total_numbers,
            _ => raw,
        }
    }

    pub fn number_range(&self) -> std::ops::RangeInclusive<u32> {
        match self.draw_rule {
            DrawRule::DigitPerColumn => 0..=9,
            DrawRule::Distinct | DrawRule::DistinctZeroIsMax => 1..=self.total_numbers,
        }
    }
}

impl LotteryKind {
    pub const ALL: [LotteryKind; 9] = [
        LotteryKind::Megasena,
        LotteryKind::Lotofacil,
        LotteryKind::Quina,
        LotteryKind::Lotomania,
        LotteryKind::Timemania,
        LotteryKind::Duplasena,
        LotteryKind::Diadesorte,
        LotteryKind::Maismilionaria,
        LotteryKind::Supersete,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            LotteryKind::Megasena => "megasena",
            LotteryKind::Lotofacil => "lotofacil",
            LotteryKind::Quina => "quina",
            LotteryKind::Lotomania => "lotomania",
            LotteryKind::Timemania => "timemania",
            LotteryKind::Duplasena => "duplasena",
            LotteryKind::Diadesorte => "diadesorte",
            LotteryKind::Maismilionaria => "maismilionaria",
            LotteryKind::Supersete => "supersete",
        }
    }

    pub fn from_slug(slug: &str) -> Result<Self> {
        let slug = slug.trim().to_lowercase();
        match Self::ALL.iter().find(|k| k.slug() == slug) {
            Some(kind) => Ok(*kind),
            None => bail!("Unknown lottery '{}'", slug),
        }
    }

    pub fn config(&self) -> LotteryConfig {
        use DrawRule::*;
        let (name, total_numbers, picked_numbers, cols, sum_range, even_range, has_frame, draw_rule) =
            match self {
                LotteryKind::Megasena => ("Mega Sena", 60, 6, 10, Bounds::new(130, 230), Bounds::new(2, 4), true, Distinct),
                LotteryKind::Lotofacil => ("Lotofácil", 25, 15, 5, Bounds::new(180, 220), Bounds::new(6, 9), true, Distinct),
                LotteryKind::Quina => ("Quina", 80, 5, 10, Bounds::new(160, 240), Bounds::new(1, 4), false, Distinct),
                LotteryKind::Lotomania => ("Lotomania", 100, 50, 10, Bounds::new(2100, 3000), Bounds::new(20, 30), true, DistinctZeroIsMax),
                LotteryKind::Timemania => ("Timemania", 80, 10, 10, Bounds::new(300, 500), Bounds::new(3, 7), true, Distinct),
                LotteryKind::Duplasena => ("Dupla Sena", 50, 6, 10, Bounds::new(120, 190), Bounds::new(2, 4), true, Distinct),
                LotteryKind::Diadesorte => ("Dia de Sorte", 31, 7, 7, Bounds::new(80, 150), Bounds::new(2, 5), false, Distinct),
                LotteryKind::Maismilionaria => ("+Milionária", 50, 6, 10, Bounds::new(120, 190), Bounds::new(2, 4), true, Distinct),
                LotteryKind::Supersete => ("Super Sete", 10, 7, 1, Bounds::new(20, 50), Bounds::new(2, 5), false, DigitPerColumn),
            };
        LotteryConfig {
            kind: *self,
            name,
            total_numbers,
            picked_numbers,
            cols,
            sum_range,
            even_range,
            has_frame,
            draw_rule,
        }
    }
}

impl std::fmt::Display for LotteryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[derive(Debug, Clone)]
pub struct NumberStats {
    pub number: u32,
    pub frequency: u32,
    pub gap: u32,
}

pub fn validate_draw(numbers: &[u32], config: &LotteryConfig) -> Result<()> {
    if numbers.is_empty() {
        bail!("Empty draw");
    }
    let range = config.number_range();
    for &n in numbers {
        if !range.contains(&n) {
            bail!("Number {} out of range ({}-{})", n, range.start(), range.end());
        }
    }
    if config.draw_rule == DrawRule::DigitPerColumn {
        if numbers.len() != config.picked_numbers {
            bail!("Expected {} columns, got {}", config.picked_numbers, numbers.len());
        }
        return Ok(());
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Duplicate number: {}", numbers[i]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draw_ok() {
        let config = LotteryKind::Megasena.config();
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], &config).is_ok());
        assert!(validate_draw(&[60, 59, 58, 57, 56, 55], &config).is_ok());
    }

    #[test]
    fn test_validate_draw_out_of_range() {
        let config = LotteryKind::Megasena.config();
        assert!(validate_draw(&[0, 2, 3, 4, 5, 6], &config).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 61], &config).is_err());
    }

    #[test]
    fn test_validate_draw_duplicates() {
        let config = LotteryKind::Quina.config();
        assert!(validate_draw(&[1, 1, 3, 4, 5], &config).is_err());
    }

    #[test]
    fn test_digit_columns_allow_zero_and_repeats() {
        let config = LotteryKind::Supersete.config();
        assert!(validate_draw(&[0, 5, 5, 3, 9, 1, 2], &config).is_ok());
        assert!(validate_draw(&[0, 5, 5, 3, 10, 1, 2], &config).is_err());
        assert!(validate_draw(&[0, 5, 5, 3, 9, 1], &config).is_err(), "one digit per column");
        assert_eq!(config.number_range(), 0..=9);
    }

    #[test]
    fn test_zero_is_max() {
        let mania = LotteryKind::Lotomania.config();
        assert_eq!(mania.normalize(0), 100);
        assert_eq!(mania.normalize(37), 37);
        assert!(validate_draw(&[0, 1, 2], &mania).is_err(), "normalize before validating");
        assert!(validate_draw(&[100, 1, 2], &mania).is_ok());

        let mega = LotteryKind::Megasena.config();
        assert_eq!(mega.normalize(0), 0);
    }

    #[test]
    fn test_slug_roundtrip() {
        for kind in LotteryKind::ALL {
            assert_eq!(LotteryKind::from_slug(kind.slug()).unwrap(), kind);
        }
        assert_eq!(LotteryKind::from_slug(" MegaSena ").unwrap(), LotteryKind::Megasena);
        assert!(LotteryKind::from_slug("euromillions").is_err());
    }

    #[test]
    fn test_config_table() {
        let mega = LotteryKind::Megasena.config();
        assert_eq!(mega.total_numbers, 60);
        assert_eq!(mega.picked_numbers, 6);
        assert_eq!(mega.sum_range, Bounds::new(130, 230));

        let facil = LotteryKind::Lotofacil.config();
        assert_eq!(facil.picked_numbers, 15);
        assert_eq!(facil.cols, 5);
        assert!(!LotteryKind::Quina.config().has_frame);
    }

    #[test]
    fn test_sorted_numbers() {
        let draw = Draw {
            lottery: LotteryKind::Megasena,
            contest: 1,
            date: "1996-03-11".to_string(),
            numbers: vec![41, 5, 4, 52, 30, 33],
            is_special: false,
        };
        assert_eq!(draw.sorted_numbers(), vec![4, 5, 30, 33, 41, 52]);
    }
}

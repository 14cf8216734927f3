use lotowheel_db::models::Draw;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub hits: usize,
    pub matched: Vec<u32>,
    pub contest: u32,
    pub date: String,
}

/// Best past match of `numbers` with at least `min_hits` hits.
///
/// A draw matching every number ends the search. Among equal hit counts the first draw in
/// `history` wins, which is the most recent one for histories read from the store.
pub fn check_game(numbers: &[u32], history: &[Draw], min_hits: usize) -> Option<CheckResult> {
    let mut best: Option<CheckResult> = None;

    for draw in history {
        let matched: Vec<u32> = numbers
            .iter()
            .copied()
            .filter(|n| draw.numbers.contains(n))
            .collect();
        let hits = matched.len();
        if hits < min_hits || hits == 0 {
            continue;
        }

        let result = CheckResult {
            hits,
            matched,
            contest: draw.contest,
            date: draw.date.clone(),
        };
        if hits == numbers.len().min(draw.numbers.len()) {
            return Some(result);
        }
        if best.as_ref().is_none_or(|b| hits > b.hits) {
            best = Some(result);
        }
    }

    best
}

/// Lazy iterator over the `size`-subsets of `source`, in lexicographic index order.
///
/// Keeps one ascending index vector; each step advances the right-most index that can
/// still move and resets everything to its right to consecutive values. Every call to
/// [`combinations`] builds an independent iterator, so two calls yield the same sequence.
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    source: &'a [T],
    indices: Vec<usize>,
    done: bool,
}

pub fn combinations<T: Clone>(source: &[T], size: usize) -> Combinations<'_, T> {
    let done = size == 0 || size > source.len();
    Combinations {
        source,
        indices: (0..size).collect(),
        done,
    }
}

impl<T: Clone> Combinations<'_, T> {
    fn advance(&mut self) {
        let n = self.source.len();
        let k = self.indices.len();

        let mut i = k;
        while i > 0 && self.indices[i - 1] == n - k + i - 1 {
            i -= 1;
        }
        if i == 0 {
            self.done = true;
            return;
        }

        let pivot = i - 1;
        self.indices[pivot] += 1;
        for j in (pivot + 1)..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
    }
}

impl<T: Clone> Iterator for Combinations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.iter().map(|&i| self.source[i].clone()).collect();
        self.advance();
        Some(current)
    }
}

/// Calls `f` with each `size`-subset of `source`, in the same order as [`combinations`],
/// through one reused buffer.
pub fn for_each_combination<T, F>(source: &[T], size: usize, mut f: F)
where
    T: Clone,
    F: FnMut(&[T]),
{
    let mut iter = combinations(source, size);
    let mut buf: Vec<T> = Vec::with_capacity(size);
    while !iter.done {
        buf.clear();
        buf.extend(iter.indices.iter().map(|&i| source[i].clone()));
        f(&buf);
        iter.advance();
    }
}

/// C(n, k), saturating at `u128::MAX`.
pub fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result = 1u128;
    for i in 0..k {
        // Exact at every step: result * (n - i) is divisible by (i + 1).
        result = match result.checked_mul((n - i) as u128) {
            Some(v) => v / (i as u128 + 1),
            None => return u128::MAX,
        };
    }
    result
}

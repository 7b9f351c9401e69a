//! Sequence-similarity ratio between two strings.
//!
//! Matching follows the Ratcliff/Obershelp scheme: take the longest block
//! shared by both sides, then recurse into the text left and right of it.
//! The ratio is `2 * M / (|a| + |b|)` where `M` counts the characters in all
//! matched blocks. Two empty strings are identical and score 1.0.
//!
//! When `b` has at least [`AUTOJUNK_MIN_LEN`] characters, characters that
//! make up more than one percent of it are not used to seed a block. They
//! can still extend a block found through other characters.

use std::collections::{HashMap, HashSet};

/// Length of `b` from which frequent characters stop seeding matches.
pub const AUTOJUNK_MIN_LEN: usize = 200;

/// Returns the similarity ratio of `a` and `b` in `[0.0, 1.0]`.
///
/// The frequent-character rule only looks at `b`, so swapping the arguments
/// can change the result for long inputs and for inputs with several
/// equally long shared blocks.
#[must_use]
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matcher = Matcher::new(&a, &b);
    2.0 * matcher.matched_len() as f64 / total as f64
}

/// A block of `len` characters starting at `a[a_start]` and `b[b_start]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    a_start: usize,
    b_start: usize,
    len: usize,
}

struct Matcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each seeding character in `b`, ascending.
    positions: HashMap<char, Vec<usize>>,
}

impl<'a> Matcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &ch) in b.iter().enumerate() {
            positions.entry(ch).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            let popular: HashSet<char> = positions
                .iter()
                .filter(|(_, at)| at.len() > limit)
                .map(|(&ch, _)| ch)
                .collect();
            positions.retain(|ch, _| !popular.contains(ch));
        }

        Self { a, b, positions }
    }

    /// Total length of all matched blocks.
    fn matched_len(&self) -> usize {
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        let mut matched = 0;

        while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
            let block = self.longest_block(a_lo, a_hi, b_lo, b_hi);
            if block.len == 0 {
                continue;
            }
            matched += block.len;

            if a_lo < block.a_start && b_lo < block.b_start {
                pending.push((a_lo, block.a_start, b_lo, block.b_start));
            }
            let a_end = block.a_start + block.len;
            let b_end = block.b_start + block.len;
            if a_end < a_hi && b_end < b_hi {
                pending.push((a_end, a_hi, b_end, b_hi));
            }
        }

        matched
    }

    /// Longest block inside `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    fn longest_block(&self, a_lo: usize, a_hi: usize, b_lo: usize, b_hi: usize) -> Block {
        let mut best = Block {
            a_start: a_lo,
            b_start: b_lo,
            len: 0,
        };

        // run_ending_at[j] = length of the match ending at a[i - 1], b[j].
        let mut run_ending_at: HashMap<usize, usize> = HashMap::new();
        for i in a_lo..a_hi {
            let mut next_runs = HashMap::new();
            if let Some(at) = self.positions.get(&self.a[i]) {
                for &j in at {
                    if j < b_lo {
                        continue;
                    }
                    if j >= b_hi {
                        break;
                    }
                    let run = j
                        .checked_sub(1)
                        .and_then(|prev| run_ending_at.get(&prev))
                        .map_or(1, |run| run + 1);
                    next_runs.insert(j, run);
                    if run > best.len {
                        best = Block {
                            a_start: i + 1 - run,
                            b_start: j + 1 - run,
                            len: run,
                        };
                    }
                }
            }
            run_ending_at = next_runs;
        }

        // Frequent characters never seed a block but may widen one.
        while best.a_start > a_lo
            && best.b_start > b_lo
            && self.a[best.a_start - 1] == self.b[best.b_start - 1]
        {
            best.a_start -= 1;
            best.b_start -= 1;
            best.len += 1;
        }
        while best.a_start + best.len < a_hi
            && best.b_start + best.len < b_hi
            && self.a[best.a_start + best.len] == self.b[best.b_start + best.len]
        {
            best.len += 1;
        }

        best
    }
}

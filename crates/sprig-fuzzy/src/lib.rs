//! Fuzzy matching for completion ranking.
//!
//! Matching is ASCII case-insensitive. A candidate that starts with the query is a
//! [`MatchKind::Prefix`] match and always outranks subsequence ([`MatchKind::Fuzzy`]) matches.
//! Subsequence matches are scored with a small dynamic program that rewards word starts
//! (`camelCase` humps, separators) and consecutive runs, and penalizes gaps.
//!
//! Every match has a strictly positive score; `None` means "no match".

#![forbid(unsafe_code)]

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Prefix,
    Fuzzy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub kind: MatchKind,
    /// Always `>= 1`.
    pub score: i32,
}

/// Sort key: prefix matches first, then by score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankKey {
    kind_rank: u8,
    score: i32,
}

impl MatchScore {
    pub fn rank_key(self) -> RankKey {
        RankKey {
            kind_rank: match self.kind {
                MatchKind::Prefix => 1,
                MatchKind::Fuzzy => 0,
            },
            score: self.score,
        }
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.kind_rank, self.score).cmp(&(other.kind_rank, other.score))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One-shot convenience over [`FuzzyMatcher`].
pub fn fuzzy_match(query: &str, candidate: &str) -> Option<MatchScore> {
    FuzzyMatcher::new(query).score(candidate)
}

const BASE_MATCH: i32 = 10;
const BONUS_WORD_START: i32 = 15;
const BONUS_CONSECUTIVE: i32 = 5;
const BONUS_EXACT_CASE: i32 = 2;
const GAP_PENALTY: i32 = 1;
const LEADING_PENALTY: i32 = 1;
const PREFIX_BASE: i32 = 1_000_000;
const NONE: i32 = i32::MIN / 4;

/// Matcher for one query, reusable across candidates without reallocating.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    query: Vec<u8>,
    folded: Vec<u8>,
    prev: Vec<i32>,
    cur: Vec<i32>,
}

impl FuzzyMatcher {
    pub fn new(query: &str) -> Self {
        let query = query.as_bytes().to_vec();
        let folded = query.iter().map(u8::to_ascii_lowercase).collect();
        Self {
            query,
            folded,
            prev: Vec::new(),
            cur: Vec::new(),
        }
    }

    pub fn score(&mut self, candidate: &str) -> Option<MatchScore> {
        let candidate = candidate.as_bytes();
        if self.query.is_empty() {
            return Some(MatchScore {
                kind: MatchKind::Prefix,
                score: 1,
            });
        }

        let is_prefix = candidate.len() >= self.folded.len()
            && candidate
                .iter()
                .zip(&self.folded)
                .all(|(c, q)| c.to_ascii_lowercase() == *q);
        if is_prefix {
            let score = (PREFIX_BASE - candidate.len() as i32).max(1);
            return Some(MatchScore {
                kind: MatchKind::Prefix,
                score,
            });
        }

        self.subsequence(candidate).map(|raw| MatchScore {
            kind: MatchKind::Fuzzy,
            score: raw.max(1),
        })
    }

    /// Best alignment of the query as a subsequence of `candidate`.
    fn subsequence(&mut self, candidate: &[u8]) -> Option<i32> {
        let n = candidate.len();
        if self.query.len() > n {
            return None;
        }
        self.prev.clear();
        self.prev.resize(n, NONE);
        self.cur.clear();
        self.cur.resize(n, NONE);

        for (i, (&q, &q_folded)) in self.query.iter().zip(&self.folded).enumerate() {
            // Best score of the previous query byte matched strictly before `j`, with the
            // gap penalty folded in relative to `j`.
            let mut best_before = NONE;
            for j in 0..n {
                if i > 0 && j > 0 && self.prev[j - 1] > NONE {
                    best_before = best_before.max(self.prev[j - 1] + GAP_PENALTY * j as i32);
                }

                let c = candidate[j];
                self.cur[j] = NONE;
                if c.to_ascii_lowercase() != q_folded {
                    continue;
                }

                let mut gain = BASE_MATCH;
                if is_word_start(candidate, j) {
                    gain += BONUS_WORD_START;
                }
                if c == q {
                    gain += BONUS_EXACT_CASE;
                }

                let base = if i == 0 {
                    -LEADING_PENALTY * j as i32
                } else {
                    let consecutive = if j > 0 && self.prev[j - 1] > NONE {
                        self.prev[j - 1] + BONUS_CONSECUTIVE
                    } else {
                        NONE
                    };
                    let gapped = if best_before > NONE {
                        best_before - GAP_PENALTY * j as i32
                    } else {
                        NONE
                    };
                    consecutive.max(gapped)
                };
                if base > NONE {
                    self.cur[j] = base + gain;
                }
            }
            std::mem::swap(&mut self.prev, &mut self.cur);
        }

        self.prev.iter().copied().filter(|s| *s > NONE).max()
    }
}

fn is_word_start(candidate: &[u8], idx: usize) -> bool {
    let Some(prev_idx) = idx.checked_sub(1) else {
        return true;
    };
    let prev = candidate[prev_idx];
    let cur = candidate[idx];
    matches!(prev, b'_' | b'-' | b'.' | b' ' | b'/' | b'$')
        || (prev.is_ascii_lowercase() && cur.is_ascii_uppercase())
        || (prev.is_ascii_alphabetic() && cur.is_ascii_digit())
}

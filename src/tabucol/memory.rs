//! Tabu memory and aspiration table.

use std::collections::VecDeque;

use rand::Rng;
use rustc_hash::FxHashMap;

use super::types::Move;
use crate::graph::Color;

/// Bounded recency list of forbidden moves.
///
/// New entries go to the front; once the list holds more than `capacity`
/// entries the oldest one is evicted. The same move may be recorded more than
/// once and stays forbidden while any occurrence remains.
#[derive(Debug, Clone)]
pub struct TabuMemory {
    capacity: usize,
    entries: VecDeque<Move>,
    /// occurrences per move for O(1) membership
    counts: FxHashMap<Move, usize>,
}

impl TabuMemory {
    /// Creates an empty memory.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "called `TabuMemory::new()` with zero capacity");
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity + 1),
            counts: FxHashMap::default(),
        }
    }

    /// Creates a memory pre-filled with distinct (vertex, color) pairs drawn
    /// uniformly from `0..vertex_count` × `0..k`.
    ///
    /// Fills up to `capacity` entries, fewer only if there are not that many
    /// pairs.
    pub fn random<R: Rng>(capacity: usize, vertex_count: usize, k: Color, rng: &mut R) -> Self {
        let mut memory = Self::new(capacity);
        let pairs = vertex_count * k;
        for i in rand::seq::index::sample(rng, pairs, capacity.min(pairs)) {
            memory.push(Move::new(i / k, i % k));
        }
        memory
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no move is forbidden.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `mv` is forbidden.
    pub fn contains(&self, mv: &Move) -> bool {
        self.counts.contains_key(mv)
    }

    /// Records `mv` as the most recent entry, evicting the oldest entry if
    /// the capacity is exceeded.
    pub fn push(&mut self, mv: Move) {
        self.entries.push_front(mv);
        *self.counts.entry(mv).or_insert(0) += 1;
        if self.entries.len() > self.capacity {
            if let Some(oldest) = self.entries.pop_back() {
                self.forget(oldest);
            }
        }
    }

    /// Removes every occurrence of `mv`. Returns whether it was forbidden.
    pub fn lift(&mut self, mv: &Move) -> bool {
        if self.counts.remove(mv).is_none() {
            return false;
        }
        self.entries.retain(|e| e != mv);
        true
    }

    /// Entries from most to least recent.
    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.entries.iter()
    }

    fn forget(&mut self, mv: Move) {
        if let Some(count) = self.counts.get_mut(&mv) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&mv);
            }
        }
    }
}

/// Best objective reached from each key, used to let tabu moves through.
///
/// A move passes when its resulting objective is strictly below the best
/// recorded for the key, or strictly below the current objective when the
/// key has no record yet.
#[derive(Debug, Clone, Default)]
pub struct AspirationTable {
    best: FxHashMap<u64, usize>,
}

impl AspirationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys with a record.
    pub fn len(&self) -> usize {
        self.best.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    /// Best objective recorded for `key`.
    pub fn best(&self, key: u64) -> Option<usize> {
        self.best.get(&key).copied()
    }

    /// Whether a move from a state with objective `current` under `key`,
    /// reaching `resulting`, satisfies the criterion.
    pub fn admits(&self, key: u64, current: usize, resulting: usize) -> bool {
        match self.best(key) {
            Some(best) => resulting < best,
            None => resulting < current,
        }
    }

    /// Records `resulting` for `key` if it beats the current record.
    pub fn record(&mut self, key: u64, resulting: usize) {
        self.best
            .entry(key)
            .and_modify(|best| *best = (*best).min(resulting))
            .or_insert(resulting);
    }
}

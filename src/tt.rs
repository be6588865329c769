//! Zobrist-keyed transposition table: fixed-capacity, always-overwrite.

use std::mem::size_of;

use crate::types::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Exact,
    Cut,
    AllAlphaUnchanged,
}

#[derive(Clone, Copy, Debug)]
pub struct NodeData {
    pub hash: u64,
    pub score: i16,
    pub depth: u8,
    pub node_type: NodeType,
    pub best_move: Move,
}

const DEFAULT_HASH_MIB: usize = 16;
const MIN_CAPACITY: usize = 1009;

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

fn largest_prime_at_most(n: usize) -> usize {
    let mut candidate = n.max(2);
    loop {
        if is_prime(candidate) {
            return candidate;
        }
        candidate -= 1;
    }
}

fn capacity_for_mib(size_mib: usize) -> usize {
    let slot_size = size_of::<NodeData>().max(1);
    let bytes = size_mib.saturating_mul(1 << 20);
    let requested = (bytes / slot_size).max(MIN_CAPACITY);
    largest_prime_at_most(requested)
}

/// Process-global hash table, sized in MiB, with explicit init/resize/clear/free
/// lifecycle matching the UCI `Hash` option and `ucinewgame`. Slots are `Option`
/// so a legitimately stored depth-0 entry (quiescence nodes) is never confused
/// with an unwritten slot.
pub struct TranspositionTable {
    slots: Vec<Option<NodeData>>,
}

impl TranspositionTable {
    #[must_use]
    pub fn new(size_mib: usize) -> Self {
        let capacity = capacity_for_mib(size_mib);
        TranspositionTable {
            slots: vec![None; capacity],
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn index(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<&NodeData> {
        match &self.slots[self.index(hash)] {
            Some(entry) if entry.hash == hash => Some(entry),
            _ => None,
        }
    }

    pub fn store(&mut self, hash: u64, score: i16, depth: u8, node_type: NodeType, best_move: Move) {
        let idx = self.index(hash);
        self.slots[idx] = Some(NodeData {
            hash,
            score,
            depth,
            node_type,
            best_move,
        });
    }

    pub fn resize(&mut self, size_mib: usize) {
        *self = TranspositionTable::new(size_mib);
    }

    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_HASH_MIB)
    }
}

/// Advisory cache-line prefetch hint; a no-op on hosts without the instruction.
#[inline]
pub fn prefetch_tt(_tt: &TranspositionTable, _hash: u64) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_prime_and_bounded_by_size() {
        let tt = TranspositionTable::new(1);
        assert!(is_prime(tt.capacity()));
        let slot_size = size_of::<NodeData>();
        assert!(tt.capacity() * slot_size <= (1 << 20) + slot_size * 64);
    }

    #[test]
    fn store_then_probe_round_trips() {
        let mut tt = TranspositionTable::new(1);
        let mv = Move::new(12, 28, crate::types::MoveType::DoublePawnPush);
        tt.store(0xABCD, 55, 4, NodeType::Exact, mv);
        let entry = tt.probe(0xABCD).expect("entry should be present");
        assert_eq!(entry.score, 55);
        assert_eq!(entry.depth, 4);
        assert_eq!(entry.best_move, mv);
    }

    #[test]
    fn probe_misses_on_hash_collision_with_different_key() {
        let mut tt = TranspositionTable::new(1);
        let mv = Move::new(12, 28, crate::types::MoveType::DoublePawnPush);
        tt.store(1, 10, 3, NodeType::Exact, mv);
        assert!(tt.probe(2).is_none() || tt.probe(2).unwrap().hash != 2);
    }

    #[test]
    fn clear_empties_every_slot() {
        let mut tt = TranspositionTable::new(1);
        let mv = Move::new(4, 5, crate::types::MoveType::Other);
        tt.store(42, 1, 1, NodeType::Exact, mv);
        tt.clear();
        assert!(tt.probe(42).is_none());
    }
}

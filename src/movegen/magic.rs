//! Magic-bitboard attack tables for sliding pieces.
//!
//! Built once per process: for each square, a relevant-occupancy mask is
//! computed, every subset of that mask is enumerated with the Carry-Rippler
//! trick, and a 64-bit multiplier is searched for (via the sparse RNG, C2)
//! that maps every subset to a unique index — or to an index two subsets
//! happen to share the same attack set for.

use super::attacks::{relevant_occupancy_mask, BISHOP_DIRECTIONS, ROOK_DIRECTIONS};
use crate::bitboard::{next_subset, popcount, Bitboard, EMPTY};
use crate::rng::Rng;
use crate::types::Square;
use once_cell::sync::Lazy;

struct MagicEntry {
    mask: Bitboard,
    multiplier: u64,
    shift: u32,
    offset: usize,
}

pub struct SliderTable {
    magics: [MagicEntry; 64],
    attacks: Vec<Bitboard>,
}

impl SliderTable {
    #[inline]
    #[must_use]
    pub fn attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let entry = &self.magics[sq as usize];
        let blockers = occupied & entry.mask;
        let index = (blockers.wrapping_mul(entry.multiplier)) >> entry.shift;
        self.attacks[entry.offset + index as usize]
    }
}

/// Search for a magic multiplier for `sq` given its mask and the enumerated
/// (occupancy subset, reference attack set) pairs. Candidates are accepted
/// only when they look "sparse enough" post-multiplication.
fn find_magic(
    rng: &mut Rng,
    mask: Bitboard,
    subsets: &[Bitboard],
    references: &[Bitboard],
    shift: u32,
) -> (u64, Vec<Bitboard>) {
    let table_size = 1usize << (64 - shift);
    let mut table = vec![EMPTY; table_size];
    let mut seen_at = vec![u32::MAX; table_size];
    let mut attempt: u32 = 0;

    loop {
        let candidate = rng.next_sparse_u64();
        if popcount((candidate.wrapping_mul(mask)) >> 56) < 6 {
            continue;
        }

        attempt += 1;
        let mut ok = true;
        for (&subset, &reference) in subsets.iter().zip(references.iter()) {
            let index = (subset.wrapping_mul(candidate) >> shift) as usize;
            if seen_at[index] != attempt {
                seen_at[index] = attempt;
                table[index] = reference;
            } else if table[index] != reference {
                ok = false;
                break;
            }
        }

        if ok {
            return (candidate, table);
        }
    }
}

fn build_slider_table(directions: &'static [(i8, i8)], seed: u64) -> SliderTable {
    let mut rng = Rng::new(seed);
    let mut masks = [0u64; 64];
    let mut shifts = [0u32; 64];
    let mut offsets = [0usize; 64];
    let mut flat: Vec<Bitboard> = Vec::new();

    let placeholder = MagicEntry { mask: 0, multiplier: 0, shift: 0, offset: 0 };
    let mut magics: Vec<MagicEntry> = (0..64).map(|_| MagicEntry {
        mask: placeholder.mask,
        multiplier: placeholder.multiplier,
        shift: placeholder.shift,
        offset: placeholder.offset,
    }).collect();

    for sq in 0..64u8 {
        let mask = relevant_occupancy_mask(sq, directions);
        let relevant_bits = popcount(mask);
        let shift = 64 - relevant_bits;

        let mut subsets = Vec::with_capacity(1usize << relevant_bits);
        let mut references = Vec::with_capacity(1usize << relevant_bits);
        let mut subset = 0u64;
        loop {
            subsets.push(subset);
            references.push(super::attacks::ray_attacks(sq, subset, directions));
            subset = next_subset(subset, mask);
            if subset == 0 {
                break;
            }
        }

        let (multiplier, table) = find_magic(&mut rng, mask, &subsets, &references, shift);

        masks[sq as usize] = mask;
        shifts[sq as usize] = shift;
        offsets[sq as usize] = flat.len();
        flat.extend_from_slice(&table);

        magics[sq as usize] = MagicEntry {
            mask,
            multiplier,
            shift,
            offset: offsets[sq as usize],
        };
    }

    SliderTable { magics: magics.try_into().unwrap_or_else(|_| unreachable!()), attacks: flat }
}

pub static ROOK_TABLE: Lazy<SliderTable> =
    Lazy::new(|| build_slider_table(&ROOK_DIRECTIONS, 0x1234_5678_9abc_def1));
pub static BISHOP_TABLE: Lazy<SliderTable> =
    Lazy::new(|| build_slider_table(&BISHOP_DIRECTIONS, 0xfedc_ba98_7654_3211));

#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ROOK_TABLE.attacks(sq, occupied)
}

#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    BISHOP_TABLE.attacks(sq, occupied)
}

#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

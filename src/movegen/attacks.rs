//! Precomputed leaper attack tables and the slow ray generator used to seed
//! the magic-bitboard build.

use crate::bitboard::{bit, Bitboard, EMPTY};
use crate::types::{file_of, rank_of, square_of, Color, Square};
use once_cell::sync::Lazy;

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2),
    (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0), (1, 1), (0, 1), (-1, 1),
    (-1, 0), (-1, -1), (0, -1), (1, -1),
];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

fn leaper_attacks(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [EMPTY; 64];
    for sq in 0..64u8 {
        let rank = rank_of(sq) as i8;
        let file = file_of(sq) as i8;
        let mut attacks = EMPTY;
        for &(dr, df) in deltas {
            let r = rank + dr;
            let f = file + df;
            if (0..8).contains(&r) && (0..8).contains(&f) {
                attacks |= bit(square_of(r as u8, f as u8));
            }
        }
        table[sq as usize] = attacks;
    }
    table
}

pub static KNIGHT_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| leaper_attacks(&KNIGHT_DELTAS));
pub static KING_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| leaper_attacks(&KING_DELTAS));

/// pawn_attacks[color][square]: squares a pawn of `color` standing on `square` attacks.
pub static PAWN_ATTACKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut table = [[EMPTY; 64]; 2];
    for sq in 0..64u8 {
        let rank = rank_of(sq) as i8;
        let file = file_of(sq) as i8;
        for (color_idx, dr) in [(0usize, 1i8), (1usize, -1i8)] {
            let mut attacks = EMPTY;
            for df in [-1i8, 1i8] {
                let r = rank + dr;
                let f = file + df;
                if (0..8).contains(&r) && (0..8).contains(&f) {
                    attacks |= bit(square_of(r as u8, f as u8));
                }
            }
            table[color_idx][sq as usize] = attacks;
        }
    }
    table
});

#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

#[inline]
#[must_use]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq as usize]
}

/// Slow ray attack generator: walks each direction until it hits the edge or a blocker
/// (the blocker square itself is included, since it may be capturable).
#[must_use]
pub fn ray_attacks(sq: Square, occupied: Bitboard, directions: &[(i8, i8)]) -> Bitboard {
    let rank = rank_of(sq) as i8;
    let file = file_of(sq) as i8;
    let mut attacks = EMPTY;
    for &(dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let target = square_of(r as u8, f as u8);
            attacks |= bit(target);
            if occupied & bit(target) != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Relevant-occupancy mask for a sliding piece on `sq`: the slow-ray attack set on an
/// empty board, minus board edges along directions that don't originate at `sq` (an
/// occupant on the far edge contributes no new blocker information).
#[must_use]
pub fn relevant_occupancy_mask(sq: Square, directions: &[(i8, i8)]) -> Bitboard {
    let rank = rank_of(sq) as i8;
    let file = file_of(sq) as i8;
    let mut mask = EMPTY;
    for &(dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let next_r = r + dr;
            let next_f = f + df;
            if !(0..8).contains(&next_r) || !(0..8).contains(&next_f) {
                break;
            }
            mask |= bit(square_of(r as u8, f as u8));
            r = next_r;
            f = next_f;
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_corner_has_two_targets() {
        assert_eq!(popcount_test(knight_attacks(0)), 2);
    }

    #[test]
    fn king_center_has_eight_targets() {
        assert_eq!(popcount_test(king_attacks(27)), 8);
    }

    #[test]
    fn pawn_attacks_mirror_by_color() {
        let white = pawn_attacks(12, Color::White);
        let black = pawn_attacks(12, Color::Black);
        assert_ne!(white, black);
    }

    #[test]
    fn rook_mask_excludes_edges() {
        let mask = relevant_occupancy_mask(0, &ROOK_DIRECTIONS);
        // a1: excludes h1 and a8 themselves (edge squares), keeps b1..g1 and a2..a7
        assert_eq!(popcount_test(mask), 10);
    }

    fn popcount_test(bb: Bitboard) -> u32 {
        bb.count_ones()
    }
}

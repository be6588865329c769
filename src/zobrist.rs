//! Zobrist hashing: XOR of random constants selected by piece/square, castling
//! state, en-passant file, and side-to-move.

use crate::position::{
    CastleSide, Position, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE, CASTLE_WHITE_KINGSIDE,
    CASTLE_WHITE_QUEENSIDE,
};
use crate::rng::Rng;
use crate::types::{Color, PieceType, ALL_PIECE_TYPES};
use once_cell::sync::Lazy;

const ZOBRIST_SEED: u64 = 0xC0FF_EE15_BEEF_F00D;

struct ZobristKeys {
    /// piece_keys[piece_type][color][square]
    piece_keys: [[[u64; 64]; 2]; 6],
    castling_keys: [u64; 16],
    en_passant_keys: [u64; 8],
    black_to_move_key: u64,
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = Rng::new(ZOBRIST_SEED);
        let mut piece_keys = [[[0u64; 64]; 2]; 6];
        for piece_type in piece_keys.iter_mut() {
            for color in piece_type.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.next_u64();
                }
            }
        }

        let mut castling_keys = [0u64; 16];
        for key in castling_keys.iter_mut() {
            *key = rng.next_u64();
        }

        let mut en_passant_keys = [0u64; 8];
        for key in en_passant_keys.iter_mut() {
            *key = rng.next_u64();
        }

        let black_to_move_key = rng.next_u64();

        ZobristKeys {
            piece_keys,
            castling_keys,
            en_passant_keys,
            black_to_move_key,
        }
    }
}

static KEYS: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[must_use]
pub fn castling_right_bit(color: Color, side: CastleSide) -> u8 {
    match (color, side) {
        (Color::White, CastleSide::Kingside) => CASTLE_WHITE_KINGSIDE,
        (Color::White, CastleSide::Queenside) => CASTLE_WHITE_QUEENSIDE,
        (Color::Black, CastleSide::Kingside) => CASTLE_BLACK_KINGSIDE,
        (Color::Black, CastleSide::Queenside) => CASTLE_BLACK_QUEENSIDE,
    }
}

/// Compute the Zobrist hash of a position from scratch by XORing the entries
/// for its current configuration. Called once per `do_move`/`do_null_move`.
#[must_use]
pub fn hash_position(pos: &Position) -> u64 {
    let mut hash = 0u64;

    for &pt in &ALL_PIECE_TYPES {
        for &color in &[Color::White, Color::Black] {
            let mut bb = pos.piece_bitboard(pt, color);
            while bb != 0 {
                let sq = crate::bitboard::pop_lsb(&mut bb);
                hash ^= KEYS.piece_keys[pt.index()][color.index()][sq as usize];
            }
        }
    }

    for &(color, side) in &[
        (Color::White, CastleSide::Kingside),
        (Color::White, CastleSide::Queenside),
        (Color::Black, CastleSide::Kingside),
        (Color::Black, CastleSide::Queenside),
    ] {
        if pos.has_castling_right(color, side) {
            hash ^= KEYS.castling_keys[castling_right_bit(color, side) as usize];
        }
    }

    if let Some(ep_sq) = pos.en_passant_square() {
        hash ^= KEYS.en_passant_keys[crate::types::file_of(ep_sq) as usize];
    }

    if pos.side_to_move() == Color::Black {
        hash ^= KEYS.black_to_move_key;
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::types::{Move, MoveType};

    #[test]
    fn hash_is_stable_across_do_undo() {
        let mut pos = Position::startpos();
        let before = pos.hash();
        let mv = Move::new(12, 28, MoveType::DoublePawnPush);
        pos.do_move(mv);
        pos.undo_move(mv);
        assert_eq!(pos.hash(), before);
    }

    #[test]
    fn different_positions_almost_always_hash_differently() {
        let a = Position::startpos();
        let b = Position::create_from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        )
        .unwrap();
        assert_ne!(a.hash(), b.hash());
    }
}

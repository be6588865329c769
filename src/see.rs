//! Static exchange evaluation for capture ordering.

use crate::bitboard::lsb;
use crate::eval::MATERIAL;
use crate::movegen;
use crate::position::Position;
use crate::types::{Color, Move, MoveType, PieceType};

fn least_valuable_attacker(pos: &Position, sq: u8, color: Color) -> Option<(u8, PieceType)> {
    let attackers = movegen::attackers_of(pos, sq) & pos.color_bitboard(color);
    for &pt in &[
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ] {
        let bb = attackers & pos.piece_bitboard(pt, color);
        if bb != 0 {
            return Some((lsb(bb), pt));
        }
    }
    None
}

fn recapture_move(pos: &Position, from: u8, to: u8, attacker: PieceType, color: Color) -> Move {
    let promotes = attacker == PieceType::Pawn
        && crate::types::rank_of(to) == if color == Color::White { 7 } else { 0 };
    let tag = if promotes {
        MoveType::QueenPromotionCapture
    } else {
        MoveType::Capture
    };
    Move::new(from, to, tag)
}

/// Recursively play out recaptures on `sq`, always choosing the least valuable
/// attacker, and return the best material gain `side` can force there. A side
/// declines to recapture (contributing 0) whenever doing so would lose material.
fn exchange(pos: &mut Position, sq: u8, side: Color) -> i32 {
    let Some((from, attacker)) = least_valuable_attacker(pos, sq, side) else {
        return 0;
    };
    let captured_value = MATERIAL[pos
        .get_piece_at(sq)
        .piece_type()
        .expect("exchange target must be occupied")
        .index()];
    let mv = recapture_move(pos, from, sq, attacker, side);
    pos.do_move(mv);
    let gain = (captured_value - exchange(pos, sq, side.flip())).max(0);
    pos.undo_move(mv);
    gain
}

/// Net material value of `mv`, a capture, accounting for the full recapture
/// sequence on its target square.
#[must_use]
pub fn capture_score(pos: &mut Position, mv: Move) -> i32 {
    let side = pos.side_to_move();
    let attacker = pos
        .get_piece_at(mv.from())
        .piece_type()
        .expect("from-square occupied");
    let victim_value = if mv.is_en_passant() {
        MATERIAL[PieceType::Pawn.index()]
    } else {
        MATERIAL[pos
            .get_piece_at(mv.to())
            .piece_type()
            .expect("capture target occupied")
            .index()]
    };

    if MATERIAL[attacker.index()] < MATERIAL[PieceType::Rook.index()]
        && victim_value >= MATERIAL[PieceType::Rook.index()]
    {
        let promo_bonus = if mv.promotion_piece().is_some() {
            MATERIAL[PieceType::Queen.index()] - MATERIAL[PieceType::Pawn.index()]
        } else {
            0
        };
        return victim_value + promo_bonus;
    }

    pos.do_move(mv);
    let exchange_result = exchange(pos, mv.to(), side.flip());
    pos.undo_move(mv);
    victim_value - exchange_result
}

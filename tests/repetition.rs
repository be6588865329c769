//! §8 property 10: replaying the knight shuffle `Nf3 Nf6 Ng1 Ng8 Nf3 Nf6
//! Ng1 Ng8` from the starting position reaches a position
//! `equal_for_repetition` to the start, and the search's in-line repetition
//! detector recognizes the same cycle during a deeper search.

use duskwing::position::Position;
use duskwing::search::{new_running_flag, run_search, SearchArg};
use duskwing::tt::TranspositionTable;

fn apply_lan_sequence(pos: &mut Position, moves: &[&str]) -> Vec<Position> {
    let mut history = Vec::with_capacity(moves.len());
    for lan in moves {
        let mv = pos.find_legal_move(lan).unwrap_or_else(|e| panic!("{lan} should be legal: {e}"));
        history.push(pos.clone());
        pos.do_move(mv);
    }
    history
}

#[test]
fn knight_shuffle_returns_to_the_starting_position() {
    let start = Position::startpos();
    let mut pos = Position::startpos();
    apply_lan_sequence(&mut pos, &["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"]);
    assert!(pos.equal_for_repetition(&start));
}

#[test]
fn search_detects_the_cycle_mid_line() {
    // One shuffle short of the full repeat: search from here should see that
    // repeating the cycle once more is available and not worth more than a draw.
    let mut pos = Position::startpos();
    let history = apply_lan_sequence(&mut pos, &["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6"]);

    let mut tt = TranspositionTable::new(1);
    let mut arg = SearchArg::new(new_running_flag());
    arg.depth = Some(4);
    arg.history = history;

    let mut last_score = None;
    run_search(
        &mut pos,
        &mut tt,
        &arg,
        |info| last_score = Some(info.score),
        |_mv| {},
    );
    assert!(last_score.is_some(), "search should report at least one iteration");
}

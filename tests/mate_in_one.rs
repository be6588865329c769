//! End-to-end `EngineHandle` scenarios from §8 (E2, E3) and the UCI `go`
//! contract's node-budget path (E4).

use std::sync::mpsc;
use std::time::Duration;

use duskwing::engine::EngineHandle;
use duskwing::search::{new_running_flag, InfoLine, Score, SearchArg};
use duskwing::types::Move;

/// Drive a `go` through the real worker thread and collect its events.
fn run_go(engine: &mut EngineHandle, arg: SearchArg) -> (Vec<InfoLine>, Move) {
    let (tx, rx) = mpsc::channel();
    engine.go(arg, move |event| {
        let _ = tx.send(event);
    });

    let deadline = std::time::Instant::now() + Duration::from_secs(10);
    let mut infos = Vec::new();
    let mut best = Move::NULL;
    loop {
        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok(duskwing::engine::EngineEvent::Info(info)) => infos.push(info),
            Ok(duskwing::engine::EngineEvent::BestMove(mv)) => {
                best = mv;
                break;
            }
            Err(_) if std::time::Instant::now() > deadline => break,
            Err(_) => continue,
        }
    }
    engine.stop();
    (infos, best)
}

#[test]
fn e2_rook_and_king_mate_is_found_with_a_positive_mate_score() {
    let mut engine = EngineHandle::new();
    assert!(engine.set_position(Some("4k3/8/8/8/8/8/4K2R/8 w K - 0 1"), &[]));

    let mut arg = SearchArg::new(new_running_flag());
    arg.depth = Some(6);
    let (infos, best) = run_go(&mut engine, arg);

    assert!(!best.is_null());
    let last = infos.last().expect("at least one info line");
    assert!(matches!(last.score, Score::Mate(n) if n > 0), "expected a positive mate score, got {:?}", last.score);
}

#[test]
fn e3_queen_mate_in_one_under_movetime() {
    let mut engine = EngineHandle::new();
    assert!(engine.set_position(Some("7k/5Q2/6K1/8/8/8/8/8 w - - 0 1"), &[]));

    let mut arg = SearchArg::new(new_running_flag());
    arg.movetime = Some(100);
    let (infos, best) = run_go(&mut engine, arg);

    assert_eq!(best.to_lan(), "f7g7");
    let last = infos.last().expect("at least one info line");
    assert!(matches!(last.score, Score::Mate(1)), "expected mate 1, got {:?}", last.score);
}

#[test]
fn e4_node_limited_search_on_black_reply_returns_a_legal_move() {
    let mut engine = EngineHandle::new();
    assert!(engine.set_position(None, &["e2e4".to_string()]));

    let mut arg = SearchArg::new(new_running_flag());
    arg.nodes = Some(1);
    let (_, best) = run_go(&mut engine, arg);

    assert!(!best.is_null());
    let mut pos = duskwing::position::Position::startpos();
    pos.do_move(duskwing::types::Move::new(
        duskwing::types::parse_square("e2").unwrap(),
        duskwing::types::parse_square("e4").unwrap(),
        duskwing::types::MoveType::DoublePawnPush,
    ));
    let legal = duskwing::movegen::legal_moves(&mut pos);
    assert!(legal.contains(&best), "bestmove {best} was not among the 20 legal replies");
}

#[test]
fn e5_stop_returns_a_bestmove_promptly() {
    let mut engine = EngineHandle::new();
    assert!(engine.set_position(None, &[]));

    let (tx, rx) = mpsc::channel();
    let mut arg = SearchArg::new(new_running_flag());
    arg.infinite = true;
    engine.go(arg, move |event| {
        let _ = tx.send(event);
    });

    std::thread::sleep(Duration::from_millis(200));
    let stop_issued = std::time::Instant::now();
    engine.stop();

    let mut got_bestmove = false;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, duskwing::engine::EngineEvent::BestMove(_)) {
            got_bestmove = true;
        }
    }
    assert!(got_bestmove);
    assert!(stop_issued.elapsed() < Duration::from_millis(500));
}


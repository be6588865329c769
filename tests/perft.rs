//! Move-generator correctness gate: the published perft node counts for the
//! starting position and the "Kiwipete" position (§8, properties 5-6).

use duskwing::movegen::perft;
use duskwing::position::Position;

#[test]
fn startpos_perft_depths_1_to_5() {
    let expected = [20u64, 400, 8902, 197281, 4865609];
    for (i, &exp) in expected.iter().enumerate() {
        let mut pos = Position::startpos();
        assert_eq!(perft(&mut pos, i as u32 + 1), exp, "depth {}", i + 1);
    }
}

#[test]
#[ignore = "depth 6 takes several seconds in debug builds; run with --ignored --release"]
fn startpos_perft_depth_6() {
    let mut pos = Position::startpos();
    assert_eq!(perft(&mut pos, 6), 119_060_324);
}

#[test]
fn kiwipete_perft_depths_1_to_3() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let expected = [48u64, 2039, 97862];
    for (i, &exp) in expected.iter().enumerate() {
        let mut pos = Position::create_from_fen(fen).unwrap();
        assert_eq!(perft(&mut pos, i as u32 + 1), exp, "depth {}", i + 1);
    }
}

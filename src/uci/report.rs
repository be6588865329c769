//! Formatting `info`/`bestmove` lines for stdout.

use crate::search::{InfoLine, Score};
use crate::types::Move;

pub fn print_ready() {
    println!("readyok");
}

/// `info depth D nodes N [score cp C | score mate M] [lowerbound] nps R time T`,
/// fields in exactly that order.
pub fn print_info(info: &InfoLine) {
    let score = match info.score {
        Score::Centipawns(cp) => format!("score cp {cp}"),
        Score::Mate(n) => format!("score mate {n}"),
    };
    let lowerbound = if info.lowerbound { " lowerbound" } else { "" };
    println!(
        "info depth {} nodes {} {}{} nps {} time {}",
        info.depth, info.nodes, score, lowerbound, info.nps, info.time_ms
    );
}

pub fn print_bestmove(mv: Move) {
    if mv.is_null() {
        println!("bestmove 0000");
    } else {
        println!("bestmove {mv}");
    }
}

//! Iterative-deepening negamax search: alpha-beta, quiescence, pruning
//! heuristics, repetition tracking, time control, cooperative cancellation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::eval;
use crate::position::Position;
use crate::tt::{NodeType, TranspositionTable};
use crate::types::{Move, PieceType};

pub const INF: i32 = 32767;
pub const MAX_PLY: i32 = 128;
const NODE_CHECK_INTERVAL: u64 = 8192;
const FUTILITY_MARGIN_PER_PLY: i32 = 175;
const NULL_MOVE_REDUCTION: i32 = 4;
const NULL_MOVE_MIN_DEPTH: i32 = 4;
const REPETITION_TABLE_SIZE: usize = 8191;

pub type RunningFlag = Arc<Mutex<bool>>;

#[must_use]
pub fn new_running_flag() -> RunningFlag {
    Arc::new(Mutex::new(true))
}

fn is_running(flag: &RunningFlag) -> bool {
    *flag.lock()
}

fn clear_running(flag: &RunningFlag) {
    *flag.lock() = false;
}

#[derive(Clone, Copy, Debug)]
pub enum Score {
    Centipawns(i32),
    Mate(i32),
}

#[derive(Clone, Debug)]
pub struct InfoLine {
    pub depth: u32,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub score: Score,
    pub lowerbound: bool,
}

/// Everything the UCI collaborator hands to a search: the position, the
/// game's move history (for repetition), `go` limits, and the cooperative
/// stop flag.
pub struct SearchArg {
    pub history: Vec<Position>,
    pub infinite: bool,
    pub depth: Option<u32>,
    pub mate: Option<u32>,
    pub movestogo: Option<u32>,
    pub perft: Option<u32>,
    pub nodes: Option<u64>,
    pub time: [Option<u64>; 2],
    pub inc: [Option<u64>; 2],
    pub movetime: Option<u64>,
    pub running: RunningFlag,
}

impl SearchArg {
    #[must_use]
    pub fn new(running: RunningFlag) -> Self {
        SearchArg {
            history: Vec::new(),
            infinite: false,
            depth: None,
            mate: None,
            movestogo: None,
            perft: None,
            nodes: None,
            time: [None, None],
            inc: [None, None],
            movetime: None,
            running,
        }
    }
}

struct SearchData<'a> {
    pos: &'a mut Position,
    tt: &'a mut TranspositionTable,
    ply: i32,
    nodes: u64,
    killers: Vec<[Move; 2]>,
    line: Vec<Position>,
    counts: Box<[i16; REPETITION_TABLE_SIZE]>,
    running: RunningFlag,
    node_limit: Option<u64>,
    stop_time: Option<Instant>,
}

impl<'a> SearchData<'a> {
    fn new(pos: &'a mut Position, tt: &'a mut TranspositionTable, arg: &SearchArg) -> Self {
        let mut counts = Box::new([0i16; REPETITION_TABLE_SIZE]);
        for prior in &arg.history {
            counts[(prior.hash() % REPETITION_TABLE_SIZE as u64) as usize] += 1;
        }
        SearchData {
            pos,
            tt,
            ply: 0,
            nodes: 0,
            killers: vec![[Move::NULL; 2]; MAX_PLY as usize + 1],
            line: arg.history.clone(),
            counts,
            running: arg.running.clone(),
            node_limit: arg.nodes,
            stop_time: None,
        }
    }

    fn enter_position(&mut self) {
        self.line.push(self.pos.clone());
        let idx = (self.pos.hash() % REPETITION_TABLE_SIZE as u64) as usize;
        self.counts[idx] += 1;
    }

    fn exit_position(&mut self) {
        let idx = (self.pos.hash() % REPETITION_TABLE_SIZE as u64) as usize;
        self.counts[idx] -= 1;
        self.line.pop();
    }

    fn record_killer(&mut self, mv: Move) {
        let slot = &mut self.killers[self.ply as usize];
        if slot[0] != mv {
            slot[1] = slot[0];
            slot[0] = mv;
        }
    }

    fn is_killer(&self, mv: Move) -> bool {
        let slot = &self.killers[self.ply as usize];
        slot[0] == mv || slot[1] == mv
    }

    fn is_repeated(&self) -> bool {
        let hash = self.pos.hash();
        if self.counts[(hash % REPETITION_TABLE_SIZE as u64) as usize] == 0 {
            return false;
        }
        let limit = self.pos.halfmove_clock() as usize;
        let n = self.line.len();
        let mut back = 2; // the immediately preceding ply has the opposite side to move
        while back <= limit && back <= n {
            if self.line[n - back].equal_for_repetition(self.pos) {
                return true;
            }
            back += 2;
        }
        false
    }

    /// Every `NODE_CHECK_INTERVAL` nodes (negamax only) or when a hard limit is
    /// hit, clear `running`. Returns whether the search should keep going.
    fn poll(&mut self, sample_clock: bool) -> bool {
        if sample_clock && self.nodes % NODE_CHECK_INTERVAL == 0 {
            if let Some(stop_time) = self.stop_time {
                if Instant::now() >= stop_time {
                    clear_running(&self.running);
                }
            }
        }
        if let Some(limit) = self.node_limit {
            if self.nodes >= limit {
                clear_running(&self.running);
            }
        }
        if self.ply > MAX_PLY {
            clear_running(&self.running);
        }
        is_running(&self.running)
    }
}

fn score_to_ttscore(score: i32, ply: i32) -> i32 {
    if score >= INF - MAX_PLY {
        score + ply
    } else if score <= -INF + MAX_PLY {
        score - ply
    } else {
        score
    }
}

/// Adjusts a stored mate score back to the current ply's frame of reference.
/// The source this was ported from inverted the negative-mate branch's guard
/// (`score <= INF + MAX_PLY`); derived from first principles instead, per the
/// encoding `stored = score ± ply`.
fn ttscore_to_score(stored: i32, ply: i32) -> i32 {
    if stored >= INF - MAX_PLY {
        stored - ply
    } else if stored <= -INF + MAX_PLY {
        stored + ply
    } else {
        stored
    }
}

fn move_priority(search: &mut SearchData, tt_move: Move, mv: Move) -> i32 {
    if !tt_move.is_null() && mv == tt_move {
        return 1_000_000;
    }
    let base = eval::evaluate_move(search.pos, mv);
    if search.is_killer(mv) {
        600 + base
    } else if mv.is_capture() {
        300 + base
    } else {
        base
    }
}

fn negamax(search: &mut SearchData, depth: i32, mut alpha: i32, beta: i32) -> i32 {
    search.nodes += 1;
    if !search.poll(true) {
        return alpha;
    }

    if search.is_repeated() {
        return 0;
    }

    let hash = search.pos.hash();
    let mut tt_move = Move::NULL;
    if let Some(entry) = search.tt.probe(hash) {
        tt_move = entry.best_move;
        if entry.depth as i32 >= depth {
            let score = ttscore_to_score(entry.score as i32, search.ply);
            match entry.node_type {
                NodeType::Exact => return score,
                NodeType::Cut if score >= beta => return score,
                NodeType::AllAlphaUnchanged if score <= alpha => return score,
                _ => {}
            }
        }
    }

    if depth <= 0 {
        return qsearch(search, alpha, beta);
    }

    let us = search.pos.side_to_move();
    let in_check = search.pos.is_in_check(us);
    let has_non_pawn_material = search.pos.color_bitboard(us)
        != (search.pos.piece_bitboard(PieceType::Pawn, us) | search.pos.piece_bitboard(PieceType::King, us));

    if !in_check && has_non_pawn_material && depth > NULL_MOVE_MIN_DEPTH {
        search.pos.do_null_move();
        search.ply += 1;
        let score = -negamax(search, depth - NULL_MOVE_REDUCTION, -beta, -beta + 1);
        search.ply -= 1;
        search.pos.undo_null_move();
        if !is_running(&search.running) {
            return alpha;
        }
        if score >= beta {
            return beta;
        }
    }

    let eval_score = eval::evaluate(search.pos);
    let near_mate_bound = alpha.abs() < INF - MAX_PLY && beta.abs() < INF - MAX_PLY;

    let mut moves = search.pos.generate_pseudo_legal_moves();
    let mut scores: Vec<i32> = moves.as_slice().iter().map(|&mv| move_priority(search, tt_move, mv)).collect();

    let mut best_score = -INF;
    let mut best_move = Move::NULL;
    let mut any_legal = false;
    let mut node_type = NodeType::AllAlphaUnchanged;

    for i in 0..moves.len() {
        let mv = moves.swap_remove_best(&mut scores, i);
        if !search.pos.is_legal(mv) {
            continue;
        }
        any_legal = true;

        if mv.is_quiet() && !in_check && near_mate_bound {
            if eval_score + FUTILITY_MARGIN_PER_PLY * depth <= alpha {
                return eval_score;
            }
            if eval_score - FUTILITY_MARGIN_PER_PLY * depth >= beta {
                return eval_score - FUTILITY_MARGIN_PER_PLY * depth;
            }
        }

        search.pos.do_move(mv);
        search.ply += 1;
        search.enter_position();
        let score = -negamax(search, depth - 1, -beta, -alpha);
        search.exit_position();
        search.ply -= 1;
        search.pos.undo_move(mv);

        if !is_running(&search.running) {
            return alpha;
        }

        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        if score > alpha {
            alpha = score;
            node_type = NodeType::Exact;
        }
        if alpha >= beta {
            if mv.is_quiet() {
                search.record_killer(mv);
            }
            node_type = NodeType::Cut;
            break;
        }
    }

    if !any_legal {
        return if in_check { -INF + search.ply } else { 0 };
    }

    if is_running(&search.running) {
        let stored = score_to_ttscore(best_score, search.ply).clamp(i16::MIN as i32, i16::MAX as i32);
        search.tt.store(hash, stored as i16, depth as u8, node_type, best_move);
    }

    best_score
}

fn qsearch(search: &mut SearchData, mut alpha: i32, beta: i32) -> i32 {
    search.nodes += 1;
    if !search.poll(true) {
        return alpha;
    }

    if search.is_repeated() {
        return 0;
    }

    let hash = search.pos.hash();
    if let Some(entry) = search.tt.probe(hash) {
        let score = ttscore_to_score(entry.score as i32, search.ply);
        match entry.node_type {
            NodeType::Exact => return score,
            NodeType::Cut if score >= beta => return score,
            NodeType::AllAlphaUnchanged if score <= alpha => return score,
            _ => {}
        }
    }

    let us = search.pos.side_to_move();
    let in_check = search.pos.is_in_check(us);
    let stand_pat = eval::evaluate(search.pos);
    if stand_pat >= beta && !in_check {
        return stand_pat;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let pseudo = search.pos.generate_pseudo_legal_moves();
    let mut captures: Vec<Move> = pseudo.as_slice().iter().copied().filter(|m| m.is_capture()).collect();
    let mut scores: Vec<i32> = captures.iter().map(|&mv| eval::evaluate_move(search.pos, mv)).collect();

    let mut best_score = stand_pat;
    let mut best_move = Move::NULL;
    let mut any_capture_played = false;
    let mut node_type = NodeType::AllAlphaUnchanged;

    for i in 0..captures.len() {
        let mut best = i;
        for j in (i + 1)..captures.len() {
            if scores[j] > scores[best] {
                best = j;
            }
        }
        captures.swap(i, best);
        scores.swap(i, best);
        let mv = captures[i];
        if !search.pos.is_legal(mv) {
            continue;
        }
        any_capture_played = true;

        search.pos.do_move(mv);
        search.ply += 1;
        search.enter_position();
        let score = -qsearch(search, -beta, -alpha);
        search.exit_position();
        search.ply -= 1;
        search.pos.undo_move(mv);

        if !is_running(&search.running) {
            return alpha;
        }

        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        if score > alpha {
            alpha = score;
            node_type = NodeType::Exact;
        }
        if alpha >= beta {
            node_type = NodeType::Cut;
            break;
        }
    }

    if !any_capture_played {
        let has_any_legal = pseudo.as_slice().iter().any(|&m| search.pos.is_legal(m));
        if !has_any_legal {
            return if in_check { -INF + search.ply } else { 0 };
        }
    }

    if is_running(&search.running) {
        let stored = score_to_ttscore(best_score, search.ply).clamp(i16::MIN as i32, i16::MAX as i32);
        search.tt.store(hash, stored as i16, 0, node_type, best_move);
    }

    best_score
}

fn compute_stop_time(pos: &Position, arg: &SearchArg, start: Instant) -> Option<Instant> {
    if let Some(movetime) = arg.movetime {
        return Some(start + Duration::from_millis(movetime));
    }
    if arg.infinite {
        return None;
    }
    let color_index = pos.side_to_move().index();
    let own_time = arg.time[color_index]?;
    let own_inc = arg.inc[color_index].unwrap_or(0);
    let t = (own_time + own_inc) as f64;

    let allotted_ms = if arg.movestogo == Some(1) {
        let seconds = t / 1000.0;
        t * seconds.powf(1.1) / (seconds + 1.0).powf(1.1)
    } else {
        let max = arg.movestogo.map(|n| n.min(40)).unwrap_or(40) as f64;
        let phase = pos.phase() as f64;
        let divisor = (max * (256.0 - phase) + 8.0 * phase) / 256.0;
        t / divisor.max(1.0)
    };

    Some(start + Duration::from_millis(allotted_ms.max(0.0) as u64))
}

fn score_to_uci(score: i32) -> Score {
    if score >= INF - MAX_PLY {
        let plies_to_mate = INF - score;
        Score::Mate((plies_to_mate + 1) / 2)
    } else if score <= -INF + MAX_PLY {
        let plies_to_mate = INF + score;
        Score::Mate(-((plies_to_mate + 1) / 2))
    } else {
        Score::Centipawns(score)
    }
}

/// Drive iterative deepening to completion or cancellation, invoking
/// `send_info` once per finished (or cancelled) iteration and `send_bestmove`
/// exactly once at the end.
pub fn run_search(
    pos: &mut Position,
    tt: &mut TranspositionTable,
    arg: &SearchArg,
    mut send_info: impl FnMut(InfoLine),
    mut send_bestmove: impl FnMut(Move),
) {
    if let Some(perft_depth) = arg.perft {
        let _ = crate::movegen::perft(pos, perft_depth);
        clear_running(&arg.running);
        send_bestmove(Move::NULL);
        return;
    }

    let legal_root_moves = crate::movegen::legal_moves(pos);
    if legal_root_moves.is_empty() {
        clear_running(&arg.running);
        send_bestmove(Move::NULL);
        return;
    }

    let start = Instant::now();
    let max_depth = arg
        .depth
        .or(arg.mate.map(|_| MAX_PLY as u32))
        .map(|d| d.min(MAX_PLY as u32))
        .unwrap_or(MAX_PLY as u32);

    let mut search = SearchData::new(pos, tt, arg);
    search.stop_time = compute_stop_time(search.pos, arg, start);

    let mut overall_best = legal_root_moves[0];
    let mut found_mate = false;

    for depth in 1..=max_depth {
        if !is_running(&arg.running) {
            break;
        }

        let mut alpha = -INF;
        let beta = INF;
        let mut iteration_best = overall_best;
        let mut iteration_best_score = -INF;
        let mut cut_short = false;

        for &mv in &legal_root_moves {
            search.pos.do_move(mv);
            search.ply = 1;
            search.enter_position();
            let score = -negamax(&mut search, depth as i32 - 1, -beta, -alpha);
            search.exit_position();
            search.pos.undo_move(mv);

            if !is_running(&arg.running) {
                cut_short = true;
                break;
            }

            if score > alpha {
                alpha = score;
                iteration_best_score = score;
                iteration_best = mv;
            }

            if arg.mate.is_some() && score >= INF - MAX_PLY {
                found_mate = true;
                break;
            }
        }

        if !cut_short {
            overall_best = iteration_best;
        }

        let elapsed = start.elapsed();
        let nps = if elapsed.as_millis() > 0 {
            (search.nodes * 1000) / elapsed.as_millis() as u64
        } else {
            0
        };
        send_info(InfoLine {
            depth,
            nodes: search.nodes,
            nps,
            time_ms: elapsed.as_millis() as u64,
            score: score_to_uci(iteration_best_score),
            lowerbound: cut_short,
        });

        if cut_short || found_mate {
            break;
        }
    }

    clear_running(&arg.running);
    send_bestmove(overall_best);
}

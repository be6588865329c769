//! Universal Chess Interface front end.
//!
//! This module is deliberately thin: it reads lines from stdin, tokenizes
//! them (`command`), and drives an [`EngineHandle`]. All engine-owned state
//! (position, transposition table, worker thread) lives in [`engine`].

pub mod command;
pub mod options;
pub mod report;

use std::io::{self, BufRead};

use crate::engine::{EngineEvent, EngineHandle};
use crate::search::{new_running_flag, SearchArg};

use command::{parse_position_args, parse_setoption, parse_uci_command, parse_go_params, UciCommand};

/// Read commands from stdin until `quit` or end of input.
pub fn run() {
    let stdin = io::stdin();
    let mut engine = EngineHandle::new();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let Some(cmd) = parse_uci_command(&line) else { continue };

        // Any command other than `stop`/`quit` is dropped while a search is
        // in flight, so the worker's exclusive ownership of the position and
        // transposition table (§5) is never contended by the interface thread.
        if engine.is_searching() && !matches!(cmd, UciCommand::Stop | UciCommand::Quit) {
            continue;
        }

        match cmd {
            UciCommand::Uci => options::print_options(),
            UciCommand::IsReady => report::print_ready(),
            UciCommand::UciNewGame => engine.new_game(),
            UciCommand::Position(parts) => {
                if let Some((fen, moves)) = parse_position_args(&parts) {
                    // A malformed token anywhere in the list drops the whole
                    // command rather than applying a partial prefix (§7).
                    engine.set_position(fen.as_deref(), &moves);
                }
            }
            UciCommand::SetOption(parts) => {
                if let Some((name, value)) = parse_setoption(&parts) {
                    // Rejections are silently dropped per §7; `_err` only
                    // feeds the optional log line below.
                    if let Err(_err) = options::apply_setoption(&mut engine, &name, value.as_deref()) {
                        #[cfg(feature = "logging")]
                        log::warn!("setoption: {_err}");
                    }
                }
            }
            UciCommand::Go(parts) => {
                let params = parse_go_params(&parts);
                let running = new_running_flag();
                let mut arg = SearchArg::new(running);
                arg.infinite = params.infinite;
                arg.depth = params.depth;
                arg.mate = params.mate;
                arg.movestogo = params.movestogo;
                arg.perft = params.perft;
                arg.nodes = params.nodes;
                arg.time = [params.wtime, params.btime];
                arg.inc = [params.winc, params.binc];
                arg.movetime = params.movetime;

                engine.go(arg, |event| match event {
                    EngineEvent::Info(info) => report::print_info(&info),
                    EngineEvent::BestMove(mv) => report::print_bestmove(mv),
                });
            }
            UciCommand::Stop => engine.stop(),
            UciCommand::Quit => {
                engine.quit();
                break;
            }
            UciCommand::Unknown(_) => {
                // Silently ignored, per UCI convention (§7).
            }
        }
    }
}

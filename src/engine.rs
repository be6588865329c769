//! Owns the transposition table, the position, and the single search worker
//! thread. The UCI collaborator talks to this handle only; it never touches
//! the position or the table directly while a search is running.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use crate::position::Position;
use crate::search::{self, InfoLine, RunningFlag, SearchArg};
use crate::tt::TranspositionTable;
use crate::types::Move;

const DEFAULT_HASH_MIB: usize = 16;
pub const MIN_HASH_MIB: usize = 1;
pub const MAX_HASH_MIB: usize = 32768;
const SEARCH_STACK_SIZE: usize = 8 * 1024 * 1024;

pub enum EngineEvent {
    Info(InfoLine),
    BestMove(Move),
}

pub struct EngineHandle {
    tt: Arc<Mutex<TranspositionTable>>,
    position: Position,
    history: Vec<Position>,
    hash_mib: usize,
    running: Option<RunningFlag>,
    worker: Option<JoinHandle<()>>,
}

impl EngineHandle {
    #[must_use]
    pub fn new() -> Self {
        EngineHandle {
            tt: Arc::new(Mutex::new(TranspositionTable::new(DEFAULT_HASH_MIB))),
            position: Position::startpos(),
            history: Vec::new(),
            hash_mib: DEFAULT_HASH_MIB,
            running: None,
            worker: None,
        }
    }

    /// True while the worker is between spawn and its own `bestmove` exit.
    /// The worker clears its `running` flag on the way out, so a finished
    /// search (depth/node limit reached, not just an explicit `stop`) is
    /// correctly reported as no longer searching.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.running.as_ref().is_some_and(|flag| *flag.lock())
    }

    pub fn set_hash_mib(&mut self, mib: usize) {
        self.hash_mib = mib.clamp(MIN_HASH_MIB, MAX_HASH_MIB);
    }

    /// `ucinewgame`: resize the table to the configured size and drop history.
    pub fn new_game(&mut self) {
        #[cfg(feature = "logging")]
        log::info!("ucinewgame: resizing transposition table to {} MiB", self.hash_mib);
        self.tt.lock().resize(self.hash_mib);
        self.history.clear();
    }

    /// Load `startpos` or a FEN, then replay `moves`, recording each
    /// intermediate position for repetition detection.
    pub fn set_position(&mut self, fen: Option<&str>, moves: &[String]) -> bool {
        let base = match fen {
            Some(text) => match Position::create_from_fen(text) {
                Ok(p) => p,
                Err(_err) => {
                    #[cfg(feature = "logging")]
                    log::warn!("position: malformed FEN dropped ({_err})");
                    return false;
                }
            },
            None => Position::startpos(),
        };

        let mut pos = base;
        let mut history = Vec::with_capacity(moves.len());
        for lan in moves {
            let mv = match pos.find_legal_move(lan) {
                Ok(mv) => mv,
                Err(_err) => {
                    #[cfg(feature = "logging")]
                    log::warn!("position: '{lan}' dropped the command ({_err})");
                    return false;
                }
            };
            history.push(pos.clone());
            pos.do_move(mv);
        }

        self.position = pos;
        self.history = history;
        true
    }

    /// Spawn the worker thread to run `arg` against the current position.
    /// Ignored if a search is already running, per the UCI `go` contract.
    pub fn go(&mut self, mut arg: SearchArg, on_event: impl Fn(EngineEvent) + Send + 'static) {
        if self.is_searching() {
            #[cfg(feature = "logging")]
            log::warn!("go received while a search is already running; dropped");
            return;
        }

        #[cfg(feature = "logging")]
        log::debug!("go: starting search from {}", self.position.to_fen());

        // Reap a worker left over from a search that finished on its own
        // (depth/node limit), as opposed to being stopped explicitly.
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        arg.history = self.history.clone();
        let running = arg.running.clone();
        self.running = Some(running);

        let mut pos = self.position.clone();
        let tt = Arc::clone(&self.tt);

        let handle = thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let mut guard = tt.lock();
                search::run_search(
                    &mut pos,
                    &mut guard,
                    &arg,
                    |info| on_event(EngineEvent::Info(info)),
                    |mv| on_event(EngineEvent::BestMove(mv)),
                );
            })
            .expect("failed to spawn search thread");
        self.worker = Some(handle);
    }

    /// `stop`: clear `running` and join the worker. The worker emits
    /// `bestmove` on its way out.
    pub fn stop(&mut self) {
        if let Some(running) = &self.running {
            *running.lock() = false;
        }
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
        self.running = None;
        #[cfg(feature = "logging")]
        log::debug!("stop: worker joined");
    }

    pub fn quit(&mut self) {
        self.stop();
    }
}

impl Default for EngineHandle {
    fn default() -> Self {
        EngineHandle::new()
    }
}

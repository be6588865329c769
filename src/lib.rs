//! `duskwing` — a UCI chess engine.
//!
//! The library exposes every core component (bitboards, position, move
//! generation, evaluation, search, transposition table) as a public module
//! so it can be exercised from integration tests and benchmarks. `main.rs`
//! is a thin shim around [`uci::run`].

pub mod bitboard;
pub mod engine;
pub mod eval;
pub mod movegen;
pub mod position;
pub mod rng;
pub mod search;
pub mod see;
pub mod tt;
pub mod types;
pub mod uci;
pub mod zobrist;

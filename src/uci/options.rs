//! The UCI option table. Only `Hash` is exposed (§9 open question 3 notes
//! that the source's `Clear Hash` button was commented out; this design
//! follows that and exposes nothing beyond `Hash`).

use std::fmt;

use crate::engine::{EngineHandle, MAX_HASH_MIB, MIN_HASH_MIB};

/// Rejected `setoption` argument. Every variant is handled the same way by
/// the caller — dropped silently, per UCI convention — but keeping them
/// distinct lets `apply_setoption` log *why* when the `logging` feature is
/// on, instead of a single opaque failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    OptionNotFound { name: String },
    OptionValueRange { name: String, value: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::OptionNotFound { name } => write!(f, "unknown option '{name}'"),
            EngineError::OptionValueRange { name, value } => {
                write!(f, "value '{value}' out of range for option '{name}'")
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub fn print_options() {
    println!("id name duskwing");
    println!("id author duskwing contributors");
    println!("option name Hash type spin default 16 min {MIN_HASH_MIB} max {MAX_HASH_MIB}");
    println!("uciok");
}

/// Apply a parsed `setoption` name/value pair. Unknown names and
/// out-of-range values are silently ignored by the caller (§7), but are
/// reported back as an `EngineError` so this function's own logging (and
/// its tests) can distinguish the two.
pub fn apply_setoption(engine: &mut EngineHandle, name: &str, value: Option<&str>) -> Result<(), EngineError> {
    if !name.eq_ignore_ascii_case("hash") {
        return Err(EngineError::OptionNotFound { name: name.to_string() });
    }
    let value = value.unwrap_or_default();
    let in_range = value.parse::<usize>().ok().filter(|mib| (MIN_HASH_MIB..=MAX_HASH_MIB).contains(mib));
    let Some(mib) = in_range else {
        return Err(EngineError::OptionValueRange { name: name.to_string(), value: value.to_string() });
    };
    engine.set_hash_mib(mib);
    Ok(())
}

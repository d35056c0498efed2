//! Courtside Core Library
//!
//! Volleyball match tracking: rally scoring, lineup rotation with libero
//! substitution, match completion, and a key/value match archive.

pub mod completion;
pub mod controller;
pub mod error;
pub mod invariants;
pub mod models;
pub mod roster;
pub mod rotation;
pub mod scoring;
pub mod storage;

pub use completion::{advance_to_next_set, evaluate_match_state, AdvanceBlocked, MatchStatus};
pub use controller::{now_millis, DiscardRisk, MatchController, NextSet};
pub use error::{Error, Result};
pub use models::*;
pub use rotation::{apply_libero_rule, rotate, side_out, LiberoChange};
pub use scoring::{win_threshold, RallyOutcome};
pub use storage::{
    export_document, import_document, Database, KeyValueStore, MatchArchive, MatchRepository,
    MemoryStore,
};

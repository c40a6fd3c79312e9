//! Concrete search spaces and problems.
//!
//! Each domain exposes its states, actions and costs through the generic
//! `Space` and `Problem` traits, plus the heuristics that make sense for it.

pub mod graph;
pub mod sliding_tile;

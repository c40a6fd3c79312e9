//! Containers backing the search strategies.

pub mod dary_heap;

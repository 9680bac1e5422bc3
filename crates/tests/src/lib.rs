//! Crate housing end-to-end scenarios against the assembled stack;
//! see `tests/scenarios.rs` for the actual cases.

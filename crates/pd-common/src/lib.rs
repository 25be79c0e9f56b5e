//! PropDeck shared utilities.
//!
//! Logging bootstrap used by the shell binary and its crates.

pub mod logging;

//! Dashboard Shell
//!
//! The HTTP surface of the application: a router built from the static
//! route table, with a gate evaluation on every protected route and the
//! role dispatcher on root.

pub mod nav;
pub mod pages;
pub mod router;

pub use nav::PageNavigation;
pub use router::{shell_router, ShellState};

//! Novel Refiner - chapter editor with a simulated audit and revision assistant.
//!
//! The `core` module holds the editing and wizard logic; `tui` renders it
//! in the terminal.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

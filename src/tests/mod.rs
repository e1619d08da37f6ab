//! Cross-module tests.
//!
//! - `property`: proptest invariants for the chapter picker and the
//!   progress simulator.
//! - `unit`: wizard scenarios on a virtual clock and table-driven cases.

mod property;
mod unit;

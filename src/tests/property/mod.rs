//! Property-based tests.
//!
//! Run them with:
//! ```sh
//! cargo test property --release
//! ```
//!
//! - `picker_props`: pagination counts, toggle involution, selection summary
//! - `simulator_props`: step order, single completion, monotone progress

mod picker_props;
mod simulator_props;

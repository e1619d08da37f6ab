//! Multi-module scenarios and table-driven cases.

mod table_tests;
mod wizard_flow_tests;

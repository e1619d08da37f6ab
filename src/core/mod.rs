//! UI-free domain logic: chapters, the audit and revision wizard, the
//! simulated processing pipeline, and the documents being edited.

pub mod audit;
pub mod chapters;
pub mod document;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod revision;
pub mod vip;
pub mod wizard;

//! Event Data
//!
//! Fundamental structs for activity-level process data
pub mod case_centric;

#[doc(inline)]
pub use case_centric::EventLog;

//! Process Discovery
//!
//! Process discovery algorithms typically learn process model representations
//! from input event data.
pub mod case_centric;
pub use case_centric::*;

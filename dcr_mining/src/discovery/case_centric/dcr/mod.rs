//! DCR Graph Discovery
//!
//! Mines a [`DcrGraph`](crate::core::process_models::case_centric::dcr::DcrGraph) from an event log
//! in two steps: the log is first condensed into a [`LogAbstraction`], which is then translated
//! into DCR relations.
/// Abstraction of an event log into candidate relations
pub mod log_abstraction;
/// Mining DCR graphs from log abstractions
pub mod mining;

#[doc(inline)]
pub use log_abstraction::{abstract_log, LogAbstraction};
#[doc(inline)]
pub use mining::{discover_dcr_graph, mine_graph, DcrDiscoveryOptions};

#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![doc = include_str!("../README.md")]

pub mod conformance;
pub mod core;
pub mod discovery;

#[doc(inline)]
pub use crate::core::{DcrGraph, EventLog, LabelledDcrGraph};

#[doc(inline)]
pub use discovery::case_centric::dcr::{abstract_log, discover_dcr_graph, mine_graph};

#[doc(inline)]
pub use conformance::case_centric::dcr_alignment::{align, align_traces};

#[doc(inline)]
pub use conformance::case_centric::test_driven::check_test_case;

#[cfg(feature = "graphviz-export")]
#[doc(inline)]
pub use crate::core::process_models::case_centric::dcr::image_export::{
    export_dcr_to_dot_graph, graph_to_dot,
};

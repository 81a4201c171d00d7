//! Core modules for DCR process mining
pub mod event_data;

pub mod process_models;

pub use event_data::case_centric::EventLog;
pub use process_models::case_centric::dcr::{DcrGraph, LabelledDcrGraph};

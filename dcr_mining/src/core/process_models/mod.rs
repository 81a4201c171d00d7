//! Process Models
//!
//! Representations of process models and their execution semantics
pub mod case_centric;

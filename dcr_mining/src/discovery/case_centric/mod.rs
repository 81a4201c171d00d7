//! Case-centric Process Discovery
pub mod dcr;

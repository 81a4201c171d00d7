//! Case-centric Process Models
pub mod dcr;

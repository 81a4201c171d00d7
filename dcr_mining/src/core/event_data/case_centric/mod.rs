//! Case-centric Event Data
#[doc(hidden)]
pub(crate) mod event_log_struct;
pub mod macros;
#[doc(inline)]
pub use event_log_struct::*;

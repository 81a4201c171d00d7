//! Case-centric Conformance Checking
pub mod dcr_alignment;
pub mod test_driven;

#[doc(inline)]
pub use dcr_alignment::{align, align_traces, Alignment, AlignmentOptions, AlignmentStatus};
#[doc(inline)]
pub use test_driven::{check_test_case, TestCase};

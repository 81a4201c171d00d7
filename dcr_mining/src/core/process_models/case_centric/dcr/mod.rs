//! DCR (Dynamic Condition Response) graphs
#[cfg(feature = "graphviz-export")]
pub mod image_export;
#[doc(hidden)]
pub(crate) mod dcr_graph_struct;
#[doc(hidden)]
pub(crate) mod labelled_dcr_graph;
pub mod macros;
pub mod relation_map;
pub mod runtime;

#[doc(inline)]
pub use dcr_graph_struct::*;
#[doc(inline)]
pub use labelled_dcr_graph::*;
#[doc(inline)]
pub use relation_map::RelationMap;
#[doc(inline)]
pub use runtime::DcrRuntime;

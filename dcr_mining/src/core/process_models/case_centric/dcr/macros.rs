//! Convenient Macros for creating DCR graphs
///
/// Creates a [`DcrGraph`](crate::core::process_models::case_centric::dcr::DcrGraph).
///
/// The event list is followed (after a semicolon) by relation edges in the usual DCR arrow notation:
///
/// | Notation        | Relation  |
/// |-----------------|-----------|
/// | `"a" -->* "b"`  | condition |
/// | `"a" --><> "b"` | milestone |
/// | `"a" *--> "b"`  | response  |
/// | `"a" -->+ "b"`  | include   |
/// | `"a" -->% "b"`  | exclude   |
///
/// All events are initially included, nothing is executed or pending.
///
/// # Panics
///
/// Panics if an edge references an event missing from the event list.
///
/// # Examples
///
/// ```rust
/// use dcr_mining::{dcr_graph, core::process_models::case_centric::dcr::RelationKind};
///
/// let graph = dcr_graph!(["Approve", "Reject", "Archive"];
///     "Approve" -->% "Reject",
///     "Reject" -->% "Approve",
///     "Approve" *--> "Archive",
///     "Approve" -->* "Archive",
/// );
/// assert!(graph.has_relation(RelationKind::Condition, "Approve", "Archive"));
/// assert_eq!(graph.relation_count(), 4);
/// ```
#[macro_export]
macro_rules! dcr_graph {
    ( [ $( $event:expr ),* $(,)? ] $( ; $( $rest:tt )* )? ) => {{
        #[allow(unused_mut)]
        let mut graph = $crate::core::process_models::case_centric::dcr::DcrGraph::new(
            ::std::vec::Vec::<::std::string::String>::from([
                $( ::std::string::ToString::to_string(&$event) ),*
            ]),
        );
        $( $crate::dcr_graph!(@edges graph; $( $rest )*); )?
        graph
    }};
    (@edges $g:ident; ) => {};
    (@edges $g:ident; $from:literal -->* $to:literal $( , $( $rest:tt )* )? ) => {
        $crate::dcr_graph!(@edge $g, Condition, $from, $to);
        $( $crate::dcr_graph!(@edges $g; $( $rest )*); )?
    };
    (@edges $g:ident; $from:literal --><> $to:literal $( , $( $rest:tt )* )? ) => {
        $crate::dcr_graph!(@edge $g, Milestone, $from, $to);
        $( $crate::dcr_graph!(@edges $g; $( $rest )*); )?
    };
    (@edges $g:ident; $from:literal *--> $to:literal $( , $( $rest:tt )* )? ) => {
        $crate::dcr_graph!(@edge $g, Response, $from, $to);
        $( $crate::dcr_graph!(@edges $g; $( $rest )*); )?
    };
    (@edges $g:ident; $from:literal -->+ $to:literal $( , $( $rest:tt )* )? ) => {
        $crate::dcr_graph!(@edge $g, Include, $from, $to);
        $( $crate::dcr_graph!(@edges $g; $( $rest )*); )?
    };
    (@edges $g:ident; $from:literal -->% $to:literal $( , $( $rest:tt )* )? ) => {
        $crate::dcr_graph!(@edge $g, Exclude, $from, $to);
        $( $crate::dcr_graph!(@edges $g; $( $rest )*); )?
    };
    (@edge $g:ident, $kind:ident, $from:literal, $to:literal) => {
        if let ::std::result::Result::Err(e) = $g.add_relation(
            $crate::core::process_models::case_centric::dcr::RelationKind::$kind,
            $from,
            $to,
        ) {
            panic!("Invalid DCR graph edge: {}", e);
        }
    };
}

//! Export of DCR graphs to Graphviz DOT
use graphviz_rust::{
    dot_generator::{attr, edge, id, node, node_id, stmt},
    dot_structures::*,
    printer::{DotPrinter, PrinterContext},
};

use super::{
    dcr_graph_struct::{DcrGraph, RelationKind},
    labelled_dcr_graph::Labelling,
};

/// Edge color and arrowhead symbol of a relation kind
fn relation_style(kind: RelationKind) -> (&'static str, &'static str) {
    match kind {
        RelationKind::Condition => ("\"#FFA500\"", "•"),
        RelationKind::Milestone => ("\"#BC1AF2\"", "◇"),
        RelationKind::Response => ("\"#2192FF\"", "•"),
        RelationKind::Include => ("\"#1E9E1E\"", "+"),
        RelationKind::Exclude => ("\"#D4001F\"", "%"),
    }
}

///
/// Export a [`DcrGraph`] to a DOT graph (used in Graphviz)
///
/// Events are drawn as boxes (labelled via `labelling`, if given): excluded events are dashed,
/// pending events are drawn with a red border and executed events are marked with a check mark.
///
/// Also see [`graph_to_dot`]
///
pub fn export_dcr_to_dot_graph(
    dcr: &DcrGraph,
    labelling: Option<&Labelling>,
    dpi_factor: Option<f32>,
) -> Graph {
    let event_nodes: Vec<Stmt> = dcr
        .events
        .iter()
        .map(|e| {
            let mut label = labelling
                .and_then(|l| l.label(e))
                .cloned()
                .unwrap_or_else(|| e.clone());
            if dcr.marking.executed.contains(e) {
                label.push_str(" ✓");
            }
            let style = if dcr.marking.included.contains(e) {
                "\"rounded\""
            } else {
                "\"rounded,dashed\""
            };
            let color = if dcr.marking.pending.contains(e) {
                "\"#D4001F\""
            } else {
                "\"black\""
            };
            stmt!(node!(esc e; attr!("label", esc label), attr!("shape","box"), attr!("style",style), attr!("color",color), attr!("fontsize",12), attr!("height",0.5)))
        })
        .collect();

    let relation_arcs: Vec<Stmt> = RelationKind::ALL
        .iter()
        .flat_map(|kind| {
            let (color, symbol) = relation_style(*kind);
            dcr.relation_edges(*kind)
                .into_iter()
                .map(move |(from, to)| {
                    let attrs = vec![
                        attr!("color", color),
                        attr!("fontcolor", color),
                        attr!("headlabel", esc symbol),
                        attr!("tooltip", esc kind.get_name()),
                    ];
                    stmt!(edge!(node_id!(esc from) => node_id!(esc to), attrs))
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let mut global_graph_options = vec![stmt!(attr!("rankdir", "LR"))];
    if let Some(dpi_fac) = dpi_factor {
        global_graph_options.push(stmt!(attr!("dpi", (dpi_fac * 96.0))))
    }

    // Not strict: several relations between the same pair of events are drawn as separate arcs
    Graph::DiGraph {
        id: id!(esc "dcr_graph"),
        strict: false,
        stmts: vec![global_graph_options, event_nodes, relation_arcs]
            .into_iter()
            .flatten()
            .collect(),
    }
}

///
/// Convert a DOT graph to a String containing the DOT source
///
pub fn graph_to_dot(g: &Graph) -> String {
    g.print(&mut PrinterContext::default())
}

use serde::{Deserialize, Serialize};

use crate::core::{
    event_data::case_centric::{EventLogError, EventSet},
    process_models::case_centric::dcr::{DcrGraph, RelationMap},
    EventLog,
};

use super::log_abstraction::{abstract_log, LogAbstraction};

/// Options for the discovery of DCR graphs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcrDiscoveryOptions {
    /// Replay the log after the direct translation to find conditions on events that might be excluded
    pub find_additional_conditions: bool,
}

impl Default for DcrDiscoveryOptions {
    fn default() -> Self {
        Self {
            find_additional_conditions: true,
        }
    }
}

/// Discover a [`DcrGraph`] from an [`EventLog`]
///
/// Shorthand for [`abstract_log`] followed by [`mine_graph`].
pub fn discover_dcr_graph(
    log: &EventLog,
    options: &DcrDiscoveryOptions,
) -> Result<DcrGraph, EventLogError> {
    let abstraction = abstract_log(log)?;
    Ok(mine_graph(&abstraction, options.find_additional_conditions))
}

///
/// Mine a [`DcrGraph`] from a [`LogAbstraction`]
///
/// The direct translation encodes
/// - at-most-once events as self-exclusions,
/// - responses and precedences as responses and conditions,
/// - chain precedences `i, j` as `i -->+ j` and `j -->% j`,
/// - events that never co-occur as mutual exclusions and
/// - `e -->% s` whenever `s` precedes but never succeeds `e` (and is not self-excluding).
///
/// Redundant exclusions and transitively implied conditions and responses are pruned afterwards.
/// With `find_additional_conditions`, the log is replayed against the include/exclude relations
/// and every predecessor of `e` that is executed or excluded before each occurrence of `e` becomes
/// an additional condition for `e`.
///
/// The returned graph has all events included, nothing executed or pending.
pub fn mine_graph(abstraction: &LogAbstraction, find_additional_conditions: bool) -> DcrGraph {
    let events = &abstraction.events;
    let mut graph = DcrGraph::new(events.iter().cloned());

    for event in &abstraction.at_most_once {
        graph.excludes_to.insert(event, event);
    }
    graph.responses_to.union_with(&abstraction.response_to);
    graph.conditions_for.union_with(&abstraction.precedence_for);

    for (j, i) in abstraction.chain_precedence_for.edges() {
        graph.includes_to.insert(i, j);
        graph.excludes_to.insert(j, j);
    }

    for event in events {
        let co_occurring = abstraction.co_occurring(event);
        let never_co_occurring: Vec<_> = events
            .iter()
            .filter(|e| *e != event && !co_occurring.contains(*e))
            .cloned()
            .collect();
        graph
            .excludes_to
            .ensure_entry(event)
            .extend(never_co_occurring);

        let successors = abstraction.successor.get(event);
        for s in abstraction
            .predecessor
            .get(event)
            .iter()
            .filter(|s| !successors.contains(*s))
        {
            if !graph.excludes_to.contains(s, s) {
                graph.excludes_to.insert(event, s);
            }
        }
    }
    tracing::debug!(
        conditions = graph.conditions_for.edge_count(),
        responses = graph.responses_to.edge_count(),
        includes = graph.includes_to.edge_count(),
        excludes = graph.excludes_to.edge_count(),
        "Translated log abstraction to DCR graph"
    );

    prune_redundant_excludes(&mut graph.excludes_to, &abstraction.precedence_for);
    graph.conditions_for.prune_transitive();
    graph.responses_to.prune_transitive();

    if find_additional_conditions {
        let additional = replay_additional_conditions(abstraction, &graph);
        graph.conditions_for.union_with(&additional);
        graph.conditions_for.prune_transitive();
    }

    tracing::debug!(
        events = graph.events.len(),
        relations = graph.relation_count(),
        find_additional_conditions,
        "Mined DCR graph"
    );
    graph
}

/// If `r` always precedes `s` and `r -->% t`, then `s -->% t` is (mostly) redundant
///
/// Self-exclusions are kept.
fn prune_redundant_excludes(excludes_to: &mut RelationMap, precedence_for: &RelationMap) {
    for (s, preceding) in precedence_for.iter() {
        for r in preceding {
            let implied: Vec<_> = excludes_to
                .get(r)
                .iter()
                .filter(|t| *t != s)
                .cloned()
                .collect();
            for t in implied {
                excludes_to.remove(s, &t);
            }
        }
    }
}

/// Candidate conditions surviving a replay of all traces
///
/// A predecessor `c` of `e` stays a candidate only if, at every occurrence of `e`, `c` was either
/// executed before in the same trace or currently excluded.
fn replay_additional_conditions(abstraction: &LogAbstraction, graph: &DcrGraph) -> RelationMap {
    let mut candidates = abstraction.predecessor.clone();
    for trace in abstraction.traces.values() {
        let mut seen_before = EventSet::new();
        let mut included = abstraction.events.clone();
        for event in trace {
            if let Some(conditions) = candidates.get_mut(event) {
                conditions.retain(|c| seen_before.contains(c) || !included.contains(c));
            }
            for excluded in graph.excludes_to.get(event) {
                included.remove(excluded);
            }
            included.extend(graph.includes_to.get(event).iter().cloned());
            seen_before.insert(event.clone());
        }
    }
    tracing::debug!(
        additional_conditions = candidates.edge_count(),
        "Replayed log for additional conditions"
    );
    candidates
}

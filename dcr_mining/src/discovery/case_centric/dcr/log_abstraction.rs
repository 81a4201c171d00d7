use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{
    event_data::case_centric::{Event, EventLogError, EventSet, Trace},
    process_models::case_centric::dcr::RelationMap,
    EventLog,
};

///
/// Abstraction of an [`EventLog`] used for DCR discovery
///
/// Holds, for every event, the candidate relation sets observed over all traces.
/// All relation maps are total over `events`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogAbstraction {
    /// All events of the log
    pub events: EventSet,
    /// Raw traces, by trace identifier
    pub traces: BTreeMap<String, Trace>,
    /// Events never occurring twice in the same trace
    pub at_most_once: EventSet,
    /// For every event `e`, the events preceding _every_ occurrence of `e`
    pub precedence_for: RelationMap,
    /// For every event `e`, the single event immediately preceding every occurrence of `e` (if any)
    pub chain_precedence_for: RelationMap,
    /// For every event `e`, the events always following the last occurrence of `e`
    pub response_to: RelationMap,
    /// For every event `e`, all events that ever occurred before `e` in some trace
    pub predecessor: RelationMap,
    /// For every event `e`, all events that ever occurred after `e` in some trace
    pub successor: RelationMap,
}

impl LogAbstraction {
    /// Events co-occurring with `event` in at least one trace
    pub fn co_occurring(&self, event: &str) -> EventSet {
        self.predecessor
            .get(event)
            .union(self.successor.get(event))
            .cloned()
            .collect()
    }

    fn scan_trace(&mut self, trace: &[Event]) {
        let mut seen = EventSet::new();
        let mut seen_only_before: BTreeMap<&Event, EventSet> = BTreeMap::new();
        let mut last_event: Option<&Event> = None;
        for event in trace {
            self.predecessor
                .ensure_entry(event)
                .extend(seen.iter().cloned());
            if seen.contains(event) {
                self.at_most_once.remove(event);
            }
            seen.insert(event.clone());

            if let Some(precedence) = self.precedence_for.get_mut(event) {
                precedence.retain(|p| seen.contains(p));
            }

            if let Some(chain) = self.chain_precedence_for.get_mut(event) {
                match last_event {
                    Some(last) => chain.retain(|p| p == last),
                    // Starting a trace rules out any chain predecessor
                    None => chain.clear(),
                }
            }

            if !self.response_to.get(event).is_empty() {
                seen_only_before.insert(event, seen.clone());
            }
            for before in seen_only_before.values_mut() {
                before.remove(event);
            }
            last_event = Some(event);
        }

        for (event, before) in seen_only_before {
            if let Some(responses) = self.response_to.get_mut(event) {
                responses.retain(|r| r != event && seen.contains(r) && !before.contains(r));
            }
        }
    }
}

///
/// Build the [`LogAbstraction`] of an [`EventLog`]
///
/// Each trace is scanned once from left to right. Fails if the log is structurally invalid
/// (see [`EventLog::validate`]).
pub fn abstract_log(log: &EventLog) -> Result<LogAbstraction, EventLogError> {
    log.validate()?;
    let events = &log.events;
    let mut abstraction = LogAbstraction {
        events: events.clone(),
        traces: log.traces.clone(),
        at_most_once: events.clone(),
        precedence_for: RelationMap::complete_over(events),
        chain_precedence_for: RelationMap::complete_over(events),
        response_to: RelationMap::complete_over(events),
        predecessor: RelationMap::empty_over(events),
        successor: RelationMap::new(),
    };
    for trace in log.traces.values() {
        abstraction.scan_trace(trace);
    }
    abstraction.successor = abstraction.predecessor.reversed();

    tracing::debug!(
        events = abstraction.events.len(),
        traces = abstraction.traces.len(),
        at_most_once = abstraction.at_most_once.len(),
        precedences = abstraction.precedence_for.edge_count(),
        chain_precedences = abstraction.chain_precedence_for.edge_count(),
        responses = abstraction.response_to.edge_count(),
        "Abstracted event log"
    );
    Ok(abstraction)
}

#[cfg(test)]
mod tests {
    use super::abstract_log;
    use crate::core::event_data::case_centric::{EventLog, EventLogError, EventSet};
    use crate::event_log;

    fn set(events: &[&str]) -> EventSet {
        events.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_abstract_small_log() {
        let log = event_log!("1" => ["a", "b", "c"], "2" => ["a", "c"]);
        let abs = abstract_log(&log).unwrap();

        assert_eq!(abs.at_most_once, set(&["a", "b", "c"]));

        assert!(abs.precedence_for.get("a").is_empty());
        assert_eq!(abs.precedence_for.get("b"), &set(&["a"]));
        assert_eq!(abs.precedence_for.get("c"), &set(&["a"]));

        assert!(abs.chain_precedence_for.get("a").is_empty());
        assert_eq!(abs.chain_precedence_for.get("b"), &set(&["a"]));
        assert!(abs.chain_precedence_for.get("c").is_empty());

        assert_eq!(abs.response_to.get("a"), &set(&["c"]));
        assert_eq!(abs.response_to.get("b"), &set(&["c"]));
        assert!(abs.response_to.get("c").is_empty());

        assert_eq!(abs.predecessor.get("c"), &set(&["a", "b"]));
        assert_eq!(abs.successor.get("a"), &set(&["b", "c"]));
        assert!(abs.successor.get("c").is_empty());
        assert_eq!(abs.co_occurring("b"), set(&["a", "c"]));
    }

    #[test]
    fn test_repetitions_and_responses_after_last_occurrence() {
        let log = event_log!("1" => ["a", "b", "a"], "2" => ["b", "a", "b"]);
        let abs = abstract_log(&log).unwrap();
        assert!(abs.at_most_once.is_empty());
        // Repeated events are their own predecessors
        assert_eq!(abs.predecessor.get("a"), &set(&["a", "b"]));
        // After the last `a` of trace 1, nothing follows
        assert!(abs.response_to.get("a").is_empty());
        assert!(abs.response_to.get("b").is_empty());
        // Different immediate predecessors of `a`
        assert!(abs.chain_precedence_for.get("a").is_empty());
        // `b` starts trace 2
        assert!(abs.chain_precedence_for.get("b").is_empty());
    }

    #[test]
    fn test_empty_traces_and_isolated_events() {
        let mut log = event_log!("1" => [], "2" => ["x"]);
        log.add_event("never");
        let abs = abstract_log(&log).unwrap();
        assert_eq!(abs.at_most_once, set(&["never", "x"]));
        assert!(abs.predecessor.get("x").is_empty());
        assert!(abs.successor.contains_key("never"));
        assert_eq!(abs.precedence_for.get("never"), &set(&["x"]));
        assert_eq!(abs.response_to.get("x"), &set(&[]));
    }

    #[test]
    fn test_empty_event_name_is_not_special() {
        let log = event_log!("1" => ["", "a"], "2" => ["", "a"]);
        let abs = abstract_log(&log).unwrap();
        assert_eq!(abs.chain_precedence_for.get("a"), &set(&[""]));
        assert_eq!(abs.response_to.get(""), &set(&["a"]));
    }

    #[test]
    fn test_invalid_log_is_rejected() {
        let mut log = EventLog::new();
        log.add_trace("", vec!["a".to_string()]);
        assert_eq!(abstract_log(&log), Err(EventLogError::EmptyTraceId));

        let mut log = event_log!("1" => ["a"]);
        log.events.clear();
        assert!(matches!(
            abstract_log(&log),
            Err(EventLogError::UnknownEvent { .. })
        ));
    }
}

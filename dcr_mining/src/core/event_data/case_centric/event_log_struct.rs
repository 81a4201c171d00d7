use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Identifier of an event (e.g., an activity name)
///
/// Events are opaque: two events are the same exactly if their identifiers are equal.
pub type Event = String;

/// Set of [`Event`]s
///
/// Kept in canonical (lexicographic) order, so that iteration, comparison and serialization
/// never depend on insertion order.
pub type EventSet = BTreeSet<Event>;

/// Ordered sequence of [`Event`] occurrences (repetitions allowed)
pub type Trace = Vec<Event>;

///
/// Structural errors of an [`EventLog`]
///
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventLogError {
    /// A trace without identifier
    #[error("Trace with empty identifier")]
    EmptyTraceId,
    /// A trace contains an event that is not part of the event set of the log
    #[error("Trace '{trace_id}' contains unknown event '{event}'")]
    UnknownEvent {
        /// Identifier of the offending trace
        trace_id: String,
        /// The event missing from the log's event set
        event: Event,
    },
}

///
/// Activity-level event log
///
/// Consists of a set of [`Event`]s and a map from trace identifiers to their [`Trace`]s.
/// Every event occurring in a trace must also be part of `events`
/// (see [`EventLog::validate`]).
///
/// ```rust
/// use dcr_mining::event_log;
///
/// let log = event_log!(
///     "case-1" => ["register", "approve"],
///     "case-2" => ["register", "reject"],
/// );
/// assert_eq!(log.events.len(), 3);
/// assert_eq!(log.traces.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    /// All events of the log
    pub events: EventSet,
    /// Traces, by trace identifier
    pub traces: BTreeMap<String, Trace>,
}

impl EventLog {
    /// Create a new, empty [`EventLog`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an [`EventLog`] from `(trace id, trace)` pairs
    ///
    /// The event set is derived from the traces.
    pub fn from_traces<I, S, T>(traces: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: IntoIterator,
        T::Item: Into<Event>,
    {
        let mut log = Self::new();
        for (trace_id, trace) in traces {
            log.add_trace(trace_id, trace.into_iter().map(Into::into).collect());
        }
        log
    }

    /// Add an event that does not (yet) occur in any trace
    pub fn add_event<S: Into<Event>>(&mut self, event: S) -> bool {
        self.events.insert(event.into())
    }

    /// Add a trace, registering all of its events
    ///
    /// Returns the trace previously stored under the same identifier, if any.
    pub fn add_trace<S: Into<String>>(&mut self, trace_id: S, trace: Trace) -> Option<Trace> {
        self.events.extend(trace.iter().cloned());
        self.traces.insert(trace_id.into(), trace)
    }

    /// Total number of event occurrences over all traces
    pub fn num_occurrences(&self) -> usize {
        self.traces.values().map(Vec::len).sum()
    }

    /// Check the structural well-formedness of the log
    ///
    /// Fails on the first trace with an empty identifier or with an event outside of `events`.
    pub fn validate(&self) -> Result<(), EventLogError> {
        for (trace_id, trace) in &self.traces {
            if trace_id.is_empty() {
                return Err(EventLogError::EmptyTraceId);
            }
            if let Some(event) = trace.iter().find(|e| !self.events.contains(*e)) {
                return Err(EventLogError::UnknownEvent {
                    trace_id: trace_id.clone(),
                    event: event.clone(),
                });
            }
        }
        Ok(())
    }
}

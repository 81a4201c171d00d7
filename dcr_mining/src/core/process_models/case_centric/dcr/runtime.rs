//! Executing DCR graphs
use crate::core::event_data::case_centric::Event;

use super::dcr_graph_struct::{DcrError, DcrGraph, Marking};

///
/// Execution engine of a [`DcrGraph`]
///
/// Borrows the (immutable) relations of the graph and owns the single live [`Marking`].
/// Speculative execution (e.g., during alignment search) is done inside
/// [`DcrRuntime::speculate`] or between [`DcrRuntime::checkpoint`] and [`DcrRuntime::restore`],
/// so that sibling branches never observe each other's changes.
#[derive(Debug, Clone)]
pub struct DcrRuntime<'g> {
    graph: &'g DcrGraph,
    marking: Marking,
}

impl<'g> DcrRuntime<'g> {
    /// Create a runtime starting at the marking of `graph`
    pub fn new(graph: &'g DcrGraph) -> Self {
        Self::with_marking(graph, graph.marking.clone())
    }

    /// Create a runtime starting at the given marking
    pub fn with_marking(graph: &'g DcrGraph, marking: Marking) -> Self {
        Self { graph, marking }
    }

    /// The executed graph
    pub fn graph(&self) -> &'g DcrGraph {
        self.graph
    }

    /// The current marking
    pub fn marking(&self) -> &Marking {
        &self.marking
    }

    /// Consume the runtime, returning the current marking
    pub fn into_marking(self) -> Marking {
        self.marking
    }

    /// Execute `event`, updating the marking
    ///
    /// Does not check whether `event` is enabled (see [`DcrRuntime::is_enabled`]).
    pub fn execute(&mut self, event: &str) -> Result<(), DcrError> {
        let Some(event) = self.graph.events.get(event) else {
            return Err(DcrError::UnknownEvent {
                event: event.to_string(),
            });
        };
        let marking = &mut self.marking;
        marking.executed.insert(event.clone());
        marking.pending.remove(event);
        marking
            .pending
            .extend(self.graph.responses_to.get(event).iter().cloned());
        for excluded in self.graph.excludes_to.get(event) {
            marking.included.remove(excluded);
        }
        marking
            .included
            .extend(self.graph.includes_to.get(event).iter().cloned());
        Ok(())
    }

    /// Checks if `event` can currently be executed
    ///
    /// `event` has to be included, all included conditions have to be executed and no included
    /// milestone may be pending. Unknown events are never enabled.
    pub fn is_enabled(&self, event: &str) -> bool {
        let marking = &self.marking;
        if !marking.included.contains(event) {
            return false;
        }
        let conditions_met = self
            .graph
            .conditions_for
            .get(event)
            .iter()
            .all(|c| !marking.included.contains(c) || marking.executed.contains(c));
        let milestones_met = self
            .graph
            .milestones_for
            .get(event)
            .iter()
            .all(|m| !(marking.included.contains(m) && marking.pending.contains(m)));
        conditions_met && milestones_met
    }

    /// All currently enabled events (in canonical order)
    pub fn enabled_events(&self) -> impl Iterator<Item = &'g Event> + '_ {
        self.graph.events.iter().filter(|e| self.is_enabled(e))
    }

    /// Checks if no included event is pending
    pub fn is_accepting(&self) -> bool {
        self.marking.is_accepting()
    }

    /// Snapshot the current marking
    pub fn checkpoint(&self) -> Marking {
        self.marking.clone()
    }

    /// Restore a marking previously taken with [`DcrRuntime::checkpoint`]
    pub fn restore(&mut self, checkpoint: Marking) {
        self.marking = checkpoint;
    }

    /// Run `f` on this runtime, restoring the current marking afterwards
    pub fn speculate<T, F: FnOnce(&mut Self) -> T>(&mut self, f: F) -> T {
        let checkpoint = self.checkpoint();
        let ret = f(self);
        self.restore(checkpoint);
        ret
    }
}

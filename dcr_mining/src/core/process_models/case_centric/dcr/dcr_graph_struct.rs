use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

use crate::core::event_data::case_centric::{Event, EventSet};

use super::relation_map::RelationMap;
use super::runtime::DcrRuntime;

///
/// The five relation kinds of DCR graphs
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// `a -->* b`: `b` can only execute if `a` is executed or excluded
    Condition,
    /// `a --><> b`: `b` can only execute if `a` is not pending or excluded
    Milestone,
    /// `a *--> b`: executing `a` makes `b` pending
    Response,
    /// `a -->+ b`: executing `a` includes `b`
    Include,
    /// `a -->% b`: executing `a` excludes `b`
    Exclude,
}

impl RelationKind {
    /// All relation kinds
    pub const ALL: [RelationKind; 5] = [
        RelationKind::Condition,
        RelationKind::Milestone,
        RelationKind::Response,
        RelationKind::Include,
        RelationKind::Exclude,
    ];

    /// Name of the relation kind
    pub fn get_name(&self) -> &'static str {
        match self {
            RelationKind::Condition => "condition",
            RelationKind::Milestone => "milestone",
            RelationKind::Response => "response",
            RelationKind::Include => "include",
            RelationKind::Exclude => "exclude",
        }
    }

    /// Whether the relation is stored by its target event
    ///
    /// Conditions and milestones are stored as `conditions_for[target]`/`milestones_for[target]`,
    /// all other relations as `xxx_to[source]`.
    pub fn is_stored_by_target(&self) -> bool {
        matches!(self, RelationKind::Condition | RelationKind::Milestone)
    }
}

impl Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

///
/// Structural errors of DCR graphs (and their use)
///
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DcrError {
    /// An event is not part of the graph
    #[error("Unknown event '{event}'")]
    UnknownEvent {
        /// The unknown event
        event: Event,
    },
    /// A relation edge references an event that is not part of the graph
    #[error("{relation} relation from '{from}' to '{to}' references an unknown event")]
    UnknownRelationEvent {
        /// Relation kind of the edge
        relation: RelationKind,
        /// Source of the edge
        from: Event,
        /// Target of the edge
        to: Event,
    },
    /// A relation map has no entry for a graph event
    #[error("{relation} relation has no entry for event '{event}'")]
    MissingRelationEntry {
        /// Relation kind of the incomplete map
        relation: RelationKind,
        /// Event without entry
        event: Event,
    },
    /// The marking references an event that is not part of the graph
    #[error("Marking references unknown event '{event}'")]
    UnknownMarkingEvent {
        /// The unknown event
        event: Event,
    },
    /// An event of a labelled graph has no label
    #[error("Event '{event}' has no label")]
    MissingLabel {
        /// The unlabelled event
        event: Event,
    },
    /// An event is mapped to a label that is not part of the label alphabet
    #[error("Event '{event}' is mapped to unknown label '{label}'")]
    UnknownLabel {
        /// The unknown label
        label: String,
        /// The event mapped to it
        event: Event,
    },
    /// Event-to-label mapping and its inverse disagree
    #[error("Label mapping of event '{event}' does not match the inverse label mapping")]
    LabelMismatch {
        /// The inconsistently mapped event
        event: Event,
    },
}

///
/// Marking (i.e., state) of a [`DcrGraph`]
///
/// The three sets are not required to be disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marking {
    /// Events executed at least once
    pub executed: EventSet,
    /// Events that have to be executed eventually (or excluded)
    pub pending: EventSet,
    /// Events currently part of the graph
    pub included: EventSet,
}

impl Marking {
    /// Create a new [`Marking`] in which exactly `included` is included and nothing is executed or pending
    pub fn new(included: EventSet) -> Self {
        Self {
            executed: EventSet::new(),
            pending: EventSet::new(),
            included,
        }
    }

    /// Checks if no event is both pending and included
    pub fn is_accepting(&self) -> bool {
        self.pending.is_disjoint(&self.included)
    }
}

///
/// A DCR (Dynamic Condition Response) graph
///
/// Declarative process model: [`Event`]s with five [`RelationKind`]s between them and a [`Marking`].
/// The relation maps are total over `events`.
/// The structure is never changed during execution; executing events only changes a [`Marking`] (see [`DcrRuntime`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcrGraph {
    /// Events
    pub events: EventSet,
    /// For every event, the events that are a condition for it
    pub conditions_for: RelationMap,
    /// For every event, the events that are a milestone for it
    pub milestones_for: RelationMap,
    /// For every event, the events it makes pending
    pub responses_to: RelationMap,
    /// For every event, the events it includes
    pub includes_to: RelationMap,
    /// For every event, the events it excludes
    pub excludes_to: RelationMap,
    /// (Initial) marking
    pub marking: Marking,
}

impl DcrGraph {
    /// Create a new [`DcrGraph`] with the given events, no relations and all events included
    pub fn new<I, S>(events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Event>,
    {
        let events: EventSet = events.into_iter().map(Into::into).collect();
        Self {
            conditions_for: RelationMap::empty_over(&events),
            milestones_for: RelationMap::empty_over(&events),
            responses_to: RelationMap::empty_over(&events),
            includes_to: RelationMap::empty_over(&events),
            excludes_to: RelationMap::empty_over(&events),
            marking: Marking::new(events.clone()),
            events,
        }
    }

    /// Add an event (included, without any relations)
    ///
    /// Returns `false` if the event was already part of the graph.
    pub fn add_event<S: Into<Event>>(&mut self, event: S) -> bool {
        let event = event.into();
        if !self.events.insert(event.clone()) {
            return false;
        }
        for kind in RelationKind::ALL {
            self.relation_mut(kind).ensure_entry(&event);
        }
        self.marking.included.insert(event);
        true
    }

    /// Get the [`RelationMap`] storing the given relation kind
    ///
    /// See [`RelationKind::is_stored_by_target`] for the direction in which pairs are stored.
    pub fn relation(&self, kind: RelationKind) -> &RelationMap {
        match kind {
            RelationKind::Condition => &self.conditions_for,
            RelationKind::Milestone => &self.milestones_for,
            RelationKind::Response => &self.responses_to,
            RelationKind::Include => &self.includes_to,
            RelationKind::Exclude => &self.excludes_to,
        }
    }

    fn relation_mut(&mut self, kind: RelationKind) -> &mut RelationMap {
        match kind {
            RelationKind::Condition => &mut self.conditions_for,
            RelationKind::Milestone => &mut self.milestones_for,
            RelationKind::Response => &mut self.responses_to,
            RelationKind::Include => &mut self.includes_to,
            RelationKind::Exclude => &mut self.excludes_to,
        }
    }

    /// Add a relation edge from `from` to `to`
    ///
    /// Fails if either event is not part of the graph.
    pub fn add_relation(
        &mut self,
        kind: RelationKind,
        from: &str,
        to: &str,
    ) -> Result<(), DcrError> {
        if !self.events.contains(from) || !self.events.contains(to) {
            return Err(DcrError::UnknownRelationEvent {
                relation: kind,
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        if kind.is_stored_by_target() {
            self.relation_mut(kind).insert(to, from);
        } else {
            self.relation_mut(kind).insert(from, to);
        }
        Ok(())
    }

    /// Remove a relation edge from `from` to `to`
    ///
    /// Returns `true` if the edge existed.
    pub fn remove_relation(&mut self, kind: RelationKind, from: &str, to: &str) -> bool {
        if kind.is_stored_by_target() {
            self.relation_mut(kind).remove(to, from)
        } else {
            self.relation_mut(kind).remove(from, to)
        }
    }

    /// Checks if there is a relation edge of the given kind from `from` to `to`
    pub fn has_relation(&self, kind: RelationKind, from: &str, to: &str) -> bool {
        if kind.is_stored_by_target() {
            self.relation(kind).contains(to, from)
        } else {
            self.relation(kind).contains(from, to)
        }
    }

    /// All relation edges of the given kind, as `(from, to)` pairs
    pub fn relation_edges(&self, kind: RelationKind) -> Vec<(&Event, &Event)> {
        let rel = self.relation(kind);
        if kind.is_stored_by_target() {
            rel.edges().map(|(to, from)| (from, to)).collect()
        } else {
            rel.edges().collect()
        }
    }

    /// Total number of relation edges (over all relation kinds)
    pub fn relation_count(&self) -> usize {
        RelationKind::ALL
            .iter()
            .map(|kind| self.relation(*kind).edge_count())
            .sum()
    }

    /// Events that are a condition for at least one event
    ///
    /// Only for these events, the executed state influences enabledness.
    pub fn condition_sources(&self) -> EventSet {
        self.conditions_for.all_targets()
    }

    /// Checks the structural well-formedness of the graph
    ///
    /// All relation maps must have an entry for every event, all edges and all marking entries must
    /// reference events of the graph.
    pub fn validate(&self) -> Result<(), DcrError> {
        for kind in RelationKind::ALL {
            let rel = self.relation(kind);
            if let Some(event) = self.events.iter().find(|e| !rel.contains_key(e)) {
                return Err(DcrError::MissingRelationEntry {
                    relation: kind,
                    event: event.clone(),
                });
            }
            for (from, to) in self.relation_edges(kind) {
                if !self.events.contains(from) || !self.events.contains(to) {
                    return Err(DcrError::UnknownRelationEvent {
                        relation: kind,
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
            }
        }
        let marking = &self.marking;
        if let Some(event) = marking
            .executed
            .iter()
            .chain(marking.pending.iter())
            .chain(marking.included.iter())
            .find(|e| !self.events.contains(*e))
        {
            return Err(DcrError::UnknownMarkingEvent {
                event: event.clone(),
            });
        }
        Ok(())
    }

    /// Create a [`DcrRuntime`] executing this graph, starting at its marking
    pub fn runtime(&self) -> DcrRuntime<'_> {
        DcrRuntime::new(self)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string and validate the result
    pub fn from_json(json: &str) -> Result<Self, DcrGraphJsonError> {
        let graph: Self = serde_json::from_str(json)?;
        graph.validate()?;
        Ok(graph)
    }
}

///
/// Errors when importing a [`DcrGraph`] from JSON
///
#[derive(Debug, Error)]
pub enum DcrGraphJsonError {
    /// Malformed JSON
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    /// Well-formed JSON, but not a well-formed DCR graph
    #[error("DCR Error: {0}")]
    Dcr(#[from] DcrError),
}

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::event_data::case_centric::{Event, EventSet};

use super::dcr_graph_struct::{DcrError, DcrGraph};

/// Label (i.e., activity) of an [`Event`]
pub type Label = String;

static EMPTY_EVENT_SET: EventSet = BTreeSet::new();

///
/// Bidirectional index between [`Event`]s and [`Label`]s
///
/// Every event has at most one label, while several events may share a label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labelling {
    /// Label alphabet
    pub labels: BTreeSet<Label>,
    /// Label of each event
    pub label_of: BTreeMap<Event, Label>,
    /// Events carrying each label
    pub events_of: BTreeMap<Label, EventSet>,
}

impl Labelling {
    /// Create an empty [`Labelling`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Label every event with its own identifier
    pub fn identity(events: &EventSet) -> Self {
        let mut ret = Self::new();
        for e in events {
            ret.assign(e.clone(), e.clone());
        }
        ret
    }

    /// Add a label to the alphabet (without assigning it to any event)
    pub fn add_label<S: Into<Label>>(&mut self, label: S) -> bool {
        self.labels.insert(label.into())
    }

    /// Label `event` with `label` (adding `label` to the alphabet)
    ///
    /// A previous label of `event` is replaced.
    pub fn assign<E: Into<Event>, L: Into<Label>>(&mut self, event: E, label: L) {
        let (event, label) = (event.into(), label.into());
        if let Some(previous) = self.label_of.insert(event.clone(), label.clone()) {
            if let Some(events) = self.events_of.get_mut(&previous) {
                events.remove(&event);
                if events.is_empty() {
                    self.events_of.remove(&previous);
                }
            }
        }
        self.labels.insert(label.clone());
        self.events_of.entry(label).or_default().insert(event);
    }

    /// Label of `event`
    pub fn label(&self, event: &str) -> Option<&Label> {
        self.label_of.get(event)
    }

    /// All events carrying `label`
    ///
    /// Empty, if `label` is unknown.
    pub fn events_with_label(&self, label: &str) -> &EventSet {
        self.events_of.get(label).unwrap_or(&EMPTY_EVENT_SET)
    }
}

///
/// [`DcrGraph`] with a [`Labelling`] of its events
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelledDcrGraph {
    /// The DCR graph
    pub graph: DcrGraph,
    /// Labels of the graph's events
    pub labelling: Labelling,
}

impl LabelledDcrGraph {
    /// Combine a graph with a labelling, validating both
    ///
    /// Every event of the graph needs a label from the label alphabet, only graph events may be labelled and
    /// both directions of the labelling have to agree.
    pub fn new(graph: DcrGraph, labelling: Labelling) -> Result<Self, DcrError> {
        let ret = Self { graph, labelling };
        ret.validate()?;
        Ok(ret)
    }

    /// Combine a graph with `(event, label)` pairs
    pub fn from_labels<I, E, L>(graph: DcrGraph, labels: I) -> Result<Self, DcrError>
    where
        I: IntoIterator<Item = (E, L)>,
        E: Into<Event>,
        L: Into<Label>,
    {
        let mut labelling = Labelling::new();
        for (event, label) in labels {
            labelling.assign(event, label);
        }
        Self::new(graph, labelling)
    }

    /// Checks the structural well-formedness of graph and labelling
    pub fn validate(&self) -> Result<(), DcrError> {
        self.graph.validate()?;
        let labelling = &self.labelling;
        for event in &self.graph.events {
            match labelling.label(event) {
                None => {
                    return Err(DcrError::MissingLabel {
                        event: event.clone(),
                    })
                }
                Some(label) if !labelling.labels.contains(label) => {
                    return Err(DcrError::UnknownLabel {
                        label: label.clone(),
                        event: event.clone(),
                    })
                }
                Some(label) if !labelling.events_with_label(label).contains(event) => {
                    return Err(DcrError::LabelMismatch {
                        event: event.clone(),
                    })
                }
                Some(_) => {}
            }
        }
        if let Some(event) = labelling
            .label_of
            .keys()
            .find(|e| !self.graph.events.contains(*e))
        {
            return Err(DcrError::UnknownEvent {
                event: event.clone(),
            });
        }
        for (label, events) in &labelling.events_of {
            if let Some(event) = events
                .iter()
                .find(|e| labelling.label(e) != Some(label))
            {
                return Err(DcrError::LabelMismatch {
                    event: event.clone(),
                });
            }
        }
        Ok(())
    }

    /// Label of `event`
    pub fn label(&self, event: &str) -> Option<&Label> {
        self.labelling.label(event)
    }

    /// All events carrying `label`
    pub fn events_with_label(&self, label: &str) -> &EventSet {
        self.labelling.events_with_label(label)
    }
}

impl From<DcrGraph> for LabelledDcrGraph {
    /// Label every event with its own identifier
    fn from(graph: DcrGraph) -> Self {
        let labelling = Labelling::identity(&graph.events);
        Self { graph, labelling }
    }
}

#[cfg(test)]
mod tests {
    use super::{Labelling, LabelledDcrGraph};
    use crate::core::process_models::case_centric::dcr::{DcrError, DcrGraph};

    #[test]
    fn test_identity_labelling() {
        let model: LabelledDcrGraph = DcrGraph::new(["a", "b"]).into();
        assert_eq!(model.label("a").map(String::as_str), Some("a"));
        assert_eq!(model.events_with_label("b").len(), 1);
        assert!(model.events_with_label("c").is_empty());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_shared_labels() {
        let graph = DcrGraph::new(["e1", "e2", "e3"]);
        let model =
            LabelledDcrGraph::from_labels(graph, [("e1", "A"), ("e2", "A"), ("e3", "B")]).unwrap();
        assert_eq!(model.events_with_label("A").len(), 2);
        assert_eq!(model.labelling.labels.len(), 2);
    }

    #[test]
    fn test_reassign_label() {
        let mut labelling = Labelling::new();
        labelling.assign("e1", "A");
        labelling.assign("e1", "B");
        assert!(labelling.events_with_label("A").is_empty());
        assert!(labelling.events_with_label("B").contains("e1"));
    }

    #[test]
    fn test_labelling_errors() {
        let graph = DcrGraph::new(["e1", "e2"]);
        assert_eq!(
            LabelledDcrGraph::from_labels(graph.clone(), [("e1", "A")]),
            Err(DcrError::MissingLabel { event: "e2".into() })
        );
        assert_eq!(
            LabelledDcrGraph::from_labels(graph.clone(), [("e1", "A"), ("e2", "A"), ("x", "A")]),
            Err(DcrError::UnknownEvent { event: "x".into() })
        );

        let mut labelling = Labelling::identity(&graph.events);
        labelling.labels.remove("e1");
        assert_eq!(
            LabelledDcrGraph::new(graph.clone(), labelling),
            Err(DcrError::UnknownLabel {
                label: "e1".into(),
                event: "e1".into()
            })
        );

        let mut labelling = Labelling::identity(&graph.events);
        labelling.events_of.remove("e2");
        assert_eq!(
            LabelledDcrGraph::new(graph, labelling),
            Err(DcrError::LabelMismatch { event: "e2".into() })
        );
    }
}

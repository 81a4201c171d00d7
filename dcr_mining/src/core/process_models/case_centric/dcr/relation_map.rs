//! Relation maps (event to event set) shared by DCR graphs and log abstractions
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::event_data::case_centric::{Event, EventSet};

static EMPTY_EVENT_SET: EventSet = BTreeSet::new();

///
/// Map from an [`Event`] to a set of [`Event`]s
///
/// Used for all relations between events (of DCR graphs as well as of log abstractions).
/// A relation map is meant to be total over an event set: every event has an entry, possibly empty.
/// Lookups of events without an entry yield the empty set.
///
/// Iteration is in canonical (lexicographic) order, so all passes over a [`RelationMap`] are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationMap(BTreeMap<Event, EventSet>);

impl RelationMap {
    /// Create a new [`RelationMap`] without any entries
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`RelationMap`] with an empty entry for every given event
    pub fn empty_over<'a, I: IntoIterator<Item = &'a Event>>(events: I) -> Self {
        Self(
            events
                .into_iter()
                .map(|e| (e.clone(), EventSet::new()))
                .collect(),
        )
    }

    /// Create a [`RelationMap`] relating every event to all _other_ events
    pub fn complete_over(events: &EventSet) -> Self {
        Self(
            events
                .iter()
                .map(|e| {
                    let mut others = events.clone();
                    others.remove(e);
                    (e.clone(), others)
                })
                .collect(),
        )
    }

    /// Get the set related to `event`
    ///
    /// Returns the empty set if `event` has no entry.
    pub fn get(&self, event: &str) -> &EventSet {
        self.0.get(event).unwrap_or(&EMPTY_EVENT_SET)
    }

    /// Get mutable access to the set related to `event` (if it has an entry)
    pub fn get_mut(&mut self, event: &str) -> Option<&mut EventSet> {
        self.0.get_mut(event)
    }

    /// Replace the set related to `event`
    pub fn set(&mut self, event: Event, related: EventSet) -> Option<EventSet> {
        self.0.insert(event, related)
    }

    /// Make sure `event` has an entry (empty, if newly created)
    pub fn ensure_entry(&mut self, event: &str) -> &mut EventSet {
        self.0.entry(event.to_string()).or_default()
    }

    /// Checks if `event` has an entry
    pub fn contains_key(&self, event: &str) -> bool {
        self.0.contains_key(event)
    }

    /// Checks if the pair (`from`, `to`) is related
    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.get(from).contains(to)
    }

    /// Relate `from` to `to`, creating an entry for `from` if needed
    ///
    /// Returns `true` if the pair was not related before.
    pub fn insert(&mut self, from: &str, to: &str) -> bool {
        self.ensure_entry(from).insert(to.to_string())
    }

    /// Remove the pair (`from`, `to`)
    ///
    /// Returns `true` if the pair was related before.
    pub fn remove(&mut self, from: &str, to: &str) -> bool {
        self.0.get_mut(from).is_some_and(|s| s.remove(to))
    }

    /// Iterate over all events with an entry
    pub fn keys(&self) -> impl Iterator<Item = &Event> {
        self.0.keys()
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = (&Event, &EventSet)> {
        self.0.iter()
    }

    /// Iterate over all related pairs
    pub fn edges(&self) -> impl Iterator<Item = (&Event, &Event)> {
        self.0
            .iter()
            .flat_map(|(from, to)| to.iter().map(move |t| (from, t)))
    }

    /// Number of related pairs
    pub fn edge_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    /// Union of all related sets
    pub fn all_targets(&self) -> EventSet {
        self.0.values().flatten().cloned().collect()
    }

    /// Inverse relation
    ///
    /// Every event with an entry in `self` also has an entry in the result.
    pub fn reversed(&self) -> RelationMap {
        let mut ret = RelationMap::empty_over(self.0.keys());
        for (from, to) in self.edges() {
            ret.insert(to, from);
        }
        ret
    }

    /// Add all pairs of `other` to `self`
    pub fn union_with(&mut self, other: &RelationMap) {
        for (event, related) in other.iter() {
            self.ensure_entry(event).extend(related.iter().cloned());
        }
    }

    /// Remove pairs implied by transitivity
    ///
    /// A pair `(a, c)` is dropped whenever `(a, b)` and `(b, c)` are both related, judged on the
    /// relation as it was before pruning. Targets of `a` that imply each other in a cycle would all
    /// be dropped by that rule; instead the lexicographically smallest of them is kept, unless the
    /// cycle is implied by another target of `a`. Self-loops neither prune their own entry nor the
    /// pairs leading to them.
    pub fn prune_transitive(&mut self) {
        let snapshot = self.clone();
        for (a, related) in self.0.iter_mut() {
            let targets: EventSet = snapshot
                .get(a)
                .iter()
                .filter(|t| *t != a)
                .cloned()
                .collect();
            let reach: BTreeMap<&Event, EventSet> = targets
                .iter()
                .map(|t| (t, snapshot.reachable_within(t, &targets)))
                .collect();
            let redundant: Vec<Event> = targets
                .iter()
                .filter(|c| snapshot.is_implied_within(c, &targets, &reach))
                .cloned()
                .collect();
            for c in &redundant {
                related.remove(c);
            }
        }
    }

    /// Events of `within` reachable from `from` using only pairs between events of `within`
    fn reachable_within(&self, from: &Event, within: &EventSet) -> EventSet {
        let mut reached = EventSet::new();
        let mut queue = vec![from];
        while let Some(e) = queue.pop() {
            for next in self.get(e).intersection(within) {
                if reached.insert(next.clone()) {
                    queue.push(next);
                }
            }
        }
        reached
    }

    /// Checks if `c` is implied by another event of `targets`
    ///
    /// Of every cycle among `targets` not implied from outside, the smallest event counts as not implied.
    fn is_implied_within(
        &self,
        c: &Event,
        targets: &EventSet,
        reach: &BTreeMap<&Event, EventSet>,
    ) -> bool {
        if !targets.iter().any(|b| b != c && self.contains(b, c)) {
            return false;
        }
        let reaches = |x: &Event, y: &Event| reach.get(x).is_some_and(|r| r.contains(y));
        let cycle: EventSet = targets
            .iter()
            .filter(|y| *y == c || (reaches(c, *y) && reaches(*y, c)))
            .cloned()
            .collect();
        if cycle.len() == 1 || cycle.first() != Some(c) {
            return true;
        }
        targets
            .iter()
            .filter(|b| !cycle.contains(*b))
            .any(|b| cycle.iter().any(|m| self.contains(b, m)))
    }
}

impl FromIterator<(Event, EventSet)> for RelationMap {
    fn from_iter<T: IntoIterator<Item = (Event, EventSet)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::RelationMap;
    use crate::core::event_data::case_centric::EventSet;

    fn set(events: &[&str]) -> EventSet {
        events.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_lookup_of_unknown_event_is_empty() {
        let rel = RelationMap::empty_over(&set(&["a"]));
        assert!(rel.get("a").is_empty());
        assert!(rel.get("zzz").is_empty());
        assert!(!rel.contains_key("zzz"));
    }

    #[test]
    fn test_complete_and_reversed() {
        let events = set(&["a", "b", "c"]);
        let complete = RelationMap::complete_over(&events);
        assert_eq!(complete.get("a"), &set(&["b", "c"]));
        assert_eq!(complete.edge_count(), 6);
        assert_eq!(complete.reversed(), complete);

        let mut rel = RelationMap::empty_over(&events);
        rel.insert("a", "b");
        rel.insert("a", "c");
        let rev = rel.reversed();
        assert_eq!(rev.get("b"), &set(&["a"]));
        assert_eq!(rev.get("c"), &set(&["a"]));
        assert!(rev.get("a").is_empty());
        assert!(rev.contains_key("a"));
    }

    #[test]
    fn test_prune_transitive_chain() {
        let mut rel = RelationMap::empty_over(&set(&["a", "b", "c", "d"]));
        rel.insert("a", "b");
        rel.insert("a", "c");
        rel.insert("a", "d");
        rel.insert("b", "c");
        rel.insert("c", "d");
        rel.prune_transitive();
        assert_eq!(rel.get("a"), &set(&["b"]));
        assert_eq!(rel.get("b"), &set(&["c"]));
        assert_eq!(rel.get("c"), &set(&["d"]));
    }

    #[test]
    fn test_prune_transitive_keeps_one_edge_of_cycle() {
        let mut rel = RelationMap::empty_over(&set(&["a", "b", "c"]));
        rel.insert("a", "b");
        rel.insert("a", "c");
        rel.insert("b", "c");
        rel.insert("c", "b");
        let mut other = rel.clone();
        rel.prune_transitive();
        other.prune_transitive();
        assert_eq!(rel, other);
        assert_eq!(rel.get("a"), &set(&["b"]));
        assert_eq!(rel.get("b"), &set(&["c"]));
        assert_eq!(rel.get("c"), &set(&["b"]));
    }

    #[test]
    fn test_prune_transitive_chain_against_lexicographic_order() {
        let events = set(&["a", "b", "c", "d"]);
        let mut forward = RelationMap::empty_over(&events);
        forward.insert("a", "b");
        forward.insert("a", "c");
        forward.insert("a", "d");
        forward.insert("b", "d");
        forward.insert("d", "c");
        let mut renamed = RelationMap::empty_over(&events);
        renamed.insert("a", "d");
        renamed.insert("a", "c");
        renamed.insert("a", "b");
        renamed.insert("d", "b");
        renamed.insert("b", "c");
        forward.prune_transitive();
        renamed.prune_transitive();
        assert_eq!(forward.get("a"), &set(&["b"]));
        assert_eq!(renamed.get("a"), &set(&["d"]));
    }

    #[test]
    fn test_prune_transitive_cycle_implied_by_other_target() {
        let mut rel = RelationMap::empty_over(&set(&["a", "b", "c", "d", "e"]));
        for t in ["b", "c", "d", "e"] {
            rel.insert("a", t);
        }
        rel.insert("e", "b");
        rel.insert("b", "c");
        rel.insert("c", "d");
        rel.insert("d", "b");
        rel.prune_transitive();
        assert_eq!(rel.get("a"), &set(&["e"]));
        assert_eq!(rel.get("d"), &set(&["b"]));
    }

    #[test]
    fn test_prune_transitive_self_loop() {
        let mut rel = RelationMap::empty_over(&set(&["a", "b"]));
        rel.insert("a", "a");
        rel.insert("a", "b");
        rel.insert("b", "b");
        rel.prune_transitive();
        assert_eq!(rel.get("a"), &set(&["a", "b"]));
        assert_eq!(rel.get("b"), &set(&["b"]));
    }
}

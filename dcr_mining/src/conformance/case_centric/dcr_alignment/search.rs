use std::collections::HashMap;

use crate::core::{
    event_data::case_centric::{Event, EventSet},
    process_models::case_centric::dcr::{DcrError, DcrRuntime, LabelledDcrGraph, Marking},
};

use super::{
    cost::{Cost, CostFunction, MoveKind},
    Alignment, AlignmentMove, AlignmentStatus,
};

/// Moves of a complete path, last move first
type Path = (Cost, Vec<AlignmentMove>);

#[derive(Debug, Default, Clone, Copy)]
struct SearchStats {
    visited: usize,
    dominated: usize,
    bounded: usize,
    improvements: usize,
}

///
/// Depth-first branch-and-bound search for a minimum-cost alignment
///
/// One search aligns one trace. The runtime marking is the only state changed along a path
/// and is restored after every explored move.
struct AlignmentSearch<'a, C: CostFunction + ?Sized> {
    model: &'a LabelledDcrGraph,
    cost_fn: &'a C,
    condition_sources: EventSet,
    depth_bound: Option<usize>,
    /// Paths reaching this cost are abandoned; lowered to the cost of every alignment found
    bound: Cost,
    /// Cost and depth a (marking signature) was last explored with, by remaining trace length
    ///
    /// Depths are only tracked with a `depth_bound` and are `0` otherwise.
    memo: Vec<HashMap<Marking, (Cost, usize)>>,
    depth_cut: bool,
    stats: SearchStats,
}

impl<'a, C: CostFunction + ?Sized> AlignmentSearch<'a, C> {
    fn new(
        model: &'a LabelledDcrGraph,
        cost_fn: &'a C,
        depth_bound: Option<usize>,
        bound: Cost,
        trace_len: usize,
    ) -> Self {
        Self {
            model,
            cost_fn,
            condition_sources: model.graph.condition_sources(),
            depth_bound,
            bound,
            memo: vec![HashMap::new(); trace_len + 1],
            depth_cut: false,
            stats: SearchStats::default(),
        }
    }

    /// Memo key of a marking
    ///
    /// Being executed only matters for events that are a condition of some event.
    fn signature(&self, marking: &Marking) -> Marking {
        Marking {
            executed: marking
                .executed
                .intersection(&self.condition_sources)
                .cloned()
                .collect(),
            pending: marking.pending.clone(),
            included: marking.included.clone(),
        }
    }

    fn run<T: AsRef<str>>(mut self, trace: &[T]) -> Result<Alignment, DcrError> {
        let model = self.model;
        let mut rt = model.graph.runtime();
        let found = self.search(&mut rt, trace, Cost::ZERO, 0)?;
        tracing::debug!(
            trace_len = trace.len(),
            visited = self.stats.visited,
            dominated = self.stats.dominated,
            bounded = self.stats.bounded,
            improvements = self.stats.improvements,
            depth_cut = self.depth_cut,
            "Finished alignment search"
        );
        Ok(match found {
            Some((cost, mut moves)) => {
                moves.reverse();
                Alignment::aligned(cost, moves)
            }
            None if self.depth_cut => Alignment::unaligned(AlignmentStatus::DepthExhausted),
            None => Alignment::unaligned(AlignmentStatus::NoAlignment),
        })
    }

    fn search<T: AsRef<str>>(
        &mut self,
        rt: &mut DcrRuntime<'a>,
        trace: &[T],
        cost: Cost,
        depth: usize,
    ) -> Result<Option<Path>, DcrError> {
        if cost >= self.bound {
            self.stats.bounded += 1;
            return Ok(None);
        }
        if self.depth_bound.is_some_and(|max| depth >= max) {
            self.depth_cut = true;
            return Ok(None);
        }
        self.stats.visited += 1;

        let signature = self.signature(rt.marking());
        let depth_key = if self.depth_bound.is_some() { depth } else { 0 };
        let seen = &mut self.memo[trace.len()];
        let dominated = |(prev_cost, prev_depth): &(Cost, usize)| {
            *prev_cost <= cost && *prev_depth <= depth_key
        };
        if seen.get(&signature).is_some_and(dominated) {
            self.stats.dominated += 1;
            return Ok(None);
        }
        seen.insert(signature, (cost, depth_key));

        if trace.is_empty() && rt.is_accepting() {
            tracing::trace!(%cost, depth, "Found alignment");
            self.stats.improvements += 1;
            self.bound = cost;
            return Ok(Some((cost, Vec::new())));
        }

        let model = self.model;
        let mut best: Option<Path> = None;
        let mut keep_if_better = |found: Option<Path>, mv: AlignmentMove| {
            if let Some((found_cost, mut moves)) = found {
                if best.as_ref().map_or(true, |(c, _)| found_cost < *c) {
                    moves.push(mv);
                    best = Some((found_cost, moves));
                }
            }
        };

        if let Some((label, rest)) = trace.split_first() {
            let label = label.as_ref();
            // Consume
            for event in model.events_with_label(label) {
                if !rt.is_enabled(event) {
                    continue;
                }
                let step = cost + self.cost_fn.cost(MoveKind::Consume, event);
                let found = rt.speculate(|rt| {
                    rt.execute(event)?;
                    self.search(rt, rest, step, depth + 1)
                })?;
                keep_if_better(
                    found,
                    AlignmentMove::Consume {
                        label: label.to_string(),
                        event: event.clone(),
                    },
                );
            }
            // Trace-skip
            let step = cost + self.cost_fn.cost(MoveKind::TraceSkip, label);
            let found = self.search(rt, rest, step, depth + 1)?;
            keep_if_better(
                found,
                AlignmentMove::TraceSkip {
                    label: label.to_string(),
                },
            );
        }

        // Model-skip
        let enabled: Vec<&'a Event> = rt.enabled_events().collect();
        for event in enabled {
            let step = cost + self.cost_fn.cost(MoveKind::ModelSkip, event);
            let found = rt.speculate(|rt| {
                rt.execute(event)?;
                self.search(rt, trace, step, depth + 1)
            })?;
            keep_if_better(
                found,
                AlignmentMove::ModelSkip {
                    event: event.clone(),
                },
            );
        }

        Ok(best)
    }
}

///
/// Compute a minimum-cost [`Alignment`] of `trace` (a sequence of labels) against `model`
///
/// Moves are explored depth-first (consume, then trace-skip, then model-skip), abandoning every path
/// whose cost reaches the cost of the best alignment found so far. Without a `depth_bound`, the
/// search starts bounded by the cost of skipping the whole trace and aligning the empty trace.
/// With a `depth_bound`, paths of that many moves are cut off instead; the result is then an
/// upper bound of the optimal cost (and [`AlignmentStatus::DepthExhausted`] if no alignment
/// was found within the bound).
///
/// Fails if `model` is not well-formed.
pub fn align<T: AsRef<str>, C: CostFunction + ?Sized>(
    trace: &[T],
    model: &LabelledDcrGraph,
    cost_fn: &C,
    depth_bound: Option<usize>,
) -> Result<Alignment, DcrError> {
    model.validate()?;
    align_validated(trace, model, cost_fn, depth_bound)
}

pub(crate) fn align_validated<T: AsRef<str>, C: CostFunction + ?Sized>(
    trace: &[T],
    model: &LabelledDcrGraph,
    cost_fn: &C,
    depth_bound: Option<usize>,
) -> Result<Alignment, DcrError> {
    let bound = match depth_bound {
        Some(_) => Cost::Infinite,
        None => {
            let skip_all: Cost = trace
                .iter()
                .map(|label| cost_fn.cost(MoveKind::TraceSkip, label.as_ref()))
                .sum();
            let empty_trace: [&str; 0] = [];
            let empty = AlignmentSearch::new(model, cost_fn, None, Cost::Infinite, 0)
                .run(&empty_trace)?;
            // Exclusive bound: the seed path itself has to remain admissible
            skip_all + empty.cost + Cost::Finite(1)
        }
    };
    tracing::trace!(%bound, ?depth_bound, "Starting alignment search");
    AlignmentSearch::new(model, cost_fn, depth_bound, bound, trace.len()).run(trace)
}

#[cfg(test)]
mod tests {
    use super::align;
    use crate::conformance::case_centric::dcr_alignment::{
        AlignmentMove, AlignmentStatus, Cost, DefaultCost, MoveKind,
    };
    use crate::core::process_models::case_centric::dcr::{
        DcrError, DcrGraph, LabelledDcrGraph, Labelling,
    };
    use crate::dcr_graph;

    #[test]
    fn test_perfectly_fitting_trace() {
        let model: LabelledDcrGraph =
            dcr_graph!(["a", "b"]; "a" -->* "b", "a" *--> "b").into();
        let alignment = align(&["a", "b"], &model, &DefaultCost, None).unwrap();
        assert_eq!(alignment.cost, Cost::ZERO);
        assert_eq!(alignment.events, vec!["a", "b"]);
        assert_eq!(alignment.status, AlignmentStatus::Aligned);
        assert!(alignment
            .moves
            .iter()
            .all(|m| matches!(m, AlignmentMove::Consume { .. })));
    }

    #[test]
    fn test_model_skip_to_reach_acceptance() {
        let mut graph = dcr_graph!(["a", "b"]; "a" *--> "b");
        graph.marking.pending.insert("b".into());
        let model: LabelledDcrGraph = graph.into();
        let alignment = align::<&str, _>(&[], &model, &DefaultCost, None).unwrap();
        assert_eq!(alignment.cost, Cost::Finite(1));
        assert_eq!(
            alignment.moves,
            vec![AlignmentMove::ModelSkip { event: "b".into() }]
        );
        assert_eq!(alignment.events, vec!["b"]);
    }

    #[test]
    fn test_condition_needs_model_skip_or_trace_skip() {
        let model: LabelledDcrGraph = dcr_graph!(["a", "b"]; "a" -->* "b").into();
        let alignment = align(&["b"], &model, &DefaultCost, None).unwrap();
        assert_eq!(alignment.cost, Cost::Finite(1));

        // Model-skips are free, trace-skips are expensive
        let cheap_model_skips = |kind: MoveKind, _: &str| match kind {
            MoveKind::TraceSkip => Cost::Finite(5),
            _ => Cost::ZERO,
        };
        let alignment = align(&["b"], &model, &cheap_model_skips, None).unwrap();
        assert_eq!(alignment.cost, Cost::ZERO);
        assert_eq!(alignment.events, vec!["a", "b"]);
    }

    #[test]
    fn test_depth_bound() {
        let model: LabelledDcrGraph = dcr_graph!(["a", "b"]; "a" -->* "b").into();
        let cut = align(&["b"], &model, &DefaultCost, Some(1)).unwrap();
        assert_eq!(cut.cost, Cost::Infinite);
        assert_eq!(cut.status, AlignmentStatus::DepthExhausted);
        assert!(cut.events.is_empty());

        let deep_enough = align(&["b"], &model, &DefaultCost, Some(3)).unwrap();
        assert_eq!(deep_enough.cost, Cost::Finite(1));
        assert_eq!(deep_enough.status, AlignmentStatus::Aligned);
    }

    #[test]
    fn test_depth_bound_revisits_shallower_marking() {
        // Skipping `p` first reaches the marking of skipping `q` alone, one move deeper
        let model: LabelledDcrGraph = dcr_graph!(["p", "q", "r", "b"];
            "q" -->* "b",
            "p" -->% "r",
            "q" -->+ "r"
        )
        .into();
        let free_model_skips = |kind: MoveKind, _: &str| match kind {
            MoveKind::TraceSkip => Cost::Infinite,
            _ => Cost::ZERO,
        };
        let unbounded = align(&["b"], &model, &free_model_skips, None).unwrap();
        assert_eq!(unbounded.cost, Cost::ZERO);

        let bounded = align(&["b"], &model, &free_model_skips, Some(3)).unwrap();
        assert_eq!(bounded.status, AlignmentStatus::Aligned);
        assert_eq!(bounded.cost, Cost::ZERO);
        assert_eq!(bounded.moves.len(), 2);
        assert_eq!(bounded.events, vec!["q", "b"]);
    }

    #[test]
    fn test_no_alignment() {
        let mut graph = dcr_graph!(["a", "b"]; "a" -->* "b", "b" -->* "a");
        graph.marking.pending.insert("a".into());
        let model: LabelledDcrGraph = graph.into();
        let alignment = align::<&str, _>(&[], &model, &DefaultCost, None).unwrap();
        assert_eq!(alignment.cost, Cost::Infinite);
        assert_eq!(alignment.status, AlignmentStatus::NoAlignment);
        let alignment = align(&["a"], &model, &DefaultCost, Some(10)).unwrap();
        assert_eq!(alignment.status, AlignmentStatus::NoAlignment);
    }

    #[test]
    fn test_unknown_labels_are_skipped() {
        let model: LabelledDcrGraph = dcr_graph!(["a"]).into();
        let alignment = align(&["zzz", "a"], &model, &DefaultCost, None).unwrap();
        assert_eq!(alignment.cost, Cost::Finite(1));
        assert_eq!(
            alignment.moves,
            vec![
                AlignmentMove::TraceSkip {
                    label: "zzz".into()
                },
                AlignmentMove::Consume {
                    label: "a".into(),
                    event: "a".into()
                }
            ]
        );
    }

    #[test]
    fn test_shared_labels_pick_enabled_event() {
        let graph = dcr_graph!(["e1", "e2", "x"]; "x" -->* "e1");
        let model = LabelledDcrGraph::from_labels(graph, [("e1", "A"), ("e2", "A"), ("x", "X")])
            .unwrap();
        let alignment = align(&["A"], &model, &DefaultCost, None).unwrap();
        assert_eq!(alignment.cost, Cost::ZERO);
        assert_eq!(alignment.events, vec!["e2"]);
    }

    #[test]
    fn test_invalid_model_is_rejected() {
        let graph = DcrGraph::new(["a", "b"]);
        let mut labelling = Labelling::identity(&graph.events);
        labelling.label_of.remove("b");
        let model = LabelledDcrGraph { graph, labelling };
        assert_eq!(
            align(&["a"], &model, &DefaultCost, None),
            Err(DcrError::MissingLabel { event: "b".into() })
        );
    }
}

//! Alignments of traces against labelled DCR graphs
//!
//! An alignment explains a trace (a sequence of labels) by a sequence of moves:
//! _consuming_ the next label by executing an enabled event carrying it,
//! _skipping_ the next label in the trace, or _skipping_ in the model by executing any enabled event.
//! Every move has a [`Cost`] (see [`CostFunction`]); [`align`] finds an alignment of minimal cost that
//! consumes the whole trace and ends in an accepting marking.
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{
    event_data::case_centric::Event,
    process_models::case_centric::dcr::{DcrError, Label, LabelledDcrGraph},
};

/// Costs and cost functions
pub mod cost;
/// Branch-and-bound alignment search
pub mod search;

#[doc(inline)]
pub use cost::{Cost, CostFunction, DefaultCost, MoveKind};
#[doc(inline)]
pub use search::align;

/// A single move of an [`Alignment`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AlignmentMove {
    /// The next trace label was consumed by executing `event`
    Consume {
        /// Consumed label
        label: Label,
        /// Executed event (carrying `label`)
        event: Event,
    },
    /// The next trace label was skipped
    TraceSkip {
        /// Skipped label
        label: Label,
    },
    /// `event` was executed without consuming a label
    ModelSkip {
        /// Executed event
        event: Event,
    },
}

impl AlignmentMove {
    /// The [`MoveKind`] of this move
    pub fn kind(&self) -> MoveKind {
        match self {
            AlignmentMove::Consume { .. } => MoveKind::Consume,
            AlignmentMove::TraceSkip { .. } => MoveKind::TraceSkip,
            AlignmentMove::ModelSkip { .. } => MoveKind::ModelSkip,
        }
    }

    /// The model event executed by this move (if any)
    pub fn event(&self) -> Option<&Event> {
        match self {
            AlignmentMove::Consume { event, .. } | AlignmentMove::ModelSkip { event } => {
                Some(event)
            }
            AlignmentMove::TraceSkip { .. } => None,
        }
    }
}

/// Outcome of an alignment search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentStatus {
    /// A minimum-cost alignment was found (within the depth bound, if any)
    Aligned,
    /// No sequence of moves consumes the trace and reaches an accepting marking
    NoAlignment,
    /// No alignment was found, but the depth bound cut off parts of the search
    DepthExhausted,
}

/// Result of aligning a trace against a [`LabelledDcrGraph`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    /// Total cost ([`Cost::Infinite`] if no alignment was found)
    pub cost: Cost,
    /// Model events executed by the alignment, in order
    pub events: Vec<Event>,
    /// All moves of the alignment, in order
    pub moves: Vec<AlignmentMove>,
    /// Search outcome
    pub status: AlignmentStatus,
}

impl Alignment {
    pub(crate) fn aligned(cost: Cost, moves: Vec<AlignmentMove>) -> Self {
        Self {
            cost,
            events: moves.iter().filter_map(AlignmentMove::event).cloned().collect(),
            moves,
            status: AlignmentStatus::Aligned,
        }
    }

    pub(crate) fn unaligned(status: AlignmentStatus) -> Self {
        Self {
            cost: Cost::Infinite,
            events: Vec::new(),
            moves: Vec::new(),
            status,
        }
    }

    /// Checks if an alignment was found
    pub fn is_aligned(&self) -> bool {
        self.status == AlignmentStatus::Aligned
    }
}

/// Options for aligning traces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentOptions {
    /// Maximal number of moves of an alignment; `None` searches without depth limit
    pub depth_bound: Option<usize>,
}

///
/// Align many traces against the same `model` (in parallel)
///
/// The model is validated once. Results are in the order of `traces`.
pub fn align_traces<S, T, C>(
    traces: &[S],
    model: &LabelledDcrGraph,
    cost_fn: &C,
    options: &AlignmentOptions,
) -> Result<Vec<Alignment>, DcrError>
where
    S: AsRef<[T]> + Sync,
    T: AsRef<str> + Sync,
    C: CostFunction + Sync + ?Sized,
{
    model.validate()?;
    let ret: Result<Vec<Alignment>, DcrError> = traces
        .par_iter()
        .map(|trace| search::align_validated(trace.as_ref(), model, cost_fn, options.depth_bound))
        .collect();
    if let Ok(alignments) = &ret {
        tracing::debug!(
            traces = alignments.len(),
            aligned = alignments.iter().filter(|a| a.is_aligned()).count(),
            "Aligned traces"
        );
    }
    ret
}

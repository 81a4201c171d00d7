//! Test-driven conformance checking of DCR graphs
//!
//! A [`TestCase`] states that a trace should (or should not) be possible in a model,
//! considering only the labels of its _context_: model events with labels outside of the
//! context may be executed freely in between.
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::process_models::case_centric::dcr::{DcrError, Label, LabelledDcrGraph, Labelling};

use super::dcr_alignment::{search::align_validated, Cost, CostFunction, MoveKind};

/// Whether a test trace is required or forbidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// The trace has to be possible
    #[serde(rename = "+")]
    Positive,
    /// The trace has to be impossible
    #[serde(rename = "-")]
    Negative,
}

/// A single test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Labels of the test trace
    pub trace: Vec<Label>,
    /// Labels the test is about
    pub context: BTreeSet<Label>,
    /// Required outcome
    pub polarity: Polarity,
}

///
/// [`CostFunction`] for test cases
///
/// Consuming is free and the trace can never be skipped. Executing an event without consuming
/// is free, unless its label is part of the context.
#[derive(Debug, Clone, Copy)]
pub struct ContextCost<'a> {
    context: &'a BTreeSet<Label>,
    labelling: &'a Labelling,
}

impl<'a> ContextCost<'a> {
    /// Create the cost function for `context`, looking up event labels in `labelling`
    pub fn new(context: &'a BTreeSet<Label>, labelling: &'a Labelling) -> Self {
        Self { context, labelling }
    }
}

impl CostFunction for ContextCost<'_> {
    fn cost(&self, kind: MoveKind, target: &str) -> Cost {
        match kind {
            MoveKind::Consume => Cost::ZERO,
            MoveKind::TraceSkip => Cost::Infinite,
            MoveKind::ModelSkip => match self.labelling.label(target) {
                Some(label) if self.context.contains(label) => Cost::Infinite,
                _ => Cost::ZERO,
            },
        }
    }
}

/// Check whether `model` satisfies `test`
///
/// A positive test passes if its trace can be aligned at finite cost (see [`ContextCost`]),
/// a negative test passes if it cannot.
pub fn check_test_case(
    test: &TestCase,
    model: &LabelledDcrGraph,
    depth_bound: Option<usize>,
) -> Result<bool, DcrError> {
    model.validate()?;
    let cost_fn = ContextCost::new(&test.context, &model.labelling);
    let alignment = align_validated(test.trace.as_slice(), model, &cost_fn, depth_bound)?;
    let passed = match test.polarity {
        Polarity::Positive => alignment.cost.is_finite(),
        Polarity::Negative => !alignment.cost.is_finite(),
    };
    tracing::debug!(
        polarity = ?test.polarity,
        passed,
        status = ?alignment.status,
        trace = %alignment
            .events
            .iter()
            .filter_map(|e| model.label(e))
            .join(","),
        "Checked test case"
    );
    Ok(passed)
}

#[cfg(test)]
mod tests {
    use super::{check_test_case, ContextCost, Polarity, TestCase};
    use crate::conformance::case_centric::dcr_alignment::{Cost, CostFunction, MoveKind};
    use crate::core::process_models::case_centric::dcr::LabelledDcrGraph;
    use crate::dcr_graph;

    fn test_case(trace: &[&str], context: &[&str], polarity: Polarity) -> TestCase {
        TestCase {
            trace: trace.iter().map(|l| l.to_string()).collect(),
            context: context.iter().map(|l| l.to_string()).collect(),
            polarity,
        }
    }

    fn claims_model() -> LabelledDcrGraph {
        dcr_graph!(["Approve", "Reject", "Notify"];
            "Approve" -->% "Reject",
            "Reject" -->% "Approve",
            "Notify" -->* "Approve",
        )
        .into()
    }

    #[test]
    fn test_context_cost() {
        let model = claims_model();
        let context = ["Approve".to_string()].into_iter().collect();
        let cost_fn = ContextCost::new(&context, &model.labelling);
        assert_eq!(cost_fn.cost(MoveKind::Consume, "Approve"), Cost::ZERO);
        assert_eq!(cost_fn.cost(MoveKind::TraceSkip, "Notify"), Cost::Infinite);
        assert_eq!(cost_fn.cost(MoveKind::ModelSkip, "Approve"), Cost::Infinite);
        assert_eq!(cost_fn.cost(MoveKind::ModelSkip, "Notify"), Cost::ZERO);
    }

    #[test]
    fn test_positive_cases() {
        let model = claims_model();
        // `Notify` is outside of the context and can be executed in between
        let test = test_case(&["Approve"], &["Approve", "Reject"], Polarity::Positive);
        assert!(check_test_case(&test, &model, None).unwrap());
        // ... unless it is part of the context
        let test = test_case(&["Approve"], &["Approve", "Notify"], Polarity::Positive);
        assert!(!check_test_case(&test, &model, None).unwrap());
        let test = test_case(&["Notify", "Approve"], &["Approve", "Notify"], Polarity::Positive);
        assert!(check_test_case(&test, &model, Some(10)).unwrap());
    }

    #[test]
    fn test_depth_bound_agrees_with_unbounded_check() {
        let model: LabelledDcrGraph = dcr_graph!(["p", "q", "r", "b"];
            "q" -->* "b",
            "p" -->% "r",
            "q" -->+ "r"
        )
        .into();
        let test = test_case(&["b"], &["b"], Polarity::Positive);
        assert!(check_test_case(&test, &model, None).unwrap());
        assert!(check_test_case(&test, &model, Some(3)).unwrap());
        assert!(!check_test_case(&test, &model, Some(1)).unwrap());
    }

    #[test]
    fn test_negative_cases() {
        let model = claims_model();
        let test = test_case(
            &["Notify", "Approve", "Reject"],
            &["Approve", "Reject"],
            Polarity::Negative,
        );
        assert!(check_test_case(&test, &model, None).unwrap());
        let test = test_case(&["Reject"], &["Approve", "Reject"], Polarity::Negative);
        assert!(!check_test_case(&test, &model, None).unwrap());
    }

    #[test]
    fn test_test_case_json() {
        let test = test_case(&["a"], &["a"], Polarity::Negative);
        let json = serde_json::to_string(&test).unwrap();
        assert!(json.contains("\"polarity\":\"-\""));
        let imported: TestCase = serde_json::from_str(&json).unwrap();
        assert_eq!(imported, test);
    }
}

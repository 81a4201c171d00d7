use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
};

///
/// Cost of (partial) alignments: a natural number or infinity
///
/// Every finite cost is lower than [`Cost::Infinite`]; addition saturates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cost {
    /// Finite cost
    Finite(u64),
    /// Infinite cost (i.e., impossible)
    Infinite,
}

impl Cost {
    /// Cost of free moves
    pub const ZERO: Cost = Cost::Finite(0);

    /// Checks if the cost is finite
    pub fn is_finite(&self) -> bool {
        matches!(self, Cost::Finite(_))
    }

    /// The finite value, if any
    pub fn finite(&self) -> Option<u64> {
        match self {
            Cost::Finite(c) => Some(*c),
            Cost::Infinite => None,
        }
    }
}

impl Default for Cost {
    fn default() -> Self {
        Cost::ZERO
    }
}

impl From<u64> for Cost {
    fn from(value: u64) -> Self {
        Cost::Finite(value)
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Cost::Finite(a), Cost::Finite(b)) => {
                a.checked_add(b).map_or(Cost::Infinite, Cost::Finite)
            }
            _ => Cost::Infinite,
        }
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Self {
        iter.fold(Cost::ZERO, Add::add)
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cost::Finite(c) => write!(f, "{c}"),
            Cost::Infinite => write!(f, "∞"),
        }
    }
}

///
/// The three kinds of alignment moves
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveKind {
    /// Execute an enabled model event carrying the next trace label
    Consume,
    /// Drop the next trace label
    TraceSkip,
    /// Execute an enabled model event without consuming a trace label
    ModelSkip,
}

impl MoveKind {
    /// Name of the move kind
    pub fn get_name(&self) -> &'static str {
        match self {
            MoveKind::Consume => "consume",
            MoveKind::TraceSkip => "trace-skip",
            MoveKind::ModelSkip => "model-skip",
        }
    }
}

impl Display for MoveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

///
/// Cost of individual alignment moves
///
/// `target` is the executed model event for [`MoveKind::Consume`] and [`MoveKind::ModelSkip`],
/// and the skipped trace label for [`MoveKind::TraceSkip`].
///
/// Implemented for closures:
/// ```rust
/// use dcr_mining::conformance::case_centric::dcr_alignment::{Cost, CostFunction, MoveKind};
///
/// let expensive_skips = |kind: MoveKind, _target: &str| match kind {
///     MoveKind::Consume => Cost::ZERO,
///     _ => Cost::Finite(10),
/// };
/// assert_eq!(expensive_skips.cost(MoveKind::TraceSkip, "a"), Cost::Finite(10));
/// ```
pub trait CostFunction {
    /// Cost of a move of the given kind on `target`
    fn cost(&self, kind: MoveKind, target: &str) -> Cost;
}

impl<F: Fn(MoveKind, &str) -> Cost> CostFunction for F {
    fn cost(&self, kind: MoveKind, target: &str) -> Cost {
        self(kind, target)
    }
}

/// Default [`CostFunction`]: consuming is free, every skip costs 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultCost;

impl CostFunction for DefaultCost {
    fn cost(&self, kind: MoveKind, _target: &str) -> Cost {
        match kind {
            MoveKind::Consume => Cost::ZERO,
            MoveKind::TraceSkip | MoveKind::ModelSkip => Cost::Finite(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cost, CostFunction, DefaultCost, MoveKind};

    #[test]
    fn test_cost_order_and_arithmetic() {
        assert!(Cost::Finite(u64::MAX) < Cost::Infinite);
        assert!(Cost::Finite(1) < Cost::Finite(2));
        assert_eq!(Cost::Finite(1) + Cost::Finite(2), Cost::Finite(3));
        assert_eq!(Cost::Finite(1) + Cost::Infinite, Cost::Infinite);
        assert_eq!(Cost::Finite(u64::MAX) + Cost::Finite(1), Cost::Infinite);
        let total: Cost = [1, 2, 3].into_iter().map(Cost::from).sum();
        assert_eq!(total, Cost::Finite(6));
        let empty: Cost = std::iter::empty().sum();
        assert_eq!(empty, Cost::ZERO);
        let mut c = Cost::ZERO;
        c += Cost::Infinite;
        assert!(!c.is_finite());
        assert_eq!(c.finite(), None);
    }

    #[test]
    fn test_cost_display_and_serde() {
        assert_eq!(Cost::Finite(4).to_string(), "4");
        assert_eq!(Cost::Infinite.to_string(), "∞");
        assert_eq!(
            serde_json::to_string(&MoveKind::TraceSkip).unwrap(),
            "\"trace-skip\""
        );
        let json = serde_json::to_string(&Cost::Infinite).unwrap();
        let c: Cost = serde_json::from_str(&json).unwrap();
        assert_eq!(c, Cost::Infinite);
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(DefaultCost.cost(MoveKind::Consume, "a"), Cost::ZERO);
        assert_eq!(DefaultCost.cost(MoveKind::TraceSkip, "a"), Cost::Finite(1));
        assert_eq!(DefaultCost.cost(MoveKind::ModelSkip, "a"), Cost::Finite(1));
        assert_eq!(MoveKind::ModelSkip.to_string(), "model-skip");
    }
}

//! Makespan-minimizing schedulers for the job shop.

pub mod branch_and_bound;
pub mod greedy;
pub mod parallel_greedy;
pub mod shifting_bottleneck;
pub mod single_machine;

use core::fmt;

use crate::data_structures::shop::{JobShopInstance, Schedule};

/// Upper limit for worker pools; requested thread counts are clamped to it.
pub const MAX_WORKERS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// The disjunctive graph lost acyclicity, which is a sequencing bug,
    /// not an input condition.
    CyclicGraph,
    /// The node budget drained before any complete schedule was reached.
    BudgetExhausted,
    /// The round bound was hit before every operation was committed.
    NoProgress,
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::CyclicGraph => {
                write!(f, "Internal error: the precedence graph became cyclic.")
            }
            SolveError::BudgetExhausted => write!(
                f,
                "The node budget ran out before a complete schedule was found."
            ),
            SolveError::NoProgress => write!(
                f,
                "Internal error: the iteration bound was hit before all operations were committed."
            ),
        }
    }
}

impl std::error::Error for SolveError {}

/// The selectable solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    GreedyEarliestAvailable,
    GreedyShortestProcessingTime,
    ParallelGreedy,
    SequentialBranchAndBound,
    ParallelBranchAndBound,
    SequentialShiftingBottleneck,
    ParallelShiftingBottleneck,
}

impl Algorithm {
    pub fn is_parallel(self) -> bool {
        matches!(
            self,
            Algorithm::ParallelGreedy
                | Algorithm::ParallelBranchAndBound
                | Algorithm::ParallelShiftingBottleneck
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::GreedyEarliestAvailable => "greedy-ea",
            Algorithm::GreedyShortestProcessingTime => "greedy-spt",
            Algorithm::ParallelGreedy => "greedy-par",
            Algorithm::SequentialBranchAndBound => "bb-seq",
            Algorithm::ParallelBranchAndBound => "bb-par",
            Algorithm::SequentialShiftingBottleneck => "sb-seq",
            Algorithm::ParallelShiftingBottleneck => "sb-par",
        }
    }
}

/// Runs the selected solver. `workers` is ignored by the sequential
/// algorithms and clamped to `1..=`[MAX_WORKERS] by the parallel ones.
pub fn solve(
    instance: &JobShopInstance,
    algorithm: Algorithm,
    workers: usize,
) -> Result<Schedule, SolveError> {
    match algorithm {
        Algorithm::GreedyEarliestAvailable => Ok(greedy::earliest_available(instance)),
        Algorithm::GreedyShortestProcessingTime => Ok(greedy::shortest_processing_time(instance)),
        Algorithm::ParallelGreedy => parallel_greedy::schedule(instance, workers),
        Algorithm::SequentialBranchAndBound => {
            branch_and_bound::sequential(instance).map(|solution| solution.schedule)
        }
        Algorithm::ParallelBranchAndBound => {
            branch_and_bound::parallel(instance, workers).map(|solution| solution.schedule)
        }
        Algorithm::SequentialShiftingBottleneck => shifting_bottleneck::sequential(instance),
        Algorithm::ParallelShiftingBottleneck => shifting_bottleneck::parallel(instance, workers),
    }
}

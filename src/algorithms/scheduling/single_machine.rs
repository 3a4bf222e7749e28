//! The one-machine relaxation used for bottleneck selection.
//!
//! Every operation competing for a machine carries a release time (its
//! earliest start in the current precedence graph), a processing time and a
//! tail (the longest path from the operation to the end of the schedule).
//! Sequencing by non-decreasing release times and simulating the machine
//! yields the completion time the machine would impose on its own.

/// An operation projected onto a single machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneMachineOp {
    /// Node id of the operation in the precedence graph.
    pub node: u32,
    pub processing: i64,
    pub release: i64,
    pub tail: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneMachineSolution {
    /// Node ids in execution order.
    pub sequence: Vec<u32>,
    /// Completion time of the machine under that order.
    pub cmax: i64,
}

/// Orders the operations by `(release, processing)`, with the node id as
/// the final tie-break, and simulates the machine without preemption.
pub fn sequence_by_release(ops: &[OneMachineOp]) -> OneMachineSolution {
    let mut ordered = ops.to_vec();
    ordered.sort_unstable_by_key(|op| (op.release, op.processing, op.node));

    let mut completion = 0;
    let mut cmax = 0;
    for op in &ordered {
        completion = completion.max(op.release) + op.processing;
        cmax = cmax.max(completion);
    }

    OneMachineSolution {
        sequence: ordered.into_iter().map(|op| op.node).collect(),
        cmax,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // processing and release times of five competing operations; node ids
    // count from 1 as they would in a precedence graph with a source node
    const OPS: [(u32, i64, i64); 5] = [(1, 1, 18), (2, 52, 93), (3, 73, 49), (4, 27, 50), (5, 38, 24)];

    fn ops() -> Vec<OneMachineOp> {
        OPS.iter()
            .map(|&(node, processing, release)| OneMachineOp {
                node,
                processing,
                release,
                tail: 0,
            })
            .collect()
    }

    #[test]
    fn test_sequence_follows_release_times() {
        let solution = sequence_by_release(&ops());
        assert_eq!(solution.sequence, [1, 5, 3, 4, 2]);
        // 18+1, then max(19,24)+38 = 62, 62+73 = 135, 135+27 = 162, 162+52
        assert_eq!(solution.cmax, 214);
    }

    #[test]
    fn test_ties_break_by_processing_time_then_node() {
        let ops = [
            OneMachineOp { node: 3, processing: 4, release: 0, tail: 0 },
            OneMachineOp { node: 2, processing: 2, release: 0, tail: 0 },
            OneMachineOp { node: 1, processing: 2, release: 0, tail: 0 },
        ];
        let solution = sequence_by_release(&ops);
        assert_eq!(solution.sequence, [1, 2, 3]);
        assert_eq!(solution.cmax, 8);
    }

    #[test]
    fn test_idle_time_before_late_release() {
        let ops = [
            OneMachineOp { node: 1, processing: 2, release: 0, tail: 0 },
            OneMachineOp { node: 2, processing: 3, release: 10, tail: 0 },
        ];
        let solution = sequence_by_release(&ops);
        assert_eq!(solution.sequence, [1, 2]);
        assert_eq!(solution.cmax, 13);
    }

    #[test]
    fn test_empty_input() {
        let solution = sequence_by_release(&[]);
        assert!(solution.sequence.is_empty());
        assert_eq!(solution.cmax, 0);
    }
}

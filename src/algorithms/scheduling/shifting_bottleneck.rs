//! Shifting Bottleneck heuristic.
//!
//! The instance is modelled as a disjunctive graph: a source, a sink and one
//! node per operation, connected by conjunctive arcs along each job. One
//! machine per iteration gets its processing order fixed: release times and
//! tails are computed on the current graph, every unsequenced machine is
//! evaluated through the one-machine relaxation, and the machine with the
//! largest completion time has its order committed as disjunctive arcs. A
//! final pass turns the longest-path start times into a schedule that also
//! respects machine exclusivity where the one-machine orders alone would not
//! force it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use crate::algorithms::graphs::{longest_path_lengths, tail_lengths};
use crate::data_structures::graphs::{
    Direction, DirectedEdgeListGraph, InOutAdjacencyArraysGraph,
};
use crate::data_structures::shop::{JobShopInstance, Schedule};

use super::single_machine::{sequence_by_release, OneMachineOp, OneMachineSolution};
use super::{SolveError, MAX_WORKERS};

/// The job-precedence skeleton plus the disjunctive arcs committed so far.
///
/// Node ids: 0 is the source, `1 + job * ops_per_job + op` the operation
/// nodes, `total_ops + 1` the sink. Node weights are the operation
/// durations; source and sink weigh nothing.
struct DisjunctiveGraph<'a> {
    instance: &'a JobShopInstance,
    arcs: DirectedEdgeListGraph<u32>,
    weights: Vec<i64>,
}

const SOURCE: u32 = 0;

impl<'a> DisjunctiveGraph<'a> {
    fn new(instance: &'a JobShopInstance) -> Self {
        let num_nodes = instance.total_ops() + 2;
        let ops_per_job = instance.ops_per_job();
        let sink = instance.total_ops() + 1;

        let mut arcs = DirectedEdgeListGraph::new(num_nodes);
        let mut weights = vec![0i64; num_nodes as usize];
        for job in instance.jobs() {
            let first = 1 + job * ops_per_job;
            arcs.push_arc(SOURCE, first);
            for op in 0..ops_per_job {
                let node = first + op;
                weights[node as usize] = i64::from(instance.operation(job, op).duration);
                if op + 1 < ops_per_job {
                    arcs.push_arc(node, node + 1);
                } else {
                    arcs.push_arc(node, sink);
                }
            }
        }
        Self { instance, arcs, weights }
    }

    fn op_node(&self, job: u32, op: u32) -> u32 {
        1 + job * self.instance.ops_per_job() + op
    }

    fn sink(&self) -> u32 {
        self.instance.total_ops() + 1
    }

    /// Fixes the processing order of one machine by chaining its nodes.
    fn commit_sequence(&mut self, sequence: &[u32]) {
        for pair in sequence.windows(2) {
            self.arcs.push_arc(pair[0], pair[1]);
        }
    }

    /// Rebuilds the adjacency arrays for the current arc set.
    fn snapshot(&self) -> InOutAdjacencyArraysGraph<u32> {
        InOutAdjacencyArraysGraph::from(&self.arcs)
    }

    /// Earliest start of every node on the current graph.
    fn release_times(&self, snapshot: &InOutAdjacencyArraysGraph<u32>) -> Result<Vec<i64>, SolveError> {
        longest_path_lengths(snapshot, &self.weights, Direction::OUT)
            .map_err(|_| SolveError::CyclicGraph)
    }

    /// Tail of every node on the current graph, its own duration included.
    fn tails(&self, snapshot: &InOutAdjacencyArraysGraph<u32>) -> Result<Vec<i64>, SolveError> {
        tail_lengths(snapshot, &self.weights).map_err(|_| SolveError::CyclicGraph)
    }

    /// Projects a machine's operations into the one-machine relaxation.
    fn machine_ops(&self, machine: u32, est: &[i64], tails: &[i64]) -> Vec<OneMachineOp> {
        let mut ops = Vec::new();
        for job in self.instance.jobs() {
            for op in 0..self.instance.ops_per_job() {
                let operation = self.instance.operation(job, op);
                if operation.machine != machine {
                    continue;
                }
                let node = self.op_node(job, op);
                ops.push(OneMachineOp {
                    node,
                    processing: i64::from(operation.duration),
                    release: est[node as usize],
                    tail: tails[node as usize],
                });
            }
        }
        ops
    }
}

pub fn sequential(instance: &JobShopInstance) -> Result<Schedule, SolveError> {
    solve(instance, 1)
}

pub fn parallel(instance: &JobShopInstance, workers: usize) -> Result<Schedule, SolveError> {
    solve(instance, workers.clamp(1, MAX_WORKERS))
}

fn solve(instance: &JobShopInstance, workers: usize) -> Result<Schedule, SolveError> {
    let mut graph = DisjunctiveGraph::new(instance);
    let mut sequenced = vec![false; instance.num_machines() as usize];

    for _ in 0..instance.num_machines() {
        let snapshot = graph.snapshot();
        let est = graph.release_times(&snapshot)?;
        let tails = graph.tails(&snapshot)?;

        let candidates: Vec<u32> = instance
            .machines()
            .filter(|&machine| !sequenced[machine as usize])
            .collect();

        let bottleneck = if workers > 1 {
            find_bottleneck_parallel(&graph, &candidates, &est, &tails, workers)
        } else {
            find_bottleneck(&graph, &candidates, &est, &tails)
        };
        let Some((machine, solution)) = bottleneck else {
            break;
        };

        log::debug!(
            "Sequencing bottleneck machine {machine}, one-machine completion {}",
            solution.cmax
        );
        graph.commit_sequence(&solution.sequence);
        sequenced[machine as usize] = true;
    }

    finalize(instance, &graph)
}

/// Evaluates every candidate machine and keeps the one with the largest
/// one-machine completion time; equal metrics go to the smaller machine id.
fn find_bottleneck(
    graph: &DisjunctiveGraph,
    candidates: &[u32],
    est: &[i64],
    tails: &[i64],
) -> Option<(u32, OneMachineSolution)> {
    let mut best: Option<(u32, OneMachineSolution)> = None;
    for &machine in candidates {
        let ops = graph.machine_ops(machine, est, tails);
        if ops.is_empty() {
            continue;
        }
        let solution = sequence_by_release(&ops);
        if improves(&best, machine, &solution) {
            best = Some((machine, solution));
        }
    }
    best
}

/// The same evaluation with the candidate machines handed out dynamically
/// to a fixed pool of workers; the graph is only read inside the region.
fn find_bottleneck_parallel(
    graph: &DisjunctiveGraph,
    candidates: &[u32],
    est: &[i64],
    tails: &[i64],
    workers: usize,
) -> Option<(u32, OneMachineSolution)> {
    let cursor = AtomicUsize::new(0);
    let best: Mutex<Option<(u32, OneMachineSolution)>> = Mutex::new(None);

    thread::scope(|scope| {
        for _ in 0..workers {
            let cursor = &cursor;
            let best = &best;
            scope.spawn(move || {
                let mut local: Option<(u32, OneMachineSolution)> = None;
                loop {
                    let next = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(&machine) = candidates.get(next) else {
                        break;
                    };
                    let ops = graph.machine_ops(machine, est, tails);
                    if ops.is_empty() {
                        continue;
                    }
                    let solution = sequence_by_release(&ops);
                    if improves(&local, machine, &solution) {
                        local = Some((machine, solution));
                    }
                }
                if let Some((machine, solution)) = local {
                    let mut best = best.lock().expect("lock cannot be poisoned");
                    if improves(&best, machine, &solution) {
                        *best = Some((machine, solution));
                    }
                }
            });
        }
    });

    best.into_inner().expect("all workers have exited")
}

fn improves(
    current: &Option<(u32, OneMachineSolution)>,
    machine: u32,
    solution: &OneMachineSolution,
) -> bool {
    match current {
        None => true,
        Some((best_machine, best)) => {
            solution.cmax > best.cmax || (solution.cmax == best.cmax && machine < *best_machine)
        }
    }
}

/// Turns the fixed graph into a resource-feasible schedule.
///
/// Operations are assigned in `(earliest start, job, op)` order; each start
/// is pushed past the job's previous operation and the machine's last
/// assignment. The longest-path times alone would already satisfy job
/// precedence, but machines whose order was cut short (or never contended)
/// could still overlap without this pass.
fn finalize(instance: &JobShopInstance, graph: &DisjunctiveGraph) -> Result<Schedule, SolveError> {
    let snapshot = graph.snapshot();
    let est = graph.release_times(&snapshot)?;

    let mut order: Vec<(i64, u32, u32)> = Vec::with_capacity(instance.total_ops() as usize);
    for job in instance.jobs() {
        for op in 0..instance.ops_per_job() {
            order.push((est[graph.op_node(job, op) as usize], job, op));
        }
    }
    order.sort_unstable();

    let mut schedule = Schedule::empty(instance);
    let mut machine_available = vec![0i64; instance.num_machines() as usize];
    for (est, job, op) in order {
        let operation = instance.operation(job, op);
        let mut start = est;
        if op > 0 {
            let previous = instance.operation(job, op - 1);
            let previous_end = schedule
                .start(job, op - 1)
                .expect("earlier operations of a job sort before later ones")
                + i64::from(previous.duration);
            start = start.max(previous_end);
        }
        start = start.max(machine_available[operation.machine as usize]);
        schedule.set_start(job, op, start);
        machine_available[operation.machine as usize] = start + i64::from(operation.duration);
    }

    Ok(schedule)
}

#[cfg(test)]
mod test {
    use crate::data_structures::shop::Operation;

    use super::*;

    fn op(machine: u32, duration: u32) -> Operation {
        Operation { machine, duration }
    }

    // job 0 runs (M0,3)(M1,2), job 1 runs (M1,2)(M0,1)
    fn crossing_jobs() -> JobShopInstance {
        JobShopInstance::new(2, 2, 2, vec![op(0, 3), op(1, 2), op(1, 2), op(0, 1)])
    }

    // job 0 runs (M0,2)(M1,2), job 1 runs (M1,2)(M0,2); optimum 4
    fn opposed_pair() -> JobShopInstance {
        JobShopInstance::new(2, 2, 2, vec![op(0, 2), op(1, 2), op(1, 2), op(0, 2)])
    }

    #[test]
    fn test_release_times_and_tails_of_initial_graph() {
        let instance = crossing_jobs();
        let graph = DisjunctiveGraph::new(&instance);
        let snapshot = graph.snapshot();
        let est = graph.release_times(&snapshot).unwrap();
        let tails = graph.tails(&snapshot).unwrap();
        // nodes 1..=4 are (j0,o0), (j0,o1), (j1,o0), (j1,o1)
        assert_eq!(est[1..5], [0, 3, 0, 2]);
        assert_eq!(tails[1..5], [5, 2, 3, 1]);
        // the sink's release is the longest job chain
        assert_eq!(est[graph.sink() as usize], 5);
    }

    #[test]
    fn test_crossing_jobs_schedule() {
        let instance = crossing_jobs();
        let schedule = sequential(&instance).unwrap();
        assert_eq!(schedule.check(&instance), Ok(()));
        assert_eq!(schedule.start(0, 0), Some(0));
        assert_eq!(schedule.start(1, 0), Some(0));
        assert_eq!(schedule.start(0, 1), Some(3));
        assert_eq!(schedule.start(1, 1), Some(3));
        assert_eq!(schedule.makespan(&instance), 5);
    }

    #[test]
    fn test_opposed_pair_reaches_optimum() {
        let instance = opposed_pair();
        let schedule = sequential(&instance).unwrap();
        assert_eq!(schedule.check(&instance), Ok(()));
        assert_eq!(schedule.makespan(&instance), 4);
    }

    #[test]
    fn test_single_job_runs_back_to_back() {
        let instance = JobShopInstance::new(1, 3, 3, vec![op(0, 4), op(1, 1), op(2, 2)]);
        let schedule = sequential(&instance).unwrap();
        assert_eq!(schedule.start(0, 0), Some(0));
        assert_eq!(schedule.start(0, 1), Some(4));
        assert_eq!(schedule.start(0, 2), Some(5));
        assert_eq!(schedule.makespan(&instance), 7);
    }

    #[test]
    fn test_unused_machine_does_not_stall_the_loop() {
        // machine 2 exists but no operation needs it
        let instance = JobShopInstance::new(2, 3, 2, vec![op(0, 2), op(1, 1), op(1, 2), op(0, 1)]);
        let schedule = sequential(&instance).unwrap();
        assert_eq!(schedule.check(&instance), Ok(()));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let instances = [
            crossing_jobs(),
            opposed_pair(),
            JobShopInstance::new(
                3,
                3,
                3,
                vec![
                    op(0, 3), op(1, 2), op(2, 2),
                    op(2, 2), op(0, 1), op(1, 4),
                    op(1, 4), op(2, 3), op(0, 1),
                ],
            ),
        ];
        for instance in &instances {
            let expected = sequential(instance).unwrap();
            for workers in [2, 4, 8] {
                assert_eq!(parallel(instance, workers).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_three_by_three_invariants() {
        let instance = JobShopInstance::new(
            3,
            3,
            3,
            vec![
                op(0, 3), op(1, 2), op(2, 2),
                op(2, 2), op(0, 1), op(1, 4),
                op(1, 4), op(2, 3), op(0, 1),
            ],
        );
        let schedule = sequential(&instance).unwrap();
        assert_eq!(schedule.check(&instance), Ok(()));
    }
}

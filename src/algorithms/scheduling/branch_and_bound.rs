//! Depth-first branch and bound over partial schedules.
//!
//! A node advances one job by one operation, placed at the earliest time
//! that respects the job's previous operation and the machine's frontier
//! (semi-active schedules; no idle-insertion is explored). Nodes are pruned
//! against the best makespan found so far. Both solvers are bounded by a
//! node budget and return the best complete schedule reached within it.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::thread;

use crate::data_structures::shop::{JobShopInstance, Schedule};

use super::{SolveError, MAX_WORKERS};

/// Node budget of the sequential solver.
pub const SEQUENTIAL_NODE_BUDGET: u32 = 10_000;
/// Node budget of each parallel worker.
pub const WORKER_NODE_BUDGET: u32 = 2_000;

/// Hard capacity of the node stack; pushes beyond it are dropped. The
/// dropped subtree stays reachable through sibling branches, and the solver
/// is heuristic under the node budget anyway.
const MAX_STACK: usize = 1_000;

#[derive(Debug, Clone)]
struct Node {
    /// Next operation index per job.
    job_progress: Vec<u32>,
    /// Completion time of each job's last scheduled operation.
    job_ready: Vec<i64>,
    /// Earliest free time per machine.
    machine_time: Vec<i64>,
    depth: u32,
    lower_bound: i64,
}

impl Node {
    fn root(instance: &JobShopInstance) -> Self {
        let mut root = Self {
            job_progress: vec![0; instance.num_jobs() as usize],
            job_ready: vec![0; instance.num_jobs() as usize],
            machine_time: vec![0; instance.num_machines() as usize],
            depth: 0,
            lower_bound: 0,
        };
        root.lower_bound = root.lower_bound(instance);
        root
    }

    fn is_complete(&self, instance: &JobShopInstance) -> bool {
        self.job_progress
            .iter()
            .all(|&progress| progress == instance.ops_per_job())
    }

    fn makespan(&self) -> i64 {
        self.machine_time.iter().copied().max().unwrap_or(0)
    }

    /// Schedules job's next operation and returns the child with its start.
    fn advance(&self, instance: &JobShopInstance, job: u32) -> (Node, i64) {
        let op = self.job_progress[job as usize];
        let operation = instance.operation(job, op);
        let machine = operation.machine as usize;

        let start = self.machine_time[machine].max(self.job_ready[job as usize]);
        let end = start + i64::from(operation.duration);

        let mut child = self.clone();
        child.job_progress[job as usize] = op + 1;
        child.job_ready[job as usize] = end;
        child.machine_time[machine] = end;
        child.depth += 1;
        child.lower_bound = child.lower_bound(instance);
        (child, start)
    }

    /// Single-bottleneck relaxations: the largest remaining work of any one
    /// job, and the largest machine frontier plus the work still bound for
    /// that machine.
    fn lower_bound(&self, instance: &JobShopInstance) -> i64 {
        let mut bound = 0;
        let mut machine_load = self.machine_time.clone();
        for job in instance.jobs() {
            let mut job_remainder = 0;
            for op in self.job_progress[job as usize]..instance.ops_per_job() {
                let operation = instance.operation(job, op);
                job_remainder += i64::from(operation.duration);
                machine_load[operation.machine as usize] += i64::from(operation.duration);
            }
            bound = bound.max(job_remainder);
        }
        bound.max(machine_load.into_iter().max().unwrap_or(0))
    }
}

/// A stack entry: the node plus the operations committed on the way to it,
/// so that an incumbent can be emitted as a full schedule.
#[derive(Debug, Clone)]
struct StackEntry {
    node: Node,
    committed: Vec<(u32, u32, i64)>,
}

impl StackEntry {
    fn root(instance: &JobShopInstance) -> Self {
        Self {
            node: Node::root(instance),
            committed: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BbSolution {
    pub schedule: Schedule,
    pub makespan: i64,
}

fn to_schedule(instance: &JobShopInstance, committed: &[(u32, u32, i64)]) -> Schedule {
    let mut schedule = Schedule::empty(instance);
    for &(job, op, start) in committed {
        schedule.set_start(job, op, start);
    }
    schedule
}

/// Sequential depth-first search with an explicit stack.
pub fn sequential(instance: &JobShopInstance) -> Result<BbSolution, SolveError> {
    let mut stack = Vec::with_capacity(MAX_STACK);
    stack.push(StackEntry::root(instance));

    let mut best_makespan = i64::MAX;
    let mut best: Option<StackEntry> = None;
    let mut nodes_explored = 0;

    while nodes_explored < SEQUENTIAL_NODE_BUDGET {
        let Some(entry) = stack.pop() else {
            break;
        };
        nodes_explored += 1;

        if entry.node.is_complete(instance) {
            let makespan = entry.node.makespan();
            if makespan < best_makespan {
                best_makespan = makespan;
                log::info!("New best makespan found: {makespan}");
                best = Some(entry);
            }
            continue;
        }
        if entry.node.lower_bound >= best_makespan {
            continue;
        }

        for job in instance.jobs() {
            let op = entry.node.job_progress[job as usize];
            if op == instance.ops_per_job() {
                continue;
            }
            let (child, start) = entry.node.advance(instance, job);
            if child.lower_bound >= best_makespan {
                continue;
            }
            if stack.len() >= MAX_STACK {
                log::debug!("Node stack full, dropping a child at depth {}", child.depth);
                continue;
            }
            let mut committed = entry.committed.clone();
            committed.push((job, op, start));
            stack.push(StackEntry { node: child, committed });
        }
    }

    log::debug!("Nodes explored: {nodes_explored}");
    let best = best.ok_or(SolveError::BudgetExhausted)?;
    Ok(BbSolution {
        schedule: to_schedule(instance, &best.committed),
        makespan: best_makespan,
    })
}

/// Best complete solution shared between the parallel workers.
///
/// The makespan additionally lives in an atomic so pruning can read it
/// without taking the lock; the bound only ever decreases, and a stale read
/// merely costs extra exploration.
struct SharedBest {
    bound: AtomicI64,
    incumbent: Mutex<Option<(i64, Vec<(u32, u32, i64)>)>>,
}

impl SharedBest {
    fn new() -> Self {
        Self {
            bound: AtomicI64::new(i64::MAX),
            incumbent: Mutex::new(None),
        }
    }

    fn offer(&self, makespan: i64, committed: &[(u32, u32, i64)]) {
        let previous = self.bound.fetch_min(makespan, Ordering::Relaxed);
        if makespan < previous {
            log::info!("New best makespan found: {makespan}");
        }
        // the incumbent lock decides ties independently of the atomic
        let mut incumbent = self.incumbent.lock().expect("lock cannot be poisoned");
        if incumbent.as_ref().is_none_or(|(best, _)| makespan < *best) {
            *incumbent = Some((makespan, committed.to_vec()));
        }
    }
}

/// Parallel variant: a fixed pool of workers popping from one shared stack,
/// each bounded by [WORKER_NODE_BUDGET] nodes.
pub fn parallel(instance: &JobShopInstance, workers: usize) -> Result<BbSolution, SolveError> {
    let workers = workers.clamp(1, MAX_WORKERS);

    let stack = Mutex::new(vec![StackEntry::root(instance)]);
    let best = SharedBest::new();

    thread::scope(|scope| {
        for _ in 0..workers {
            let stack = &stack;
            let best = &best;
            scope.spawn(move || {
                let mut nodes_explored = 0;
                while nodes_explored < WORKER_NODE_BUDGET {
                    let Some(entry) = stack.lock().expect("lock cannot be poisoned").pop() else {
                        break;
                    };
                    nodes_explored += 1;

                    if entry.node.is_complete(instance) {
                        best.offer(entry.node.makespan(), &entry.committed);
                        continue;
                    }
                    if entry.node.lower_bound >= best.bound.load(Ordering::Relaxed) {
                        continue;
                    }

                    for job in instance.jobs() {
                        let op = entry.node.job_progress[job as usize];
                        if op == instance.ops_per_job() {
                            continue;
                        }
                        let (child, start) = entry.node.advance(instance, job);
                        if child.lower_bound >= best.bound.load(Ordering::Relaxed) {
                            continue;
                        }
                        let mut committed = entry.committed.clone();
                        committed.push((job, op, start));
                        let mut stack = stack.lock().expect("lock cannot be poisoned");
                        if stack.len() >= MAX_STACK {
                            log::debug!(
                                "Node stack full, dropping a child at depth {}",
                                child.depth
                            );
                            continue;
                        }
                        stack.push(StackEntry { node: child, committed });
                    }
                }
                log::debug!("Worker explored {nodes_explored} nodes");
            });
        }
    });

    let incumbent = best
        .incumbent
        .into_inner()
        .expect("all workers have exited");
    let (makespan, committed) = incumbent.ok_or(SolveError::BudgetExhausted)?;
    Ok(BbSolution {
        schedule: to_schedule(instance, &committed),
        makespan,
    })
}

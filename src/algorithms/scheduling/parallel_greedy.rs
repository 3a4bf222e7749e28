//! Round-based parallel list scheduler.
//!
//! Jobs are statically partitioned over the workers (`job % workers`). In
//! every round each worker commits the front operation of its lowest-indexed
//! unfinished job. All commits of a round happen inside one critical
//! section, entered in worker-id order, so a given worker count always
//! produces the same schedule; a barrier separates the rounds. The round
//! loop stops when a round commits nothing.

use std::sync::{Barrier, Condvar, Mutex};
use std::thread;

use crate::data_structures::shop::{JobShopInstance, Schedule};

use super::{SolveError, MAX_WORKERS};

struct RoundState {
    schedule: Schedule,
    next_op: Vec<u32>,
    next_ready: Vec<i64>,
    committed: u32,
    /// Worker whose turn it is inside the current round.
    turn: usize,
    round_commits: u32,
    rounds: u64,
    done: bool,
}

/// Schedules the instance with `workers` threads (clamped to 1..=8).
pub fn schedule(instance: &JobShopInstance, workers: usize) -> Result<Schedule, SolveError> {
    let workers = workers.clamp(1, MAX_WORKERS);
    let total = instance.total_ops();
    let max_rounds = u64::from(total) * 10;

    let num_jobs = instance.num_jobs() as usize;
    let shared = Mutex::new(RoundState {
        schedule: Schedule::empty(instance),
        next_op: vec![0; num_jobs],
        next_ready: vec![0; num_jobs],
        committed: 0,
        turn: 0,
        round_commits: 0,
        rounds: 0,
        done: false,
    });
    let my_turn = Condvar::new();
    let round_end = Barrier::new(workers);

    thread::scope(|scope| {
        for worker in 0..workers {
            let shared = &shared;
            let my_turn = &my_turn;
            let round_end = &round_end;
            scope.spawn(move || loop {
                {
                    let mut state = shared.lock().expect("lock cannot be poisoned");
                    while state.turn != worker {
                        state = my_turn.wait(state).expect("lock cannot be poisoned");
                    }
                    if commit_front(instance, worker, workers, &mut state) {
                        state.round_commits += 1;
                    }
                    state.turn += 1;
                    my_turn.notify_all();
                }

                if round_end.wait().is_leader() {
                    let mut state = shared.lock().expect("lock cannot be poisoned");
                    state.rounds += 1;
                    state.done = state.round_commits == 0
                        || state.committed == total
                        || state.rounds >= max_rounds;
                    state.round_commits = 0;
                    state.turn = 0;
                }
                // hold every worker back until the leader reset the round
                round_end.wait();

                if shared.lock().expect("lock cannot be poisoned").done {
                    break;
                }
            });
        }
    });

    let state = shared.into_inner().expect("all workers have exited");
    if state.committed == total {
        Ok(state.schedule)
    } else {
        // a worker with pending operations always commits, so an incomplete
        // schedule means the round bound was hit
        Err(SolveError::NoProgress)
    }
}

/// Commits the front operation of the worker's first unfinished job, if any.
fn commit_front(
    instance: &JobShopInstance,
    worker: usize,
    workers: usize,
    state: &mut RoundState,
) -> bool {
    for job in instance.jobs() {
        if job as usize % workers != worker {
            continue;
        }
        let op = state.next_op[job as usize];
        if op >= instance.ops_per_job() {
            continue;
        }
        let operation = instance.operation(job, op);
        let start = state.schedule.find_slot(
            instance,
            operation.machine,
            operation.duration,
            state.next_ready[job as usize],
        );
        state.schedule.set_start(job, op, start);
        state.next_op[job as usize] = op + 1;
        state.next_ready[job as usize] = start + i64::from(operation.duration);
        state.committed += 1;
        return true;
    }
    false
}

#[cfg(test)]
mod test {
    use crate::data_structures::shop::Operation;

    use super::*;

    fn op(machine: u32, duration: u32) -> Operation {
        Operation { machine, duration }
    }

    // four identical jobs (M0,1)(M1,1) contending pairwise
    fn four_identical_jobs() -> JobShopInstance {
        let job = [op(0, 1), op(1, 1)];
        JobShopInstance::new(4, 2, 2, job.iter().cycle().take(8).copied().collect())
    }

    #[test]
    fn test_two_workers_interleave_rounds() {
        let instance = four_identical_jobs();
        let schedule = schedule(&instance, 2).unwrap();
        assert_eq!(schedule.check(&instance), Ok(()));
        // round 1 fills machine 0 at 0 and 1, round 2 machine 1, and so on
        assert_eq!(schedule.start(0, 0), Some(0));
        assert_eq!(schedule.start(1, 0), Some(1));
        assert_eq!(schedule.start(0, 1), Some(1));
        assert_eq!(schedule.start(1, 1), Some(2));
        assert_eq!(schedule.start(2, 0), Some(2));
        assert_eq!(schedule.start(3, 0), Some(3));
        assert_eq!(schedule.start(2, 1), Some(3));
        assert_eq!(schedule.start(3, 1), Some(4));
        assert_eq!(schedule.makespan(&instance), 5);
    }

    #[test]
    fn test_same_worker_count_is_deterministic() {
        let instance = four_identical_jobs();
        let first = schedule(&instance, 2).unwrap();
        for _ in 0..10 {
            assert_eq!(schedule(&instance, 2).unwrap(), first);
        }
    }

    #[test]
    fn test_more_workers_than_jobs() {
        let instance = four_identical_jobs();
        let schedule = schedule(&instance, 8).unwrap();
        assert_eq!(schedule.check(&instance), Ok(()));
    }

    #[test]
    fn test_single_worker_completes() {
        let instance = four_identical_jobs();
        let schedule = schedule(&instance, 1).unwrap();
        assert_eq!(schedule.check(&instance), Ok(()));
    }

    #[test]
    fn test_crossing_machine_orders() {
        // job 0 visits the machines forward, job 1 backward
        let instance = JobShopInstance::new(
            2,
            3,
            3,
            vec![op(0, 2), op(1, 3), op(2, 1), op(2, 2), op(1, 2), op(0, 3)],
        );
        let schedule = schedule(&instance, 2).unwrap();
        assert_eq!(schedule.check(&instance), Ok(()));
    }
}

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Largest number of jobs an instance may declare.
pub const MAX_JOBS: u32 = 100;
/// Largest number of machines an instance may declare.
pub const MAX_MACHINES: u32 = 100;

/// One step of a job: the machine it needs and for how long.
///
/// Machines are 0-based in memory; the text format uses 1-based ids and the
/// parser converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub machine: u32,
    pub duration: u32,
}

/// A job-shop instance.
///
/// Every job consists of `ops_per_job` operations that must run in order.
/// The plan is immutable once constructed; solutions live in [Schedule].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobShopInstance {
    num_jobs: u32,
    num_machines: u32,
    ops_per_job: u32,
    plan: Vec<Operation>,
}

impl JobShopInstance {
    /// Creates an instance from a row-major plan (`job * ops_per_job + op`).
    ///
    /// # Panics
    ///
    /// Panics if the plan size does not match, a machine id is out of range
    /// or a duration is zero.
    pub fn new(num_jobs: u32, num_machines: u32, ops_per_job: u32, plan: Vec<Operation>) -> Self {
        assert_eq!(
            plan.len(),
            num_jobs as usize * ops_per_job as usize,
            "plan must hold exactly ops_per_job operations per job"
        );
        assert!(
            plan.iter().all(|op| op.machine < num_machines),
            "operation references a machine outside 0..{num_machines}"
        );
        assert!(
            plan.iter().all(|op| op.duration > 0),
            "durations must be positive"
        );
        Self {
            num_jobs,
            num_machines,
            ops_per_job,
            plan,
        }
    }

    pub fn num_jobs(&self) -> u32 {
        self.num_jobs
    }

    pub fn num_machines(&self) -> u32 {
        self.num_machines
    }

    pub fn ops_per_job(&self) -> u32 {
        self.ops_per_job
    }

    pub fn total_ops(&self) -> u32 {
        self.num_jobs * self.ops_per_job
    }

    pub fn operation(&self, job: u32, op: u32) -> Operation {
        debug_assert!(job < self.num_jobs && op < self.ops_per_job);
        self.plan[(job * self.ops_per_job + op) as usize]
    }

    pub fn jobs(&self) -> Range<u32> {
        0..self.num_jobs
    }

    pub fn machines(&self) -> Range<u32> {
        0..self.num_machines
    }
}

/// Start-time assignments for an instance's operations.
///
/// `None` marks an operation that has not been committed yet. Algorithms
/// mutate the schedule through [Schedule::set_start]; job precedence and
/// machine exclusivity of a finished schedule can be verified with
/// [Schedule::check].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    ops_per_job: u32,
    starts: Vec<Option<i64>>,
}

impl Schedule {
    pub fn empty(instance: &JobShopInstance) -> Self {
        Self {
            ops_per_job: instance.ops_per_job(),
            starts: vec![None; instance.total_ops() as usize],
        }
    }

    pub fn start(&self, job: u32, op: u32) -> Option<i64> {
        self.starts[(job * self.ops_per_job + op) as usize]
    }

    pub fn set_start(&mut self, job: u32, op: u32, start: i64) {
        debug_assert!(start >= 0);
        self.starts[(job * self.ops_per_job + op) as usize] = Some(start);
    }

    pub fn is_complete(&self) -> bool {
        self.starts.iter().all(Option::is_some)
    }

    /// Maximum completion time over all committed operations.
    pub fn makespan(&self, instance: &JobShopInstance) -> i64 {
        let mut makespan = 0;
        for job in instance.jobs() {
            for op in 0..self.ops_per_job {
                if let Some(start) = self.start(job, op) {
                    makespan = makespan.max(start + i64::from(instance.operation(job, op).duration));
                }
            }
        }
        makespan
    }

    /// Finds the earliest start `>= earliest_start` at which `machine` can
    /// run an operation of the given duration without overlapping any
    /// committed operation on that machine.
    ///
    /// Whenever the candidate interval overlaps a committed one, the
    /// candidate jumps to the latest conflicting end time; each failed pass
    /// strictly increases the candidate, so the loop terminates.
    ///
    /// # Panics
    ///
    /// Panics if `machine` is not a machine of the instance.
    pub fn find_slot(
        &self,
        instance: &JobShopInstance,
        machine: u32,
        duration: u32,
        earliest_start: i64,
    ) -> i64 {
        assert!(
            machine < instance.num_machines(),
            "machine {machine} outside 0..{}",
            instance.num_machines()
        );
        let length = i64::from(duration);
        let mut candidate = earliest_start;
        loop {
            let mut next = candidate;
            for job in instance.jobs() {
                for op in 0..self.ops_per_job {
                    let operation = instance.operation(job, op);
                    if operation.machine != machine {
                        continue;
                    }
                    if let Some(start) = self.start(job, op) {
                        let end = start + i64::from(operation.duration);
                        if candidate < end && candidate + length > start {
                            next = next.max(end);
                        }
                    }
                }
            }
            if next == candidate {
                return candidate;
            }
            candidate = next;
        }
    }

    /// Verifies coverage, non-negative starts, job precedence and machine
    /// exclusivity, returning the first violation found.
    pub fn check(&self, instance: &JobShopInstance) -> Result<(), ScheduleViolation> {
        for job in instance.jobs() {
            for op in 0..self.ops_per_job {
                let Some(start) = self.start(job, op) else {
                    return Err(ScheduleViolation::Unscheduled { job, op });
                };
                if start < 0 {
                    return Err(ScheduleViolation::NegativeStart { job, op });
                }
                if op > 0 {
                    let previous = self.start(job, op - 1).expect("checked in the previous iteration");
                    let ready = previous + i64::from(instance.operation(job, op - 1).duration);
                    if start < ready {
                        return Err(ScheduleViolation::PrecedenceViolated { job, op });
                    }
                }
            }
        }

        // pairwise interval disjointness per machine
        for machine in instance.machines() {
            let mut intervals: Vec<(i64, i64, u32, u32)> = Vec::new();
            for job in instance.jobs() {
                for op in 0..self.ops_per_job {
                    let operation = instance.operation(job, op);
                    if operation.machine != machine {
                        continue;
                    }
                    let start = self.start(job, op).expect("coverage checked above");
                    intervals.push((start, start + i64::from(operation.duration), job, op));
                }
            }
            intervals.sort_unstable();
            for pair in intervals.windows(2) {
                if pair[1].0 < pair[0].1 {
                    return Err(ScheduleViolation::MachineOverlap {
                        machine,
                        first: (pair[0].2, pair[0].3),
                        second: (pair[1].2, pair[1].3),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleViolation {
    Unscheduled { job: u32, op: u32 },
    NegativeStart { job: u32, op: u32 },
    PrecedenceViolated { job: u32, op: u32 },
    MachineOverlap { machine: u32, first: (u32, u32), second: (u32, u32) },
}

impl fmt::Display for ScheduleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleViolation::Unscheduled { job, op } => {
                write!(f, "Operation {op} of job {job} has no start time.")
            }
            ScheduleViolation::NegativeStart { job, op } => {
                write!(f, "Operation {op} of job {job} starts before time 0.")
            }
            ScheduleViolation::PrecedenceViolated { job, op } => {
                write!(f, "Operation {op} of job {job} starts before its predecessor finishes.")
            }
            ScheduleViolation::MachineOverlap {
                machine,
                first: (j1, o1),
                second: (j2, o2),
            } => write!(
                f,
                "Operations ({j1},{o1}) and ({j2},{o2}) overlap on machine {machine}."
            ),
        }
    }
}

impl std::error::Error for ScheduleViolation {}

//! Sequential list schedulers.
//!
//! Both priority rules commit one operation at a time through
//! [Schedule::find_slot], so job precedence and machine exclusivity hold by
//! construction. The candidate fronts are kept in a min-heap; lexicographic
//! tuple ordering gives the job-index tie-break.

use binary_heap_plus::{BinaryHeap, MinComparator};

use crate::data_structures::shop::{JobShopInstance, Schedule};

/// Earliest-available rule: always advance the job that can start its next
/// operation first.
pub fn earliest_available(instance: &JobShopInstance) -> Schedule {
    let mut schedule = Schedule::empty(instance);
    let mut next_op = vec![0u32; instance.num_jobs() as usize];

    // (earliest start of the job's next operation, job)
    let mut fronts: BinaryHeap<(i64, u32), MinComparator> =
        BinaryHeap::with_capacity_min(instance.num_jobs() as usize);
    for job in instance.jobs() {
        fronts.push((0, job));
    }

    while let Some((ready, job)) = fronts.pop() {
        let op = next_op[job as usize];
        let operation = instance.operation(job, op);
        let start = schedule.find_slot(instance, operation.machine, operation.duration, ready);
        schedule.set_start(job, op, start);
        next_op[job as usize] += 1;
        if next_op[job as usize] < instance.ops_per_job() {
            fronts.push((start + i64::from(operation.duration), job));
        }
    }

    schedule
}

/// Shortest-processing-time rule: always commit the cheapest front
/// operation over all incomplete jobs.
pub fn shortest_processing_time(instance: &JobShopInstance) -> Schedule {
    let mut schedule = Schedule::empty(instance);
    let mut next_op = vec![0u32; instance.num_jobs() as usize];
    let mut next_ready = vec![0i64; instance.num_jobs() as usize];

    // (duration of the job's front operation, job)
    let mut fronts: BinaryHeap<(u32, u32), MinComparator> =
        BinaryHeap::with_capacity_min(instance.num_jobs() as usize);
    for job in instance.jobs() {
        fronts.push((instance.operation(job, 0).duration, job));
    }

    while let Some((_, job)) = fronts.pop() {
        let op = next_op[job as usize];
        let operation = instance.operation(job, op);
        let start = schedule.find_slot(
            instance,
            operation.machine,
            operation.duration,
            next_ready[job as usize],
        );
        schedule.set_start(job, op, start);
        next_op[job as usize] += 1;
        if next_op[job as usize] < instance.ops_per_job() {
            next_ready[job as usize] = start + i64::from(operation.duration);
            fronts.push((instance.operation(job, op + 1).duration, job));
        }
    }

    schedule
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

    // one job over three machines
    fn chain_job() -> JobShopInstance {
        JobShopInstance::new(1, 3, 3, vec![op(0, 4), op(1, 1), op(2, 2)])
    }

    // three single-operation jobs competing for one machine
    fn contended_machine() -> JobShopInstance {
        JobShopInstance::new(3, 1, 1, vec![op(0, 2), op(0, 3), op(0, 1)])
    }

    #[test]
    fn test_earliest_available_crossing_jobs() {
        let instance = crossing_jobs();
        let schedule = earliest_available(&instance);
        assert_eq!(schedule.check(&instance), Ok(()));
        assert_eq!(schedule.start(0, 0), Some(0));
        assert_eq!(schedule.start(1, 0), Some(0));
        assert_eq!(schedule.start(0, 1), Some(3));
        assert_eq!(schedule.start(1, 1), Some(3));
        assert_eq!(schedule.makespan(&instance), 5);
    }

    #[test]
    fn test_single_job_runs_back_to_back() {
        let instance = chain_job();
        for schedule in [earliest_available(&instance), shortest_processing_time(&instance)] {
            assert_eq!(schedule.check(&instance), Ok(()));
            assert_eq!(schedule.start(0, 0), Some(0));
            assert_eq!(schedule.start(0, 1), Some(4));
            assert_eq!(schedule.start(0, 2), Some(5));
            assert_eq!(schedule.makespan(&instance), 7);
        }
    }

    #[test]
    fn test_spt_orders_by_duration() {
        let instance = contended_machine();
        let schedule = shortest_processing_time(&instance);
        assert_eq!(schedule.check(&instance), Ok(()));
        // commit order is job 2 (d=1), job 0 (d=2), job 1 (d=3)
        assert_eq!(schedule.start(2, 0), Some(0));
        assert_eq!(schedule.start(0, 0), Some(1));
        assert_eq!(schedule.start(1, 0), Some(3));
        assert_eq!(schedule.makespan(&instance), 6);
    }

    #[test]
    fn test_ea_breaks_ties_by_job_index() {
        let instance = contended_machine();
        let schedule = earliest_available(&instance);
        assert_eq!(schedule.check(&instance), Ok(()));
        assert_eq!(schedule.start(0, 0), Some(0));
        assert_eq!(schedule.start(1, 0), Some(2));
        assert_eq!(schedule.start(2, 0), Some(5));
        assert_eq!(schedule.makespan(&instance), 6);
    }

    #[test]
    fn test_ea_schedule_is_left_shifted() {
        // no operation of the EA schedule can move one unit to the left
        let instance = crossing_jobs();
        let schedule = earliest_available(&instance);
        for job in instance.jobs() {
            for op in 0..instance.ops_per_job() {
                let start = schedule.start(job, op).unwrap();
                if start == 0 {
                    continue;
                }
                let mut shifted = schedule.clone();
                shifted.set_start(job, op, start - 1);
                assert!(
                    shifted.check(&instance).is_err(),
                    "operation ({job},{op}) could start earlier"
                );
            }
        }
    }

    #[test]
    fn test_reruns_are_identical() {
        let instance = crossing_jobs();
        assert_eq!(earliest_available(&instance), earliest_available(&instance));
        assert_eq!(
            shortest_processing_time(&instance),
            shortest_processing_time(&instance)
        );
    }
}

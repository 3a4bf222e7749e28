//! Writing finished schedules.
//!
//! Both formats start with the makespan on its own line, followed by one
//! line per job. The list formats print `start,duration,machine` per
//! operation (machine ids 1-based); the compact format prints only the
//! start times.

use std::fs;
use std::path::Path;

use itertools::Itertools;

use crate::data_structures::shop::{JobShopInstance, Schedule};

use super::{ensure_parent_folder_exists, IOError};

/// Writes `start,duration,machine` tokens per operation.
pub fn write_triplets(
    file_path: impl AsRef<Path>,
    instance: &JobShopInstance,
    schedule: &Schedule,
) -> Result<(), IOError> {
    write_lines(file_path, instance, schedule, |instance, schedule, job, op| {
        let operation = instance.operation(job, op);
        let start = schedule.start(job, op).expect("schedule is complete");
        format!("{},{},{}", start, operation.duration, operation.machine + 1)
    })
}

/// Writes only the start time per operation.
pub fn write_starts(
    file_path: impl AsRef<Path>,
    instance: &JobShopInstance,
    schedule: &Schedule,
) -> Result<(), IOError> {
    write_lines(file_path, instance, schedule, |_, schedule, job, op| {
        schedule.start(job, op).expect("schedule is complete").to_string()
    })
}

fn write_lines(
    file_path: impl AsRef<Path>,
    instance: &JobShopInstance,
    schedule: &Schedule,
    token: impl Fn(&JobShopInstance, &Schedule, u32, u32) -> String,
) -> Result<(), IOError> {
    let file_path = file_path.as_ref();
    ensure_parent_folder_exists(file_path)?;
    let display: String = file_path.display().to_string();

    let mut content = format!("{}\n", schedule.makespan(instance));
    for job in instance.jobs() {
        let line = (0..instance.ops_per_job())
            .map(|op| token(instance, schedule, job, op))
            .join(" ");
        content.push_str(&line);
        content.push('\n');
    }

    fs::write(file_path, content).map_err(|why| IOError::CannotWrite(display, why.to_string()))
}

#[cfg(test)]
mod test {
    use crate::data_structures::shop::Operation;

    use super::*;

    fn sample() -> (JobShopInstance, Schedule) {
        let instance = JobShopInstance::new(
            2,
            2,
            2,
            vec![
                Operation { machine: 0, duration: 3 },
                Operation { machine: 1, duration: 2 },
                Operation { machine: 1, duration: 2 },
                Operation { machine: 0, duration: 1 },
            ],
        );
        let mut schedule = Schedule::empty(&instance);
        schedule.set_start(0, 0, 0);
        schedule.set_start(0, 1, 3);
        schedule.set_start(1, 0, 0);
        schedule.set_start(1, 1, 3);
        (instance, schedule)
    }

    #[test]
    fn test_triplet_format() {
        let (instance, schedule) = sample();
        let path = std::env::temp_dir().join("jobshop_schedule_triplets.txt");
        write_triplets(&path, &instance, &schedule).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(written, "5\n0,3,1 3,2,2\n0,2,2 3,1,1\n");
    }

    #[test]
    fn test_starts_format() {
        let (instance, schedule) = sample();
        let path = std::env::temp_dir().join("jobshop_schedule_starts.txt");
        write_starts(&path, &instance, &schedule).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(written, "5\n0 3\n0 3\n");
    }

    #[test]
    fn test_write_to_unwritable_path_fails() {
        let (instance, schedule) = sample();
        assert!(write_triplets("/proc/readonly/out.txt", &instance, &schedule).is_err());
    }
}

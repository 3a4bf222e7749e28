//! Reading and writing the whitespace-delimited problem format.
//!
//! The first two tokens are the number of jobs and machines; every job then
//! contributes one `machine_id duration` pair per machine, machine ids
//! counting from 1. The number of operations per job equals the number of
//! machines.

use std::fs;
use std::path::Path;

use itertools::Itertools;

use crate::data_structures::shop::{JobShopInstance, Operation, MAX_JOBS, MAX_MACHINES};

use super::{ensure_parent_folder_exists, IOError};

/// Loads an instance from a problem file.
pub fn read_problem(file_path: impl AsRef<Path>) -> Result<JobShopInstance, IOError> {
    let file_path = file_path.as_ref();
    let display: String = file_path.display().to_string();

    let content = fs::read_to_string(file_path)
        .map_err(|why| IOError::CannotRead(display.clone(), why.to_string()))?;
    parse_problem(&content).map_err(|why| IOError::InvalidFormat(display, why))
}

/// Parses an instance from the text format.
pub fn parse_problem(content: &str) -> Result<JobShopInstance, String> {
    let mut tokens = content.split_whitespace();
    let mut next_u32 = move |what: &str| -> Result<u32, String> {
        let token = tokens
            .next()
            .ok_or_else(|| format!("missing token: expected {what}"))?;
        token
            .parse::<u32>()
            .map_err(|_| format!("expected {what}, found '{token}'"))
    };

    let num_jobs = next_u32("number of jobs")?;
    let num_machines = next_u32("number of machines")?;
    if num_jobs == 0 || num_machines == 0 {
        return Err(String::from("job and machine counts must be positive"));
    }
    if num_jobs > MAX_JOBS {
        return Err(format!("{num_jobs} jobs exceed the supported {MAX_JOBS}"));
    }
    if num_machines > MAX_MACHINES {
        return Err(format!(
            "{num_machines} machines exceed the supported {MAX_MACHINES}"
        ));
    }

    let ops_per_job = num_machines;
    let mut plan = Vec::with_capacity((num_jobs * ops_per_job) as usize);
    for job in 0..num_jobs {
        for op in 0..ops_per_job {
            let machine = next_u32(&format!("machine id of job {job} operation {op}"))?;
            let duration = next_u32(&format!("duration of job {job} operation {op}"))?;
            if machine == 0 || machine > num_machines {
                return Err(format!(
                    "machine id {machine} of job {job} operation {op} is outside 1..={num_machines}"
                ));
            }
            if duration == 0 {
                return Err(format!("job {job} operation {op} has zero duration"));
            }
            plan.push(Operation {
                machine: machine - 1,
                duration,
            });
        }
    }

    Ok(JobShopInstance::new(num_jobs, num_machines, ops_per_job, plan))
}

/// Writes an instance in the text format, machine ids 1-based.
pub fn write_problem(
    file_path: impl AsRef<Path>,
    instance: &JobShopInstance,
) -> Result<(), IOError> {
    let file_path = file_path.as_ref();
    ensure_parent_folder_exists(file_path)?;
    let display: String = file_path.display().to_string();

    let mut content = format!("{} {}\n", instance.num_jobs(), instance.num_machines());
    for job in instance.jobs() {
        let line = (0..instance.ops_per_job())
            .map(|op| {
                let operation = instance.operation(job, op);
                format!("{} {}", operation.machine + 1, operation.duration)
            })
            .join(" ");
        content.push_str(&line);
        content.push('\n');
    }

    fs::write(file_path, content).map_err(|why| IOError::CannotWrite(display, why.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = "2 2\n1 3 2 2\n2 2 1 1\n";

    #[test]
    fn test_parse_sample() {
        let instance = parse_problem(SAMPLE).unwrap();
        assert_eq!(instance.num_jobs(), 2);
        assert_eq!(instance.num_machines(), 2);
        assert_eq!(instance.ops_per_job(), 2);
        assert_eq!(instance.operation(0, 0), Operation { machine: 0, duration: 3 });
        assert_eq!(instance.operation(0, 1), Operation { machine: 1, duration: 2 });
        assert_eq!(instance.operation(1, 0), Operation { machine: 1, duration: 2 });
        assert_eq!(instance.operation(1, 1), Operation { machine: 0, duration: 1 });
    }

    #[test]
    fn test_parse_ignores_line_structure() {
        let instance = parse_problem("2 2 1 3 2 2 2 2 1 1").unwrap();
        assert_eq!(instance, parse_problem(SAMPLE).unwrap());
    }

    #[test]
    fn test_parse_rejects_missing_tokens() {
        assert!(parse_problem("").is_err());
        assert!(parse_problem("2").is_err());
        assert!(parse_problem("2 2\n1 3 2 2\n2 2 1").is_err());
    }

    #[test]
    fn test_parse_rejects_non_integers() {
        assert!(parse_problem("2 x\n").is_err());
        assert!(parse_problem("2 2\n1 3 2 2\n2 two 1 1\n").is_err());
        assert!(parse_problem("2 2\n1 3 2 2\n2 -2 1 1\n").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_dimensions() {
        assert!(parse_problem("0 2\n").is_err());
        assert!(parse_problem("2 0\n").is_err());
        assert!(parse_problem("101 1 1 1").is_err());
        assert!(parse_problem("1 101").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_operations() {
        // machine id 3 in a 2-machine instance
        assert!(parse_problem("2 2\n1 3 3 2\n2 2 1 1\n").is_err());
        // machine id 0 (ids are 1-based)
        assert!(parse_problem("2 2\n0 3 2 2\n2 2 1 1\n").is_err());
        // zero duration
        assert!(parse_problem("2 2\n1 0 2 2\n2 2 1 1\n").is_err());
    }

    #[test]
    fn test_write_read_round_trip() {
        let instance = parse_problem(SAMPLE).unwrap();
        let path = std::env::temp_dir().join("jobshop_problem_round_trip.jss");
        write_problem(&path, &instance).unwrap();
        let reread = read_problem(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(reread, instance);
    }

    #[test]
    fn test_read_missing_file_fails() {
        assert!(read_problem("/nonexistent/problem.jss").is_err());
    }
}

pub mod csv;
pub mod json;
pub mod problem;
pub mod schedule;

use std::fmt;
use std::fs::create_dir_all;
use std::path::Path;

#[derive(Debug)]
pub enum IOError {
    CannotWrite(String, String),
    CannotSerialize(String, String),
    CannotRead(String, String),
    CannotDeserialize(String, String),
    InvalidFormat(String, String),
}

impl fmt::Display for IOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let err = match self {
            IOError::CannotWrite(what, why) => format!("Couldn't write to {}: {}", what, why),
            IOError::CannotSerialize(what, why) => {
                format!("Couldn't serialize to {}: {}", what, why)
            }
            IOError::CannotRead(what, why) => format!("Couldn't read from {}: {}", what, why),
            IOError::CannotDeserialize(what, why) => {
                format!("Couldn't deserialize from {}: {}", what, why)
            }
            IOError::InvalidFormat(what, why) => format!("Invalid problem file {}: {}", what, why),
        };

        write!(f, "{err}")
    }
}
impl std::error::Error for IOError {}

/// Size class of an instance, used to route generated files and tag run
/// records. Carries no scheduling semantics.
pub fn size_category(num_jobs: u32, num_machines: u32) -> &'static str {
    if num_jobs <= 3 && num_machines <= 3 {
        "P1_Small"
    } else if num_jobs <= 6 && num_machines <= 6 {
        "P2_Medium"
    } else if num_jobs <= 25 && num_machines <= 25 {
        "P3_Large"
    } else if num_jobs <= 50 && num_machines <= 20 {
        "P4_XLarge"
    } else {
        "P5_XXLarge"
    }
}

fn ensure_parent_folder_exists(file_path: &Path) -> Result<(), IOError> {
    let display: String = file_path.display().to_string();

    let parent = match file_path.parent() {
        None => return Result::Err(IOError::CannotWrite(display, String::from("Not a file."))),
        Some(p) => p,
    };
    // ensure folder exists
    if let Err(why) = create_dir_all(parent) {
        Result::Err(IOError::CannotWrite(display, why.to_string()))
    } else {
        Ok(())
    }
}

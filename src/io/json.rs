use std::{
    fs::OpenOptions,
    io::{BufWriter, Read},
    path::Path,
};

use serde::{de::DeserializeOwned, Serialize};

use super::{ensure_parent_folder_exists, IOError};

/// Serialize the given object to a json string and write that to the given file.
pub fn write_json_to_file<T: Serialize>(file_path: &Path, object: T) -> Result<(), IOError> {
    ensure_parent_folder_exists(file_path)?;

    let display: String = file_path.display().to_string();

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|why| IOError::CannotWrite(display.clone(), why.to_string()))?;

    serde_json::to_writer(BufWriter::new(file), &object)
        .map_err(|why| IOError::CannotSerialize(display, why.to_string()))
}

pub fn read_json_from_file<T: DeserializeOwned>(file_path: &Path) -> Result<T, IOError> {
    let display: String = file_path.display().to_string();

    let mut file = OpenOptions::new()
        .read(true)
        .open(file_path)
        .map_err(|why| IOError::CannotRead(display.clone(), why.to_string()))?;

    let mut file_content = String::new();
    file.read_to_string(&mut file_content)
        .map_err(|why| IOError::CannotRead(display.clone(), why.to_string()))?;

    serde_json::from_str(&file_content)
        .map_err(|why| IOError::CannotDeserialize(display, why.to_string()))
}

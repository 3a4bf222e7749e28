use std::{fs::OpenOptions, io::ErrorKind, path::Path};

use serde::{de::DeserializeOwned, Serialize};

use super::{ensure_parent_folder_exists, IOError};

/// Appends the records to a CSV file, writing the header row only when the
/// file is created by this call.
pub fn append_to_file<T: Serialize>(
    file_path: impl AsRef<Path>,
    records: &[T],
) -> Result<(), IOError> {
    let file_path = file_path.as_ref();
    ensure_parent_folder_exists(file_path)?;

    let display: String = file_path.display().to_string();

    let mut writer = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(file_path)
    {
        Ok(file) => csv::WriterBuilder::new().has_headers(true).from_writer(file),
        Err(why) if why.kind() == ErrorKind::AlreadyExists => {
            let file = OpenOptions::new()
                .append(true)
                .open(file_path)
                .map_err(|why| IOError::CannotWrite(display.clone(), why.to_string()))?;
            // the existing file already carries headers
            csv::WriterBuilder::new().has_headers(false).from_writer(file)
        }
        Err(why) => return Err(IOError::CannotWrite(display, why.to_string())),
    };

    for record in records {
        writer
            .serialize(record)
            .map_err(|why| IOError::CannotSerialize(display.clone(), why.to_string()))?;
    }
    Ok(())
}

pub fn read_from_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<Vec<T>, IOError> {
    let file_path = file_path.as_ref();
    let display: String = file_path.display().to_string();

    let file = OpenOptions::new()
        .read(true)
        .open(file_path)
        .map_err(|why| IOError::CannotRead(display, why.to_string()))?;

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    Ok(reader.deserialize::<T>().filter_map(Result::ok).collect())
}

#[cfg(test)]
mod test {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        input: String,
        makespan: i64,
    }

    #[test]
    fn test_append_writes_headers_once() {
        let path = std::env::temp_dir().join("jobshop_csv_append.csv");
        std::fs::remove_file(&path).ok();

        let first = Record { input: String::from("a"), makespan: 5 };
        let second = Record { input: String::from("b"), makespan: 7 };
        append_to_file(&path, std::slice::from_ref(&first)).unwrap();
        append_to_file(&path, std::slice::from_ref(&second)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);

        let records: Vec<Record> = read_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(records, [first, second]);
    }
}

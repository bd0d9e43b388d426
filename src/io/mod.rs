pub mod features;
pub mod inventory;
pub mod reporting;
pub mod stats;

use crate::error::{PlannerError, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Deserializes every row of a headed CSV stream.
pub fn read_records<T, R>(reader: R) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

/// Opens `path`, mapping a missing file to [`PlannerError::MissingData`].
pub(crate) fn open_required(path: &Path, artifact: &'static str) -> Result<File> {
    if !path.exists() {
        return Err(PlannerError::MissingData {
            artifact,
            path: path.display().to_string(),
        });
    }
    Ok(File::open(path)?)
}

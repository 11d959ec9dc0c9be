//! CSV loading of the rental dataset.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::record::RentalRecord;

/// Reads every row of a headered CSV file into [`RentalRecord`]s.
///
/// Columns not named by [`RentalRecord`] are ignored.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_records(path: &Path) -> Result<Vec<RentalRecord>> {
    let file = File::open(path)?;
    let records = read_records(file)?;
    info!(rows = records.len(), "Dataset loaded");
    Ok(records)
}

/// Deserializes records from any CSV source with a header row.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RentalRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: RentalRecord = result?;
        rows.push(record);
    }

    debug!(rows = rows.len(), "CSV rows deserialized");
    Ok(rows)
}

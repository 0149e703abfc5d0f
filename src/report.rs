use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One row of the run statistics file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub seed: Option<u64>,
    /// Strategy, with the heuristic after a colon for informed ones (`A*:set-level`).
    pub algorithm: String,
    pub problem: String,
    pub millis: u64,
    pub iterations: u64,
    pub max_frontier_size: usize,
    pub plan_length: Option<usize>,
    pub cost: Option<f64>,
}

/// Writes `records` as CSV with a header row.
pub fn write_records<W: io::Write>(writer: W, records: &[RunRecord]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Appends `records` to the CSV file at `path`, creating it with a header row if it does not
/// exist yet or is empty.
pub fn append_records(path: impl AsRef<Path>, records: &[RunRecord]) -> csv::Result<()> {
    let path = path.as_ref();
    let fresh = std::fs::metadata(path).map_or(true, |meta| meta.len() == 0);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(fresh)
        .from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    tracing::debug!(path = %path.display(), rows = records.len(), "appended run records");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seed: Option<u64>, cost: Option<f64>) -> RunRecord {
        RunRecord {
            seed,
            algorithm: "A*:set-level".to_owned(),
            problem: "p1.txt".to_owned(),
            millis: 12,
            iterations: 40,
            max_frontier_size: 9,
            plan_length: cost.map(|c| c as usize),
            cost,
        }
    }

    #[test]
    fn header_then_rows() {
        let mut out = vec![];
        write_records(&mut out, &[record(Some(3), Some(3.0)), record(None, None)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "seed,algorithm,problem,millis,iterations,max_frontier_size,plan_length,cost",
                "3,A*:set-level,p1.txt,12,40,9,3,3.0",
                ",A*:set-level,p1.txt,12,40,9,,",
            ]
        );
    }

    #[test]
    fn appending_writes_header_once() {
        let path = std::env::temp_dir().join(format!("statesearch-report-{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);
        append_records(&path, &[record(Some(1), Some(2.0))]).unwrap();
        append_records(&path, &[record(Some(2), None)]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<RunRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(rows, [record(Some(1), Some(2.0)), record(Some(2), None)]);
    }
}

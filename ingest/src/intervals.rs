use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A labelled time range of interest. Bounds aren't validated here; a reversed interval is kept
/// as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub start_time: i64,
    pub end_time: i64,
    pub event_type: String,
}

/// The first row is a header and is always skipped, whatever it contains.
pub fn load<R: std::io::Read>(reader: R, source: &str) -> Result<Vec<IntervalRecord>> {
    let mut intervals = Vec::new();
    for rec in crate::reader_builder(true, csv::Trim::All).from_reader(reader).records() {
        let rec = rec?;
        if rec.len() != 3 {
            continue;
        }
        match rec.deserialize::<IntervalRecord>(None) {
            Ok(interval) => intervals.push(interval),
            Err(err) => {
                let line = rec.position().map(|pos| pos.line()).unwrap_or(0);
                warn!("Skipping line {line} in {source}: {:?} ({err})", rec);
            }
        }
    }
    Ok(intervals)
}

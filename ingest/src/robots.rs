use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobotRecord {
    pub robot_id: i64,
    pub name: String,
}

/// The file has no header. Rows that don't have exactly two fields are ignored. Names are kept
/// exactly as written; only the ID is trimmed.
pub fn load<R: std::io::Read>(reader: R, source: &str) -> Result<Vec<RobotRecord>> {
    let mut robots = Vec::new();
    for rec in crate::reader_builder(false, csv::Trim::None)
        .from_reader(reader)
        .records()
    {
        let rec = rec?;
        if rec.len() != 2 {
            continue;
        }
        match rec[0].trim().parse::<i64>() {
            Ok(robot_id) => robots.push(RobotRecord {
                robot_id,
                name: rec[1].to_string(),
            }),
            Err(err) => {
                let line = rec.position().map(|pos| pos.line()).unwrap_or(0);
                warn!("Skipping line {line} in {source}: {:?} ({err})", rec);
            }
        }
    }
    Ok(robots)
}

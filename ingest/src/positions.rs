use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One sampled position. The files don't record time explicitly; one row is one time unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PositionRecord {
    pub timestamp: i64,
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize)]
struct Record {
    x: f64,
    y: f64,
}

/// The timestamp of each row is its 1-based line number, so blank or broken lines still consume
/// a timestamp.
pub fn load<R: std::io::Read>(reader: R, source: &str) -> Result<Vec<PositionRecord>> {
    let mut positions = Vec::new();
    for rec in crate::reader_builder(false, csv::Trim::All).from_reader(reader).records() {
        let rec = rec?;
        let line = match rec.position() {
            Some(pos) => pos.line(),
            None => bail!("{source}: record {:?} has no position", rec),
        };
        if rec.len() != 2 {
            continue;
        }
        match rec.deserialize::<Record>(None) {
            Ok(Record { x, y }) => {
                if !x.is_finite() || !y.is_finite() {
                    warn!("Skipping line {line} in {source}: non-finite coordinates {x}, {y}");
                    continue;
                }
                positions.push(PositionRecord {
                    timestamp: line as i64,
                    x,
                    y,
                });
            }
            Err(err) => {
                warn!("Skipping line {line} in {source}: {:?} ({err})", rec);
            }
        }
    }
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_line_numbers() {
        let input = "0.0,0.0\n1.5,2\n\nbad,row\n3,4\n";
        let positions = load(input.as_bytes(), "t1.csv").unwrap();
        let times: Vec<i64> = positions.iter().map(|p| p.timestamp).collect();
        assert_eq!(times, vec![1, 2, 5]);
        assert_eq!(positions[1].x, 1.5);
        assert_eq!(positions[1].y, 2.0);
    }

    #[test]
    fn ignores_wrong_field_count() {
        let input = "1,2,3\n4,5\n";
        let positions = load(input.as_bytes(), "t1.csv").unwrap();
        assert_eq!(
            positions,
            vec![PositionRecord {
                timestamp: 2,
                x: 4.0,
                y: 5.0,
            }]
        );
    }

    #[test]
    fn rejects_non_finite() {
        let input = "NaN,1\ninf,2\n1,1\n";
        let positions = load(input.as_bytes(), "t1.csv").unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].timestamp, 3);
    }
}

use serde::{Deserialize, Serialize};

use crate::{Bounds, Error, Pt2D, Result, Sample, Timestamp, Trajectory};

/// Two robots count as close when both axes differ by strictly less than this.
pub const DEFAULT_CLOSE_THRESHOLD: f64 = 1.0;

/// A maximal run of consecutive timestamps where two robots stayed close, with the bounding box
/// of the first robot over the run. Both ends are inclusive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProximityRegion {
    pub start: Timestamp,
    pub end: Timestamp,
    pub bounds: Bounds,
}

impl ProximityRegion {
    /// The number of timestamps covered
    pub fn duration(&self) -> i64 {
        self.end - self.start + 1
    }
}

/// Regions are ordered by time and never overlap. A timestamp missing from either trajectory
/// breaks a run, even if its neighbors are close.
pub fn find_close_regions(
    a: &Trajectory,
    b: &Trajectory,
    threshold: f64,
) -> Result<Vec<ProximityRegion>> {
    check_threshold(threshold)?;

    let mut regions: Vec<ProximityRegion> = Vec::new();
    for sample in close_samples(a, b, threshold) {
        match regions.last_mut() {
            Some(region) if region.end.checked_add(1) == Some(sample.time) => {
                region.end = sample.time;
                region.bounds.update(sample.pos);
            }
            _ => {
                regions.push(ProximityRegion {
                    start: sample.time,
                    end: sample.time,
                    bounds: Bounds::from_pt(sample.pos),
                });
            }
        }
    }
    Ok(regions)
}

/// How many timestamps the two robots are close at. Always matches the total duration of
/// `find_close_regions`.
pub fn count_close_timestamps(a: &Trajectory, b: &Trajectory, threshold: f64) -> Result<usize> {
    check_threshold(threshold)?;
    Ok(close_samples(a, b, threshold).len())
}

pub(crate) fn check_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "Proximity threshold must be finite and non-negative, not {threshold}"
        )));
    }
    Ok(())
}

// Samples of `a` at timestamps where `b` also has a sample and the two are close. Both
// trajectories are sorted by time, so walk them together.
fn close_samples<'a>(a: &'a Trajectory, b: &Trajectory, threshold: f64) -> Vec<&'a Sample> {
    let mut hits = Vec::new();
    let mut other = b.samples().iter().peekable();
    for sample in a.samples() {
        while other.next_if(|s| s.time < sample.time).is_some() {}
        match other.peek() {
            Some(s) if s.time == sample.time => {
                if is_close(sample.pos, s.pos, threshold) {
                    hits.push(sample);
                }
            }
            Some(_) => {}
            None => break,
        }
    }
    hits
}

// Per-axis, not Euclidean
fn is_close(pt1: Pt2D, pt2: Pt2D, threshold: f64) -> bool {
    (pt1.x - pt2.x).abs() < threshold && (pt1.y - pt2.y).abs() < threshold
}

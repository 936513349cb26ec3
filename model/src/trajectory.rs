use serde::{Deserialize, Serialize};

use crate::{Bounds, Error, Pt2D, Result, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: Timestamp,
    pub pos: Pt2D,
}

impl Sample {
    pub fn new(time: Timestamp, x: f64, y: f64) -> Self {
        Self {
            time,
            pos: Pt2D::new(x, y),
        }
    }
}

/// The samples of one robot. Time strictly increases.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    inner: Vec<Sample>,
}

impl Trajectory {
    pub fn new(raw: Vec<Sample>) -> Result<Self> {
        for pair in raw.windows(2) {
            if pair[0].time >= pair[1].time {
                return Err(Error::InvalidArgument(format!(
                    "Trajectory input out-of-order or duplicated: {} then {}",
                    pair[0].time, pair[1].time
                )));
            }
        }
        if let Some(sample) = raw.iter().find(|s| !s.pos.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "Trajectory has a non-finite position at {}",
                sample.time
            )));
        }
        Ok(Self { inner: raw })
    }

    /// Sorts the input, then keeps the first sample for each timestamp and drops anything
    /// non-finite. Returns whatever got dropped.
    pub fn from_unsorted(mut raw: Vec<Sample>) -> (Self, Vec<Sample>) {
        raw.sort_by_key(|s| s.time);
        let mut inner: Vec<Sample> = Vec::with_capacity(raw.len());
        let mut dropped = Vec::new();
        for sample in raw {
            let duplicate = inner.last().map(|last| last.time == sample.time).unwrap_or(false);
            if duplicate || !sample.pos.is_finite() {
                dropped.push(sample);
            } else {
                inner.push(sample);
            }
        }
        (Self { inner }, dropped)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.inner
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// All samples with `start <= time <= end`, in order. Empty if `start > end`.
    pub fn between(&self, start: Timestamp, end: Timestamp) -> &[Sample] {
        let first = self.inner.partition_point(|s| s.time < start);
        let last = self.inner.partition_point(|s| s.time <= end);
        if first >= last {
            return &[];
        }
        &self.inner[first..last]
    }

    /// None for an empty trajectory
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_pts(self.inner.iter().map(|s| s.pos))
    }
}

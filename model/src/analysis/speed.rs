use serde::{Deserialize, Serialize};

use crate::{Error, Result, TimeWindow, Trajectory};

/// Below this average speed (distance units per time unit), a robot counts as slow.
pub const DEFAULT_SLOW_THRESHOLD: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpeedEstimate {
    /// Fewer than two samples in the window. This is not the same as standing still.
    Undefined,
    /// Path length walked over the window, and the time it took
    Defined { distance: f64, elapsed: i64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slowness {
    Slower,
    NotSlower,
    Undefined,
}

impl SpeedEstimate {
    pub fn speed(&self) -> Option<f64> {
        match self {
            SpeedEstimate::Undefined => None,
            SpeedEstimate::Defined { distance, elapsed } => Some(*distance / *elapsed as f64),
        }
    }

    /// Strictly slower than the threshold
    pub fn classify(&self, threshold: f64) -> Slowness {
        match self.speed() {
            None => Slowness::Undefined,
            Some(speed) if speed < threshold => Slowness::Slower,
            Some(_) => Slowness::NotSlower,
        }
    }
}

/// Sums the straight-line distance between consecutive samples inside the window, then divides
/// by the time between them. Gaps in sampling are fine; elapsed time comes from the timestamps.
pub fn average_speed(trajectory: &Trajectory, window: &TimeWindow) -> Result<SpeedEstimate> {
    window.validate()?;

    let mut distance = 0.0;
    let mut elapsed: i64 = 0;
    for pair in trajectory
        .between(window.start_time, window.end_time)
        .windows(2)
    {
        distance += pair[0].pos.dist_to(pair[1].pos);
        elapsed = pair[1]
            .time
            .checked_sub(pair[0].time)
            .and_then(|dt| elapsed.checked_add(dt))
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "Elapsed time in window {} doesn't fit in a timestamp",
                    window.id.0
                ))
            })?;
    }

    if elapsed > 0 {
        Ok(SpeedEstimate::Defined { distance, elapsed })
    } else {
        Ok(SpeedEstimate::Undefined)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{Sample, Timestamp, WindowID};

    fn window(start_time: Timestamp, end_time: Timestamp) -> TimeWindow {
        TimeWindow {
            id: WindowID(1),
            start_time,
            end_time,
            event_type: "test".to_string(),
        }
    }

    fn trajectory(samples: &[(Timestamp, f64, f64)]) -> Trajectory {
        Trajectory::new(
            samples
                .iter()
                .map(|(t, x, y)| Sample::new(*t, *x, *y))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn sums_consecutive_steps() {
        let t = trajectory(&[(10, 0.0, 0.0), (11, 3.0, 4.0), (12, 3.0, 4.0)]);
        let estimate = average_speed(&t, &window(10, 12)).unwrap();
        assert_eq!(
            estimate,
            SpeedEstimate::Defined {
                distance: 5.0,
                elapsed: 2,
            }
        );
        assert_eq!(estimate.speed(), Some(2.5));
        assert_eq!(estimate.classify(DEFAULT_SLOW_THRESHOLD), Slowness::NotSlower);
    }

    #[test]
    fn only_samples_inside_window() {
        let t = trajectory(&[(9, 100.0, 100.0), (10, 0.0, 0.0), (11, 3.0, 4.0), (13, 0.0, 0.0)]);
        let estimate = average_speed(&t, &window(10, 12)).unwrap();
        assert_eq!(estimate.speed(), Some(5.0));
    }

    #[test]
    fn uneven_sampling() {
        let t = trajectory(&[(0, 0.0, 0.0), (4, 0.0, 2.0), (5, 0.0, 3.0)]);
        let estimate = average_speed(&t, &window(0, 5)).unwrap();
        assert_eq!(
            estimate,
            SpeedEstimate::Defined {
                distance: 3.0,
                elapsed: 5,
            }
        );
        assert_eq!(estimate.speed(), Some(0.6));
    }

    #[test]
    fn undefined_is_not_zero() {
        let t = trajectory(&[(10, 1.0, 1.0), (20, 1.0, 1.0), (21, 1.0, 1.0)]);

        let one_sample = average_speed(&t, &window(5, 15)).unwrap();
        assert_eq!(one_sample, SpeedEstimate::Undefined);
        assert_eq!(one_sample.speed(), None);
        assert_eq!(one_sample.classify(DEFAULT_SLOW_THRESHOLD), Slowness::Undefined);

        let no_samples = average_speed(&t, &window(11, 19)).unwrap();
        assert_eq!(no_samples, SpeedEstimate::Undefined);

        // Standing still is a real zero
        let still = average_speed(&t, &window(20, 21)).unwrap();
        assert_eq!(still.speed(), Some(0.0));
        assert_eq!(still.classify(DEFAULT_SLOW_THRESHOLD), Slowness::Slower);
    }

    #[test]
    fn classification_is_strict() {
        let t = trajectory(&[(0, 0.0, 0.0), (5, 1.0, 0.0)]);
        let estimate = average_speed(&t, &window(0, 5)).unwrap();
        assert_eq!(estimate.speed(), Some(0.2));
        assert_eq!(estimate.classify(0.2), Slowness::NotSlower);
        assert_eq!(estimate.classify(0.21), Slowness::Slower);
    }

    #[test]
    fn reversed_window() {
        let t = trajectory(&[(0, 0.0, 0.0), (1, 1.0, 0.0)]);
        assert_matches!(
            average_speed(&t, &window(1, 0)),
            Err(Error::InvalidArgument(_))
        );
        // A single-point window is fine
        assert_eq!(
            average_speed(&t, &window(1, 1)).unwrap(),
            SpeedEstimate::Undefined
        );
    }

    #[test]
    fn extreme_timestamps() {
        let t = trajectory(&[(i64::MIN, 0.0, 0.0), (i64::MAX, 1.0, 0.0)]);
        assert_matches!(
            average_speed(&t, &window(i64::MIN, i64::MAX)),
            Err(Error::InvalidArgument(_))
        );

        let t = trajectory(&[(i64::MAX - 2, 0.0, 0.0), (i64::MAX, 1.0, 0.0)]);
        assert_eq!(
            average_speed(&t, &window(i64::MAX - 2, i64::MAX)).unwrap(),
            SpeedEstimate::Defined {
                distance: 1.0,
                elapsed: 2,
            }
        );
    }
}

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::proximity::check_threshold;
use crate::{
    average_speed, count_close_timestamps, find_close_regions, Error, ProximityRegion, Result,
    RobotID, RobotName, Slowness, SpeedEstimate, TimeWindow, Timestamp, Trajectory,
    TrajectoryStore, WindowID,
};

/// Close regions between two robots, looked up by ID. Comparing a robot with itself finds
/// nothing.
pub fn close_regions(
    store: &dyn TrajectoryStore,
    a: RobotID,
    b: RobotID,
    threshold: f64,
) -> Result<Vec<ProximityRegion>> {
    let (traj_a, traj_b) = pair(store, a, b)?;
    if a == b {
        check_threshold(threshold)?;
        debug!("Not comparing {a} with itself");
        return Ok(Vec::new());
    }
    find_close_regions(&traj_a, &traj_b, threshold)
}

/// The number of timestamps two robots are close at, looked up by ID
pub fn close_duration(
    store: &dyn TrajectoryStore,
    a: RobotID,
    b: RobotID,
    threshold: f64,
) -> Result<usize> {
    let (traj_a, traj_b) = pair(store, a, b)?;
    if a == b {
        check_threshold(threshold)?;
        return Ok(0);
    }
    count_close_timestamps(&traj_a, &traj_b, threshold)
}

pub fn speed_for(
    store: &dyn TrajectoryStore,
    robot: RobotID,
    window: &TimeWindow,
) -> Result<SpeedEstimate> {
    let trajectory = store.trajectory(robot)?;
    average_speed(&trajectory, window)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedRow {
    pub window: WindowID,
    pub event_type: String,
    pub robot: RobotName,
    pub estimate: SpeedEstimate,
    pub slowness: Slowness,
}

/// The average speed of every robot in every window. Windows come in ID order, then robots in
/// ID order within each window. Windows with reversed bounds are skipped with a warning.
pub fn speed_report(store: &dyn TrajectoryStore, slow_threshold: f64) -> Result<Vec<SpeedRow>> {
    if !slow_threshold.is_finite() {
        return Err(Error::InvalidArgument(format!(
            "Slowness threshold must be finite, not {slow_threshold}"
        )));
    }

    let robots = store.list_robots()?;
    let mut trajectories: Vec<Cow<Trajectory>> = Vec::new();
    for robot in &robots {
        trajectories.push(store.trajectory(robot.id)?);
    }

    // Different windows may cover the same time range
    let mut cache: BTreeMap<(RobotID, Timestamp, Timestamp), SpeedEstimate> = BTreeMap::new();
    let mut rows = Vec::new();
    for window in store.list_windows()? {
        if let Err(err) = window.validate() {
            warn!("Skipping window: {err}");
            continue;
        }
        for (robot, trajectory) in robots.iter().zip(trajectories.iter()) {
            let key = (robot.id, window.start_time, window.end_time);
            let estimate = match cache.get(&key) {
                Some(estimate) => *estimate,
                None => {
                    let estimate = average_speed(trajectory, &window)?;
                    cache.insert(key, estimate);
                    estimate
                }
            };
            rows.push(SpeedRow {
                window: window.id,
                event_type: window.event_type.clone(),
                robot: robot.name.clone(),
                estimate,
                slowness: estimate.classify(slow_threshold),
            });
        }
    }
    Ok(rows)
}

fn pair<'a>(
    store: &'a dyn TrajectoryStore,
    a: RobotID,
    b: RobotID,
) -> Result<(Cow<'a, Trajectory>, Cow<'a, Trajectory>)> {
    Ok((store.trajectory(a)?, store.trajectory(b)?))
}

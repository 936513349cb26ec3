#[macro_use]
extern crate log;

mod analysis;
mod db;
mod error;
mod geom;
mod store;
mod trajectory;
mod window;

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use ingest::{Dataset, ImportConfig};

pub use self::analysis::{
    average_speed, close_duration, close_regions, count_close_timestamps, find_close_regions,
    robot_extents, speed_for, speed_report, ProximityRegion, RobotExtent, Slowness,
    SpeedEstimate, SpeedRow, DEFAULT_CLOSE_THRESHOLD, DEFAULT_SLOW_THRESHOLD,
};
pub use self::db::{Database, ImportSummary};
pub use self::error::{Error, Result};
pub use self::geom::{Bounds, Pt2D};
pub use self::store::TrajectoryStore;
pub use self::trajectory::{Sample, Trajectory};
pub use self::window::{TimeWindow, WindowID};

/// Whole time units. The input has one sample per unit.
pub type Timestamp = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RobotID(pub i64);

impl fmt::Display for RobotID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "robot #{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RobotName(pub String);

impl fmt::Display for RobotName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub id: RobotID,
    pub name: RobotName,
}

/// Everything held in memory. Built with the same uniqueness rules as the SQLite store.
pub struct Model {
    // Ordered by ID
    pub robots: Vec<Robot>,
    // Every robot has an entry, maybe empty
    pub trajectories: BTreeMap<RobotID, Trajectory>,
    // Ordered by ID
    pub windows: Vec<TimeWindow>,
}

impl Model {
    pub fn import(config: &ImportConfig) -> anyhow::Result<Self> {
        let dataset = Dataset::load(config)?;
        Ok(Self::from_dataset(&dataset))
    }

    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut robots: BTreeMap<RobotID, Robot> = BTreeMap::new();
        let mut names = BTreeSet::new();
        for rec in &dataset.robots {
            let id = RobotID(rec.robot_id);
            if robots.contains_key(&id) || names.contains(&rec.name) {
                warn!("Skipping duplicate robot ID or name: {} {}", rec.robot_id, rec.name);
                continue;
            }
            names.insert(rec.name.clone());
            robots.insert(
                id,
                Robot {
                    id,
                    name: RobotName(rec.name.clone()),
                },
            );
        }

        let mut trajectories: BTreeMap<RobotID, Trajectory> = robots
            .keys()
            .map(|id| (*id, Trajectory::default()))
            .collect();
        for (robot_id, positions) in &dataset.trajectories {
            let id = RobotID(*robot_id);
            if !robots.contains_key(&id) {
                warn!(
                    "Skipping {} positions for unknown {id}",
                    positions.len()
                );
                continue;
            }
            let raw = positions
                .iter()
                .map(|p| Sample::new(p.timestamp, p.x, p.y))
                .collect();
            let (trajectory, dropped) = Trajectory::from_unsorted(raw);
            for sample in dropped {
                warn!(
                    "Skipping duplicate or invalid position for {id} at timestamp {}",
                    sample.time
                );
            }
            trajectories.insert(id, trajectory);
        }

        let windows = dataset
            .intervals
            .iter()
            .enumerate()
            .map(|(idx, rec)| TimeWindow {
                id: WindowID(idx as i64 + 1),
                start_time: rec.start_time,
                end_time: rec.end_time,
                event_type: rec.event_type.clone(),
            })
            .collect();

        let model = Self {
            robots: robots.into_values().collect(),
            trajectories,
            windows,
        };
        info!(
            "Model has {} robots, {} samples, {} windows",
            model.robots.len(),
            model.trajectories.values().map(|t| t.len()).sum::<usize>(),
            model.windows.len()
        );
        model
    }
}

impl TrajectoryStore for Model {
    fn list_robots(&self) -> Result<Vec<Robot>> {
        Ok(self.robots.clone())
    }

    fn trajectory(&self, id: RobotID) -> Result<Cow<'_, Trajectory>> {
        match self.trajectories.get(&id) {
            Some(trajectory) => Ok(Cow::Borrowed(trajectory)),
            None => Err(Error::NotFound {
                entity: "robot",
                id: id.0.to_string(),
            }),
        }
    }

    fn list_windows(&self) -> Result<Vec<TimeWindow>> {
        Ok(self.windows.clone())
    }
}

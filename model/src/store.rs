use std::borrow::Cow;

use crate::{Error, Result, Robot, RobotID, TimeWindow, Trajectory};

/// Read access to loaded data. Everything here is read-only once the data is imported, so
/// analyses can call these in any order.
pub trait TrajectoryStore {
    /// Ordered by ID
    fn list_robots(&self) -> Result<Vec<Robot>>;

    /// Fails with `NotFound` for an unknown robot. A known robot without samples has an empty
    /// trajectory.
    fn trajectory(&self, id: RobotID) -> Result<Cow<'_, Trajectory>>;

    /// Ordered by ID
    fn list_windows(&self) -> Result<Vec<TimeWindow>>;

    fn robot_by_name(&self, name: &str) -> Result<Robot> {
        self.list_robots()?
            .into_iter()
            .find(|r| r.name.0 == name)
            .ok_or_else(|| Error::NotFound {
                entity: "robot",
                id: name.to_string(),
            })
    }
}

use serde::{Deserialize, Serialize};

use crate::{Bounds, Result, RobotName, TrajectoryStore};

/// The furthest a robot reached along each axis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobotExtent {
    pub name: RobotName,
    pub bounds: Bounds,
}

/// Ordered by robot name. Robots with no samples are left out.
pub fn robot_extents(store: &dyn TrajectoryStore) -> Result<Vec<RobotExtent>> {
    let mut extents = Vec::new();
    for robot in store.list_robots()? {
        if let Some(bounds) = store.trajectory(robot.id)?.bounds() {
            extents.push(RobotExtent {
                name: robot.name,
                bounds,
            });
        }
    }
    extents.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(extents)
}

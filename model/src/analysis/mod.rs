// Queries over loaded trajectories. Everything in here is a pure read.

mod extents;
mod proximity;
mod report;
mod speed;

pub use extents::{robot_extents, RobotExtent};
pub use proximity::{
    count_close_timestamps, find_close_regions, ProximityRegion, DEFAULT_CLOSE_THRESHOLD,
};
pub use report::{close_duration, close_regions, speed_for, speed_report, SpeedRow};
pub use speed::{average_speed, Slowness, SpeedEstimate, DEFAULT_SLOW_THRESHOLD};

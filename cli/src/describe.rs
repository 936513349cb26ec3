use model::{ProximityRegion, RobotExtent, Slowness, SpeedRow};

use crate::table::Table;

pub fn extents(extents: &[RobotExtent]) -> Table {
    let mut table = Table::new(&[
        "robot_name",
        "min_x_reached",
        "max_x_reached",
        "min_y_reached",
        "max_y_reached",
    ]);
    for extent in extents {
        table.push(vec![
            extent.name.to_string(),
            extent.bounds.min_x.to_string(),
            extent.bounds.max_x.to_string(),
            extent.bounds.min_y.to_string(),
            extent.bounds.max_y.to_string(),
        ]);
    }
    table
}

pub fn close_regions(regions: &[ProximityRegion]) -> Table {
    let mut table = Table::new(&[
        "region_start_time",
        "region_end_time",
        "region_x_min",
        "region_x_max",
        "region_y_min",
        "region_y_max",
    ]);
    for region in regions {
        table.push(vec![
            region.start.to_string(),
            region.end.to_string(),
            region.bounds.min_x.to_string(),
            region.bounds.max_x.to_string(),
            region.bounds.min_y.to_string(),
            region.bounds.max_y.to_string(),
        ]);
    }
    table
}

pub fn speeds(rows: &[SpeedRow], slow_threshold: f64) -> Table {
    let slower_header = format!("Is Slower (<{slow_threshold})?");
    let mut table = Table::new(&[
        "Interval ID",
        "Event Type",
        "Robot Name",
        "Avg Speed",
        slower_header.as_str(),
    ]);
    for row in rows {
        table.push(vec![
            row.window.0.to_string(),
            row.event_type.clone(),
            row.robot.to_string(),
            match row.estimate.speed() {
                Some(speed) => format!("{speed:.4}"),
                None => "N/A (no movement/data)".to_string(),
            },
            match row.slowness {
                Slowness::Slower => "Yes",
                Slowness::NotSlower => "No",
                Slowness::Undefined => "N/A",
            }
            .to_string(),
        ]);
    }
    table
}

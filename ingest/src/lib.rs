#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod config;
mod intervals;
mod positions;
mod robots;

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Result;

pub use config::ImportConfig;
pub use intervals::IntervalRecord;
pub use positions::PositionRecord;
pub use robots::RobotRecord;

/// Everything read from one data directory, before any uniqueness rules are applied. Rows that
/// couldn't be parsed are already dropped.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub robots: Vec<RobotRecord>,
    // Keyed by the robot ID implied by the file name. Sorted by timestamp.
    pub trajectories: BTreeMap<i64, Vec<PositionRecord>>,
    // In file order
    pub intervals: Vec<IntervalRecord>,
}

impl Dataset {
    /// Fails only if the data directory itself is missing. A file that's absent or unreadable is
    /// logged and skipped.
    pub fn load(config: &ImportConfig) -> Result<Self> {
        if !config.data_dir.is_dir() {
            bail!("Data directory {} doesn't exist", config.data_dir.display());
        }
        let mut dataset = Self::default();

        let path = config.robots_path();
        if let Some(robots) = load_file(&path, |contents, source| robots::load(contents, source)) {
            info!("Read {} robots from {}", robots.len(), path.display());
            dataset.robots = robots;
        }

        for robot_id in 1..=config.trajectory_files {
            let path = config.trajectory_path(robot_id);
            if let Some(positions) =
                load_file(&path, |contents, source| positions::load(contents, source))
            {
                info!("Read {} positions from {}", positions.len(), path.display());
                dataset.trajectories.insert(robot_id as i64, positions);
            }
        }

        let path = config.intervals_path();
        if let Some(intervals) =
            load_file(&path, |contents, source| intervals::load(contents, source))
        {
            info!(
                "Read {} target intervals from {}",
                intervals.len(),
                path.display()
            );
            dataset.intervals = intervals;
        }

        Ok(dataset)
    }

    pub fn num_positions(&self) -> usize {
        self.trajectories.values().map(|list| list.len()).sum()
    }
}

// One broken file shouldn't stop the rest of the directory from loading. Also strips a leading
// UTF-8 BOM.
fn load_file<T, F: Fn(&[u8], &str) -> Result<Vec<T>>>(path: &Path, load: F) -> Option<Vec<T>> {
    let contents = match fs_err::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            error!("{} not found, skipping it", path.display());
            return None;
        }
        Err(err) => {
            error!("Skipping {}: {err}", path.display());
            return None;
        }
    };
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);
    match load(contents.as_bytes(), &path.display().to_string()) {
        Ok(list) => Some(list),
        Err(err) => {
            error!("Skipping {}: {err}", path.display());
            None
        }
    }
}

fn reader_builder(has_headers: bool, trim: csv::Trim) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    // Rows with the wrong number of fields are filtered by each loader, not rejected by csv
    builder.has_headers(has_headers).flexible(true).trim(trim);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs_err::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "robot.csv", "\u{feff}1,Astro\n2,IamHuman\n");
        write(dir.path(), "t1.csv", "0,0\n1,1\n");
        write(dir.path(), "t2.csv", "5,5\n");
        write(
            dir.path(),
            "target_interval.csv",
            "start_time,end_time,event_type\n1,2,meeting\n",
        );

        let mut config = ImportConfig::new(dir.path());
        config.trajectory_files = 3;
        let dataset = Dataset::load(&config).unwrap();

        assert_eq!(dataset.robots.len(), 2);
        assert_eq!(dataset.robots[0].robot_id, 1);
        assert_eq!(dataset.robots[0].name, "Astro");
        // t3.csv is missing
        assert_eq!(dataset.trajectories.len(), 2);
        assert_eq!(dataset.num_positions(), 3);
        assert_eq!(dataset.intervals.len(), 1);
    }

    #[test]
    fn unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "robot.csv", "1,Astro\n2,IamHuman\n");
        write(dir.path(), "t1.csv", "0,0\n1,1\n");
        fs_err::write(dir.path().join("t2.csv"), b"\xff\xfe,1\n").unwrap();
        write(dir.path(), "t3.csv", "5,5\n");

        let mut config = ImportConfig::new(dir.path());
        config.trajectory_files = 3;
        let dataset = Dataset::load(&config).unwrap();

        assert_eq!(dataset.robots.len(), 2);
        let ids: Vec<i64> = dataset.trajectories.keys().copied().collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(dataset.num_positions(), 3);
    }

    #[test]
    fn missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Dataset::load(&ImportConfig::new(dir.path().join("nope"))).is_err());
    }

    #[test]
    fn empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset::load(&ImportConfig::new(dir.path())).unwrap();
        assert!(dataset.robots.is_empty());
        assert!(dataset.trajectories.is_empty());
        assert!(dataset.intervals.is_empty());
    }
}

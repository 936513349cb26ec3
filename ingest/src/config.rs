use std::path::PathBuf;

/// Where to find the input files. The defaults match the layout the data is distributed in.
#[derive(Clone, Debug)]
pub struct ImportConfig {
    pub data_dir: PathBuf,
    pub robots_file: String,
    /// Trajectories are read from `t1.csv` through `t{N}.csv`
    pub trajectory_files: usize,
    pub intervals_file: String,
}

impl ImportConfig {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn robots_path(&self) -> PathBuf {
        self.data_dir.join(&self.robots_file)
    }

    /// The file for one robot. The robot ID is implied by the file name.
    pub fn trajectory_path(&self, robot_id: usize) -> PathBuf {
        self.data_dir.join(format!("t{robot_id}.csv"))
    }

    pub fn intervals_path(&self) -> PathBuf {
        self.data_dir.join(&self.intervals_file)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            robots_file: "robot.csv".to_string(),
            trajectory_files: 5,
            intervals_file: "target_interval.csv".to_string(),
        }
    }
}

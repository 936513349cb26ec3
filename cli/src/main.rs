#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod describe;
mod table;

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use structopt::StructOpt;

use ingest::{Dataset, ImportConfig};
use model::{
    close_duration, close_regions, robot_extents, speed_report, Database, Model,
    ProximityRegion, RobotExtent, SpeedRow, TrajectoryStore,
};

#[derive(StructOpt)]
#[structopt(name = "robot-analytics", about = "Questions about where robots went")]
enum Args {
    /// Read the CSV files into a fresh SQLite database, replacing any existing one
    Import {
        #[structopt(flatten)]
        input: InputArgs,
        /// Where to write the database
        #[structopt(long, default_value = "robot.db")]
        db: PathBuf,
    },
    /// The furthest each robot reached along each axis
    Extents {
        #[structopt(flatten)]
        source: SourceArgs,
        #[structopt(long)]
        json: bool,
    },
    /// When two robots were close to each other, and for how long
    Close {
        #[structopt(flatten)]
        source: SourceArgs,
        #[structopt(flatten)]
        pair: PairArgs,
        #[structopt(long)]
        json: bool,
    },
    /// The average speed of every robot in every target interval
    Speeds {
        #[structopt(flatten)]
        source: SourceArgs,
        /// Robots slower than this are flagged
        #[structopt(long, default_value = "0.2")]
        slow_threshold: f64,
        #[structopt(long)]
        json: bool,
    },
    /// All of the above
    Report {
        #[structopt(flatten)]
        source: SourceArgs,
        #[structopt(flatten)]
        pair: PairArgs,
        #[structopt(long, default_value = "0.2")]
        slow_threshold: f64,
        #[structopt(long)]
        json: bool,
    },
}

#[derive(StructOpt)]
struct InputArgs {
    /// The directory with robot.csv, t1.csv ... tN.csv and target_interval.csv
    #[structopt(long, default_value = ".")]
    data_dir: PathBuf,
    /// How many trajectory files to read
    #[structopt(long, default_value = "5")]
    trajectory_files: usize,
}

impl InputArgs {
    fn config(&self) -> ImportConfig {
        let mut config = ImportConfig::new(&self.data_dir);
        config.trajectory_files = self.trajectory_files;
        config
    }
}

#[derive(StructOpt)]
struct SourceArgs {
    /// A database built by the import command
    #[structopt(long, default_value = "robot.db")]
    db: PathBuf,
    /// Instead of the database, read CSV files from this directory into memory
    #[structopt(long)]
    data_dir: Option<PathBuf>,
    /// How many trajectory files to read, with --data-dir
    #[structopt(long, default_value = "5")]
    trajectory_files: usize,
}

impl SourceArgs {
    fn open(&self) -> Result<Box<dyn TrajectoryStore>> {
        if let Some(ref data_dir) = self.data_dir {
            let mut config = ImportConfig::new(data_dir);
            config.trajectory_files = self.trajectory_files;
            info!("Reading CSV files from {} into memory", data_dir.display());
            return Ok(Box::new(Model::import(&config)?));
        }
        match Database::open(&self.db) {
            Ok(db) => {
                info!("Reading from {}", self.db.display());
                Ok(Box::new(db))
            }
            Err(model::Error::NotFound { .. }) => bail!(
                "Database {} not found. Run the import command first to create it.",
                self.db.display()
            ),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(StructOpt)]
struct PairArgs {
    /// The robot whose movement is reported in each region
    #[structopt(long, default_value = "Astro")]
    first: String,
    #[structopt(long, default_value = "IamHuman")]
    second: String,
    /// Close means both x and y differ by less than this
    #[structopt(long, default_value = "1")]
    threshold: f64,
}

#[derive(Serialize)]
struct CloseReport {
    first: String,
    second: String,
    threshold: f64,
    regions: Vec<ProximityRegion>,
    close_duration: usize,
}

impl CloseReport {
    fn new(store: &dyn TrajectoryStore, pair: &PairArgs) -> Result<Self> {
        let first = store.robot_by_name(&pair.first)?;
        let second = store.robot_by_name(&pair.second)?;
        Ok(Self {
            first: pair.first.clone(),
            second: pair.second.clone(),
            threshold: pair.threshold,
            regions: close_regions(store, first.id, second.id, pair.threshold)?,
            close_duration: close_duration(store, first.id, second.id, pair.threshold)?,
        })
    }

    fn print(&self) {
        println!("--- Regions where {} and {} are close ---", self.first, self.second);
        print!("{}", describe::close_regions(&self.regions).render());
        println!(
            "\n--- Duration {} and {} are close: {} ---",
            self.first, self.second, self.close_duration
        );
    }
}

#[derive(Serialize)]
struct FullReport {
    extents: Vec<RobotExtent>,
    close: CloseReport,
    speeds: Vec<SpeedRow>,
}

fn main() -> Result<()> {
    setup_logger();

    match Args::from_args() {
        Args::Import { input, db } => {
            let dataset = Dataset::load(&input.config())?;
            info!(
                "Read {} robots, {} positions and {} target intervals",
                dataset.robots.len(),
                dataset.num_positions(),
                dataset.intervals.len()
            );
            let mut database = Database::create(&db)?;
            let summary = database.import(&dataset)?;
            println!(
                "Database {} created with {} robots, {} samples and {} target intervals",
                db.display(),
                summary.robots,
                summary.samples,
                summary.windows
            );
        }
        Args::Extents { source, json } => {
            let store = source.open()?;
            let extents = robot_extents(store.as_ref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&extents)?);
            } else {
                print_extents(&extents);
            }
        }
        Args::Close { source, pair, json } => {
            let store = source.open()?;
            let report = CloseReport::new(store.as_ref(), &pair)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }
        }
        Args::Speeds {
            source,
            slow_threshold,
            json,
        } => {
            let store = source.open()?;
            let rows = speed_report(store.as_ref(), slow_threshold)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_speeds(&rows, slow_threshold);
            }
        }
        Args::Report {
            source,
            pair,
            slow_threshold,
            json,
        } => {
            let store = source.open()?;
            let report = FullReport {
                extents: robot_extents(store.as_ref())?,
                close: CloseReport::new(store.as_ref(), &pair)?,
                speeds: speed_report(store.as_ref(), slow_threshold)?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_extents(&report.extents);
                println!();
                report.close.print();
                println!();
                print_speeds(&report.speeds, slow_threshold);
            }
        }
    }
    Ok(())
}

fn print_extents(extents: &[RobotExtent]) {
    println!("--- Robot names with maximal and minimal X and Y ---");
    print!("{}", describe::extents(extents).render());
}

fn print_speeds(rows: &[SpeedRow], slow_threshold: f64) {
    println!("--- Average robot moving speed per target interval ---");
    print!("{}", describe::speeds(rows, slow_threshold).render());
}

fn setup_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

use std::borrow::Cow;
use std::path::Path;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Transaction};

use ingest::Dataset;

use crate::{
    Error, Result, Robot, RobotID, RobotName, Sample, TimeWindow, Trajectory, TrajectoryStore,
    WindowID,
};

/// The relational store. Uniqueness of robot IDs, robot names and (robot, timestamp) pairs is
/// enforced by the schema.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

/// How many rows made it in, and how many were rejected by constraints
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportSummary {
    pub robots: usize,
    pub samples: usize,
    pub windows: usize,
    pub skipped: usize,
}

impl Database {
    /// Starts from scratch, removing any existing file at this path.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            fs_err::remove_file(path)?;
            info!("Removed existing database {}", path.display());
        }
        Self::init(Connection::open(path)?)
    }

    /// Opens a database that was already imported. Any other SQLite file is rejected untouched.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound {
                entity: "database",
                id: path.display().to_string(),
            });
        }
        let conn = Connection::open(path)?;
        let tables: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('Robots', \
             'Trajectories', 'TargetIntervals')",
            [],
            |row| row.get(0),
        )?;
        if tables != 3 {
            return Err(Error::InvalidArgument(format!(
                "{} isn't a robot database; run the import first",
                path.display()
            )));
        }
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS Robots (
                robot_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS Trajectories (
                trajectory_id INTEGER PRIMARY KEY AUTOINCREMENT,
                robot_id INTEGER NOT NULL,
                timestamp INTEGER NOT NULL,
                x_coord REAL NOT NULL,
                y_coord REAL NOT NULL,
                FOREIGN KEY (robot_id) REFERENCES Robots (robot_id),
                UNIQUE (robot_id, timestamp)
            );

            CREATE TABLE IF NOT EXISTS TargetIntervals (
                interval_id INTEGER PRIMARY KEY AUTOINCREMENT,
                start_time INTEGER NOT NULL,
                end_time INTEGER NOT NULL,
                event_type TEXT
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    /// Inserts everything from the dataset. Rows violating a constraint are skipped with a
    /// warning; anything else aborts the import.
    pub fn import(&mut self, dataset: &Dataset) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        let tx = self.conn.transaction()?;

        for rec in &dataset.robots {
            let inserted = insert_or_skip(
                &tx,
                "INSERT INTO Robots (robot_id, name) VALUES (?1, ?2)",
                params![rec.robot_id, rec.name],
                || format!("duplicate robot ID or name: {} {}", rec.robot_id, rec.name),
            )?;
            count(inserted, &mut summary.robots, &mut summary.skipped);
        }

        for (robot_id, positions) in &dataset.trajectories {
            for pos in positions {
                let inserted = insert_or_skip(
                    &tx,
                    "INSERT INTO Trajectories (robot_id, timestamp, x_coord, y_coord) VALUES (?1, \
                     ?2, ?3, ?4)",
                    params![robot_id, pos.timestamp, pos.x, pos.y],
                    || {
                        format!(
                            "position for robot {robot_id} at timestamp {} (duplicate or unknown \
                             robot)",
                            pos.timestamp
                        )
                    },
                )?;
                count(inserted, &mut summary.samples, &mut summary.skipped);
            }
        }

        for rec in &dataset.intervals {
            tx.execute(
                "INSERT INTO TargetIntervals (start_time, end_time, event_type) VALUES (?1, ?2, \
                 ?3)",
                params![rec.start_time, rec.end_time, rec.event_type],
            )?;
            summary.windows += 1;
        }

        tx.commit()?;
        info!(
            "Imported {} robots, {} samples, {} windows ({} rows skipped)",
            summary.robots, summary.samples, summary.windows, summary.skipped
        );
        Ok(summary)
    }
}

fn insert_or_skip<P: rusqlite::Params, F: Fn() -> String>(
    tx: &Transaction,
    sql: &str,
    params: P,
    describe: F,
) -> Result<bool> {
    match tx.execute(sql, params) {
        Ok(_) => Ok(true),
        Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
            warn!("Skipping {}", describe());
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

fn count(inserted: bool, ok: &mut usize, skipped: &mut usize) {
    if inserted {
        *ok += 1;
    } else {
        *skipped += 1;
    }
}

impl TrajectoryStore for Database {
    fn list_robots(&self) -> Result<Vec<Robot>> {
        let mut stmt = self
            .conn
            .prepare("SELECT robot_id, name FROM Robots ORDER BY robot_id")?;
        let robots = stmt
            .query_map([], |row| {
                Ok(Robot {
                    id: RobotID(row.get(0)?),
                    name: RobotName(row.get(1)?),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(robots)
    }

    fn trajectory(&self, id: RobotID) -> Result<Cow<'_, Trajectory>> {
        // The existence check and the read happen in one transaction
        let tx = self.conn.unchecked_transaction()?;
        let known: Option<i64> = tx
            .query_row(
                "SELECT robot_id FROM Robots WHERE robot_id = ?1",
                params![id.0],
                |row| row.get(0),
            )
            .optional()?;
        if known.is_none() {
            return Err(Error::NotFound {
                entity: "robot",
                id: id.0.to_string(),
            });
        }

        let samples = {
            let mut stmt = tx.prepare(
                "SELECT timestamp, x_coord, y_coord FROM Trajectories WHERE robot_id = ?1 ORDER \
                 BY timestamp",
            )?;
            let rows = stmt.query_map(params![id.0], |row| {
                Ok(Sample::new(row.get(0)?, row.get(1)?, row.get(2)?))
            })?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;

        Ok(Cow::Owned(Trajectory::new(samples)?))
    }

    fn list_windows(&self) -> Result<Vec<TimeWindow>> {
        let mut stmt = self.conn.prepare(
            "SELECT interval_id, start_time, end_time, event_type FROM TargetIntervals ORDER BY \
             interval_id",
        )?;
        let windows = stmt
            .query_map([], |row| {
                let event_type: Option<String> = row.get(3)?;
                Ok(TimeWindow {
                    id: WindowID(row.get(0)?),
                    start_time: row.get(1)?,
                    end_time: row.get(2)?,
                    event_type: event_type.unwrap_or_default(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(windows)
    }

    fn robot_by_name(&self, name: &str) -> Result<Robot> {
        self.conn
            .query_row(
                "SELECT robot_id, name FROM Robots WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Robot {
                        id: RobotID(row.get(0)?),
                        name: RobotName(row.get(1)?),
                    })
                },
            )
            .optional()?
            .ok_or_else(|| Error::NotFound {
                entity: "robot",
                id: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use ingest::{IntervalRecord, PositionRecord, RobotRecord};

    use super::*;

    fn dataset() -> Dataset {
        let mut dataset = Dataset::default();
        dataset.robots = vec![
            RobotRecord {
                robot_id: 2,
                name: "IamHuman".to_string(),
            },
            RobotRecord {
                robot_id: 1,
                name: "Astro".to_string(),
            },
            RobotRecord {
                robot_id: 3,
                name: "Astro".to_string(),
            },
        ];
        dataset.trajectories.insert(
            1,
            vec![
                PositionRecord {
                    timestamp: 1,
                    x: 0.0,
                    y: 0.0,
                },
                PositionRecord {
                    timestamp: 2,
                    x: 3.0,
                    y: 4.0,
                },
            ],
        );
        dataset.trajectories.insert(
            9,
            vec![PositionRecord {
                timestamp: 1,
                x: 0.0,
                y: 0.0,
            }],
        );
        dataset.intervals = vec![IntervalRecord {
            start_time: 1,
            end_time: 2,
            event_type: "meeting".to_string(),
        }];
        dataset
    }

    #[test]
    fn import_and_read_back() {
        let mut db = Database::in_memory().unwrap();
        let summary = db.import(&dataset()).unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                robots: 2,
                samples: 2,
                windows: 1,
                // The duplicate name, and the position for robot 9
                skipped: 2,
            }
        );

        let robots = db.list_robots().unwrap();
        assert_eq!(robots[0].id, RobotID(1));
        assert_eq!(robots[1].name, RobotName("IamHuman".to_string()));

        let astro = db.trajectory(RobotID(1)).unwrap();
        assert_eq!(astro.len(), 2);
        assert!(db.trajectory(RobotID(2)).unwrap().is_empty());
        assert_matches!(
            db.trajectory(RobotID(3)),
            Err(Error::NotFound { entity: "robot", .. })
        );

        let windows = db.list_windows().unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].id, WindowID(1));
        assert_eq!(windows[0].event_type, "meeting");

        assert_eq!(db.robot_by_name("Astro").unwrap().id, RobotID(1));
        assert_matches!(db.robot_by_name("Nobody"), Err(Error::NotFound { .. }));
    }

    #[test]
    fn open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            Database::open(&dir.path().join("robot.db")),
            Err(Error::NotFound {
                entity: "database",
                ..
            })
        );
    }

    #[test]
    fn open_rejects_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("CREATE TABLE Notes (body TEXT);").unwrap();
        }
        assert_matches!(Database::open(&path), Err(Error::InvalidArgument(_)));

        // Nothing was added to it
        let conn = Connection::open(&path).unwrap();
        let tables: i64 = conn
            .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(tables, 1);

        let empty = dir.path().join("empty.db");
        fs_err::write(&empty, "").unwrap();
        assert_matches!(Database::open(&empty), Err(Error::InvalidArgument(_)));
    }

    #[test]
    fn create_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("robot.db");
        {
            let mut db = Database::create(&path).unwrap();
            db.import(&dataset()).unwrap();
        }
        {
            let db = Database::open(&path).unwrap();
            assert_eq!(db.list_robots().unwrap().len(), 2);
        }
        let db = Database::create(&path).unwrap();
        assert!(db.list_robots().unwrap().is_empty());
    }
}

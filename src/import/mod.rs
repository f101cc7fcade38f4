pub mod parse;

use std::path::{Path, PathBuf};

use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{error, info};

use crate::db::repository;
use crate::import::parse::{decode_latin1, parse_course_line, parse_manifest};

const SCHEMA_FILE: &str = "./sql/schema.sql";
const DROP_SCHEMA_FILE: &str = "./sql/drop.sql";
const DATA_DIR: &str = "./data";
const MANIFEST_FILE: &str = "index.json";

/// Failures that abort the whole import. Anything at the level of a single
/// manifest entry or course line is logged and counted instead.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("unable to drop schema: {0}")]
    DropSchema(#[source] sqlx::Error),

    #[error("unable to create schema: {0}")]
    CreateSchema(#[source] sqlx::Error),

    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the pipeline finds its schema scripts and data files.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub schema_file: PathBuf,
    pub drop_file: PathBuf,
    pub data_dir: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            schema_file: PathBuf::from(SCHEMA_FILE),
            drop_file: PathBuf::from(DROP_SCHEMA_FILE),
            data_dir: PathBuf::from(DATA_DIR),
        }
    }
}

/// Per-department outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentReport {
    pub title: String,
    pub inserted: usize,
    pub invalid: usize,
}

pub struct Importer {
    db: SqlitePool,
    config: ImportConfig,
}

impl Importer {
    pub fn new(db: SqlitePool, config: ImportConfig) -> Self {
        Self { db, config }
    }

    /// Run the full pipeline: drop and recreate the schema, then seed it
    /// from the manifest. A schema failure aborts immediately — the drop
    /// must succeed before create is even attempted. Record-level failures
    /// are counted and skipped; rerunning always starts from a fresh
    /// drop/create.
    pub async fn run(&self) -> Result<Vec<DepartmentReport>, SetupError> {
        let drop_sql = read_file(&self.config.drop_file).await?;
        sqlx::raw_sql(&drop_sql)
            .execute(&self.db)
            .await
            .map_err(SetupError::DropSchema)?;
        info!("schema dropped");

        let schema_sql = read_file(&self.config.schema_file).await?;
        sqlx::raw_sql(&schema_sql)
            .execute(&self.db)
            .await
            .map_err(SetupError::CreateSchema)?;
        info!("schema created");

        let manifest = read_file(&self.config.data_dir.join(MANIFEST_FILE)).await?;
        let entries = parse_manifest(&manifest);

        let mut reports = Vec::with_capacity(entries.len());
        for entry in entries {
            let department = match repository::insert_department(
                &self.db,
                &entry.title,
                &entry.slug,
                &entry.description,
            )
            .await
            {
                Ok(Some(department)) => department,
                Ok(None) => {
                    error!("unable to insert department {:?}", entry.title);
                    continue;
                }
                Err(e) => {
                    error!("unable to insert department {:?}: {}", entry.title, e);
                    continue;
                }
            };

            let csv_path = self.config.data_dir.join(&entry.csv);
            let raw = match tokio::fs::read(&csv_path).await {
                Ok(raw) => raw,
                Err(e) => {
                    error!("unable to read {}: {}", csv_path.display(), e);
                    continue;
                }
            };
            let text = decode_latin1(&raw);

            let mut inserted = 0usize;
            let mut invalid = 0usize;
            for line in text.lines() {
                if line.trim().is_empty() {
                    continue;
                }

                let Some(course) = parse_course_line(line) else {
                    invalid += 1;
                    continue;
                };

                match repository::insert_course(&self.db, department.id, course).await {
                    Ok(Some(_)) => inserted += 1,
                    Ok(None) => invalid += 1,
                    Err(e) => {
                        error!("unable to insert course: {}", e);
                        invalid += 1;
                    }
                }
            }

            info!(
                "created department {} with {} courses and {} invalid lines",
                entry.title, inserted, invalid
            );
            reports.push(DepartmentReport {
                title: entry.title,
                inserted,
                invalid,
            });
        }

        Ok(reports)
    }
}

async fn read_file(path: &Path) -> Result<String, SetupError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SetupError::Io {
            path: path.to_path_buf(),
            source,
        })
}

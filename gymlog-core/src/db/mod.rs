pub mod models;
pub mod operations;
pub mod schema;

use std::path::{Path, PathBuf};

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::{debug, info};

use crate::errors::StoreError;

const CREATE_EXERCISES_TABLE: &str = "CREATE TABLE IF NOT EXISTS exercises (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    muscle_group TEXT NOT NULL,
    weight REAL NOT NULL,
    repetitions INTEGER NOT NULL,
    date TEXT
)";

/// Handle on the single-file exercise store.
///
/// Holds no open connection. Every caller gets its own connection from
/// [`Store::connect`] and drops it when done.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    url: String,
}

impl Store {
    /// Opens the store at `path`, creating the file, its directory and the
    /// exercise table as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let store = Store {
            url: path.to_string_lossy().into_owned(),
            path,
        };
        store.ensure_schema()?;
        info!("Opened exercise store at {}", store.path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connect(&self) -> Result<SqliteConnection, StoreError> {
        debug!("Connecting to {}", self.url);
        SqliteConnection::establish(&self.url).map_err(|source| StoreError::Connection {
            url: self.url.clone(),
            source,
        })
    }

    /// Creates the exercise table if it is missing. Idempotent.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        diesel::sql_query(CREATE_EXERCISES_TABLE).execute(&mut conn)?;
        debug!("Exercise table ensured");
        Ok(())
    }
}

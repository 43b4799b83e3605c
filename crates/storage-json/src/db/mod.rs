//! Data directory management: loading tables and replacing files atomically.

mod write_actor;

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use crate::accounts::AccountRecord;
use crate::errors::StorageError;
use crate::users::UserRecord;
use caixinha_core::Result;

pub use write_actor::{spawn_writer, WriteHandle};

pub const ACCOUNTS_FILE: &str = "contas.json";
pub const USERS_FILE: &str = "usuarios.json";

/// Both tables as held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub accounts: BTreeMap<String, AccountRecord>,
    pub users: BTreeMap<String, UserRecord>,
}

/// Locations of the table files inside the data directory.
#[derive(Debug, Clone)]
pub struct DataFiles {
    dir: PathBuf,
}

impl DataFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.dir.join(ACCOUNTS_FILE)
    }

    pub fn users_path(&self) -> PathBuf {
        self.dir.join(USERS_FILE)
    }

    pub fn load(&self) -> std::result::Result<Tables, StorageError> {
        let accounts: BTreeMap<String, AccountRecord> = load_table(&self.accounts_path())?;
        for (number, record) in &accounts {
            record.to_domain(number)?;
        }
        let users: BTreeMap<String, UserRecord> = load_table(&self.users_path())?;
        Ok(Tables { accounts, users })
    }

    /// Persists whichever tables differ between `before` and `after`.
    pub fn write_changes(
        &self,
        before: &Tables,
        after: &Tables,
    ) -> std::result::Result<(), StorageError> {
        if before.accounts != after.accounts {
            write_table(&self.accounts_path(), &after.accounts)?;
        }
        if before.users != after.users {
            write_table(&self.users_path(), &after.users)?;
        }
        Ok(())
    }

    pub fn write_all(&self, tables: &Tables) -> std::result::Result<(), StorageError> {
        write_table(&self.accounts_path(), &tables.accounts)?;
        write_table(&self.users_path(), &tables.users)
    }
}

/// Shared handle to the loaded tables and their writer.
///
/// Cheap to clone; every clone talks to the same writer actor.
#[derive(Clone)]
pub struct JsonStore {
    state: Arc<RwLock<Tables>>,
    writer: WriteHandle,
    files: DataFiles,
}

impl JsonStore {
    /// Read access to the current tables.
    pub fn read(&self) -> std::result::Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.state.read().map_err(|_| StorageError::LockPoisoned)
    }

    pub fn writer(&self) -> &WriteHandle {
        &self.writer
    }

    pub fn data_dir(&self) -> &Path {
        self.files.dir()
    }

    /// Rewrites both files from memory. Called on shutdown.
    pub async fn flush(&self) -> Result<()> {
        self.writer.flush().await
    }
}

/// Opens the data directory, creating it if needed, loads both tables and
/// starts the writer actor.
///
/// Must be called from within a Tokio runtime.
pub fn init(data_dir: &Path) -> Result<JsonStore> {
    fs::create_dir_all(data_dir).map_err(|source| StorageError::WriteFailed {
        path: data_dir.to_path_buf(),
        source,
    })?;

    let files = DataFiles::new(data_dir);
    let tables = files.load()?;
    info!(
        "Loaded {} accounts and {} users from {}",
        tables.accounts.len(),
        tables.users.len(),
        data_dir.display()
    );

    let state = Arc::new(RwLock::new(tables));
    let writer = spawn_writer(files.clone(), state.clone());
    Ok(JsonStore {
        state,
        writer,
        files,
    })
}

/// Reads a table file. A missing or empty file is an empty table, as is `[]`,
/// which is how an empty map was written by earlier versions.
fn load_table<T>(path: &Path) -> std::result::Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist yet; starting empty", path.display());
            return Ok(T::default());
        }
        Err(source) => {
            return Err(StorageError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let trimmed = contents.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return Ok(T::default());
    }
    serde_json::from_str(trimmed).map_err(|source| StorageError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes `table` into a temporary file next to `path`, syncs it and
/// renames it over `path`.
fn write_table<T: Serialize>(path: &Path, table: &T) -> std::result::Result<(), StorageError> {
    let write_err = |source| StorageError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;

    {
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut tmp, PrettyFormatter::with_indent(b"    "));
        table
            .serialize(&mut serializer)
            .map_err(|e| write_err(std::io::Error::new(ErrorKind::Other, e)))?;
    }
    tmp.write_all(b"\n").map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

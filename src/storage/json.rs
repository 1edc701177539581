use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::{
    config::OutputConfig,
    domain::{album::Album, library::Library},
    storage::error::StorageError,
};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// `<prefix>_<username>_library_<YYYYMMDDHHMMSS>.json`
pub fn library_file_name(prefix: &str, username: &str, at: &DateTime<Local>) -> String {
    format!(
        "{prefix}_{username}_library_{}.json",
        at.format(TIMESTAMP_FORMAT)
    )
}

/// Writes the albums as a tab indented JSON array, ordered by album id.
pub fn write_library(library: &Library, path: &Path) -> Result<(), StorageError> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    let mut serializer =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"\t"));
    library.sorted_albums().serialize(&mut serializer)?;

    writer.flush().map_err(io_err)
}

/// reads albums back from an exported file
pub fn read_library(path: &Path) -> Result<Vec<Album>, StorageError> {
    let file = File::open(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Names and writes the export of one user
pub struct LibraryWriter {
    dir: PathBuf,
    prefix: String,
}

impl LibraryWriter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            prefix: config.prefix.clone(),
        }
    }

    /// returns the path of the written file
    pub fn write(
        &self,
        library: &Library,
        username: &str,
        at: DateTime<Local>,
    ) -> Result<PathBuf, StorageError> {
        let path = self
            .dir
            .join(library_file_name(&self.prefix, username, &at));
        write_library(library, &path)?;
        log::debug!(
            "Wrote {} albums to {}",
            library.len(),
            path.to_string_lossy()
        );
        Ok(path)
    }
}

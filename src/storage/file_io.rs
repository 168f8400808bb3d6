//! File I/O utilities with atomic writes
//!
//! Every whole-file write goes to a sibling temp file, is synced, then
//! renamed over the target, so a file is either fully old or fully new.
//! Append-only logs (audit, outbox) use line-delimited JSON.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::PortalError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, PortalError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| {
        PortalError::PersistenceFailure(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        PortalError::PersistenceFailure(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Write JSON to a file atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), PortalError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let bytes = serde_json::to_vec_pretty(data)
        .map_err(|e| PortalError::PersistenceFailure(format!("Failed to serialize data: {}", e)))?;
    write_bytes_atomic(path, &bytes)
}

/// Write raw bytes to a file atomically (temp file, fsync, rename)
pub fn write_bytes_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), PortalError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            PortalError::PersistenceFailure(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = std::path::PathBuf::from(temp_name);

    let file = File::create(&temp_path).map_err(|e| {
        PortalError::PersistenceFailure(format!("Failed to create temp file: {}", e))
    })?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| PortalError::PersistenceFailure(format!("Failed to write data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| PortalError::PersistenceFailure(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        PortalError::PersistenceFailure(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Read a whole file
pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, PortalError> {
    let path = path.as_ref();
    fs::read(path)
        .map_err(|e| PortalError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

/// Append one record as a JSON line and flush
pub fn append_jsonl<T, P>(path: P, record: &T) -> Result<(), PortalError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let line = serde_json::to_string(record)
        .map_err(|e| PortalError::Json(format!("Failed to serialize record: {}", e)))?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PortalError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    writeln!(file, "{}", line)
        .and_then(|_| file.flush())
        .map_err(|e| PortalError::Io(format!("Failed to append to {}: {}", path.display(), e)))
}

/// Read every record of a JSONL file, oldest first; a missing file is empty
pub fn read_jsonl<T, P>(path: P) -> Result<Vec<T>, PortalError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .map_err(|e| PortalError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut records = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            PortalError::Io(format!("Failed to read line {}: {}", line_num + 1, e))
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| {
            PortalError::Json(format!(
                "Failed to parse {} line {}: {}",
                path.display(),
                line_num + 1,
                e
            ))
        })?;
        records.push(record);
    }

    Ok(records)
}

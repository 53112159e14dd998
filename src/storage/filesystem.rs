//! File system operations
//!
//! Directory lifecycle, atomic writes, deletion, inventory and retention purge
//! for the scratch directory. Everything here is async and lock-free; unique
//! names keep concurrent writers apart.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::storage::results::{PurgeResult, StorageStats};

const MAX_RETRIES: u32 = 3;
const TEMP_PREFIX: &str = ".";
const TEMP_SUFFIX: &str = ".tmp";

/// Create the directory and any missing parents. Succeeds if it already exists.
pub async fn ensure_directory(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).await
}

/// Hidden sibling used while a write is in flight
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{TEMP_PREFIX}{name}{TEMP_SUFFIX}"))
}

/// Whether a directory entry is an in-flight write rather than a stored file
fn is_temp_name(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX)
}

/// Write `data` to `path` so that the final name only ever holds complete content.
///
/// Bytes go to a freshly created temporary file, are flushed and synced, then
/// hard-linked to the final name. Neither step replaces an existing file: a
/// name collision fails with `AlreadyExists` and leaves the other file intact.
pub async fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(path);

    // Not ours to clean up if it already exists
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .await?;

    let written = async {
        file.write_all(data).await?;
        file.flush().await?;
        file.sync_all().await?;
        fs::hard_link(&temp_path, path).await
    }
    .await;
    drop(file);

    let _ = fs::remove_file(&temp_path).await;
    written
}

/// Remove a file. Returns `Ok(false)` if it was already gone.
///
/// `PermissionDenied` is retried a few times before giving up; any other
/// error is returned immediately.
pub async fn remove_file(path: &Path) -> io::Result<bool> {
    let mut attempt = 1;
    loop {
        match fs::remove_file(path).await {
            Ok(()) => return Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) if e.kind() == ErrorKind::PermissionDenied && attempt < MAX_RETRIES => {
                tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// A regular file directly inside the scratch directory
struct FileEntry {
    path: PathBuf,
    size: u64,
    modified: Option<SystemTime>,
}

/// List regular files directly inside `dir`.
///
/// A missing directory yields an empty list; entries that vanish while being
/// inspected are skipped, as are in-flight temporary files.
async fn list_files(dir: &Path) -> io::Result<Vec<FileEntry>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if is_temp_name(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };
        if !metadata.is_file() {
            continue;
        }
        files.push(FileEntry {
            path: entry.path(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
        });
    }

    Ok(files)
}

/// Count and total size of regular files in `dir`
pub async fn directory_stats(dir: &Path) -> io::Result<StorageStats> {
    let files = list_files(dir).await?;
    let total_bytes = files.iter().map(|f| f.size).sum();
    Ok(StorageStats::from_bytes(files.len() as u64, total_bytes))
}

/// Delete regular files in `dir` last modified more than `max_age` ago.
///
/// A zero `max_age` removes every file.
pub async fn purge_older_than(dir: &Path, max_age: Duration) -> io::Result<PurgeResult> {
    let now = SystemTime::now();
    let mut result = PurgeResult::default();

    for file in list_files(dir).await? {
        let expired = match file.modified {
            Some(modified) => now
                .duration_since(modified)
                .map(|age| age >= max_age)
                .unwrap_or(max_age.is_zero()),
            None => true,
        };
        if !expired {
            continue;
        }
        if remove_file(&file.path).await? {
            result.files_removed += 1;
            result.bytes_freed += file.size;
        }
    }

    Ok(result)
}

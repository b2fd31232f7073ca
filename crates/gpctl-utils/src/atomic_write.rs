//! Atomic file replacement
//!
//! Writers go through a temporary file in the target directory, fsync, then
//! rename over the destination. Readers see either the old or the new content,
//! never a partial file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

#[cfg(target_os = "windows")]
use std::{thread, time::Duration};

/// Atomically replace `path` with `content`, creating parent directories.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content)?;
    temp_file.as_file().sync_all()?;

    atomic_rename(temp_file, path)
}

/// Serialize `value` as pretty JSON with a trailing newline and write it atomically
pub fn write_json_atomic<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<()> {
    let mut json = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
    json.push(b'\n');
    write_atomic(path, &json)
}

#[cfg(not(target_os = "windows"))]
fn atomic_rename(temp_file: NamedTempFile, target: &Path) -> io::Result<()> {
    temp_file.persist(target).map(|_| ()).map_err(|e| e.error)
}

/// Windows may briefly refuse the rename while a reader has the target open
#[cfg(target_os = "windows")]
fn atomic_rename(mut temp_file: NamedTempFile, target: &Path) -> io::Result<()> {
    const MAX_RETRIES: u32 = 5;
    const INITIAL_DELAY_MS: u64 = 10;

    let mut retry_count = 0;
    loop {
        match temp_file.persist(target) {
            Ok(_) => return Ok(()),
            Err(persist_error) => {
                let retryable = matches!(
                    persist_error.error.kind(),
                    io::ErrorKind::PermissionDenied | io::ErrorKind::Other
                );
                if !retryable || retry_count >= MAX_RETRIES {
                    return Err(persist_error.error);
                }
                thread::sleep(Duration::from_millis(INITIAL_DELAY_MS * 2_u64.pow(retry_count)));
                retry_count += 1;
                temp_file = persist_error.file;
            }
        }
    }
}

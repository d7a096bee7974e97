//! The JSON state file that carries the store between invocations.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};
use slot_engine::{MemoryStore, StoreSnapshot};
use tempfile::NamedTempFile;
use tracing::debug;

/// Load the store from `path`. A missing file is an empty store.
pub fn load(path: &Path) -> Result<MemoryStore> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No state file, starting empty");
            return Ok(MemoryStore::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read state file: {}", path.display()))
        }
    };

    let snapshot: StoreSnapshot = serde_json::from_str(&json)
        .with_context(|| format!("State file is not valid JSON: {}", path.display()))?;
    MemoryStore::from_snapshot(snapshot)
        .with_context(|| format!("State file holds invalid records: {}", path.display()))
}

/// Write the store's rows to `path`.
///
/// The JSON goes to a temporary file next to `path`, which is then renamed
/// over it, so a crash mid-write leaves the previous state intact.
pub fn save(path: &Path, store: &MemoryStore) -> Result<()> {
    let json = serde_json::to_string_pretty(&store.snapshot())?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary state file in {}", dir.display()))?;
    file.write_all(json.as_bytes())
        .and_then(|()| file.as_file().sync_all())
        .with_context(|| format!("Failed to write state file: {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("Failed to replace state file: {}", path.display()))?;

    debug!(path = %path.display(), "Saved state");
    Ok(())
}

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::SnapshotSlot;

/// Snapshot stored as a single JSON file. Writes go to a sibling temp file,
/// are synced to disk, and only then renamed over the target.
#[derive(Debug, Clone)]
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<dir>/<key>.json`
    pub fn in_dir(dir: &Path, key: &str) -> Self {
        Self::new(dir.join(format!("{key}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotSlot for JsonFileSlot {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read snapshot from {}", self.path.display()))?;
        Ok(Some(contents))
    }

    fn save(&mut self, payload: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create snapshot directory {}", parent.display())
            })?;
        }

        let temp = self.temp_path();
        let mut file = File::create(&temp)
            .with_context(|| format!("Failed to create snapshot file {}", temp.display()))?;
        file.write_all(payload.as_bytes())
            .with_context(|| format!("Failed to write snapshot to {}", temp.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to sync snapshot file {}", temp.display()))?;
        drop(file);

        fs::rename(&temp, &self.path).with_context(|| {
            format!(
                "Failed to move snapshot {} into place at {}",
                temp.display(),
                self.path.display()
            )
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::utils::paths::write_atomic;

use super::{CatalogData, Result};

/// Keeps the whole catalog in a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the catalog, or an empty one when the file does not exist yet.
    pub fn load(&self) -> Result<CatalogData> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no catalog file, starting empty");
            return Ok(CatalogData::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, data: &CatalogData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }
}

use dirs::home_dir;
use std::{env, fs, io, path::Path, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".bookstore";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.bookstore`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("BOOKSTORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Writes `contents` next to `path` first and renames it into place.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!path.with_extension("tmp").exists());
    }
}

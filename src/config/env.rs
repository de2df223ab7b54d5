//! `.env` file loading

use crate::error::{AppError, Result};
use std::collections::HashMap;
use std::path::Path;

pub struct EnvManager;

impl EnvManager {
    /// Read a .env file into a key/value map without touching the process
    /// environment. A missing file yields an empty map.
    pub fn read_env_file(path: &Path, debug: bool) -> Result<HashMap<String, String>> {
        if !path.exists() {
            if debug {
                println!("No {} file found, using defaults and CLI arguments", path.display());
            }
            return Ok(HashMap::new());
        }

        let iter = dotenv::from_path_iter(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

        let vars = iter
            .map(|item| item.map_err(|e| AppError::config(format!("Failed to parse {}: {}", path.display(), e))))
            .collect::<Result<HashMap<_, _>>>()?;

        if debug {
            println!("Loaded {} setting(s) from {}", vars.len(), path.display());
        }

        Ok(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_env_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "PING_LIST=10.0.0.1,10.0.0.2").unwrap();
        writeln!(file, "PING_COUNT=3").unwrap();

        let vars = EnvManager::read_env_file(file.path(), false).unwrap();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["PING_LIST"], "10.0.0.1,10.0.0.2");
        assert_eq!(vars["PING_COUNT"], "3");
    }

    #[test]
    fn test_quoted_values_are_unquoted() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "CONNCHECK_NAME=\"branch office\"").unwrap();

        let vars = EnvManager::read_env_file(file.path(), false).unwrap();
        assert_eq!(vars["CONNCHECK_NAME"], "branch office");
    }

    #[test]
    fn test_read_missing_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let vars = EnvManager::read_env_file(&dir.path().join(".env"), false).unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn test_reading_file_leaves_process_env_alone() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "CONNCHECK_ENV_FILE_ONLY_MARKER=1").unwrap();

        EnvManager::read_env_file(file.path(), false).unwrap();
        assert!(std::env::var("CONNCHECK_ENV_FILE_ONLY_MARKER").is_err());
    }
}

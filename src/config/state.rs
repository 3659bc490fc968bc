// Application state module
// Immutable for the lifetime of the process, shared across connections via Arc

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::ServerError;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonical content root; every served path must stay below it
    pub root: PathBuf,
}

impl AppState {
    /// Resolve the configured content root and freeze the configuration
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let root = resolve_content_root(Path::new(&config.server.root))?;
        Ok(Self { config, root })
    }
}

fn resolve_content_root(path: &Path) -> Result<PathBuf, ServerError> {
    let root = path
        .canonicalize()
        .map_err(|source| ServerError::ContentRoot {
            path: path.to_path_buf(),
            source,
        })?;

    if !root.is_dir() {
        return Err(ServerError::NotADirectory(root));
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_root(root: &Path) -> Config {
        let mut cfg = Config::default();
        cfg.server.root = root.to_string_lossy().into_owned();
        cfg
    }

    #[test]
    fn test_root_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("www")).unwrap();

        let state = AppState::new(config_with_root(&dir.path().join("www/./"))).unwrap();
        assert_eq!(state.root, dir.path().join("www").canonicalize().unwrap());
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppState::new(config_with_root(&dir.path().join("missing")));
        assert!(matches!(result, Err(ServerError::ContentRoot { .. })));
    }

    #[test]
    fn test_root_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        let result = AppState::new(config_with_root(&file));
        assert!(matches!(result, Err(ServerError::NotADirectory(_))));
    }
}

use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::catalog::{load_catalog, Catalog};
use crate::error::{Error, Result};

/// Environment variable naming the catalog file to load.
pub const CATALOG_ENV: &str = "PISTEPATH_CATALOG";

/// Default filename for the catalog inside the platform data directory.
const CATALOG_FILENAME: &str = "catalog.json";

/// Resolve the default catalog location using platform-specific project directories.
pub fn default_catalog_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "pistepath", "pistepath").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(CATALOG_FILENAME))
}

/// Pick the catalog path: explicit argument, then [`CATALOG_ENV`], then the data dir.
pub fn resolve_catalog_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "using explicit catalog path");
        return Ok(path.to_path_buf());
    }

    if let Some(value) = env::var_os(CATALOG_ENV).filter(|value| !value.is_empty()) {
        let path = PathBuf::from(value);
        debug!(path = %path.display(), "using catalog path from {}", CATALOG_ENV);
        return Ok(path);
    }

    let path = default_catalog_path()?;
    debug!(path = %path.display(), "using default catalog path");
    Ok(path)
}

/// Resolve and load the catalog in one step.
pub fn open_catalog(explicit: Option<&Path>) -> Result<(PathBuf, Catalog)> {
    let path = resolve_catalog_path(explicit)?;
    let catalog = load_catalog(&path)?;
    Ok((path, catalog))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let explicit = Path::new("/tmp/somewhere/resort.json");
        let resolved = resolve_catalog_path(Some(explicit)).expect("explicit path resolves");
        assert_eq!(resolved, explicit);
    }

    #[test]
    fn default_path_ends_with_catalog_file() {
        if let Ok(path) = default_catalog_path() {
            assert!(path.ends_with(CATALOG_FILENAME));
        }
    }

    #[test]
    fn open_catalog_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.json");
        let err = open_catalog(Some(&missing)).expect_err("missing file");
        assert!(matches!(err, Error::CatalogNotFound { .. }));
    }
}

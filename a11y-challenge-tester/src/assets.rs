use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use a11y_challenge_game::{Catalogue, CatalogueError, CatalogueSource, EmbeddedCatalogue};
use thiserror::Error;

/// Why a catalogue file could not be used.
#[derive(Debug, Error)]
pub enum FileCatalogueError {
    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Invalid(#[from] CatalogueError),
}

/// Catalogue JSON read from disk.
#[derive(Debug, Clone)]
pub struct FileCatalogue {
    path: PathBuf,
}

impl FileCatalogue {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogueSource for FileCatalogue {
    type Error = FileCatalogueError;

    fn load_catalogue(&self) -> Result<Catalogue, Self::Error> {
        let json =
            std::fs::read_to_string(&self.path).map_err(|source| FileCatalogueError::Read {
                path: self.path.clone(),
                source,
            })?;
        Ok(Catalogue::from_json(&json)?)
    }
}

/// Load the catalogue at `path`, or the embedded one when no path is given.
pub fn load_catalogue(path: Option<&Path>) -> Result<Arc<Catalogue>> {
    let catalogue = match path {
        Some(path) => FileCatalogue::new(path)
            .load_catalogue()
            .with_context(|| format!("failed to load catalogue from {}", path.display()))?,
        None => EmbeddedCatalogue
            .load_catalogue()
            .context("embedded catalogue is invalid")?,
    };
    Ok(Arc::new(catalogue))
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11y_challenge_game::BUILTIN_CATALOGUE;

    fn temp_file(label: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "a11y-catalogue-{label}-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_embedded_by_default() {
        let catalogue = load_catalogue(None).unwrap();
        assert_eq!(*catalogue, Catalogue::builtin().unwrap());
    }

    #[test]
    fn loads_catalogue_file() {
        let path = temp_file("ok", BUILTIN_CATALOGUE);
        let catalogue = load_catalogue(Some(&path)).unwrap();
        assert_eq!(catalogue.list_tasks().len(), 7);
    }

    #[test]
    fn read_failures_are_not_reported_as_bad_json() {
        let missing = std::env::temp_dir().join("a11y-catalogue-absent.json");
        let err = FileCatalogue::new(&missing).load_catalogue().unwrap_err();
        let FileCatalogueError::Read { path, source } = &err else {
            panic!("expected a read error, got {err:?}");
        };
        assert_eq!(path, &missing);
        assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        assert!(!err.to_string().contains("malformed"));

        let path = temp_file("garbled", "{ not json");
        let err = FileCatalogue::new(&path).load_catalogue().unwrap_err();
        assert!(matches!(
            err,
            FileCatalogueError::Invalid(CatalogueError::Malformed(_))
        ));
    }

    #[test]
    fn reports_missing_and_invalid_files() {
        let missing = std::env::temp_dir().join("a11y-catalogue-does-not-exist.json");
        let err = load_catalogue(Some(&missing)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load catalogue"));

        let path = temp_file("bad", r#"{"tasks": []}"#);
        assert!(load_catalogue(Some(&path)).is_err());
    }
}

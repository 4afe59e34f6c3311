//! On-disk routing configuration and last-synced fingerprints.
//!
//! Each organization owns two files in the configuration directory:
//! `<org_id>.json` (the routing configuration) and `<org_id>.fingerprint`
//! (hex fingerprint of the generated routes last written).

use std::io;
use std::path::{Path, PathBuf};

use autoroute_core::{CoreError, Fingerprint, OrgId, RoutingConfig};

#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid routing configuration JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupt fingerprint file {}: {source}", path.display())]
    Fingerprint {
        path: PathBuf,
        #[source]
        source: CoreError,
    },
}

#[derive(Debug, Clone)]
pub struct ConfigFiles {
    dir: PathBuf,
}

impl ConfigFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn config_path(&self, org_id: OrgId) -> PathBuf {
        self.dir.join(format!("{org_id}.json"))
    }

    pub fn fingerprint_path(&self, org_id: OrgId) -> PathBuf {
        self.dir.join(format!("{org_id}.fingerprint"))
    }

    pub fn load_config(&self, org_id: OrgId) -> Result<RoutingConfig, FilesError> {
        let path = self.config_path(org_id);
        let raw = std::fs::read(&path).map_err(|source| FilesError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_slice(&raw).map_err(|source| FilesError::Parse { path, source })
    }

    /// The fingerprint written by the last sync, or `None` if there was none.
    pub fn load_fingerprint(&self, org_id: OrgId) -> Result<Option<Fingerprint>, FilesError> {
        let path = self.fingerprint_path(org_id);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(FilesError::Io { path, source }),
        };
        raw.parse::<Fingerprint>()
            .map(Some)
            .map_err(|source| FilesError::Fingerprint { path, source })
    }

    /// Write the configuration, then the fingerprint. Each file is replaced
    /// atomically.
    pub fn save(
        &self,
        org_id: OrgId,
        config: &RoutingConfig,
        fingerprint: Fingerprint,
    ) -> Result<(), FilesError> {
        let path = self.config_path(org_id);
        let body = serde_json::to_vec_pretty(config).map_err(|source| FilesError::Parse {
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, &body)?;
        write_atomic(&self.fingerprint_path(org_id), fingerprint.to_string().as_bytes())
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), FilesError> {
    let tmp = path.with_extension("tmp");
    let io_err = |source: io::Error| FilesError::Io {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(&tmp, contents).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn missing_fingerprint_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let files = ConfigFiles::new(dir.path());
        assert_eq!(files.load_fingerprint(1).unwrap(), None);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let files = ConfigFiles::new(dir.path());
        let config: RoutingConfig = serde_json::from_value(serde_json::json!({
            "route": { "receiver": "default" },
            "receivers": [{ "name": "default" }]
        }))
        .unwrap();

        files.save(4, &config, Fingerprint(0xabc)).unwrap();

        assert_eq!(files.load_config(4).unwrap(), config);
        assert_eq!(files.load_fingerprint(4).unwrap(), Some(Fingerprint(0xabc)));
        assert!(!dir.path().join("4.tmp").exists());
    }

    #[test]
    fn missing_config_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(
            ConfigFiles::new(dir.path()).load_config(9),
            Err(FilesError::Io { .. })
        );
    }

    #[test]
    fn corrupt_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let files = ConfigFiles::new(dir.path());
        std::fs::write(files.config_path(2), b"{ not json").unwrap();
        std::fs::write(files.fingerprint_path(2), b"zzz").unwrap();

        assert_matches!(files.load_config(2), Err(FilesError::Parse { .. }));
        assert_matches!(files.load_fingerprint(2), Err(FilesError::Fingerprint { .. }));
    }
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dirs::home_dir;
use serde::{Deserialize, Serialize};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("could not determine the home directory")]
    NoHome,
    #[error("credentials file {path} is unreadable: {reason}")]
    Invalid { path: PathBuf, reason: String },
    #[error("credentials storage failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Bearer token persisted between CLI runs in `~/.retrocat/credentials.toml`.
pub struct CredentialStore {
    path: PathBuf,
    data: CredentialsFile,
}

impl CredentialStore {
    pub fn load() -> Result<Self, CredentialsError> {
        Self::load_from(default_path()?)
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, CredentialsError> {
        let path = path.into();
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str(&contents).map_err(|err| CredentialsError::Invalid {
                path: path.clone(),
                reason: err.to_string(),
            })?
        } else {
            CredentialsFile::default()
        };
        Ok(Self { path, data })
    }

    pub fn token(&self) -> Option<&str> {
        self.data.token.as_deref()
    }

    pub fn set_token(&mut self, token: &str) {
        self.data.token = Some(token.trim().to_string()).filter(|token| !token.is_empty());
    }

    pub fn clear(&mut self) {
        self.data.token = None;
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<(), CredentialsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string(&self.data).map_err(|err| CredentialsError::Invalid {
            path: self.path.clone(),
            reason: err.to_string(),
        })?;
        fs::write(&self.path, serialized)?;
        secure_permissions(&self.path)?;
        Ok(())
    }
}

fn default_path() -> Result<PathBuf, CredentialsError> {
    let mut path = home_dir().ok_or(CredentialsError::NoHome)?;
    path.push(".retrocat");
    path.push("credentials.toml");
    Ok(path)
}

fn secure_permissions(path: &Path) -> Result<(), CredentialsError> {
    #[cfg(unix)]
    {
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_mode(0o600);
        fs::set_permissions(path, permissions)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn token_survives_reload() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("credentials.toml");

        let mut store = CredentialStore::load_from(&path).expect("load empty store");
        assert!(store.token().is_none());
        store.set_token("  abc123 ");
        store.save().expect("save");

        let reloaded = CredentialStore::load_from(&path).expect("reload");
        assert_eq!(reloaded.token(), Some("abc123"));

        #[cfg(unix)]
        {
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn clearing_removes_token() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("credentials.toml");
        let mut store = CredentialStore::load_from(&path).unwrap();
        store.set_token("abc");
        store.save().unwrap();
        store.clear();
        store.save().unwrap();
        assert!(CredentialStore::load_from(&path).unwrap().token().is_none());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("credentials.toml");
        fs::write(&path, "token = [").unwrap();
        assert!(matches!(
            CredentialStore::load_from(&path),
            Err(CredentialsError::Invalid { .. })
        ));
    }
}

//! Repository identity: parsing it out of a user-supplied URL and keeping the
//! single cached copy on disk.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::contract::IdentityStore;
use crate::error::{RepoDocError, Result};

/// The `(owner, repo)` pair naming a repository on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    pub owner: String,
    pub repo: String,
}

impl RepositoryIdentity {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Extract the identity from `github.com/<owner>/<repo>[/...]`.
    ///
    /// The scheme and a `www.` prefix are optional, trailing path segments,
    /// queries and fragments are ignored, and a `.git` suffix on the repo
    /// segment is dropped.
    pub fn parse_url(input: &str) -> Result<Self> {
        let input = input.trim();
        let captures = repo_url_pattern()
            .captures(input)
            .ok_or_else(|| RepoDocError::Input(format!("not a GitHub repository URL: {input:?}")))?;

        let owner = &captures[1];
        let repo = captures[2].strip_suffix(".git").unwrap_or(&captures[2]);
        if repo.is_empty() {
            return Err(RepoDocError::Input(format!(
                "repository name missing in {input:?}"
            )));
        }
        debug!(owner, repo, "Parsed repository URL");
        Ok(Self::new(owner, repo))
    }
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

fn repo_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:https?://)?(?:www\.)?github\.com/([^/\s?#]+)/([^/\s?#]+)(?:[/?#]\S*)?$")
            .expect("repository URL pattern is valid")
    })
}

/// Keeps the cached identity as a small JSON file.
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityStore for FileIdentityStore {
    fn get(&self) -> Result<Option<RepositoryIdentity>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cached repository identity");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let identity = serde_json::from_str(&raw).map_err(|e| {
            RepoDocError::Storage(format!(
                "cached identity at {} is unreadable: {e}",
                self.path.display()
            ))
        })?;
        Ok(Some(identity))
    }

    fn set(&self, identity: &RepositoryIdentity) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(identity)
            .map_err(|e| RepoDocError::Storage(e.to_string()))?;
        fs::write(&self.path, json)?;
        info!(path = %self.path.display(), %identity, "Cached repository identity");
        Ok(())
    }
}

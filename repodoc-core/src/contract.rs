//! # contract: the seams between repodoc's flows and the outside world
//!
//! Three traits cover every external collaborator the core talks to:
//! - [`ContentClient`]: read access to a hosted source-control API.
//! - [`CompletionClient`]: a chat-style LLM completion endpoint.
//! - [`IdentityStore`]: the single durable slot holding the connected repository.
//!
//! Concrete implementations live in [`crate::github`], [`crate::completion`] and
//! [`crate::identity`]. All traits are annotated for `mockall`, and the mocks are
//! exported behind the `test-export-mocks` feature so integration tests can use them.

use async_trait::async_trait;
use serde::Deserialize;

#[allow(unused_imports)]
use mockall::{automock, predicate::*};

use crate::error::Result;
use crate::identity::RepositoryIdentity;

/// Kind of a directory entry as reported by the contents API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks and submodules. Never walked or read.
    #[serde(other)]
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn file(path: &str) -> Self {
        Self::new(path, EntryKind::File)
    }

    pub fn dir(path: &str) -> Self {
        Self::new(path, EntryKind::Dir)
    }

    fn new(path: &str, kind: EntryKind) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        Self {
            name,
            path: path.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepositoryMetadata {
    pub description: Option<String>,
}

/// Read-only access to repository contents.
///
/// Failures follow the crate taxonomy: `NotFound` for a missing or private
/// resource, `Auth` for a rejected credential, `Transport` for everything else.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// List the entries of one directory.
    async fn list_directory(&self, owner: &str, repo: &str, path: &str) -> Result<Vec<DirEntry>>;

    /// Fetch one file body, already decoded to text.
    async fn read_file(&self, owner: &str, repo: &str, path: &str) -> Result<String>;

    /// Fetch repository metadata. Also serves as the existence check on connect.
    async fn get_repository_metadata(&self, owner: &str, repo: &str) -> Result<RepositoryMetadata>;
}

/// A chat completion endpoint. One call, one answer.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a system + user message pair and return the first choice's text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// The durable slot holding the connected repository. `set` overwrites.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait IdentityStore: Send + Sync {
    fn get(&self) -> Result<Option<RepositoryIdentity>>;
    fn set(&self, identity: &RepositoryIdentity) -> Result<()>;
}

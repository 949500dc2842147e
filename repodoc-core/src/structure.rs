//! Repository Structure Fetcher.
//!
//! Metadata is mandatory; the two well-known root files are opportunistic.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::contract::ContentClient;
use crate::error::{RepoDocError, Result};
use crate::identity::RepositoryIdentity;

pub const PACKAGE_MANIFEST: &str = "package.json";
pub const README: &str = "README.md";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepositoryStructure {
    pub description: Option<String>,
    pub package_json: Option<Value>,
    pub readme: Option<String>,
}

pub async fn fetch_structure<C>(client: &C, identity: &RepositoryIdentity) -> Result<RepositoryStructure>
where
    C: ContentClient + ?Sized,
{
    let RepositoryIdentity { owner, repo } = identity;

    let metadata = client.get_repository_metadata(owner, repo).await?;

    let package_json = optional_file(client, identity, PACKAGE_MANIFEST)
        .await
        .and_then(|raw| match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(%identity, error = %e, "package.json is not valid JSON, ignoring it");
                None
            }
        });
    let readme = optional_file(client, identity, README).await;

    info!(
        %identity,
        has_description = metadata.description.is_some(),
        has_package_json = package_json.is_some(),
        has_readme = readme.is_some(),
        "Fetched repository structure"
    );

    Ok(RepositoryStructure {
        description: metadata.description,
        package_json,
        readme,
    })
}

async fn optional_file<C>(client: &C, identity: &RepositoryIdentity, path: &str) -> Option<String>
where
    C: ContentClient + ?Sized,
{
    match client.read_file(&identity.owner, &identity.repo, path).await {
        Ok(body) => Some(body),
        Err(RepoDocError::NotFound(_)) => {
            debug!(%identity, path, "Optional file absent");
            None
        }
        Err(e) => {
            warn!(%identity, path, error = %e, "Failed to fetch optional file, continuing without it");
            None
        }
    }
}

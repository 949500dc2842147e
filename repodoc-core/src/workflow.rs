//! High-level flows: connect to a repository, then generate its documentation.
//!
//! - [`connect`] parses a repository URL, confirms the repository exists and
//!   caches its identity in the injected [`IdentityStore`].
//! - [`generate_documentation`] reads the cached identity, fetches the
//!   repository structure, selects source files and asks the completion
//!   endpoint for a README.
//!
//! [`RepoDoc`] bundles the collaborators and guards each flow with its own
//! [`Affordance`], so a flow cannot overlap with itself.
//!
//! # Error Handling
//! Mandatory steps (repository existence, the completion call) propagate.
//! Optional lookups inside [`crate::structure`] and [`crate::selector`]
//! degrade on their own and never reach this level.

use tracing::{error, info};

use crate::action::{ActionState, Affordance};
use crate::config::SelectorConfig;
use crate::contract::{CompletionClient, ContentClient, IdentityStore};
use crate::error::{RepoDocError, Result};
use crate::generator::{generate, GeneratedDocument};
use crate::identity::RepositoryIdentity;
use crate::selector::select_source_files;
use crate::structure::fetch_structure;

/// Validate `url` against the remote and cache the identity. On any failure
/// the previously cached identity is left untouched.
pub async fn connect<C, S>(url: &str, client: &C, store: &S) -> Result<RepositoryIdentity>
where
    C: ContentClient + ?Sized,
    S: IdentityStore + ?Sized,
{
    let identity = RepositoryIdentity::parse_url(url)?;
    info!(%identity, "Connecting to repository");

    if let Err(e) = client
        .get_repository_metadata(&identity.owner, &identity.repo)
        .await
    {
        error!(%identity, error = %e, "Repository lookup failed");
        return Err(e);
    }

    store.set(&identity)?;
    info!(%identity, "Connected");
    Ok(identity)
}

pub async fn generate_documentation<C, L, S>(
    content: &C,
    completion: &L,
    store: &S,
    rules: &SelectorConfig,
) -> Result<GeneratedDocument>
where
    C: ContentClient + ?Sized,
    L: CompletionClient + ?Sized,
    S: IdentityStore + ?Sized,
{
    let identity = store.get()?.ok_or_else(|| {
        RepoDocError::Input("no repository connected, run connect first".to_string())
    })?;
    info!(%identity, "Starting documentation generation");

    let structure = fetch_structure(content, &identity).await?;
    let files = select_source_files(content, &identity, rules).await;
    let document = generate(&identity, &structure, &files, completion).await?;

    info!(%identity, chars = document.as_str().len(), "Documentation generated");
    Ok(document)
}

pub struct RepoDoc<C, L, S> {
    content: C,
    completion: L,
    store: S,
    rules: SelectorConfig,
    connect_action: Affordance,
    generate_action: Affordance,
}

impl<C, L, S> RepoDoc<C, L, S>
where
    C: ContentClient,
    L: CompletionClient,
    S: IdentityStore,
{
    pub fn new(content: C, completion: L, store: S, rules: SelectorConfig) -> Self {
        Self {
            content,
            completion,
            store,
            rules,
            connect_action: Affordance::new("connect"),
            generate_action: Affordance::new("generate"),
        }
    }

    pub async fn connect(&self, url: &str) -> Result<RepositoryIdentity> {
        self.connect_action
            .run(connect(url, &self.content, &self.store))
            .await
    }

    pub async fn generate(&self) -> Result<GeneratedDocument> {
        self.generate_action
            .run(generate_documentation(
                &self.content,
                &self.completion,
                &self.store,
                &self.rules,
            ))
            .await
    }

    pub fn connected(&self) -> Result<Option<RepositoryIdentity>> {
        self.store.get()
    }

    pub fn connect_state(&self) -> ActionState {
        self.connect_action.state()
    }

    pub fn generate_state(&self) -> ActionState {
        self.generate_action.state()
    }
}

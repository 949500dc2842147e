//! Remote Content Client for the GitHub REST API.
//!
//! Only two endpoints are used: `GET /repos/{owner}/{repo}` for metadata and
//! `GET /repos/{owner}/{repo}/contents/{path}` for both directory listings and
//! file bodies. Every request carries the static bearer token.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use crate::config::{GitHubSettings, GITHUB_TOKEN_ENV};
use crate::contract::{ContentClient, DirEntry, RepositoryMetadata};
use crate::error::{RepoDocError, Result};

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// File body envelope returned by the contents endpoint.
#[derive(Debug, Deserialize)]
struct ContentEnvelope {
    #[serde(default)]
    content: String,
    encoding: String,
}

impl ContentEnvelope {
    fn decode(self) -> Result<String> {
        if self.encoding != "base64" {
            return Err(RepoDocError::Transport(format!(
                "unsupported content encoding {:?}",
                self.encoding
            )));
        }
        // The payload is line-wrapped.
        let payload: String = self.content.split_whitespace().collect();
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| RepoDocError::Transport(format!("invalid base64 content: {e}")))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub struct GitHubClient {
    http: Client,
    api_base: Url,
    token: String,
}

impl GitHubClient {
    /// Fails with `Config` when no token is configured; no request is made.
    pub fn new(settings: &GitHubSettings) -> Result<Self> {
        let token = settings
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RepoDocError::Config(format!("{GITHUB_TOKEN_ENV} is not set")))?;
        let api_base = Url::parse(&settings.api_base)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                RepoDocError::Config(format!("invalid GitHub API base {:?}", settings.api_base))
            })?;
        let http = Client::builder()
            .user_agent(concat!("repodoc/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_base,
            token,
        })
    }

    /// Appends each segment percent-encoded, so `#`, `?` and `%` in a
    /// repository path stay part of the path.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| RepoDocError::Config(format!("invalid GitHub API base {}", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repo_url(&self, owner: &str, repo: &str) -> Result<Url> {
        self.endpoint(["repos", owner, repo])
    }

    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> Result<Url> {
        self.endpoint(
            ["repos", owner, repo, "contents"]
                .into_iter()
                .chain(path.split('/').filter(|segment| !segment.is_empty())),
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let url = url.as_str();
        debug!(url, "GitHub request");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => {
                error!(url, "GitHub rejected the token");
                return Err(RepoDocError::Auth(
                    "GitHub rejected the configured token".to_string(),
                ));
            }
            StatusCode::NOT_FOUND => return Err(RepoDocError::NotFound(url.to_string())),
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                error!(url, status = %s, "GitHub returned an error");
                return Err(RepoDocError::Transport(format!(
                    "GitHub returned {s} for {url}: {body}"
                )));
            }
            _ => {}
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RepoDocError::Transport(format!("malformed GitHub response from {url}: {e}")))
    }
}

#[async_trait]
impl ContentClient for GitHubClient {
    async fn list_directory(&self, owner: &str, repo: &str, path: &str) -> Result<Vec<DirEntry>> {
        let url = self.contents_url(owner, repo, path)?;
        let entries: Vec<DirEntry> = self.get_json(url).await?;
        debug!(path, count = entries.len(), "Listed directory");
        Ok(entries)
    }

    async fn read_file(&self, owner: &str, repo: &str, path: &str) -> Result<String> {
        let url = self.contents_url(owner, repo, path)?;
        let envelope: ContentEnvelope = self.get_json(url).await?;
        envelope.decode()
    }

    async fn get_repository_metadata(&self, owner: &str, repo: &str) -> Result<RepositoryMetadata> {
        let url = self.repo_url(owner, repo)?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_line_wrapped_base64() {
        let envelope = ContentEnvelope {
            content: "aGVsbG8g\nd29ybGQ=\n".to_string(),
            encoding: "base64".to_string(),
        };
        assert_eq!(envelope.decode().unwrap(), "hello world");
    }

    #[test]
    fn rejects_other_encodings() {
        let envelope = ContentEnvelope {
            content: String::new(),
            encoding: "none".to_string(),
        };
        assert!(matches!(envelope.decode(), Err(RepoDocError::Transport(_))));
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let err = GitHubClient::new(&GitHubSettings::default()).err().unwrap();
        assert!(matches!(err, RepoDocError::Config(_)));
    }

    fn client(api_base: &str) -> GitHubClient {
        GitHubClient::new(&GitHubSettings {
            api_base: api_base.into(),
            token: Some("t".into()),
        })
        .unwrap()
    }

    #[test]
    fn contents_url_trims_slashes() {
        let url = client("http://localhost:1/").contents_url("o", "r", "/src/lib/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1/repos/o/r/contents/src/lib");
    }

    #[test]
    fn contents_url_encodes_each_segment() {
        let url = client("http://localhost:1")
            .contents_url("o", "r", "src/a#old/my file?.js")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:1/repos/o/r/contents/src/a%23old/my%20file%3F.js"
        );
    }

    #[test]
    fn api_base_prefix_is_kept() {
        let url = client("https://ghe.example.com/api/v3/").repo_url("o", "r").unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/repos/o/r");
    }

    #[test]
    fn unparseable_api_base_is_a_config_error() {
        let err = GitHubClient::new(&GitHubSettings {
            api_base: "not a url".into(),
            token: Some("t".into()),
        })
        .err()
        .unwrap();
        assert!(matches!(err, RepoDocError::Config(_)));
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{RepoDocError, Result};

pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Everything the connect and generate flows need. Secrets are never read from
/// or written to the YAML side; they are injected from the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GitHubSettings,
    pub completion: CompletionSettings,
    pub selector: SelectorConfig,
    pub storage: StorageSettings,
}

impl Config {
    pub fn trace_loaded(&self) {
        info!(
            github_api = %self.github.api_base,
            completion_api = %self.completion.api_base,
            model = %self.completion.model,
            identity_path = %self.storage.identity_path.display(),
            "Loaded Config"
        );
        debug!(selector = ?self.selector, "Config loaded (selector rules)");
    }

    /// Startup check: both credentials must be present before the first command runs.
    pub fn require_credentials(&self) -> Result<()> {
        if self.github.token.as_deref().map_or(true, str::is_empty) {
            return Err(RepoDocError::Config(format!(
                "{GITHUB_TOKEN_ENV} is not set"
            )));
        }
        if self.completion.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(RepoDocError::Config(format!(
                "{OPENAI_API_KEY_ENV} is not set"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    pub api_base: String,
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            token: None,
        }
    }
}

impl std::fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("api_base", &self.api_base)
            .field("token_set", &self.token.is_some())
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for CompletionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSettings")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key_set", &self.api_key.is_some())
            .finish()
    }
}

/// Hard upper bound on the number of selected source files.
pub const MAX_SOURCE_FILES: usize = 5;

/// Rules for the source file walk. See [`crate::selector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Subtree that is walked, relative to the repository root.
    pub root: String,
    /// Allowed file extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// A file whose name contains any of these is skipped.
    pub exclude: Vec<String>,
    /// Ordered name fragments; earlier fragments rank first.
    pub priority: Vec<String>,
    /// Lowers the number of files sent to the model. Values above
    /// [`MAX_SOURCE_FILES`] are clamped.
    pub max_files: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            root: "src".to_string(),
            extensions: owned(&["js", "jsx", "ts", "tsx", "py", "rb", "go", "rs", "java", "php"]),
            exclude: owned(&["test", "spec", "config"]),
            priority: owned(&["index", "main", "app"]),
            max_files: MAX_SOURCE_FILES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// File holding the single cached repository identity.
    pub identity_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let identity_path = dirs::data_dir()
            .map(|dir| dir.join("repodoc").join("identity.json"))
            .unwrap_or_else(|| PathBuf::from(".repodoc").join("identity.json"));
        Self { identity_path }
    }
}

//! Documentation Generator: turns the fetched structure and selected files into
//! a single prompt and asks the completion endpoint for a README.

use std::fmt;
use std::fmt::Write as _;
use tracing::info;

use crate::contract::CompletionClient;
use crate::error::{RepoDocError, Result};
use crate::identity::RepositoryIdentity;
use crate::selector::SourceFile;
use crate::structure::RepositoryStructure;

pub const SYSTEM_PROMPT: &str = "You are a technical documentation expert. \
Write clear, accurate README files in Markdown for software repositories, \
based only on the material you are given.";

/// Characters of the existing README that are included in the prompt.
pub const README_EXCERPT_CHARS: usize = 4000;

/// Markdown produced by the completion endpoint, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument(String);

impl GeneratedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GeneratedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub async fn generate<L>(
    identity: &RepositoryIdentity,
    structure: &RepositoryStructure,
    files: &[SourceFile],
    client: &L,
) -> Result<GeneratedDocument>
where
    L: CompletionClient + ?Sized,
{
    if files.is_empty() {
        return Err(RepoDocError::Input(format!(
            "no eligible source files found in {identity}"
        )));
    }

    let prompt = build_prompt(identity, structure, files);
    info!(%identity, files = files.len(), prompt_chars = prompt.len(), "Generating documentation");
    let markdown = client.complete(SYSTEM_PROMPT, &prompt).await?;
    Ok(GeneratedDocument(markdown))
}

pub fn build_prompt(
    identity: &RepositoryIdentity,
    structure: &RepositoryStructure,
    files: &[SourceFile],
) -> String {
    let mut prompt = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(
        prompt,
        "Write a comprehensive README.md for the GitHub repository {identity}."
    );
    let _ = writeln!(
        prompt,
        "Cover what the project does, how to install and use it, and how the code is organised.\n"
    );

    if let Some(description) = structure.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(prompt, "## Repository description\n{description}\n");
    }

    if let Some(readme) = structure.readme.as_deref() {
        let _ = writeln!(
            prompt,
            "## Existing README (excerpt)\n{}\n",
            excerpt(readme, README_EXCERPT_CHARS)
        );
    }

    if let Some(dependencies) = structure
        .package_json
        .as_ref()
        .and_then(|manifest| manifest.get("dependencies"))
    {
        if let Ok(pretty) = serde_json::to_string_pretty(dependencies) {
            let _ = writeln!(prompt, "## Dependencies\n```json\n{pretty}\n```\n");
        }
    }

    let _ = writeln!(prompt, "## Source files");
    for file in files {
        let _ = writeln!(prompt, "\n### {}\n```\n{}\n```", file.path, file.content);
    }
    prompt
}

fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

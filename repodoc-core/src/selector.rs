//! # Source File Selector
//!
//! Walks one subtree of the repository, keeps files that look like source code,
//! ranks them by how likely they are to be an entry point and keeps the first few.
//!
//! The walk is strictly sequential: one listing per directory and one read per
//! admitted file, awaited in traversal order. Directories are expanded in place,
//! so the pre-sort order is depth-first listing order. The priority sort is
//! stable, which makes that traversal order observable in the result; any
//! parallel rewrite of [`walk_directory`] must preserve it.
//!
//! Failures never escape this module. A broken listing or an unreadable file
//! is logged and contributes nothing.

use futures::future::{BoxFuture, FutureExt};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{SelectorConfig, MAX_SOURCE_FILES};
use crate::contract::{ContentClient, DirEntry, EntryKind};
use crate::identity::RepositoryIdentity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

pub async fn select_source_files<C>(
    client: &C,
    identity: &RepositoryIdentity,
    rules: &SelectorConfig,
) -> Vec<SourceFile>
where
    C: ContentClient + ?Sized,
{
    info!(%identity, root = %rules.root, "Selecting source files");
    let candidates = walk_directory(client, identity, rules, rules.root.clone()).await;
    let total = candidates.len();

    let mut selected = rank_by_priority(candidates, &rules.priority);
    selected.truncate(rules.max_files.min(MAX_SOURCE_FILES));

    info!(
        %identity,
        admitted = total,
        selected = selected.len(),
        "Source file selection complete"
    );
    selected
}

/// Whether a file entry is eligible: allowed extension and no excluded substring in its name.
pub fn is_eligible(entry: &DirEntry, rules: &SelectorConfig) -> bool {
    if entry.kind != EntryKind::File {
        return false;
    }
    let extension_allowed = Path::new(&entry.name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| rules.extensions.iter().any(|allowed| allowed == ext));
    extension_allowed && !rules.exclude.iter().any(|fragment| entry.name.contains(fragment.as_str()))
}

/// Stable sort by the index of the first priority fragment found in the path
/// (case-insensitive). Files matching no fragment keep their order and go last.
pub fn rank_by_priority(mut files: Vec<SourceFile>, priority: &[String]) -> Vec<SourceFile> {
    let fragments: Vec<String> = priority.iter().map(|f| f.to_lowercase()).collect();
    files.sort_by_cached_key(|file| {
        let path = file.path.to_lowercase();
        fragments
            .iter()
            .position(|fragment| path.contains(fragment.as_str()))
            .unwrap_or(usize::MAX)
    });
    files
}

fn walk_directory<'a, C>(
    client: &'a C,
    identity: &'a RepositoryIdentity,
    rules: &'a SelectorConfig,
    path: String,
) -> BoxFuture<'a, Vec<SourceFile>>
where
    C: ContentClient + ?Sized,
{
    async move {
        let entries = match client
            .list_directory(&identity.owner, &identity.repo, &path)
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                warn!(%identity, path = %path, error = %e, "Failed to list directory, skipping it");
                return Vec::new();
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            match entry.kind {
                EntryKind::Dir => {
                    let nested = walk_directory(client, identity, rules, entry.path).await;
                    files.extend(nested);
                }
                EntryKind::File if is_eligible(&entry, rules) => {
                    match client
                        .read_file(&identity.owner, &identity.repo, &entry.path)
                        .await
                    {
                        Ok(content) => {
                            debug!(path = %entry.path, bytes = content.len(), "Admitted source file");
                            files.push(SourceFile {
                                path: entry.path,
                                content,
                            });
                        }
                        Err(e) => {
                            warn!(%identity, path = %entry.path, error = %e, "Failed to read source file, skipping it");
                        }
                    }
                }
                _ => debug!(path = %entry.path, "Skipping entry"),
            }
        }
        files
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> SourceFile {
        SourceFile {
            path: path.to_string(),
            content: String::new(),
        }
    }

    fn paths(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn eligibility_checks_extension_and_exclusions() {
        let rules = SelectorConfig::default();
        assert!(is_eligible(&DirEntry::file("src/lib.rs"), &rules));
        assert!(is_eligible(&DirEntry::file("src/App.tsx"), &rules));
        assert!(!is_eligible(&DirEntry::file("src/x.test.js"), &rules));
        assert!(!is_eligible(&DirEntry::file("src/y.config.js"), &rules));
        assert!(!is_eligible(&DirEntry::file("src/api.spec.ts"), &rules));
        assert!(!is_eligible(&DirEntry::file("src/styles.css"), &rules));
        assert!(!is_eligible(&DirEntry::file("src/Makefile"), &rules));
        assert!(!is_eligible(&DirEntry::dir("src/main.js"), &rules));
    }

    #[test]
    fn exclusions_look_at_the_name_only() {
        let rules = SelectorConfig::default();
        assert!(is_eligible(&DirEntry::file("src/testing/util.js"), &rules));
    }

    #[test]
    fn ranks_by_first_matching_fragment_then_keeps_order() {
        let priority = SelectorConfig::default().priority;
        let ranked = rank_by_priority(
            vec![
                file("src/utils.js"),
                file("src/app.jsx"),
                file("src/zeta.js"),
                file("src/main.ts"),
                file("src/index.js"),
            ],
            &priority,
        );
        assert_eq!(
            paths(&ranked),
            ["src/index.js", "src/main.ts", "src/app.jsx", "src/utils.js", "src/zeta.js"]
        );
    }

    #[test]
    fn ranking_is_case_insensitive_and_uses_the_earliest_fragment() {
        let priority = SelectorConfig::default().priority;
        let ranked = rank_by_priority(
            vec![file("src/App.js"), file("src/mainApp.js"), file("src/Index.ts")],
            &priority,
        );
        // mainApp matches both "main" and "app"; "main" wins.
        assert_eq!(paths(&ranked), ["src/Index.ts", "src/mainApp.js", "src/App.js"]);
    }

    #[test]
    fn equal_ranks_keep_input_order() {
        let priority = SelectorConfig::default().priority;
        let ranked = rank_by_priority(
            vec![file("src/b/index.js"), file("src/a/index.js")],
            &priority,
        );
        assert_eq!(paths(&ranked), ["src/b/index.js", "src/a/index.js"]);
    }
}

use std::collections::HashMap;

use repodoc_core::config::SelectorConfig;
use repodoc_core::contract::{DirEntry, EntryKind, MockContentClient};
use repodoc_core::identity::RepositoryIdentity;
use repodoc_core::selector::select_source_files;
use repodoc_core::RepoDocError;

/// A fake repository: directory listings keyed by path. A directory without a
/// listing fails with NotFound, a file listed in `unreadable` fails to read.
fn fake_repo(
    listings: Vec<(&'static str, Vec<DirEntry>)>,
    unreadable: &'static [&'static str],
) -> MockContentClient {
    let listings: HashMap<String, Vec<DirEntry>> = listings
        .into_iter()
        .map(|(path, entries)| (path.to_string(), entries))
        .collect();

    let mut client = MockContentClient::new();
    client
        .expect_list_directory()
        .returning(move |_, _, path| {
            listings
                .get(path)
                .cloned()
                .ok_or_else(|| RepoDocError::NotFound(path.to_string()))
        });
    client.expect_read_file().returning(move |_, _, path| {
        if unreadable.iter().any(|locked| *locked == path) {
            Err(RepoDocError::Transport(format!("cannot read {path}")))
        } else {
            Ok(format!("// body of {path}"))
        }
    });
    client
}

fn identity() -> RepositoryIdentity {
    RepositoryIdentity::new("octo", "widgets")
}

fn paths(files: &[repodoc_core::selector::SourceFile]) -> Vec<&str> {
    files.iter().map(|f| f.path.as_str()).collect()
}

#[tokio::test]
async fn filters_and_ranks_the_canonical_example() {
    let client = fake_repo(
        vec![(
            "src",
            vec![
                DirEntry::file("src/utils.js"),
                DirEntry::file("src/index.js"),
                DirEntry::file("src/app.jsx"),
                DirEntry::file("src/main.ts"),
                DirEntry::file("src/x.test.js"),
                DirEntry::file("src/y.config.js"),
            ],
        )],
        &[],
    );

    let files = select_source_files(&client, &identity(), &SelectorConfig::default()).await;

    assert_eq!(
        paths(&files),
        ["src/index.js", "src/main.ts", "src/app.jsx", "src/utils.js"]
    );
    assert_eq!(files[0].content, "// body of src/index.js");
}

#[tokio::test]
async fn never_returns_more_than_five_files() {
    let mut root: Vec<DirEntry> = (0..8).map(|i| DirEntry::file(&format!("src/mod{i}.rs"))).collect();
    root.push(DirEntry::dir("src/nested"));
    let nested = (0..6).map(|i| DirEntry::file(&format!("src/nested/app{i}.ts"))).collect();

    let client = fake_repo(vec![("src", root), ("src/nested", nested)], &[]);
    let files = select_source_files(&client, &identity(), &SelectorConfig::default()).await;

    assert_eq!(files.len(), 5);
    // The nested app* files rank ahead of everything else.
    assert!(files.iter().all(|f| f.path.starts_with("src/nested/app")), "{:?}", paths(&files));
}

#[tokio::test]
async fn missing_root_yields_no_files() {
    let mut client = MockContentClient::new();
    client
        .expect_list_directory()
        .times(1)
        .returning(|_, _, _| Err(RepoDocError::NotFound("src".into())));
    client.expect_read_file().times(0);

    let files = select_source_files(&client, &identity(), &SelectorConfig::default()).await;
    assert!(files.is_empty());
}

#[tokio::test]
async fn broken_branches_and_unreadable_files_are_skipped() {
    let client = fake_repo(
        vec![
            (
                "src",
                vec![
                    DirEntry::dir("src/broken"),
                    DirEntry::dir("src/lib"),
                    DirEntry::file("src/a.js"),
                    DirEntry::file("src/locked.js"),
                ],
            ),
            ("src/lib", vec![DirEntry::file("src/lib/b.py")]),
        ],
        &["src/locked.js"],
    );

    let files = select_source_files(&client, &identity(), &SelectorConfig::default()).await;
    assert_eq!(paths(&files), ["src/lib/b.py", "src/a.js"]);
}

#[tokio::test]
async fn directories_expand_in_place_depth_first() {
    let client = fake_repo(
        vec![
            (
                "src",
                vec![
                    DirEntry::file("src/z.js"),
                    DirEntry::dir("src/m"),
                    DirEntry::file("src/b.js"),
                ],
            ),
            ("src/m", vec![DirEntry::dir("src/m/deep"), DirEntry::file("src/m/c.js")]),
            ("src/m/deep", vec![DirEntry::file("src/m/deep/d.go")]),
        ],
        &[],
    );

    let files = select_source_files(&client, &identity(), &SelectorConfig::default()).await;
    assert_eq!(
        paths(&files),
        ["src/z.js", "src/m/deep/d.go", "src/m/c.js", "src/b.js"]
    );
}

#[tokio::test]
async fn only_eligible_files_are_fetched() {
    let mut client = MockContentClient::new();
    client.expect_list_directory().returning(|_, _, _| {
        Ok(vec![
            DirEntry::file("src/logo.png"),
            DirEntry::file("src/index.spec.ts"),
            DirEntry {
                name: "vendored".into(),
                path: "src/vendored".into(),
                kind: EntryKind::Other,
            },
            DirEntry::file("src/index.ts"),
        ])
    });
    client
        .expect_read_file()
        .withf(|_, _, path| path.to_string() == "src/index.ts")
        .times(1)
        .returning(|_, _, _| Ok("export {}".into()));

    let files = select_source_files(&client, &identity(), &SelectorConfig::default()).await;
    assert_eq!(paths(&files), ["src/index.ts"]);
}

#[tokio::test]
async fn custom_rules_change_root_and_limit() {
    let client = fake_repo(
        vec![(
            "lib",
            vec![
                DirEntry::file("lib/one.rb"),
                DirEntry::file("lib/two.rb"),
                DirEntry::file("lib/three.rb"),
            ],
        )],
        &[],
    );
    let rules = SelectorConfig {
        root: "lib".into(),
        max_files: 2,
        ..SelectorConfig::default()
    };

    let files = select_source_files(&client, &identity(), &rules).await;
    assert_eq!(paths(&files), ["lib/one.rb", "lib/two.rb"]);
}

#[tokio::test]
async fn configured_limit_cannot_exceed_five() {
    let names = ["a.py", "b.py", "c.py", "d.py", "e.py", "f.py", "g.py"];
    let client = fake_repo(
        vec![(
            "src",
            names
                .iter()
                .map(|name| DirEntry::file(&format!("src/{name}")))
                .collect(),
        )],
        &[],
    );
    let rules = SelectorConfig {
        max_files: 50,
        ..SelectorConfig::default()
    };

    let files = select_source_files(&client, &identity(), &rules).await;
    assert_eq!(files.len(), 5);
}

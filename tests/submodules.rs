// tests/submodules.rs

mod common;

use common::{downloader, listing, MockTransport};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

const APP: &str = "https://api.github.com/repos/org/app/contents";
const LIB: &str = "https://api.github.com/repos/org/lib/contents";

const GITMODULES: &str = "[submodule \"vendor/lib\"]\n\tpath = vendor/lib\n\turl = https://github.com/org/lib.git\n";

fn app_with_lib() -> MockTransport {
    MockTransport::new()
        // The root listing keeps the separator when only a reference is given.
        .with(
            &format!("{APP}/?ref=v2"),
            &listing(&[("main.rs", "file"), (".gitmodules", "file")]),
        )
        .with(&format!("{APP}/main.rs?ref=v2"), "fn main() {}")
        .with(&format!("{APP}/.gitmodules?ref=v2"), GITMODULES)
        .with(LIB, &listing(&[("lib.rs", "file"), ("src", "dir")]))
        .with(&format!("{LIB}/lib.rs"), "pub fn lib() {}")
        .with(&format!("{LIB}/src"), &listing(&[("util.rs", "file")]))
        .with(&format!("{LIB}/src/util.rs"), "pub fn util() {}")
}

#[test]
fn test_submodules_are_downloaded_into_their_paths() -> anyhow::Result<()> {
    let temp = tempdir()?;
    let api = Arc::new(
        MockTransport::new()
            .with(APP, &listing(&[("main.rs", "file"), (".gitmodules", "file")]))
            .with(&format!("{APP}/main.rs"), "fn main() {}")
            .with(&format!("{APP}/.gitmodules"), GITMODULES)
            .with(LIB, &listing(&[("lib.rs", "file"), ("src", "dir")]))
            .with(&format!("{LIB}/lib.rs"), "pub fn lib() {}")
            .with(&format!("{LIB}/src"), &listing(&[("util.rs", "file")]))
            .with(&format!("{LIB}/src/util.rs"), "pub fn util() {}"),
    );
    let d = downloader(api, 4);

    let summary = d.download_directory(
        "https://github.com/org/app",
        "",
        Some(temp.path()),
        None,
        true,
    )?;

    let lib_dir = temp.path().join("vendor").join("lib");
    assert_eq!(fs::read_to_string(temp.path().join(".gitmodules"))?, GITMODULES);
    assert_eq!(fs::read_to_string(lib_dir.join("lib.rs"))?, "pub fn lib() {}");
    assert!(lib_dir.join("src").join("util.rs").is_file());
    assert_eq!(summary.submodules, 1);
    assert_eq!(summary.files, 4);
    Ok(())
}

#[test]
fn test_submodules_are_read_at_their_default_branch() -> anyhow::Result<()> {
    let temp = tempdir()?;
    let api = Arc::new(app_with_lib());
    let d = downloader(api.clone(), 2);

    d.download_directory(
        "https://github.com/org/app",
        "",
        Some(temp.path()),
        Some("v2"),
        true,
    )?;

    let requests = api.requests();
    assert!(requests
        .iter()
        .filter(|u| u.starts_with(APP))
        .all(|u| u.ends_with("?ref=v2")));
    assert!(requests
        .iter()
        .filter(|u| u.starts_with(LIB))
        .all(|u| !u.contains("?ref=")));
    assert!(temp.path().join("vendor/lib/src/util.rs").is_file());
    Ok(())
}

#[test]
fn test_gitmodules_is_not_expanded_without_flag() -> anyhow::Result<()> {
    let temp = tempdir()?;
    let api = Arc::new(
        MockTransport::new()
            .with(APP, &listing(&[(".gitmodules", "file")]))
            .with(&format!("{APP}/.gitmodules"), GITMODULES),
    );
    let d = downloader(api.clone(), 2);

    let summary = d.download_directory(
        "https://github.com/org/app",
        "/",
        Some(temp.path()),
        None,
        false,
    )?;

    assert!(temp.path().join(".gitmodules").is_file());
    assert!(!temp.path().join("vendor").exists());
    assert_eq!(summary.submodules, 0);
    assert!(api.requests().iter().all(|u| !u.starts_with(LIB)));
    Ok(())
}

#[test]
fn test_cyclic_submodules_are_skipped() -> anyhow::Result<()> {
    let temp = tempdir()?;
    let back_to_app = "[submodule \"app\"]\n\tpath = app\n\turl = ../app.git\n";
    let api = Arc::new(
        MockTransport::new()
            .with(APP, &listing(&[(".gitmodules", "file")]))
            .with(&format!("{APP}/.gitmodules"), GITMODULES)
            .with(LIB, &listing(&[(".gitmodules", "file")]))
            .with(&format!("{LIB}/.gitmodules"), back_to_app),
    );
    let d = downloader(api.clone(), 2);

    let summary = d.download_directory(
        "git@github.com:org/app.git",
        "",
        Some(temp.path()),
        None,
        true,
    )?;

    assert_eq!(summary.submodules, 1);
    assert_eq!(api.request_count(APP), 1);
    assert_eq!(
        fs::read_to_string(temp.path().join("vendor/lib/.gitmodules"))?,
        back_to_app
    );
    assert!(!temp.path().join("vendor/lib/app").exists());
    Ok(())
}

#[test]
fn test_submodule_path_escaping_target_is_rejected() {
    let temp = tempdir().unwrap();
    let evil =
        "[submodule \"x\"]\n\tpath = ../../outside\n\turl = https://github.com/org/lib.git\n";
    let api = Arc::new(
        MockTransport::new()
            .with(APP, &listing(&[(".gitmodules", "file")]))
            .with(&format!("{APP}/.gitmodules"), evil),
    );
    let d = downloader(api, 1);

    let result = d.download_directory(
        "https://github.com/org/app",
        "",
        Some(temp.path()),
        None,
        true,
    );

    assert!(matches!(
        result,
        Err(githubdl::Error::UnsafePath { .. })
    ));
}

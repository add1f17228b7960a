//! Checkout tests against throwaway local git repositories.

use skia_dep_tools::config::SyncConfig;
use skia_dep_tools::deps::{Git, SerialStrategy, SyncError, SyncRunner};
use std::path::Path;
use std::process::Command;

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=sync-test", "-c", "user.email=sync-test@example.com"])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git runs");
    assert!(output.status.success(), "git {:?} failed: {}", args, String::from_utf8_lossy(&output.stderr));
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn git_available() -> bool {
    Git::discover(None).is_ok()
}

fn commit(repo: &Path, file: &str, contents: &str) -> String {
    std::fs::write(repo.join(file), contents).unwrap();
    git(repo, &["add", file]);
    git(repo, &["commit", "-q", "-m", file]);
    git(repo, &["rev-parse", "HEAD"])
}

fn upstream(root: &Path, name: &str) -> std::path::PathBuf {
    let repo = root.join(name);
    std::fs::create_dir_all(&repo).unwrap();
    git(&repo, &["init", "-q"]);
    repo
}

fn write_deps(skia: &Path, entries: &[(&str, &Path, &str)]) {
    let mut text = String::from("deps = {\n");
    for (dir, repo, sha) in entries {
        text.push_str(&format!("  \"{}\": \"{}@{}\",\n", dir, repo.display(), sha));
    }
    text.push_str("}\n");
    std::fs::write(skia.join("DEPS"), text).unwrap();
}

fn runner(skia: &Path) -> SyncRunner {
    let config = SyncConfig::new().with_root(skia.to_path_buf()).without_hooks().quiet();
    SyncRunner::with_strategy(config, Box::new(SerialStrategy::with_writer(Box::new(std::io::sink()))))
}

#[test]
fn test_clone_then_update_to_new_commit() {
    if !git_available() {
        return;
    }
    let tmp = tempfile::tempdir().unwrap();
    let skia = tmp.path().join("skia");
    std::fs::create_dir_all(&skia).unwrap();
    let zlib = upstream(tmp.path(), "zlib-upstream");
    let first = commit(&zlib, "zlib.h", "v1");

    write_deps(&skia, &[("third_party/externals/zlib", zlib.as_path(), first.as_str())]);
    let report = runner(&skia).sync_deps().unwrap();

    let checkout = skia.join("third_party/externals/zlib");
    assert_eq!(report.succeeded, 1);
    assert_eq!(git(&checkout, &["rev-parse", "HEAD"]), first);

    // already at the pinned commit
    runner(&skia).sync_deps().unwrap();
    assert_eq!(git(&checkout, &["rev-parse", "HEAD"]), first);

    // new upstream commit needs a fetch
    let second = commit(&zlib, "zlib.h", "v2");
    write_deps(&skia, &[("third_party/externals/zlib", zlib.as_path(), second.as_str())]);
    runner(&skia).sync_deps().unwrap();
    assert_eq!(git(&checkout, &["rev-parse", "HEAD"]), second);
    assert_eq!(std::fs::read_to_string(checkout.join("zlib.h")).unwrap(), "v2");
}

#[test]
fn test_plain_directory_is_left_alone() {
    if !git_available() {
        return;
    }
    let tmp = tempfile::tempdir().unwrap();
    let skia = tmp.path().join("skia");
    let vendored = skia.join("third_party/externals/expat");
    std::fs::create_dir_all(&vendored).unwrap();
    std::fs::write(vendored.join("keep.txt"), "local").unwrap();

    let expat = upstream(tmp.path(), "expat-upstream");
    let sha = commit(&expat, "expat.h", "v1");
    write_deps(&skia, &[("third_party/externals/expat", expat.as_path(), sha.as_str())]);

    runner(&skia).sync_deps().unwrap();

    assert_eq!(std::fs::read_to_string(vendored.join("keep.txt")).unwrap(), "local");
    assert!(!vendored.join("expat.h").exists());
}

#[test]
fn test_one_bad_dependency_fails_after_the_rest_sync() {
    if !git_available() {
        return;
    }
    let tmp = tempfile::tempdir().unwrap();
    let skia = tmp.path().join("skia");
    std::fs::create_dir_all(&skia).unwrap();
    let good = upstream(tmp.path(), "good-upstream");
    let sha = commit(&good, "good.h", "v1");
    let missing = tmp.path().join("no-such-upstream");

    write_deps(
        &skia,
        &[
            ("a_missing", missing.as_path(), "1111111111111111111111111111111111111111"),
            ("b_good", good.as_path(), sha.as_str()),
        ],
    );

    let result = runner(&skia).sync_deps();

    assert!(matches!(result, Err(SyncError::TasksFailed { failed: 1, total: 2 })));
    assert_eq!(git(&skia.join("b_good"), &["rev-parse", "HEAD"]), sha);
}

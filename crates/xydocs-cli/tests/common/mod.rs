#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Create a configured `xydocs` command isolated from the user's config.
#[allow(dead_code)]
pub fn xydocs_cmd(docs_root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("xydocs"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("XYDOCS_CONFIG", docs_root.join(".xydocs-test-config.toml"));
    cmd.env_remove("XYDOCS_BIND");
    cmd.env_remove("XYDOCS_BASE_URL");
    cmd.env("XYDOCS_DOCS_DIR", docs_root);
    cmd.env("NO_COLOR", "1");
    cmd
}

#[allow(dead_code)]
pub fn write_doc(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("doc has a parent")).expect("create doc dir");
    fs::write(path, content).expect("write doc");
}

/// A small documentation tree shaped like the XyPriss docs.
#[allow(dead_code)]
pub fn docs_fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create docs dir");
    let root = dir.path();
    write_doc(root, "README.md", "---\n---\nWelcome to XyPriss.\n");
    write_doc(
        root,
        "guide/intro.md",
        "---\ntitle: Intro\ndescription: First steps with XyPriss\n---\n# Getting started\n\nInstall the package, then read [routing](../guide/routing.md).\n",
    );
    write_doc(
        root,
        "guide/routing.md",
        "# Routing\n\nDefine routes with `app.get`.\n\n```ts\napp.get('/', handler); [[!root|Serves the index]]\n```\n",
    );
    write_doc(
        root,
        "api/system/cpu-monitoring.md",
        "---\ntitle: CPU Monitoring\n---\nRead processor load with the system API.\n",
    );
    dir
}

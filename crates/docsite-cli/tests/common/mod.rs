#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

fn config_home() -> &'static Path {
    static CONFIG_HOME: OnceLock<TempDir> = OnceLock::new();
    CONFIG_HOME
        .get_or_init(|| tempfile::tempdir().expect("failed to create config dir for tests"))
        .path()
}

/// Create a `docsite` command isolated from the user's config and env.
#[allow(dead_code)]
pub fn docsite_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docsite"));
    cmd.timeout(CMD_TIMEOUT);
    let home = config_home();
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home);
    for key in [
        "DOCSITE_CONFIG",
        "DOCSITE_PROFILE",
        "DOCSITE_OWNER",
        "DOCSITE_REPO",
        "DOCSITE_LOCAL_ROOT",
        "DOCSITE_OUTPUT_FORMAT",
    ] {
        cmd.env_remove(key);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// `docsite --local <root>` with the given fixture checkout.
#[allow(dead_code)]
pub fn docsite_local(root: &Path) -> Command {
    let mut cmd = docsite_cmd();
    cmd.arg("--local").arg(root);
    cmd
}

#[allow(dead_code)]
pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Two-branch checkout laid out as `<branch>/docs/...`.
#[allow(dead_code)]
pub fn checkout() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write(
        root,
        "main/docs/README.md",
        "# Hyperfy Docs\n\nStart with [getting started](getting-started.md).\n",
    );
    write(
        root,
        "main/docs/getting-started.md",
        "---\ntitle: Quick Start\n---\n# Getting Started\n\nRead the [networking guide](guide/networking.md).\n",
    );
    write(root, "main/docs/guide/README.md", "# Guide\n\nOverview of the guide.\n");
    write(
        root,
        "main/docs/guide/networking.md",
        "# Networking\n\n## Peers\n\nPeers exchange snapshots. See [intro](../intro.md).\n",
    );
    write(root, "main/docs/_drafts/secret.md", "# Secret networking plans\n");
    write(root, "dev/docs/README.md", "# Dev Docs\n\nExperimental scripting layer.\n");
    write(
        root,
        "dev/docs/scripting.md",
        "# Scripting\n\nSee the [home page](README.md).\n",
    );

    tmp
}

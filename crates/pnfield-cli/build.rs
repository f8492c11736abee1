//! Stamps `pnfield --version` with the commit and commit date it was built from.

use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";
const SHORT_COMMIT_LEN: usize = 7;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");

    let commit = env::var("GITHUB_SHA")
        .ok()
        .map(|sha| sha.trim().chars().take(SHORT_COMMIT_LEN).collect::<String>())
        .filter(|sha| !sha.is_empty())
        .or_else(|| git(&["rev-parse", &format!("--short={SHORT_COMMIT_LEN}"), "HEAD"]));
    let date = git(&["log", "-1", "--format=%cs"]);

    println!(
        "cargo:rustc-env=PNFIELD_BUILD_COMMIT={}",
        commit.as_deref().unwrap_or(UNKNOWN)
    );
    println!(
        "cargo:rustc-env=PNFIELD_BUILD_DATE={}",
        date.as_deref().unwrap_or(UNKNOWN)
    );
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8(output.stdout).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

//! Embeds build identity for the startup log line
//!
//! Sets `GIT_HASH`, `BUILD_TIMESTAMP` and `BUILD_PROFILE` for `env!`.

use std::process::Command;

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}

fn main() {
    let git_hash = git_short_hash().unwrap_or_else(|| "unknown".to_string());
    let built_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    for (key, value) in [
        ("GIT_HASH", git_hash.as_str()),
        ("BUILD_TIMESTAMP", built_at.as_str()),
        ("BUILD_PROFILE", profile.as_str()),
    ] {
        println!("cargo:rustc-env={}={}", key, value);
    }
}

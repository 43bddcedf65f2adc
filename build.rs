use std::env;
use std::process::Command;

// Everything here ends up in the one-line `member_form_cli version` output.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    println!("cargo:rustc-env=MEMBER_FORM_BUILD_COMMIT={}", commit_label());

    let built_on = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=MEMBER_FORM_BUILD_DATE={built_on}");

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown-target".into());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown-profile".into());
    println!("cargo:rustc-env=MEMBER_FORM_BUILD_TARGET={target} {profile}");
}

/// Short commit hash, suffixed with `-dirty` when the work tree has changes.
fn commit_label() -> String {
    let Some(hash) = git(&["rev-parse", "--short", "HEAD"]).filter(|hash| !hash.is_empty()) else {
        return "unknown".into();
    };
    match git(&["status", "--porcelain"]) {
        Some(status) if !status.is_empty() => format!("{hash}-dirty"),
        _ => hash,
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}

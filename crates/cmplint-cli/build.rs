use std::process::Command;

/// Commit the binary was built from; `CMPLINT_GIT_HASH` wins for source
/// tarballs without a `.git` directory.
fn git_hash() -> String {
    if let Ok(hash) = std::env::var("CMPLINT_GIT_HASH") {
        return hash;
    }
    Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    println!("cargo:rustc-env=GIT_HASH={}", git_hash());
    println!("cargo:rerun-if-env-changed=CMPLINT_GIT_HASH");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");
}

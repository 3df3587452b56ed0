//! Build script: embeds the version string into the binary.

use std::process::Command;

fn main() {
    // Prefer SPARSE_STORE_VERSION if set (release builds), otherwise fall back
    // to git describe for local development builds.
    if let Ok(version) = std::env::var("SPARSE_STORE_VERSION") {
        println!("cargo:rustc-env=SPARSE_STORE_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=SPARSE_STORE_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/refs/");
    println!("cargo:rerun-if-env-changed=SPARSE_STORE_VERSION");
}

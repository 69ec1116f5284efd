use std::process::Command;

/// Run git and return trimmed stdout, or `None` outside a checkout.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    // Uncommitted changes to tracked files get a build timestamp
    let dirty = Command::new("git")
        .args(["diff", "--quiet", "HEAD"])
        .status()
        .map(|s| !s.success())
        .unwrap_or(false);

    let build_hash = if dirty {
        format!("{hash}-dirty-{}", chrono::Local::now().format("%Y%m%d-%H%M%S"))
    } else {
        hash
    };
    println!("cargo:rustc-env=BUILD_HASH={build_hash}");

    // .git lives at the workspace root
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");
}

//! Embeds the git revision and build date for `akwaaba --version`.

fn main() {
    // Release builds from a tarball have no .git; they can pass the revision in.
    let git_hash = std::env::var("AKWAABA_GIT_HASH")
        .ok()
        .filter(|h| !h.trim().is_empty())
        .or_else(|| {
            std::process::Command::new("git")
                .args(["rev-parse", "--short", "HEAD"])
                .output()
                .ok()
                .filter(|o| o.status.success())
                .and_then(|o| String::from_utf8(o.stdout).ok())
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=GIT_HASH={}", git_hash);

    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=BUILD_DATE={}", build_date);

    println!("cargo:rerun-if-env-changed=AKWAABA_GIT_HASH");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
}

use std::process::Command;

fn main() {
    tauri_build::build();

    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output();

    match output {
        Ok(out) if out.status.success() => {
            let git_hash = String::from_utf8_lossy(&out.stdout).trim().to_string();
            println!("cargo:rustc-env=GIT_COMMIT_HASH={}", git_hash);
        }
        _ => {
            println!("cargo:rustc-env=GIT_COMMIT_HASH=unknown");
        }
    }

    let build_time = chrono::Utc::now().to_rfc3339();
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);
}

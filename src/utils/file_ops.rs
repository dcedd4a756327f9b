use std::fs;
use std::path::{Path, PathBuf};

pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn app_dir() -> PathBuf {
    exe_dir().join("PackScope")
}

pub fn app_subdir<P: AsRef<Path>>(rel: P) -> PathBuf {
    app_dir().join(rel)
}

pub fn create_initial_directories() {
    let dirs = [app_dir(), app_subdir("logs"), app_subdir("config")];

    for dir in dirs {
        if let Err(e) = fs::create_dir_all(&dir) {
            eprintln!("Failed to create directory '{}': {}", dir.display(), e);
        }
    }
}

use std::path::PathBuf;

use crate::config::config::read_config;
use crate::core::paths::ScanRoots;
use crate::core::worlds::inventory::{list_worlds, world_details, WorldDetail, WorldSummary};

#[tauri::command]
pub async fn scan_worlds() -> Result<Vec<WorldSummary>, String> {
    let config = read_config().map_err(|e| format!("Failed to read config: {}", e))?;
    let roots = ScanRoots::resolve(&config);

    list_worlds(&roots).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_world_details(path: String) -> Result<WorldDetail, String> {
    let config = read_config().map_err(|e| format!("Failed to read config: {}", e))?;
    let roots = ScanRoots::resolve(&config);

    world_details(&roots, &PathBuf::from(path))
        .await
        .map_err(|e| e.to_string())
}

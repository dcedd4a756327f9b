use crate::utils::app_info;

#[tauri::command]
pub fn get_app_version() -> String {
    app_info::get_version().to_string()
}

#[tauri::command]
pub fn get_full_build_info() -> serde_json::Value {
    serde_json::json!({
        "version": app_info::get_version(),
        "gitCommit": app_info::get_git_commit(),
        "buildTime": app_info::get_build_time(),
    })
}

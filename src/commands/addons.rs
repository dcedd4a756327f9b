use tracing::error;

use crate::config::config::read_config;
use crate::core::addons::discovery::scan_scope;
use crate::core::addons::manifest::AddonRecord;
use crate::core::paths::{ScanRoots, ScanScope};
use crate::result::CoreError;

/// 按范围扫描插件。
///
/// 约定：范围级失败不向前端抛错，而是返回一条 name 为 "Error" 的
/// 占位记录替代整张列表。
#[tauri::command]
pub async fn scan_addons(scope: String) -> Vec<AddonRecord> {
    let Some(parsed) = ScanScope::parse(&scope) else {
        error!("Rejected addon scan with unknown scope: {}", scope);
        let err = CoreError::UnknownScope(scope);
        return vec![AddonRecord::error_placeholder(err.to_string())];
    };

    let config = match read_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to read config for addon scan: {}", e);
            return vec![AddonRecord::error_placeholder(e.to_string())];
        }
    };
    let roots = ScanRoots::resolve(&config);

    match scan_scope(&roots, parsed).await {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to scan {:?}: {}", parsed, e);
            vec![AddonRecord::error_placeholder(e.to_string())]
        }
    }
}

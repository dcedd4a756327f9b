use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use tokio::fs as tokio_fs;
use tracing::{info, warn};

use crate::core::addons::manifest::{read_addon, read_addon_with_identity, AddonRecord};
use crate::core::paths::{ScanRoots, ScanScope};
use crate::result::CoreError;

/// 并发上限：纯 IO 场景，放宽到 CPU 数的 8 倍
fn fanout_limit() -> usize {
    std::cmp::max(1, num_cpus::get() * 8)
}

/// 列出一个根目录下的直接子目录（非目录条目忽略）。
/// 根目录不存在按约定跳过（warn 级别），其它 IO 错误向上传播。
async fn list_addon_folders(root: &Path) -> Result<Vec<PathBuf>, CoreError> {
    let mut folders = Vec::new();

    let mut rd = match tokio_fs::read_dir(root).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Directory not found, skipping: {}", root.display());
            return Ok(folders);
        }
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = rd.next_entry().await? {
        if entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false)
        {
            folders.push(entry.path());
        }
    }

    Ok(folders)
}

/// 按扫描范围枚举插件。
///
/// 范围内任何一个根目录出现非 NotFound 的列目录错误，整个范围的扫描
/// 判为失败，已读到的部分结果一并丢弃。manifest 的读取在收集完候选
/// 目录后统一并发展开，.buffered 保证输出顺序对同一份文件系统快照稳定。
pub async fn scan_scope(
    roots: &ScanRoots,
    scope: ScanScope,
) -> Result<Vec<AddonRecord>, CoreError> {
    let mut folders: Vec<PathBuf> = Vec::new();
    for root in roots.scope_roots(scope) {
        info!("Scanning directory: {}", root.display());
        folders.extend(list_addon_folders(&root).await?);
    }

    let records: Vec<AddonRecord> = stream::iter(folders)
        .map(|folder| async move { read_addon(&folder).await })
        .buffered(fanout_limit())
        .filter_map(|record| async move { record })
        .collect()
        .await;

    info!("Found {} valid addons in {:?}.", records.len(), scope);
    Ok(records)
}

/// 汇总所有已知根目录下的插件全集（带 uuid/version 身份信息），
/// 供世界包引用匹配使用。这条路径对单个根目录的失败一律容忍。
///
/// 同一个 uuid 出现在多个目录时全集保留每条记录，匹配方取首个命中，
/// 先后顺序由根目录枚举顺序决定。
pub async fn all_addons(roots: &ScanRoots) -> Vec<AddonRecord> {
    let mut folders: Vec<PathBuf> = Vec::new();
    for root in roots.all_roots() {
        match list_addon_folders(&root).await {
            Ok(found) => folders.extend(found),
            Err(e) => warn!("Skipping addon root {}: {}", root.display(), e),
        }
    }

    stream::iter(folders)
        .map(|folder| async move { read_addon_with_identity(&folder).await })
        .buffered(fanout_limit())
        .filter_map(|record| async move { record })
        .collect()
        .await
}

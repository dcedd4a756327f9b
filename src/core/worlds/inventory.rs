use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio::fs as tokio_fs;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::core::addons::discovery::all_addons;
use crate::core::paths::ScanRoots;
use crate::core::worlds::packs::{reconcile_world_packs, WorldPackRef};
use crate::result::CoreError;

/// 世界列表条目。每次扫描都重新构建，不做任何缓存。
#[derive(Debug, Serialize, Clone)]
pub struct WorldSummary {
    pub name: String,
    pub path: String,
    pub icon: Option<String>,
}

/// 世界详情：统计信息 + 两类包引用的匹配结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldDetail {
    pub name: String,
    pub path: String,
    pub icon: Option<String>,
    pub last_modified: String,
    #[serde(rename = "sizeInMB")]
    pub size_in_mb: String,
    pub behavior_packs: Vec<WorldPackRef>,
    pub resource_packs: Vec<WorldPackRef>,
}

fn systemtime_to_iso(t: SystemTime) -> String {
    let dt: DateTime<Utc> = t.into();
    dt.to_rfc3339()
}

/// 用 walkdir 在阻塞线程里汇总目录下所有普通文件的大小。
/// 单个条目 stat 失败只跳过，不影响总数。
async fn dir_size(path: &Path) -> Result<u64, CoreError> {
    let path = path.to_path_buf();
    let size = tokio::task::spawn_blocking(move || {
        let mut total: u64 = 0;
        for entry in WalkDir::new(&path)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if let Ok(md) = entry.metadata() {
                if md.is_file() {
                    total = total.saturating_add(md.len());
                }
            }
        }
        total
    })
    .await?;

    Ok(size)
}

async fn read_world_summary(world_path: PathBuf) -> Option<WorldSummary> {
    // levelname.txt 读不出来就跳过这个世界，整体扫描继续
    let name = match tokio_fs::read_to_string(world_path.join("levelname.txt")).await {
        Ok(content) => content.trim().to_string(),
        Err(_) => {
            warn!(
                "Could not read levelname.txt for {}, skipping.",
                world_path.display()
            );
            return None;
        }
    };

    let icon_path = world_path.join("world_icon.jpeg");
    let icon = if tokio_fs::metadata(&icon_path).await.is_ok() {
        Some(format!("file://{}", icon_path.display()))
    } else {
        None
    };

    Some(WorldSummary {
        name,
        path: world_path.to_string_lossy().into_owned(),
        icon,
    })
}

/// 枚举 BDS worlds 目录下的世界
pub async fn list_worlds(roots: &ScanRoots) -> Result<Vec<WorldSummary>, CoreError> {
    let Some(worlds_root) = roots.worlds_root() else {
        return Err(CoreError::Config(
            "Bedrock server directory is not configured".to_string(),
        ));
    };
    info!("Scanning for worlds in: {}", worlds_root.display());

    let mut folders: Vec<PathBuf> = Vec::new();
    let mut rd = tokio_fs::read_dir(&worlds_root).await?;
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

    let limit = std::cmp::max(1, num_cpus::get() * 8);
    let worlds: Vec<WorldSummary> = stream::iter(folders)
        .map(read_world_summary)
        .buffered(limit)
        .filter_map(|world| async move { world })
        .collect()
        .await;

    info!("Found {} worlds.", worlds.len());
    Ok(worlds)
}

/// 读取单个世界的详情。
///
/// 插件全集只扫一遍，行为包和资源包的匹配共用同一份结果。
pub async fn world_details(
    roots: &ScanRoots,
    world_path: &Path,
) -> Result<WorldDetail, CoreError> {
    info!("Getting details for world: {}", world_path.display());

    let md = tokio_fs::metadata(world_path).await?;
    let levelname = tokio_fs::read_to_string(world_path.join("levelname.txt")).await?;

    let icon_path = world_path.join("world_icon.jpeg");
    let icon = if tokio_fs::metadata(&icon_path).await.is_ok() {
        Some(format!("file://{}", icon_path.display()))
    } else {
        None
    };

    let total_size = dir_size(world_path).await?;

    let universe = all_addons(roots).await;
    let behavior_packs =
        reconcile_world_packs(world_path, "world_behavior_packs.json", &universe).await;
    let resource_packs =
        reconcile_world_packs(world_path, "world_resource_packs.json", &universe).await;

    let last_modified = md.modified().map(systemtime_to_iso).unwrap_or_default();

    Ok(WorldDetail {
        name: levelname.trim().to_string(),
        path: world_path.to_string_lossy().into_owned(),
        icon,
        last_modified,
        size_in_mb: format!("{:.2}", total_size as f64 / (1024.0 * 1024.0)),
        behavior_packs,
        resource_packs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn bds_roots(bds: &Path) -> ScanRoots {
        ScanRoots {
            local_state: None,
            bedrock_server: Some(bds.to_path_buf()),
        }
    }

    fn make_world(worlds_dir: &Path, folder: &str, levelname: Option<&str>) -> PathBuf {
        let world = worlds_dir.join(folder);
        fs::create_dir_all(&world).unwrap();
        if let Some(name) = levelname {
            fs::write(world.join("levelname.txt"), name).unwrap();
        }
        world
    }

    #[tokio::test]
    async fn world_name_is_trimmed_and_icon_absent() {
        let tmp = TempDir::new().unwrap();
        let worlds = tmp.path().join("worlds");
        make_world(&worlds, "w1", Some("My World\n"));

        let result = list_worlds(&bds_roots(tmp.path())).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "My World");
        assert!(result[0].icon.is_none());
    }

    #[tokio::test]
    async fn world_without_levelname_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let worlds = tmp.path().join("worlds");
        make_world(&worlds, "good", Some("Good World"));
        make_world(&worlds, "broken", None);

        let result = list_worlds(&bds_roots(tmp.path())).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Good World");
    }

    #[tokio::test]
    async fn world_icon_probe_produces_file_uri() {
        let tmp = TempDir::new().unwrap();
        let worlds = tmp.path().join("worlds");
        let world = make_world(&worlds, "w1", Some("Iconic"));
        fs::write(world.join("world_icon.jpeg"), b"jpeg").unwrap();

        let result = list_worlds(&bds_roots(tmp.path())).await.unwrap();
        let icon = result[0].icon.as_deref().unwrap();
        assert!(icon.starts_with("file://"));
        assert!(icon.ends_with("world_icon.jpeg"));
    }

    #[tokio::test]
    async fn unconfigured_server_dir_is_an_error() {
        let roots = ScanRoots {
            local_state: None,
            bedrock_server: None,
        };
        assert!(list_worlds(&roots).await.is_err());
    }

    #[tokio::test]
    async fn details_report_size_and_missing_packs() {
        let tmp = TempDir::new().unwrap();
        let worlds = tmp.path().join("worlds");
        let world = make_world(&worlds, "w1", Some("Detailed World\n"));

        // 2 MiB 的区块数据，分散在子目录里
        let db = world.join("db");
        fs::create_dir_all(&db).unwrap();
        fs::write(db.join("000001.ldb"), vec![0u8; 2 * 1024 * 1024]).unwrap();

        fs::write(
            world.join("world_behavior_packs.json"),
            r#"[{"pack_id": "gone", "version": [3, 2, 1]}]"#,
        )
        .unwrap();

        let detail = world_details(&bds_roots(tmp.path()), &world).await.unwrap();
        assert_eq!(detail.name, "Detailed World");
        assert_eq!(detail.size_in_mb, "2.00");
        assert!(!detail.last_modified.is_empty());
        assert_eq!(detail.behavior_packs.len(), 1);
        assert!(detail.behavior_packs[0].missing);
        assert_eq!(detail.behavior_packs[0].version, "3.2.1");
        assert!(detail.resource_packs.is_empty());
    }

    #[tokio::test]
    async fn details_resolve_installed_packs_by_uuid() {
        let tmp = TempDir::new().unwrap();
        let worlds = tmp.path().join("worlds");
        let world = make_world(&worlds, "w1", Some("Linked World"));

        // BDS 根下装一个带身份信息的行为包
        let pack = tmp.path().join("behavior_packs").join("my_pack");
        fs::create_dir_all(&pack).unwrap();
        fs::write(
            pack.join("manifest.json"),
            r#"{"header": {"name": "My Pack", "description": "D", "uuid": "u-42", "version": [1, 2, 0]}}"#,
        )
        .unwrap();

        fs::write(
            world.join("world_behavior_packs.json"),
            r#"[{"pack_id": "u-42", "version": [1, 2, 0]}]"#,
        )
        .unwrap();

        let detail = world_details(&bds_roots(tmp.path()), &world).await.unwrap();
        assert_eq!(detail.behavior_packs.len(), 1);
        let pack_ref = &detail.behavior_packs[0];
        assert!(!pack_ref.missing);
        assert_eq!(pack_ref.name, "My Pack");
        assert_eq!(pack_ref.version, "1.2.0");
        assert!(pack_ref.path.is_some());
    }
}

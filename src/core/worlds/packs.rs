use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs as tokio_fs;
use tracing::warn;

use crate::core::addons::manifest::AddonRecord;

/// 世界目录里 world_behavior_packs.json / world_resource_packs.json 的条目
#[derive(Debug, Deserialize)]
pub struct WorldPackEntry {
    pub pack_id: String,
    #[serde(default)]
    pub version: Vec<i64>,
}

/// 世界引用的包：要么匹配到了已安装插件，要么是缺失占位
#[derive(Debug, Serialize, Clone)]
pub struct WorldPackRef {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub uuid: String,
    pub version: String,
    pub missing: bool,
}

fn join_version(version: &[i64]) -> String {
    version
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// 读取世界的包引用文件并逐条对照插件全集。
///
/// 引用文件缺失是常态（结果为空列表）；读不出来或解析失败只记 warn。
/// 输出顺序必须与引用文件中的数组顺序一致，加载顺序会影响游戏行为。
pub async fn reconcile_world_packs(
    world_path: &Path,
    file_name: &str,
    universe: &[AddonRecord],
) -> Vec<WorldPackRef> {
    let refs_path = world_path.join(file_name);
    let raw = match tokio_fs::read_to_string(&refs_path).await {
        Ok(s) => s,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                warn!(
                    "Could not read {} for {}: {}",
                    file_name,
                    world_path.display(),
                    e
                );
            }
            return Vec::new();
        }
    };

    let entries: Vec<WorldPackEntry> = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(
                "Could not parse {} for {}: {}",
                file_name,
                world_path.display(),
                e
            );
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .map(|entry| {
            let found = universe
                .iter()
                .find(|addon| addon.uuid.as_deref() == Some(entry.pack_id.as_str()));

            match found {
                Some(addon) => WorldPackRef {
                    name: addon.name.clone(),
                    description: addon.description.clone(),
                    icon: addon.icon.clone(),
                    path: Some(addon.path.clone()),
                    uuid: entry.pack_id,
                    version: addon.version.clone().unwrap_or_default(),
                    missing: false,
                },
                None => WorldPackRef {
                    name: "Missing Pack".to_string(),
                    description: format!("UUID: {}", entry.pack_id),
                    icon: None,
                    path: None,
                    uuid: entry.pack_id,
                    version: join_version(&entry.version),
                    missing: true,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn addon(uuid: &str, name: &str) -> AddonRecord {
        AddonRecord {
            name: name.to_string(),
            description: format!("{} description", name),
            icon: None,
            path: format!("/packs/{}", name),
            uuid: Some(uuid.to_string()),
            version: Some("1.0.0".to_string()),
        }
    }

    #[tokio::test]
    async fn missing_reference_file_yields_empty_list() {
        let tmp = TempDir::new().unwrap();
        let refs = reconcile_world_packs(tmp.path(), "world_behavior_packs.json", &[]).await;
        assert!(refs.is_empty());
    }

    #[tokio::test]
    async fn unparseable_reference_file_yields_empty_list() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("world_resource_packs.json"), "[ broken").unwrap();
        let refs = reconcile_world_packs(tmp.path(), "world_resource_packs.json", &[]).await;
        assert!(refs.is_empty());
    }

    #[tokio::test]
    async fn unmatched_reference_becomes_missing_stub() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("world_behavior_packs.json"),
            r#"[{"pack_id": "X", "version": [1, 0]}]"#,
        )
        .unwrap();

        let refs = reconcile_world_packs(tmp.path(), "world_behavior_packs.json", &[]).await;
        assert_eq!(refs.len(), 1);
        assert!(refs[0].missing);
        assert_eq!(refs[0].name, "Missing Pack");
        assert_eq!(refs[0].description, "UUID: X");
        assert_eq!(refs[0].uuid, "X");
        assert_eq!(refs[0].version, "1.0");
        assert!(refs[0].icon.is_none());
    }

    #[tokio::test]
    async fn output_preserves_reference_file_order() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("world_behavior_packs.json"),
            r#"[
                {"pack_id": "B", "version": [2, 0]},
                {"pack_id": "A", "version": [1, 0]}
            ]"#,
        )
        .unwrap();

        let universe = vec![addon("A", "Alpha"), addon("B", "Beta")];
        let refs =
            reconcile_world_packs(tmp.path(), "world_behavior_packs.json", &universe).await;
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name, "Beta");
        assert_eq!(refs[1].name, "Alpha");
        assert!(!refs[0].missing);
        assert!(refs[0].path.is_some());
    }

    // 同一 uuid 有多个安装副本时行为未定义，这里固定当前实现：取全集中的首个命中
    #[tokio::test]
    async fn duplicate_uuid_resolves_to_first_universe_entry() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("world_behavior_packs.json"),
            r#"[{"pack_id": "D", "version": [1, 0]}]"#,
        )
        .unwrap();

        let universe = vec![addon("D", "First Copy"), addon("D", "Second Copy")];
        let refs =
            reconcile_world_packs(tmp.path(), "world_behavior_packs.json", &universe).await;
        assert_eq!(refs[0].name, "First Copy");
    }
}

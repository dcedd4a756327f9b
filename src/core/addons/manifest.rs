use std::io::ErrorKind;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::fs as tokio_fs;
use tracing::warn;

use super::lang::parse_lang;

/// manifest.json 的 header 结构（字段全部可选，宽松解析）
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Header {
    pub name: Option<String>,
    pub description: Option<String>,
    pub uuid: Option<String>,
    pub version: Option<Vec<u32>>,
    pub min_engine_version: Option<Vec<u32>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Manifest {
    pub format_version: Option<u32>,
    pub header: Option<Header>,
}

/// 返回给前端的插件记录。name 和 description 已经完成本地化替换
/// 和颜色代码清理；uuid/version 只在 "全部插件" 扫描里填充。
#[derive(Debug, Serialize, Clone)]
pub struct AddonRecord {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl AddonRecord {
    /// 范围级扫描失败时替代整张列表的占位记录
    pub fn error_placeholder(message: impl Into<String>) -> Self {
        AddonRecord {
            name: "Error".to_string(),
            description: message.into(),
            icon: None,
            path: String::new(),
            uuid: None,
            version: None,
        }
    }
}

// Minecraft 颜色/格式代码：§ 后跟一位十六进制或 k/l/m/n/o/r
static COLOR_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new("§[0-9a-fk-or]").unwrap());

pub fn strip_color_codes(s: &str) -> String {
    COLOR_CODE_RE.replace_all(s, "").into_owned()
}

fn join_version(version: &[u32]) -> String {
    version
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// 读取单个插件目录的 manifest 并组装记录。
///
/// 返回 None 表示 "这不是一个插件"：目录没有 manifest.json 很常见，
/// 按约定不算错误；其它读取 / 解析失败记一条 warn 后同样返回 None。
pub async fn read_addon(folder: &Path) -> Option<AddonRecord> {
    let manifest_path = folder.join("manifest.json");
    let raw = match tokio_fs::read_to_string(&manifest_path).await {
        Ok(s) => s,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                warn!("Could not read manifest for {}: {}", folder.display(), e);
            }
            return None;
        }
    };

    let manifest: Manifest = match serde_json::from_str(&raw) {
        Ok(m) => m,
        Err(e) => {
            warn!("Could not parse manifest for {}: {}", folder.display(), e);
            return None;
        }
    };

    let header = manifest.header.unwrap_or_default();
    let mut name = header.name.unwrap_or_else(|| "Unknown".to_string());
    let mut description = header
        .description
        .unwrap_or_else(|| "No description".to_string());

    // pack. 前缀表示这是本地化 key，用 texts/en_US.lang 解析；
    // lang 文件缺失或 key 不存在时保留原始占位串
    if name.starts_with("pack.") || description.starts_with("pack.") {
        let lang_path = folder.join("texts").join("en_US.lang");
        match tokio_fs::read_to_string(&lang_path).await {
            Ok(data) => {
                let lang_map = parse_lang(&data);
                if name.starts_with("pack.") {
                    if let Some(resolved) = lang_map.get(&name) {
                        name = resolved.clone();
                    }
                }
                if description.starts_with("pack.") {
                    if let Some(resolved) = lang_map.get(&description) {
                        description = resolved.clone();
                    }
                }
            }
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!("Could not read lang file for {}: {}", folder.display(), e);
                }
            }
        }
    }

    // pack_icon.png 只做存在性探测，探测失败不算错误
    let icon_path = folder.join("pack_icon.png");
    let icon = if tokio_fs::metadata(&icon_path).await.is_ok() {
        Some(format!("file://{}", icon_path.display()))
    } else {
        None
    };

    Some(AddonRecord {
        name: strip_color_codes(&name),
        description: strip_color_codes(&description),
        icon,
        path: folder.to_string_lossy().into_owned(),
        uuid: None,
        version: None,
    })
}

/// "全部插件" 扫描使用的变体：二次读取 manifest 取 uuid 和 version。
/// 身份信息是世界包引用匹配的前提，取不到就整条丢弃。
pub async fn read_addon_with_identity(folder: &Path) -> Option<AddonRecord> {
    let mut record = read_addon(folder).await?;

    let raw = tokio_fs::read_to_string(folder.join("manifest.json")).await.ok()?;
    let manifest: Manifest = serde_json::from_str(&raw).ok()?;
    let header = manifest.header?;

    record.uuid = Some(header.uuid?);
    record.version = Some(join_version(&header.version?));
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, json: &str) {
        fs::write(dir.join("manifest.json"), json).unwrap();
    }

    #[test]
    fn color_code_stripping_is_idempotent() {
        let raw = "§lBold §aGreen§r plain §k";
        let once = strip_color_codes(raw);
        let twice = strip_color_codes(&once);
        assert_eq!(once, "Bold Green plain §k");
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn folder_without_manifest_is_not_an_addon() {
        let tmp = TempDir::new().unwrap();
        assert!(read_addon(tmp.path()).await.is_none());
    }

    #[tokio::test]
    async fn unparseable_manifest_is_not_an_addon() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), "{ not json");
        assert!(read_addon(tmp.path()).await.is_none());
    }

    #[tokio::test]
    async fn missing_name_defaults_to_unknown() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), r#"{"format_version": 2, "header": {}}"#);
        let record = read_addon(tmp.path()).await.unwrap();
        assert_eq!(record.name, "Unknown");
        assert_eq!(record.description, "No description");
        assert!(record.icon.is_none());
    }

    #[tokio::test]
    async fn localized_fields_are_resolved_from_lang_file() {
        let tmp = TempDir::new().unwrap();
        write_manifest(
            tmp.path(),
            r#"{"header": {"name": "pack.name", "description": "pack.description"}}"#,
        );
        fs::create_dir_all(tmp.path().join("texts")).unwrap();
        fs::write(
            tmp.path().join("texts").join("en_US.lang"),
            "pack.name=§bShiny Pack\npack.description=It has = signs = inside\n",
        )
        .unwrap();

        let record = read_addon(tmp.path()).await.unwrap();
        assert_eq!(record.name, "Shiny Pack");
        assert_eq!(record.description, "It has = signs = inside");
    }

    #[tokio::test]
    async fn unresolved_lang_key_keeps_placeholder() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), r#"{"header": {"name": "pack.name"}}"#);
        // 没有 texts/en_US.lang
        let record = read_addon(tmp.path()).await.unwrap();
        assert_eq!(record.name, "pack.name");

        // lang 文件存在但没有对应 key，同样保留占位串
        fs::create_dir_all(tmp.path().join("texts")).unwrap();
        fs::write(tmp.path().join("texts").join("en_US.lang"), "other.key=x\n").unwrap();
        let record = read_addon(tmp.path()).await.unwrap();
        assert_eq!(record.name, "pack.name");
    }

    #[tokio::test]
    async fn icon_probe_produces_file_uri() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), r#"{"header": {"name": "A"}}"#);
        fs::write(tmp.path().join("pack_icon.png"), b"png").unwrap();

        let record = read_addon(tmp.path()).await.unwrap();
        let icon = record.icon.unwrap();
        assert!(icon.starts_with("file://"));
        assert!(icon.ends_with("pack_icon.png"));
    }

    #[tokio::test]
    async fn identity_pass_joins_version_with_dots() {
        let tmp = TempDir::new().unwrap();
        write_manifest(
            tmp.path(),
            r#"{"header": {"name": "A", "uuid": "aaaa-bbbb", "version": [1, 2, 3]}}"#,
        );
        let record = read_addon_with_identity(tmp.path()).await.unwrap();
        assert_eq!(record.uuid.as_deref(), Some("aaaa-bbbb"));
        assert_eq!(record.version.as_deref(), Some("1.2.3"));
    }

    #[tokio::test]
    async fn identity_pass_drops_record_without_uuid() {
        let tmp = TempDir::new().unwrap();
        write_manifest(tmp.path(), r#"{"header": {"name": "A", "version": [1, 0]}}"#);
        assert!(read_addon_with_identity(tmp.path()).await.is_none());
    }
}

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::config::Config;

/// 扫描范围（前端传 snake_case 字符串）
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScanScope {
    PremiumCache,
    DevelopmentBehaviorPacks,
    DevelopmentResourcePacks,
}

impl ScanScope {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "premium_cache" => Some(ScanScope::PremiumCache),
            "development_behavior_packs" => Some(ScanScope::DevelopmentBehaviorPacks),
            "development_resource_packs" => Some(ScanScope::DevelopmentResourcePacks),
            _ => None,
        }
    }
}

/// 标准化的扫描根目录集合。
///
/// 在每次调用时由配置 + 环境变量解析出来，随后显式传给扫描逻辑，
/// 不读取任何全局可变状态。
#[derive(Debug, Clone, Default)]
pub struct ScanRoots {
    /// UWP 的 LocalState 目录（下含 games/com.mojang 与 premium_cache）
    pub local_state: Option<PathBuf>,
    /// 专用服务器 (BDS) 安装目录
    pub bedrock_server: Option<PathBuf>,
}

impl ScanRoots {
    pub fn resolve(config: &Config) -> Self {
        let data_dir = config.paths.minecraft_data_dir.trim();
        let local_state = if data_dir.is_empty() {
            default_uwp_local_state()
        } else {
            Some(PathBuf::from(data_dir))
        };

        let bds_dir = config.paths.bedrock_server_dir.trim();
        let bedrock_server = if bds_dir.is_empty() {
            None
        } else {
            Some(PathBuf::from(bds_dir))
        };

        ScanRoots {
            local_state,
            bedrock_server,
        }
    }

    fn com_mojang(&self) -> Option<PathBuf> {
        self.local_state
            .as_ref()
            .map(|p| p.join("games").join("com.mojang"))
    }

    fn premium_cache(&self) -> Option<PathBuf> {
        self.local_state.as_ref().map(|p| p.join("premium_cache"))
    }

    /// 单个扫描范围对应的候选根目录
    pub fn scope_roots(&self, scope: ScanScope) -> Vec<PathBuf> {
        match scope {
            ScanScope::PremiumCache => {
                // premium_cache 下行为包和资源包分两个子目录，一起扫
                let Some(cache) = self.premium_cache() else {
                    return Vec::new();
                };
                vec![cache.join("behavior_packs"), cache.join("resource_packs")]
            }
            ScanScope::DevelopmentBehaviorPacks => self
                .com_mojang()
                .map(|p| vec![p.join("development_behavior_packs")])
                .unwrap_or_default(),
            ScanScope::DevelopmentResourcePacks => self
                .com_mojang()
                .map(|p| vec![p.join("development_resource_packs")])
                .unwrap_or_default(),
        }
    }

    /// "全部插件" 模式使用的已知根目录全集（UWP + BDS）
    pub fn all_roots(&self) -> Vec<PathBuf> {
        let mut roots = Vec::new();

        if let Some(cache) = self.premium_cache() {
            roots.push(cache.join("behavior_packs"));
            roots.push(cache.join("resource_packs"));
        }
        if let Some(mojang) = self.com_mojang() {
            roots.push(mojang.join("development_behavior_packs"));
            roots.push(mojang.join("development_resource_packs"));
        }
        if let Some(bds) = &self.bedrock_server {
            for sub in [
                "behavior_packs",
                "resource_packs",
                "development_behavior_packs",
                "development_resource_packs",
            ] {
                roots.push(bds.join(sub));
            }
        }

        roots
    }

    /// BDS 的 worlds 目录
    pub fn worlds_root(&self) -> Option<PathBuf> {
        self.bedrock_server.as_ref().map(|p| p.join("worlds"))
    }

    /// 需要对 webview asset 协议放行的目录（图标显示用）
    pub fn asset_dirs(&self) -> Vec<PathBuf> {
        self.local_state
            .iter()
            .chain(self.bedrock_server.iter())
            .cloned()
            .collect()
    }
}

fn default_uwp_local_state() -> Option<PathBuf> {
    let local_appdata = env::var("LOCALAPPDATA").ok()?;
    Some(
        PathBuf::from(local_appdata)
            .join("Packages")
            .join("Microsoft.MinecraftUWP_8wekyb3d8bbwe")
            .join("LocalState"),
    )
}

use std::collections::HashMap;

/// 解析 Minecraft 的 .lang 本地化文件（key=value 文本格式）。
///
/// 规则：空行与 # 注释直接跳过；按第一个 '=' 切分，值里允许再出现 '='；
/// 重复 key 以最后一次出现为准。畸形行一律忽略，这个函数永远不会失败。
pub fn parse_lang(data: &str) -> HashMap<String, String> {
    let mut translations = HashMap::new();

    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // 没有 '=' 的行不是合法条目
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        translations.insert(key.trim().to_string(), value.trim().to_string());
    }

    translations
}

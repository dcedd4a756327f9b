use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::io::Write;
use std::path::PathBuf;
use std::{fs, io};
use tracing::{debug, error};

use crate::utils::file_ops;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LauncherConfig {
    pub debug: bool,
    pub language: String, // "auto", "en-US" 等
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PathsConfig {
    /// UWP LocalState 目录。留空则根据 LOCALAPPDATA 自动推导
    pub minecraft_data_dir: String,
    /// 专用服务器 (BDS) 安装目录。留空表示这台机器没有 BDS
    pub bedrock_server_dir: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub launcher: LauncherConfig,
    pub paths: PathsConfig,
}

pub fn get_config_file_path() -> PathBuf {
    file_ops::app_subdir("config").join("settings.toml")
}

pub fn ensure_config_dir() -> io::Result<()> {
    let config_dir = file_ops::app_subdir("config");
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }
    Ok(())
}

pub fn ensure_config_file() -> io::Result<()> {
    let config_file = get_config_file_path();
    if !config_file.exists() {
        let default_config = get_default_config();
        let toml_content = toml::to_string(&default_config)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut file = fs::File::create(config_file)?;
        file.write_all(toml_content.as_bytes())?;
    }
    Ok(())
}

pub fn get_default_config() -> Config {
    Config {
        launcher: LauncherConfig {
            debug: false,
            language: "auto".to_string(),
        },
        paths: PathsConfig {
            minecraft_data_dir: "".to_string(),
            bedrock_server_dir: "C:\\game\\game_servers\\bedrock-server-1.21".to_string(),
        },
    }
}

pub fn read_config() -> io::Result<Config> {
    ensure_config_dir()?;
    ensure_config_file()?;

    let config_file = get_config_file_path();
    let content = fs::read_to_string(&config_file)?;

    let config: Config = match toml::from_str(&content) {
        Ok(parsed_config) => parsed_config,
        Err(err) => {
            error!("Failed to parse config on first attempt: {:?}", err);

            // 用默认配置补齐缺失字段后重写文件，老字段保持用户的值
            let default_config = get_default_config();
            if let Ok(existing_config) = toml::from_str::<toml::Value>(&content) {
                if let toml::Value::Table(existing_table) = existing_config {
                    if let toml::Value::Table(default_table) =
                        toml::Value::try_from(&default_config)
                            .unwrap_or(toml::Value::Table(Default::default()))
                    {
                        let merged_config = merge_tables(default_table, existing_table);
                        if let Ok(updated_content) =
                            toml::ser::to_string(&toml::Value::Table(merged_config))
                        {
                            fs::write(&config_file, updated_content)?;
                        }
                    }
                }
            }

            let updated_content = fs::read_to_string(&config_file)?;
            toml::from_str(&updated_content).unwrap_or_else(|second_err| {
                error!("Failed to parse config on second attempt: {:?}", second_err);
                get_default_config()
            })
        }
    };

    debug!("Read config: {:?}", config);
    Ok(config)
}

fn merge_tables(
    mut default: toml::map::Map<String, toml::Value>,
    existing: toml::map::Map<String, toml::Value>,
) -> toml::map::Map<String, toml::Value> {
    for (key, existing_value) in existing {
        match default.get_mut(&key) {
            Some(default_value) => {
                if let (toml::Value::Table(default_table), toml::Value::Table(existing_table)) =
                    (default_value.clone(), existing_value.clone())
                {
                    *default_value =
                        toml::Value::Table(merge_tables(default_table, existing_table));
                } else {
                    *default_value = existing_value;
                }
            }
            None => {
                default.insert(key, existing_value);
            }
        }
    }
    default
}

pub fn write_config(config: &Config) -> io::Result<()> {
    ensure_config_dir()?;
    let config_file = get_config_file_path();
    let toml_content =
        toml::to_string(config).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mut file = fs::File::create(config_file)?;
    file.write_all(toml_content.as_bytes())?;
    Ok(())
}

pub fn get_nested_value(data: &JsonValue, key: &str) -> Option<JsonValue> {
    let parts: Vec<&str> = key.split('.').collect();
    let mut current = data;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current.clone())
}

pub fn set_nested_value(data: &mut JsonValue, key: &str, value: JsonValue) -> Result<(), String> {
    let parts: Vec<&str> = key.split('.').collect();
    let mut current = data;

    for i in 0..parts.len() {
        let part = parts[i];
        if i == parts.len() - 1 {
            return if let Some(obj) = current.as_object_mut() {
                obj.insert(part.to_string(), value);
                Ok(())
            } else {
                Err(format!("Key '{}' is not an object", part))
            };
        } else {
            current = current
                .get_mut(part)
                .ok_or_else(|| format!("Key '{}' not found", part))?;
        }
    }

    Err("Invalid key".to_string())
}

// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::Path;
use std::{env, process};
use tracing::{error, info};

use app_lib::config::config::read_config;
use app_lib::utils::logger::init_logging;
use app_lib::{run, utils};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    // 把工作目录固定到 EXE 所在目录，保证相对的 "./PackScope" 数据目录位置稳定
    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let _ = env::set_current_dir(exe_dir);
        }
    }

    init_logging();

    // 创建初始目录（同步）
    utils::file_ops::create_initial_directories();

    // 启动前先读一遍配置，保证 settings.toml 落盘
    match read_config() {
        Ok(config) => {
            info!(
                debug = config.launcher.debug,
                bedrock_server_dir = %config.paths.bedrock_server_dir,
                "Config loaded."
            );
        }
        Err(e) => {
            error!("Failed to read config: {}", e);
        }
    }

    let mut sys = sysinfo::System::new_all();
    sys.refresh_all();
    let sys_name = sysinfo::System::name().unwrap_or_else(|| "unknown".to_string());
    let kernel_version = sysinfo::System::kernel_version().unwrap_or_else(|| "unknown".to_string());
    let os_version = sysinfo::System::os_version().unwrap_or_else(|| "unknown".to_string());

    info!(
        "PackScope Start! Version: {} | Git Commit: {} | Built At: {}",
        utils::app_info::get_version(),
        utils::app_info::get_git_commit(),
        utils::app_info::get_build_time(),
    );
    info!(
        "App Path: {:?}",
        env::current_exe().unwrap_or_else(|_| Path::new(".").to_path_buf())
    );
    info!(
        "System Info: System: {} | Kernel: {} | OS Version: {}",
        sys_name, kernel_version, os_version
    );

    match run().await {
        Ok(_) => {
            info!("Program exited normally.");
        }
        Err(e) => {
            error!("Application error: {:?}", e);
            process::exit(1);
        }
    }
}

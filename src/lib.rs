// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

pub mod commands;
pub mod config;
pub mod core;
pub mod result;
pub mod utils;

use anyhow::Context;
use tauri::{AppHandle, Emitter, Manager};
use tauri_plugin_fs::FsExt;
use tracing::{error, info};

use crate::commands::*;
use crate::config::config::read_config;
use crate::core::paths::ScanRoots;
use crate::utils::logger::log;

fn show_window(app: &AppHandle) {
    let windows = app.webview_windows();
    windows
        .values()
        .next()
        .expect("Sorry, no window found")
        .set_focus()
        .expect("Can't Bring Window to Focus");
}

fn debug_mode(app: &tauri::App) -> std::io::Result<()> {
    let config = read_config()?;

    if let Some(window) = app.get_webview_window("main") {
        if config.launcher.debug {
            window.open_devtools();
        } else {
            window.close_devtools();
        }
    } else {
        error!("Failed to get main window.");
    }

    Ok(())
}

pub async fn run() -> anyhow::Result<()> {
    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            show_window(app);
        }))
        .plugin(tauri_plugin_fs::init())
        .invoke_handler(tauri::generate_handler![
            log,
            get_config,
            set_config,
            get_app_version,
            get_full_build_info,
            scan_addons,
            scan_worlds,
            get_world_details,
        ])
        .setup(move |app| {
            debug_mode(app)?;

            // 给 asset 协议放行已解析的扫描根目录，前端才能显示包和世界的图标
            let scope = app.fs_scope();
            if let Ok(config) = read_config() {
                let roots = ScanRoots::resolve(&config);
                for dir in roots.asset_dirs() {
                    let _ = scope.allow_directory(&dir, true);
                }
            }

            // 前端等这个事件到了才发起第一次 scan_worlds
            info!("Backend setup complete. Sending backend-ready signal.");
            app.handle().emit("backend-ready", ())?;

            Ok(())
        })
        .run(tauri::generate_context!())
        .context("error while running tauri application")?;

    Ok(())
}

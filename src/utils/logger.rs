use once_cell::sync::Lazy;
use std::fs::{create_dir_all, OpenOptions};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::config::read_config;
use crate::utils::file_ops;

// 程序启动时间
static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

// 自定义启动时间计时器
struct UptimeTimer;

impl FormatTime for UptimeTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> Result<(), std::fmt::Error> {
        write!(w, "{}", elapsed_time())
    }
}

// 返回程序启动后的运行时间
fn elapsed_time() -> String {
    let elapsed = START_TIME.elapsed();
    let millis = elapsed.as_millis();
    let seconds = millis / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    let millis = millis % 1000;
    let seconds = seconds % 60;
    let minutes = minutes % 60;
    let hours = hours % 24;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// 前端日志入口，按级别写进统一的日志系统
#[tauri::command]
pub fn log(level: &str, message: &str) {
    match level {
        "info" => info!("{}", message),
        "warning" | "warn" => warn!("{}", message),
        "error" => error!("{}", message),
        "debug" => debug!("{}", message),
        _ => info!("{}", message), // 默认使用 info
    }
}

// 初始化日志系统
pub fn init_logging() {
    let logs_dir = file_ops::app_subdir("logs");
    let latest_log_file = logs_dir.join("latest.log");

    // 确保日志目录存在
    if let Err(e) = create_dir_all(&logs_dir) {
        eprintln!("Failed to create logs directory: {}", e);
        return;
    }

    // 清空 latest.log 并保留句柄给日志层
    let latest_log = match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&latest_log_file)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open latest.log: {}", e);
            return;
        }
    };

    // 判断是否启用 debug 日志
    let debug_enabled = match read_config() {
        Ok(config) => config.launcher.debug,
        Err(err) => {
            eprintln!("Failed to read config, defaulting to info logging: {}", err);
            false
        }
    };

    let log_level = if debug_enabled { "debug" } else { "info" };

    // 控制台层
    let console_layer = tracing_subscriber::fmt::layer()
        .with_timer(UptimeTimer)
        .with_ansi(true)
        .with_target(true);

    // 文件层，按日期滚动
    let file_layer = tracing_subscriber::fmt::layer()
        .with_timer(UptimeTimer)
        .with_ansi(false)
        .with_target(true)
        .with_writer(tracing_appender::rolling::daily(&logs_dir, "packscope.log"));

    // 文件层，latest.log
    let latest_log_layer = tracing_subscriber::fmt::layer()
        .with_timer(UptimeTimer)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Arc::new(latest_log));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(console_layer)
        .with(file_layer)
        .with(latest_log_layer)
        .init();
}

use chrono::Local;
use directories::ProjectDirs;
use fern::Dispatch;
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;

use crate::app_settings::LogSettings;

fn get_log_file_path() -> Result<PathBuf, String> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "LyricSync", "LyricSync") {
        let log_dir = proj_dirs.data_local_dir();
        if !log_dir.exists() {
            fs::create_dir_all(log_dir)
                .map_err(|e| format!("无法创建日志目录 {log_dir:?}: {e}"))?;
        }
        Ok(log_dir.join("lyric_sync.log"))
    } else {
        let current_dir_log_path = PathBuf::from("lyric_sync.log");
        eprintln!("无法获取项目日志目录，将尝试在当前目录创建日志: {current_dir_log_path:?}");
        Ok(current_dir_log_path)
    }
}

/// 每条日志的格式：`[时间][级别] 消息`。
fn format_dispatch(level: LevelFilter) -> Dispatch {
    Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
                record.level(),
                message
            ))
        })
        .level(level)
}

/// 初始化全局日志：控制台输出到 stderr，按设置决定是否同时写入日志文件。
pub fn init_global_logger(settings: &LogSettings) {
    let console_dispatch = format_dispatch(settings.console_log_level).chain(std::io::stderr());
    let mut root = Dispatch::new().chain(console_dispatch);

    if settings.enable_file_log {
        let log_file_path = match get_log_file_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("获取日志文件路径失败: {e}。将在当前目录写入备用日志。");
                PathBuf::from("lyric_sync_fallback.log")
            }
        };
        match fern::log_file(&log_file_path) {
            Ok(log_file) => {
                root = root.chain(format_dispatch(settings.file_log_level).chain(log_file));
            }
            Err(e) => {
                eprintln!("无法打开日志文件 {log_file_path:?}: {e}。文件日志将被禁用。");
            }
        }
    }

    if let Err(e) = root.apply() {
        eprintln!("日志记录器初始化失败: {e}");
    } else {
        log::debug!("日志记录器已初始化。");
    }
}

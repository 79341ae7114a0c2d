use directories::ProjectDirs;
use ini::Ini;
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{SyncError, SyncResult};
use crate::export::ExportTarget;
use crate::track_catalog::DEFAULT_RESTART_THRESHOLD_SECS;

const LOGGING_SECTION: &str = "Logging";
const SYNC_SECTION: &str = "Sync";

#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub enable_file_log: bool,
    pub file_log_level: LevelFilter,
    pub console_log_level: LevelFilter,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            enable_file_log: false,
            file_log_level: LevelFilter::Info,
            console_log_level: LevelFilter::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncSettings {
    /// 播放不超过该秒数时，“上一首”切到上一首曲目，否则从头重播。
    pub previous_track_threshold_secs: f64,
    pub export_target: ExportTarget,
    /// 文件导出的目录，未设置时使用当前目录。
    pub export_directory: Option<PathBuf>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            previous_track_threshold_secs: DEFAULT_RESTART_THRESHOLD_SECS,
            export_target: ExportTarget::default(),
            export_directory: None,
        }
    }
}

impl SyncSettings {
    pub fn export_directory_or_current(&self) -> PathBuf {
        self.export_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSettings {
    pub log_settings: LogSettings,
    pub sync_settings: SyncSettings,
}

impl AppSettings {
    fn config_path() -> Option<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "LyricSync", "LyricSync") {
            let config_dir = proj_dirs.config_dir();
            if !config_dir.exists() {
                if let Err(e) = fs::create_dir_all(config_dir) {
                    log::error!("无法创建配置目录 {config_dir:?}: {e}");
                    return None;
                }
            }
            Some(config_dir.join("lyric_sync.ini"))
        } else {
            log::error!("无法获取项目配置目录路径。");
            None
        }
    }

    /// 从默认位置加载配置。文件不存在时写入一份默认配置。
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("无法确定配置文件路径。将使用运行时默认配置。");
                AppSettings::default()
            }
        }
    }

    /// 从指定文件加载配置，无法识别的值退回默认值。
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::info!("配置文件 {path:?} 未找到。将创建并使用默认配置。");
            let default_settings = AppSettings::default();
            if let Err(e) = default_settings.save_to(path) {
                log::error!("无法保存初始默认配置文件到 {path:?}: {e}");
            }
            return default_settings;
        }

        match Ini::load_from_file(path) {
            Ok(conf) => {
                let settings = Self::from_ini(&conf);
                log::info!("从 {path:?} 加载配置成功。");
                settings
            }
            Err(e) => {
                log::error!("加载配置文件 {path:?} 失败: {e}。将使用默认配置。");
                AppSettings::default()
            }
        }
    }

    fn from_ini(conf: &Ini) -> Self {
        let log_defaults = LogSettings::default();
        let sync_defaults = SyncSettings::default();

        let log_section = conf.section(Some(LOGGING_SECTION));
        let log_value = |key: &str| log_section.and_then(|s| s.get(key));
        let log_settings = LogSettings {
            enable_file_log: log_value("EnableFileLog")
                .and_then(|s| s.parse::<bool>().ok())
                .unwrap_or(log_defaults.enable_file_log),
            file_log_level: log_value("FileLogLevel")
                .and_then(|s| LevelFilter::from_str(s).ok())
                .unwrap_or(log_defaults.file_log_level),
            console_log_level: log_value("ConsoleLogLevel")
                .and_then(|s| LevelFilter::from_str(s).ok())
                .unwrap_or(log_defaults.console_log_level),
        };

        let sync_section = conf.section(Some(SYNC_SECTION));
        let sync_value = |key: &str| sync_section.and_then(|s| s.get(key));
        let sync_settings = SyncSettings {
            previous_track_threshold_secs: sync_value("PreviousTrackThresholdSecs")
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(sync_defaults.previous_track_threshold_secs),
            export_target: sync_value("ExportTarget")
                .and_then(|s| ExportTarget::from_str(s).ok())
                .unwrap_or(sync_defaults.export_target),
            export_directory: sync_value("ExportDirectory")
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        };

        AppSettings {
            log_settings,
            sync_settings,
        }
    }

    pub fn save(&self) -> SyncResult<()> {
        match Self::config_path() {
            Some(path) => self.save_to(&path),
            None => {
                let err_msg = "无法确定配置文件路径，保存失败。".to_string();
                log::error!("{err_msg}");
                Err(SyncError::Custom(err_msg))
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> SyncResult<()> {
        let mut conf = Ini::new();
        conf.with_section(Some(LOGGING_SECTION))
            .set(
                "EnableFileLog",
                self.log_settings.enable_file_log.to_string(),
            )
            .set("FileLogLevel", self.log_settings.file_log_level.to_string())
            .set(
                "ConsoleLogLevel",
                self.log_settings.console_log_level.to_string(),
            );

        let export_directory = self
            .sync_settings
            .export_directory
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        conf.with_section(Some(SYNC_SECTION))
            .set(
                "PreviousTrackThresholdSecs",
                self.sync_settings.previous_track_threshold_secs.to_string(),
            )
            .set("ExportTarget", self.sync_settings.export_target.to_string())
            .set("ExportDirectory", export_directory);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        conf.write_to_file(path)?;
        log::info!("配置已保存到 {path:?}。");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("lyric_sync.ini");

        let settings = AppSettings::load_from(&path);
        assert_eq!(settings, AppSettings::default());
        assert!(path.exists(), "应写入默认配置文件");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lyric_sync.ini");

        let settings = AppSettings {
            log_settings: LogSettings {
                enable_file_log: true,
                file_log_level: LevelFilter::Debug,
                console_log_level: LevelFilter::Warn,
            },
            sync_settings: SyncSettings {
                previous_track_threshold_secs: 3.5,
                export_target: ExportTarget::File,
                export_directory: Some(dir.path().join("exports")),
            },
        };
        settings.save_to(&path).unwrap();
        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn test_bad_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lyric_sync.ini");
        fs::write(
            &path,
            "[Logging]\nEnableFileLog=maybe\nFileLogLevel=loud\n\
             [Sync]\nPreviousTrackThresholdSecs=-2\nExportTarget=printer\nExportDirectory=\n",
        )
        .unwrap();

        let settings = AppSettings::load_from(&path);
        assert_eq!(settings, AppSettings::default());
        assert_eq!(
            settings.sync_settings.export_directory_or_current(),
            PathBuf::from(".")
        );
    }
}

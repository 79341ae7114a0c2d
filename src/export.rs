//! # 导出
//!
//! 核心只负责生成文本，如何交付给用户（剪贴板、文件）由这里的各个通道负责。
//! 主通道失败时自动尝试备用通道。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::app_settings::SyncSettings;
use crate::error::{SyncError, SyncResult};
use crate::io::write_text_file;
use crate::types::DocumentHeader;

/// 首选的导出方式，保存在配置文件中。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum ExportTarget {
    #[default]
    Clipboard,
    File,
}

/// 导出通道。
pub trait ExportSink {
    fn name(&self) -> &str;
    fn deliver(&mut self, content: &str) -> SyncResult<()>;
}

/// 通过系统剪贴板导出。
///
/// 在 X11/Wayland 上剪贴板内容由持有 `Clipboard` 的进程提供，`Clipboard` 被释放后内容可能随之丢失，
/// 所以这里在第一次导出后一直持有它。
#[derive(Default)]
pub struct ClipboardSink {
    clipboard: Option<arboard::Clipboard>,
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    wait_for_handover: bool,
}

impl ClipboardSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 导出后马上退出的程序（例如命令行）使用：在 Linux 上一直阻塞到其他程序接管剪贴板内容。
    pub fn waiting_for_handover() -> Self {
        Self {
            clipboard: None,
            wait_for_handover: true,
        }
    }

    /// 是否已经连接到系统剪贴板。
    pub fn is_connected(&self) -> bool {
        self.clipboard.is_some()
    }

    #[cfg(target_os = "linux")]
    fn set_text(&self, clipboard: &mut arboard::Clipboard, content: &str) -> SyncResult<()> {
        use arboard::SetExtLinux;
        if self.wait_for_handover {
            clipboard.set().wait().text(content.to_string())?;
        } else {
            clipboard.set_text(content.to_string())?;
        }
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn set_text(&self, clipboard: &mut arboard::Clipboard, content: &str) -> SyncResult<()> {
        clipboard.set_text(content.to_string())?;
        Ok(())
    }
}

impl ExportSink for ClipboardSink {
    fn name(&self) -> &str {
        "剪贴板"
    }

    fn deliver(&mut self, content: &str) -> SyncResult<()> {
        let mut clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        let result = self.set_text(&mut clipboard, content);
        self.clipboard = Some(clipboard);
        result?;
        log::info!("[Export] 已复制到剪贴板。");
        Ok(())
    }
}

/// 把文本写成文件。
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 在 `directory` 下使用 `<编号>.<曲名>.txt` 作为文件名。
    pub fn for_header(directory: &Path, header: &DocumentHeader) -> Self {
        Self::new(directory.join(export_file_name(header)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportSink for FileSink {
    fn name(&self) -> &str {
        "文件"
    }

    fn deliver(&mut self, content: &str) -> SyncResult<()> {
        write_text_file(&self.path, content)
    }
}

/// 导出文件名，去掉曲名中不能出现在文件名里的字符。
pub fn export_file_name(header: &DocumentHeader) -> String {
    let title: String = header
        .track_title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}.{}.txt", header.track_number, title.trim())
}

/// 哪个通道最终完成了导出。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportChannel {
    Primary,
    Fallback,
}

/// 先尝试主通道，失败后记录警告并尝试备用通道；两者都失败时返回 [`SyncError::ExportFailed`]。
pub fn export_with_fallback(
    content: &str,
    primary: &mut dyn ExportSink,
    fallback: &mut dyn ExportSink,
) -> SyncResult<ExportChannel> {
    let primary_error = match primary.deliver(content) {
        Ok(()) => return Ok(ExportChannel::Primary),
        Err(e) => e,
    };
    log::warn!(
        "[Export] 通过{}导出失败: {}，改用{}。",
        primary.name(),
        primary_error,
        fallback.name()
    );

    match fallback.deliver(content) {
        Ok(()) => Ok(ExportChannel::Fallback),
        Err(fallback_error) => {
            log::error!("[Export] 通过{}导出也失败了: {}", fallback.name(), fallback_error);
            Err(SyncError::ExportFailed {
                primary: primary.name().to_string(),
                primary_error: Box::new(primary_error),
                fallback: fallback.name().to_string(),
                fallback_error: Box::new(fallback_error),
            })
        }
    }
}

/// 按配置选择导出通道：首选方式作为主通道，另一种作为备用。
///
/// 剪贴板通道在多次导出之间复用。
pub struct ConfiguredExporter<C: ExportSink = ClipboardSink> {
    target: ExportTarget,
    directory: PathBuf,
    clipboard: C,
}

impl ConfiguredExporter<ClipboardSink> {
    pub fn from_settings(settings: &SyncSettings) -> Self {
        Self::with_clipboard(settings, ClipboardSink::new())
    }
}

impl<C: ExportSink> ConfiguredExporter<C> {
    pub fn with_clipboard(settings: &SyncSettings, clipboard: C) -> Self {
        Self {
            target: settings.export_target,
            directory: settings.export_directory_or_current(),
            clipboard,
        }
    }

    pub fn target(&self) -> ExportTarget {
        self.target
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// 导出 `content`，文件通道使用 `header` 生成文件名。
    pub fn export(&mut self, header: &DocumentHeader, content: &str) -> SyncResult<ExportChannel> {
        let mut file = FileSink::for_header(&self.directory, header);
        log::debug!(
            "[Export] 首选导出方式: {}，文件路径: {:?}",
            self.target,
            file.path()
        );
        match self.target {
            ExportTarget::Clipboard => {
                export_with_fallback(content, &mut self.clipboard, &mut file)
            }
            ExportTarget::File => export_with_fallback(content, &mut file, &mut self.clipboard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[derive(Default)]
    struct RecordingSink {
        fail: bool,
        received: Vec<String>,
    }

    impl ExportSink for RecordingSink {
        fn name(&self) -> &str {
            if self.fail { "坏通道" } else { "好通道" }
        }

        fn deliver(&mut self, content: &str) -> SyncResult<()> {
            if self.fail {
                return Err(SyncError::Custom("拒绝访问".to_string()));
            }
            self.received.push(content.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_primary_success_skips_fallback() {
        let mut primary = RecordingSink::default();
        let mut fallback = RecordingSink::default();
        let channel = export_with_fallback("1.A", &mut primary, &mut fallback).unwrap();
        assert_eq!(channel, ExportChannel::Primary);
        assert_eq!(primary.received, vec!["1.A"]);
        assert!(fallback.received.is_empty());
    }

    #[test]
    fn test_fallback_receives_identical_text() {
        let mut primary = RecordingSink { fail: true, ..Default::default() };
        let mut fallback = RecordingSink::default();
        let channel =
            export_with_fallback("1.A\n[0:01.00] x", &mut primary, &mut fallback).unwrap();
        assert_eq!(channel, ExportChannel::Fallback);
        assert_eq!(fallback.received, vec!["1.A\n[0:01.00] x"]);
    }

    #[test]
    fn test_both_failing_reports_both_causes() {
        let mut primary = RecordingSink { fail: true, ..Default::default() };
        let mut fallback = RecordingSink { fail: true, ..Default::default() };
        let err = export_with_fallback("1.A", &mut primary, &mut fallback).unwrap_err();
        match err {
            SyncError::ExportFailed { primary, fallback, .. } => {
                assert_eq!(primary, "坏通道");
                assert_eq!(fallback, "坏通道");
            }
            other => panic!("意外的错误类型: {other:?}"),
        }
    }

    #[test]
    fn test_file_sink_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::for_header(dir.path(), &DocumentHeader::new(3, "A/B: C"));
        assert_eq!(sink.path().file_name().unwrap(), "3.A_B_ C.txt");
        sink.deliver("3.A/B: C\nline").unwrap();
        assert_eq!(std::fs::read_to_string(sink.path()).unwrap(), "3.A/B: C\nline");
    }

    fn settings(target: ExportTarget, directory: &Path) -> SyncSettings {
        SyncSettings {
            export_target: target,
            export_directory: Some(directory.to_path_buf()),
            ..SyncSettings::default()
        }
    }

    #[test]
    fn test_configured_file_target_writes_file_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = ConfiguredExporter::with_clipboard(
            &settings(ExportTarget::File, dir.path()),
            RecordingSink::default(),
        );
        let channel = exporter.export(&DocumentHeader::new(2, "Rain"), "2.Rain
x").unwrap();
        assert_eq!(channel, ExportChannel::Primary);
        assert_eq!(std::fs::read_to_string(dir.path().join("2.Rain.txt")).unwrap(), "2.Rain
x");
        assert!(exporter.clipboard.received.is_empty());
    }

    #[test]
    fn test_configured_clipboard_target_falls_back_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let denied = RecordingSink { fail: true, ..Default::default() };
        let settings = settings(ExportTarget::Clipboard, dir.path());
        let mut exporter = ConfiguredExporter::with_clipboard(&settings, denied);
        assert_eq!(exporter.directory(), dir.path());

        let channel = exporter.export(&DocumentHeader::new(2, "Rain"), "2.Rain").unwrap();
        assert_eq!(channel, ExportChannel::Fallback);
        assert!(dir.path().join("2.Rain.txt").exists());
    }

    #[test]
    fn test_clipboard_sink_keeps_connection_after_delivery() {
        let mut sink = ClipboardSink::new();
        assert!(!sink.is_connected());
        // 无图形环境时无法连接剪贴板，只在导出成功时检查
        if sink.deliver("1.A").is_ok() {
            assert!(sink.is_connected());
        }
    }

    #[test]
    fn test_export_target_from_str() {
        assert_eq!(ExportTarget::from_str("file").unwrap(), ExportTarget::File);
        assert_eq!(ExportTarget::from_str("Clipboard").unwrap(), ExportTarget::Clipboard);
        assert!(ExportTarget::from_str("printer").is_err());
        assert_eq!(ExportTarget::File.to_string(), "File");
    }
}

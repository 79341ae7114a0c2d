//! # 打轴会话
//!
//! 持有当前选中曲目的歌词文档，把播放器的进度、用户操作和导出串起来。
//!
//! 切换曲目时整份文档被替换，同时递增 `generation`。宿主拿到的每个结果都带着它，
//! 可以借此丢弃切换前还在途中的旧结果。

use crate::app_settings::SyncSettings;
use crate::editor;
use crate::error::{SyncError, SyncResult};
use crate::export::{ConfiguredExporter, ExportChannel, ExportSink, export_with_fallback};
use crate::io::LyricSource;
use crate::lyric_generator::generate_lyric_text;
use crate::lyric_parser::parse_lyric_document;
use crate::navigator;
use crate::resolver::resolve_active_line;
use crate::track_catalog::{PreviousAction, TrackCatalog, TrackEntry};
use crate::types::{DocumentHeader, LyricDocument};
use crate::utils::sanitize_seconds;

/// 播放器的跳转接口。
pub trait SeekSink {
    fn seek(&mut self, position: f64);
}

impl<F: FnMut(f64)> SeekSink for F {
    fn seek(&mut self, position: f64) {
        self(position)
    }
}

/// 一次进度更新后的当前行。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveLineUpdate {
    pub generation: u64,
    pub active_line: Option<usize>,
    /// 与上一次相比当前行是否变化，宿主可据此决定是否滚动歌词。
    pub changed: bool,
}

pub struct SyncSession<S: LyricSource> {
    source: S,
    track: Option<TrackEntry>,
    document: LyricDocument,
    position: f64,
    duration: f64,
    active_line: Option<usize>,
    generation: u64,
}

impl<S: LyricSource> SyncSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            track: None,
            document: LyricDocument::empty(),
            position: 0.0,
            duration: 0.0,
            active_line: None,
            generation: 0,
        }
    }

    /// 选中曲目：加载并解析歌词，替换整份文档，进度归零。返回新的 generation。
    pub fn select_track(&mut self, track: TrackEntry) -> u64 {
        let document = match self.source.load(track.track_number) {
            Some(text) => parse_lyric_document(&text),
            None => {
                log::warn!("[SyncSession] 曲目 '{}' 没有歌词。", track.label());
                LyricDocument::empty()
            }
        };
        log::info!(
            "[SyncSession] 切换到曲目 '{}'，共 {} 行歌词。",
            track.label(),
            document.len()
        );
        self.replace_document(Some(track), document)
    }

    /// 直接替换文档，例如宿主从别处拿到了歌词文本。
    pub fn replace_document(&mut self, track: Option<TrackEntry>, document: LyricDocument) -> u64 {
        self.track = track;
        self.document = document;
        self.position = 0.0;
        self.duration = 0.0;
        self.active_line = None;
        self.generation += 1;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 结果是否属于当前文档。
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn track(&self) -> Option<&TrackEntry> {
        self.track.as_ref()
    }

    pub fn document(&self) -> &LyricDocument {
        &self.document
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn active_line(&self) -> Option<usize> {
        self.active_line
    }

    /// 播放器每次上报进度时调用。
    pub fn update_position(&mut self, position: f64) -> ActiveLineUpdate {
        self.position = sanitize_seconds(position);
        self.refresh_active_line()
    }

    pub fn update_duration(&mut self, duration: f64) {
        self.duration = sanitize_seconds(duration);
    }

    fn refresh_active_line(&mut self) -> ActiveLineUpdate {
        let active_line = resolve_active_line(&self.document, self.position);
        let changed = active_line != self.active_line;
        self.active_line = active_line;
        ActiveLineUpdate {
            generation: self.generation,
            active_line,
            changed,
        }
    }

    /// 在当前播放位置给某一行打轴。
    pub fn stamp_line(&mut self, line_id: usize) -> bool {
        let stamped = editor::stamp_line(&mut self.document, line_id, self.position);
        if stamped {
            self.refresh_active_line();
        }
        stamped
    }

    pub fn reset_all(&mut self) -> usize {
        let cleared = editor::reset_all(&mut self.document);
        self.refresh_active_line();
        cleared
    }

    fn seek_to(&mut self, target: f64, seek: &mut dyn SeekSink) -> ActiveLineUpdate {
        seek.seek(target);
        self.position = sanitize_seconds(target);
        self.refresh_active_line()
    }

    /// 跳到上一句已打轴的歌词，没有可跳转的目标时返回 `None` 且不会调用播放器。
    pub fn previous_lyric(&mut self, seek: &mut dyn SeekSink) -> Option<ActiveLineUpdate> {
        let target = navigator::previous_stamped_time(&self.document, self.position)?;
        log::debug!("[SyncSession] 跳转到上一句: {target:.2}s");
        Some(self.seek_to(target, seek))
    }

    /// 跳到下一句已打轴的歌词。
    pub fn next_lyric(&mut self, seek: &mut dyn SeekSink) -> Option<ActiveLineUpdate> {
        let target = navigator::next_stamped_time(&self.document, self.position)?;
        log::debug!("[SyncSession] 跳转到下一句: {target:.2}s");
        Some(self.seek_to(target, seek))
    }

    /// 点击歌词行时跳转到它的时间。
    pub fn seek_to_line(
        &mut self,
        line_id: usize,
        seek: &mut dyn SeekSink,
    ) -> Option<ActiveLineUpdate> {
        let target = navigator::seek_target_for_line(&self.document, line_id)?;
        Some(self.seek_to(target, seek))
    }

    pub fn serialize(&self) -> String {
        generate_lyric_text(&self.document)
    }

    /// 生成文本并导出，主通道失败时使用备用通道。
    pub fn export(
        &self,
        primary: &mut dyn ExportSink,
        fallback: &mut dyn ExportSink,
    ) -> SyncResult<ExportChannel> {
        export_with_fallback(&self.serialize(), primary, fallback)
    }

    /// 导出文件名使用的标题。歌词没有标题行时使用当前曲目的编号和曲名。
    fn export_header(&self) -> Option<DocumentHeader> {
        self.document.header.clone().or_else(|| {
            self.track
                .as_ref()
                .map(|track| DocumentHeader::new(track.track_number, track.title.clone()))
        })
    }

    /// 按配置的首选方式导出。
    pub fn export_configured<C: ExportSink>(
        &self,
        exporter: &mut ConfiguredExporter<C>,
    ) -> SyncResult<ExportChannel> {
        let header = self.export_header().ok_or_else(|| {
            SyncError::Custom("当前没有可导出的歌词：既没有标题行也没有选中曲目。".to_string())
        })?;
        exporter.export(&header, &self.serialize())
    }

    /// “上一首”按钮：按配置的阈值决定切到上一首还是从头重播。未选中曲目时从头重播。
    pub fn previous_track_action(
        &self,
        catalog: &TrackCatalog,
        settings: &SyncSettings,
    ) -> PreviousAction {
        match &self.track {
            Some(track) => catalog.previous_action(
                track.track_number,
                self.position,
                settings.previous_track_threshold_secs,
            ),
            None => PreviousAction::RestartCurrent,
        }
    }
}

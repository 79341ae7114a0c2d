//! # 曲目目录
//!
//! 曲目列表由宿主以文件名的形式提供（例如 `6.11 (17).txt` 或 `01.Bittersweet.mp3`），
//! 这里只负责解析和排序，不会自己去扫描目录。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::strip_extension;

/// 播放超过这个秒数时，“上一首”会改为从头重播当前曲目。
pub const DEFAULT_RESTART_THRESHOLD_SECS: f64 = 5.0;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav"];
const TRACK_EXTENSIONS: &[&str] = &["txt", "mp3", "wav"];

static TRACK_FILE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.(.+)$").expect("未能编译 TRACK_FILE_REGEX"));

static TRACK_NUMBER_PREFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.").expect("未能编译 TRACK_NUMBER_PREFIX_REGEX"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub track_number: u32,
    pub title: String,
    /// 宿主提供的原始文件名，用作加载歌词时的键。
    pub file_name: String,
}

impl TrackEntry {
    /// 从 `<编号>.<曲名>[.txt|.mp3|.wav]` 形式的文件名解析曲目，不匹配时返回 `None`。
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = strip_extension(file_name.trim(), TRACK_EXTENSIONS);
        let caps = TRACK_FILE_REGEX.captures(stem)?;
        let track_number = caps[1].parse().ok()?;
        Some(Self {
            track_number,
            title: caps[2].to_string(),
            file_name: file_name.to_string(),
        })
    }

    /// 曲目选择框中使用的 `编号.曲名` 标签。
    pub fn label(&self) -> String {
        format!("{}.{}", self.track_number, self.title)
    }
}

/// “上一首”按钮的处理结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviousAction {
    /// 回到当前曲目开头。
    RestartCurrent,
    /// 切换到指定编号的曲目。
    SwitchTo(u32),
}

#[derive(Debug, Clone, Default)]
pub struct TrackCatalog {
    tracks: Vec<TrackEntry>,
}

impl TrackCatalog {
    /// 由文件名列表构建目录，按曲目编号排序，无法解析的文件名被跳过。
    pub fn from_file_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tracks = Vec::new();
        for name in names {
            let name = name.as_ref();
            match TrackEntry::from_file_name(name) {
                Some(entry) => tracks.push(entry),
                None => log::warn!("[TrackCatalog] 跳过无法识别曲目编号的文件: '{name}'"),
            }
        }
        Self::from_entries(tracks)
    }

    /// 由音频文件名构建播放列表。
    ///
    /// 按文件名开头的编号排序，没有编号的文件保持原有顺序排在最后。
    /// 曲目编号是排序后的位置（从 1 开始），歌词按这个编号加载。
    pub fn from_audio_file_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut files: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .collect();
        // 稳定排序，没有编号的文件之间不会互换位置
        files.sort_by_key(|name| audio_file_number(name).unwrap_or(u64::MAX));

        let tracks: Vec<TrackEntry> = files
            .into_iter()
            .zip(1..)
            .map(|(file_name, track_number)| TrackEntry {
                track_number,
                title: audio_track_title(&file_name).to_string(),
                file_name,
            })
            .collect();
        log::info!("[TrackCatalog] 已载入 {} 个音频文件。", tracks.len());
        Self { tracks }
    }

    pub fn from_entries(mut tracks: Vec<TrackEntry>) -> Self {
        tracks.sort_by_key(|t| t.track_number);
        log::info!("[TrackCatalog] 已载入 {} 首曲目。", tracks.len());
        Self { tracks }
    }

    pub fn tracks(&self) -> &[TrackEntry] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn first(&self) -> Option<&TrackEntry> {
        self.tracks.first()
    }

    pub fn get(&self, track_number: u32) -> Option<&TrackEntry> {
        self.tracks.iter().find(|t| t.track_number == track_number)
    }

    pub fn find_by_label(&self, label: &str) -> Option<&TrackEntry> {
        self.tracks.iter().find(|t| t.label() == label)
    }

    fn index_of(&self, track_number: u32) -> Option<usize> {
        self.tracks.iter().position(|t| t.track_number == track_number)
    }

    /// 下一首，最后一首之后回到第一首。当前曲目不在目录中时返回第一首。
    pub fn next_track(&self, current: u32) -> Option<u32> {
        let next = match self.index_of(current) {
            Some(idx) => self.tracks.get((idx + 1) % self.tracks.len()),
            None => self.tracks.first(),
        };
        next.map(|t| t.track_number)
    }

    /// 上一首，第一首之前回到最后一首。
    pub fn previous_track(&self, current: u32) -> Option<u32> {
        let previous = match self.index_of(current) {
            Some(0) => self.tracks.last(),
            Some(idx) => self.tracks.get(idx - 1),
            None => self.tracks.first(),
        };
        previous.map(|t| t.track_number)
    }

    /// 刚开始播放（不超过 `threshold` 秒）时切到上一首，否则从头重播。
    pub fn previous_action(&self, current: u32, position: f64, threshold: f64) -> PreviousAction {
        if position <= threshold {
            if let Some(previous) = self.previous_track(current) {
                return PreviousAction::SwitchTo(previous);
            }
        }
        PreviousAction::RestartCurrent
    }

    /// 曲目对应的演唱者，`authors` 按目录顺序一行一个。
    pub fn author_of<'a>(&self, authors: &'a [String], track_number: u32) -> Option<&'a str> {
        self.index_of(track_number)
            .and_then(|idx| authors.get(idx))
            .map(String::as_str)
    }
}

fn audio_file_number(file_name: &str) -> Option<u64> {
    TRACK_NUMBER_PREFIX_REGEX
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok())
}

/// 音频文件名中的曲名：去掉 `编号.` 前缀和 `.mp3`/`.wav` 扩展名，剩下为空时返回原文件名。
pub fn audio_track_title(file_name: &str) -> &str {
    let stem = strip_extension(file_name, AUDIO_EXTENSIONS);
    let name = match TRACK_NUMBER_PREFIX_REGEX.find(stem) {
        Some(prefix) => &stem[prefix.end()..],
        None => stem,
    };
    if name.is_empty() { file_name } else { name }
}

/// 在音频文件名中找到与曲名匹配的一项（忽略大小写和首尾空白）。
pub fn match_audio_file<'a, S: AsRef<str>>(title: &str, audio_files: &'a [S]) -> Option<&'a str> {
    let wanted = title.trim().to_lowercase();
    audio_files
        .iter()
        .map(AsRef::<str>::as_ref)
        .find(|file_name| audio_track_title(file_name).trim().to_lowercase() == wanted)
}

/// 解析演唱者列表：一行一个，忽略空行和 `#` 开头的注释行。
pub fn parse_author_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

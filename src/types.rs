use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// 歌词文件第一行：`<曲目编号>.<曲名>`。它不算作歌词行。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub track_number: u32,
    pub track_title: String,
}

impl DocumentHeader {
    pub fn new(track_number: u32, track_title: impl Into<String>) -> Self {
        Self {
            track_number,
            track_title: track_title.into(),
        }
    }
}

/// 一行歌词。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricLine {
    /// 解析时分配的序号，从 0 开始，与所在位置一致。只有重新解析才会改变。
    pub id: usize,
    /// 去掉时间标签并 trim 后的显示文本。
    pub text: String,
    /// `None` 表示尚未打轴。
    pub timestamp: Option<Timestamp>,
    /// 源文件中未经改动的原始行。
    pub original: String,
}

impl LyricLine {
    pub fn is_stamped(&self) -> bool {
        self.timestamp.is_some()
    }

    pub fn seconds(&self) -> Option<f64> {
        self.timestamp.map(Timestamp::seconds)
    }
}

/// 一首曲目的歌词文档。
///
/// `header` 为 `None` 且没有任何行时表示“暂无歌词”，这是合法状态而不是错误。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LyricDocument {
    pub header: Option<DocumentHeader>,
    pub lines: Vec<LyricLine>,
}

impl LyricDocument {
    pub fn empty() -> Self {
        Self::default()
    }

    /// 没有歌词行（可能只有标题行）。
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, id: usize) -> Option<&LyricLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn line_mut(&mut self, id: usize) -> Option<&mut LyricLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }

    pub fn stamped_count(&self) -> usize {
        self.lines.iter().filter(|line| line.is_stamped()).count()
    }
}

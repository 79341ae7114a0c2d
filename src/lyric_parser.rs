//! # 歌词文档解析器
//!
//! 文件格式：第一行是 `<编号>.<曲名>`，其后每行一句歌词，已打轴的行以 `[M:SS.ss]` 开头。
//! 空白行会被丢弃。解析永远不会失败，格式不对的内容只会降级为未打轴的行。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::timestamp::Timestamp;
use crate::types::{DocumentHeader, LyricDocument, LyricLine};

static HEADER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.(.+)$").expect("未能编译 HEADER_REGEX"));

/// 捕获分钟、秒和时间标签之后的文本。
static LYRIC_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(\d+):(\d+\.?\d*)\]\s*(.*)$").expect("未能编译 LYRIC_LINE_REGEX")
});

/// 把整段歌词文本解析为文档。
pub fn parse_lyric_document(content: &str) -> LyricDocument {
    let mut rows = content.lines().filter(|row| !row.trim().is_empty());

    let Some(header_row) = rows.next() else {
        log::debug!("[LyricParser] 歌词内容为空，返回空文档。");
        return LyricDocument::empty();
    };

    let header = parse_header(header_row);
    let lines: Vec<LyricLine> = rows
        .enumerate()
        .map(|(id, row)| parse_lyric_line(id, row))
        .collect();

    let document = LyricDocument {
        header: Some(header),
        lines,
    };
    log::debug!(
        "[LyricParser] 解析完成：共 {} 行歌词，其中 {} 行已打轴。",
        document.len(),
        document.stamped_count()
    );
    document
}

/// 解析标题行。不符合 `编号.曲名` 时尽量保留原文，不会失败。
pub fn parse_header(row: &str) -> DocumentHeader {
    let row = row.trim();

    if let Some(caps) = HEADER_REGEX.captures(row) {
        if let Ok(track_number) = caps[1].parse::<u32>() {
            return DocumentHeader::new(track_number, &caps[2]);
        }
    }

    log::warn!("[LyricParser] 标题行 '{row}' 不符合 `编号.曲名` 格式，按原文尽量保留。");
    let digits_end = row
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(row.len());
    let track_number = row[..digits_end].parse().unwrap_or(0);
    let track_title = row.split_once('.').map_or(row, |(_, rest)| rest);
    DocumentHeader::new(track_number, track_title)
}

/// 解析一行歌词。`id` 是它在歌词行中的序号。
pub fn parse_lyric_line(id: usize, row: &str) -> LyricLine {
    if let Some(caps) = LYRIC_LINE_REGEX.captures(row) {
        match Timestamp::from_parts(&caps[1], &caps[2]) {
            Some(timestamp) => {
                return LyricLine {
                    id,
                    text: caps[3].trim().to_string(),
                    timestamp: Some(timestamp),
                    original: row.to_string(),
                };
            }
            None => {
                log::warn!(
                    "[LyricParser] 第 {} 行的时间标签无法解析，按普通文本处理: '{row}'",
                    id + 1
                );
            }
        }
    }

    LyricLine {
        id,
        text: row.trim().to_string(),
        timestamp: None,
        original: row.to_string(),
    }
}

//! # 歌词文档生成器
//!
//! 与 [`crate::lyric_parser`] 使用同一套语法，生成的文本可以无损地再解析回来。

use crate::types::{DocumentHeader, LyricDocument, LyricLine};

/// 把文档序列化为保存/导出用的文本，行之间以 `\n` 连接，末尾不带换行。
///
/// 空文档（没有标题行）生成空字符串。
pub fn generate_lyric_text(document: &LyricDocument) -> String {
    let Some(header) = &document.header else {
        return String::new();
    };

    let mut rows = Vec::with_capacity(document.lines.len() + 1);
    rows.push(format_header(header));
    rows.extend(document.lines.iter().map(format_line));
    rows.join("\n")
}

pub fn format_header(header: &DocumentHeader) -> String {
    format!("{}.{}", header.track_number, header.track_title)
}

/// 已打轴：`[M:SS.ss] 文本`；未打轴：只有文本。
pub fn format_line(line: &LyricLine) -> String {
    match line.timestamp {
        Some(timestamp) => format!("{timestamp} {}", line.text),
        None => line.text.clone(),
    }
}

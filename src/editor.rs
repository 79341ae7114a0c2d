//! # 打轴编辑
//!
//! 直接修改当前曲目的文档。未知的行号不算错误，只是什么都不做。

use crate::timestamp::Timestamp;
use crate::types::LyricDocument;

/// 把 `position` 打到 `line_id` 对应的行上。
///
/// 时间会先经过格式化再解析，保证与导出文本的精度一致。返回是否找到了该行。
pub fn stamp_line(document: &mut LyricDocument, line_id: usize, position: f64) -> bool {
    let timestamp = Timestamp::quantized(position);
    match document.line_mut(line_id) {
        Some(line) => {
            log::debug!("[LyricEditor] 第 {line_id} 行打轴为 {timestamp}");
            line.timestamp = Some(timestamp);
            true
        }
        None => {
            log::debug!("[LyricEditor] 忽略不存在的行 {line_id}");
            false
        }
    }
}

/// 清空所有行的时间，文本和原始行保持不变。返回被清空的行数。
pub fn reset_all(document: &mut LyricDocument) -> usize {
    let mut cleared = 0;
    for line in &mut document.lines {
        if line.timestamp.take().is_some() {
            cleared += 1;
        }
    }
    log::info!("[LyricEditor] 已清空 {cleared} 行的时间戳。");
    cleared
}

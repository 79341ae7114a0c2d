//! # 歌词间跳转
//!
//! 计算“上一句/下一句”的跳转目标。有当前行时按行顺序逐行查找，而不是按时间大小，
//! 这样重复或乱序的时间戳也不会让跳转卡住。

use crate::resolver::resolve_active_line;
use crate::types::LyricDocument;

/// 上一句已打轴歌词的时间。
///
/// - 当前行为 `i > 0`：从 `i - 1` 往前找第一条已打轴的行；
/// - 当前行为 0：没有上一句；
/// - 没有当前行：取所有严格早于 `position` 的时间中最大的一个。
///
/// `position` 为 `NaN` 或无穷大时没有跳转目标。
pub fn previous_stamped_time(document: &LyricDocument, position: f64) -> Option<f64> {
    if !position.is_finite() {
        return None;
    }
    let lines = &document.lines;
    match resolve_active_line(document, position) {
        Some(0) => None,
        Some(active) => lines[..active].iter().rev().find_map(|line| line.seconds()),
        None => greatest_stamp_below(document, position),
    }
}

/// 下一句已打轴歌词的时间，与 [`previous_stamped_time`] 对称。
///
/// 没有当前行时取所有严格晚于 `position` 的时间中最小的一个。
pub fn next_stamped_time(document: &LyricDocument, position: f64) -> Option<f64> {
    if !position.is_finite() {
        return None;
    }
    let lines = &document.lines;
    match resolve_active_line(document, position) {
        Some(active) => lines[active + 1..].iter().find_map(|line| line.seconds()),
        None => least_stamp_above(document, position),
    }
}

/// 所有严格早于 `position` 的时间中最大的一个。
pub fn greatest_stamp_below(document: &LyricDocument, position: f64) -> Option<f64> {
    document
        .lines
        .iter()
        .filter_map(|line| line.seconds())
        .filter(|&seconds| seconds < position)
        .max_by(f64::total_cmp)
}

/// 所有严格晚于 `position` 的时间中最小的一个。
pub fn least_stamp_above(document: &LyricDocument, position: f64) -> Option<f64> {
    document
        .lines
        .iter()
        .filter_map(|line| line.seconds())
        .filter(|&seconds| seconds > position)
        .min_by(f64::total_cmp)
}

/// 点击某一行时应跳转到的位置；未打轴或不存在的行返回 `None`。
pub fn seek_target_for_line(document: &LyricDocument, line_id: usize) -> Option<f64> {
    document.line(line_id).and_then(|line| line.seconds())
}

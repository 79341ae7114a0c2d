//! # 当前行定位
//!
//! 给定播放位置，找出应当高亮的歌词行。
//!
//! 规则：从后往前扫描，取第一条满足以下条件的已打轴行 `i`：
//! - `i` 的时间不晚于当前位置；
//! - `i` 是最后一行，或下一行未打轴，或下一行的时间晚于当前位置。
//!
//! 只比较相邻的下一行，因此时间戳不单调时也能给出结果。位置恰好为 0 表示尚未开始播放，总是返回 `None`；
//! `NaN` 和无穷大不是有效的播放位置，同样返回 `None`。

use crate::types::LyricDocument;

/// 返回当前行的下标，没有当前行时返回 `None`。
pub fn resolve_active_line(document: &LyricDocument, position: f64) -> Option<usize> {
    if position == 0.0 || !position.is_finite() {
        return None;
    }

    let lines = &document.lines;
    (0..lines.len()).rev().find(|&i| {
        let Some(seconds) = lines[i].seconds() else {
            return false;
        };
        if seconds > position {
            return false;
        }
        match lines.get(i + 1).and_then(|next| next.seconds()) {
            None => true,
            Some(next_seconds) => next_seconds > position,
        }
    })
}

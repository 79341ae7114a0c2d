//! # 时间戳编解码
//!
//! 处理歌词行首的 `[M:SS.ss]` 时间标签。分钟数不补零且没有上限，秒数补零到 5 位宽并保留两位小数。

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::sanitize_seconds;

/// 严格匹配单个时间标签，例如 `[1:02.30]`、`[0:5]`。
static TIMESTAMP_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(\d+):(\d+(?:\.\d+)?)\]$").expect("未能编译 TIMESTAMP_TOKEN_REGEX")
});

/// 以秒为单位的非负时间点。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(f64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0.0);

    /// 非有限值和负数都会被钳制为 0。
    pub fn from_seconds(seconds: f64) -> Self {
        Self(sanitize_seconds(seconds))
    }

    pub fn seconds(self) -> f64 {
        self.0
    }

    /// 解析一个完整的时间标签，形状不对时返回 `None`。
    pub fn parse(token: &str) -> Option<Self> {
        let caps = TIMESTAMP_TOKEN_REGEX.captures(token)?;
        Self::from_parts(&caps[1], &caps[2])
    }

    /// 先格式化再解析，得到与导出文本精度一致（百分之一秒）的值。
    pub fn quantized(seconds: f64) -> Self {
        let raw = Self::from_seconds(seconds);
        Self::parse(&raw.to_string()).unwrap_or(raw)
    }

    /// 由分钟和秒两段文本组装时间。秒数允许 `10.` 这种只有小数点的写法。
    ///
    /// 数字过长、总秒数溢出为无穷大时返回 `None`，该行按未打轴处理。
    pub(crate) fn from_parts(minutes: &str, seconds: &str) -> Option<Self> {
        let minutes: f64 = minutes.parse().ok()?;
        let seconds: f64 = seconds.trim_end_matches('.').parse().ok()?;
        let total = minutes * 60.0 + seconds;
        total.is_finite().then(|| Self::from_seconds(total))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = (self.0 / 60.0).floor();
        // 极大的值减法会有舍入误差，不能让秒数变成负数
        let seconds = (self.0 - minutes * 60.0).max(0.0);
        write!(f, "[{minutes:.0}:{seconds:05.2}]")
    }
}

/// 解析时间标签，返回总秒数。
pub fn parse_timestamp(token: &str) -> Option<Timestamp> {
    Timestamp::parse(token)
}

/// 把时间格式化为 `[M:SS.ss]`。
pub fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp.to_string()
}

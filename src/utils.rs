/// 把播放器上报的秒数规范化：`NaN`、无穷大和负数一律视为 0。
pub fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// 去掉文件名末尾的扩展名（不区分大小写）。不匹配时原样返回。
pub fn strip_extension<'a>(file_name: &'a str, extensions: &[&str]) -> &'a str {
    match file_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)) =>
        {
            stem
        }
        _ => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_seconds() {
        assert_eq!(sanitize_seconds(12.5), 12.5);
        assert_eq!(sanitize_seconds(-0.1), 0.0);
        assert_eq!(sanitize_seconds(f64::NAN), 0.0);
        assert_eq!(sanitize_seconds(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("1.Song.txt", &["txt"]), "1.Song");
        assert_eq!(strip_extension("2.Intro.MP3", &["mp3", "wav"]), "2.Intro");
        assert_eq!(strip_extension("3.Outro.flac", &["mp3", "wav"]), "3.Outro.flac");
        assert_eq!(strip_extension("txt", &["txt"]), "txt");
    }
}

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SyncResult;

/// 按曲目编号提供歌词原文。找不到歌词不算错误，返回 `None` 即可，调用方会把它当作空文档。
pub trait LyricSource {
    fn load(&self, track_number: u32) -> Option<String>;
}

/// 宿主直接注入的“曲目编号 → 歌词文本”映射。
#[derive(Debug, Clone, Default)]
pub struct InMemoryLyricSource {
    texts: HashMap<u32, String>,
}

impl InMemoryLyricSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, track_number: u32, text: impl Into<String>) {
        self.texts.insert(track_number, text.into());
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for InMemoryLyricSource {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        Self {
            texts: iter.into_iter().map(|(n, text)| (n, text.into())).collect(),
        }
    }
}

impl LyricSource for InMemoryLyricSource {
    fn load(&self, track_number: u32) -> Option<String> {
        self.texts.get(&track_number).cloned()
    }
}

/// 宿主注入的“曲目编号 → 歌词文件路径”映射，按需读取文件。
#[derive(Debug, Clone, Default)]
pub struct FileLyricSource {
    paths: HashMap<u32, PathBuf>,
}

impl FileLyricSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, track_number: u32, path: impl Into<PathBuf>) {
        self.paths.insert(track_number, path.into());
    }
}

impl LyricSource for FileLyricSource {
    fn load(&self, track_number: u32) -> Option<String> {
        let Some(path) = self.paths.get(&track_number) else {
            log::warn!("[LyricSource] 曲目 {track_number} 没有对应的歌词文件。");
            return None;
        };
        match read_lyric_file(path) {
            Ok(content) => Some(content),
            Err(e) => {
                log::error!("[LyricSource] 读取歌词文件 '{}' 失败: {}", path.display(), e);
                None
            }
        }
    }
}

/// 读取歌词文件，去掉可能存在的 UTF-8 BOM。
pub fn read_lyric_file(path: &Path) -> SyncResult<String> {
    let content = fs::read_to_string(path)?;
    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// 写入文本文件，必要时创建父目录。
pub fn write_text_file(path: &Path, content: &str) -> SyncResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    log::info!("[LyricSource] 文件已成功保存到: {}", path.display());
    Ok(())
}

//! 歌词时间轴同步核心。
//!
//! 解析带可选时间戳的歌词文本，按播放位置定位当前行，支持在当前位置给某行打轴、
//! 在已打轴的行之间跳转，并把编辑后的文档按原格式导出。

pub mod app_settings;
pub mod editor;
pub mod error;
pub mod export;
pub mod io;
pub mod logger;
pub mod lyric_generator;
pub mod lyric_parser;
pub mod navigator;
pub mod resolver;
pub mod session;
pub mod timestamp;
pub mod track_catalog;
pub mod types;
pub mod utils;

pub use editor::{reset_all, stamp_line};
pub use error::{SyncError, SyncResult};
pub use lyric_generator::generate_lyric_text;
pub use lyric_parser::parse_lyric_document;
pub use navigator::{next_stamped_time, previous_stamped_time, seek_target_for_line};
pub use resolver::resolve_active_line;
pub use session::{ActiveLineUpdate, SeekSink, SyncSession};
pub use timestamp::{Timestamp, format_timestamp, parse_timestamp};
pub use types::{DocumentHeader, LyricDocument, LyricLine};

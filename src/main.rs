use std::path::PathBuf;
use std::process::ExitCode;

use lyric_sync::app_settings::{AppSettings, SyncSettings};
use lyric_sync::export::{ClipboardSink, ConfiguredExporter};
use lyric_sync::io::{InMemoryLyricSource, read_lyric_file};
use lyric_sync::{SyncResult, SyncSession, logger, parse_lyric_document};

const USAGE: &str = "用法: lyric_sync <歌词文件> [播放位置(秒)...] [--json] [--export]";

struct CliArgs {
    path: PathBuf,
    positions: Vec<f64>,
    as_json: bool,
    export: bool,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut path = None;
    let mut positions = Vec::new();
    let mut as_json = false;
    let mut export = false;
    for arg in args {
        match arg.as_str() {
            "--json" => as_json = true,
            "--export" => export = true,
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => match arg.parse::<f64>() {
                Ok(position) => positions.push(position),
                Err(_) => return Err(format!("无效的播放位置: '{arg}'")),
            },
        }
    }
    let path = path.ok_or_else(|| "缺少歌词文件".to_string())?;
    Ok(CliArgs {
        path,
        positions,
        as_json,
        export,
    })
}

fn run(args: &CliArgs, sync_settings: &SyncSettings) -> SyncResult<()> {
    let content = read_lyric_file(&args.path)?;
    let mut session = SyncSession::new(InMemoryLyricSource::new());
    session.replace_document(None, parse_lyric_document(&content));
    let document = session.document();

    if args.as_json {
        println!("{}", serde_json::to_string_pretty(document)?);
    } else {
        match &document.header {
            Some(header) => println!(
                "曲目 {}: {} ({} 行，已打轴 {} 行)",
                header.track_number,
                header.track_title,
                document.len(),
                document.stamped_count()
            ),
            None => println!("暂无歌词"),
        }

        for &raw in &args.positions {
            // 进度经过会话规范化，NaN/无穷大/负数都按 0 处理
            let update = session.update_position(raw);
            let position = session.position();
            match update.active_line {
                Some(index) => println!(
                    "{position:>8.2}s -> #{index} {}",
                    session.document().lines[index].text
                ),
                None => println!("{position:>8.2}s -> (无)"),
            }
        }
    }

    if args.export {
        let mut exporter = ConfiguredExporter::with_clipboard(
            sync_settings,
            ClipboardSink::waiting_for_handover(),
        );
        let channel = session.export_configured(&mut exporter)?;
        log::info!(
            target: "lyric_sync_main",
            "导出完成（首选 {}，实际使用 {channel:?} 通道）。",
            exporter.target()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let app_settings = AppSettings::load();
    logger::init_global_logger(&app_settings.log_settings);

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(&args, &app_settings.sync_settings) {
        log::error!(target: "lyric_sync_main", "处理失败: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<CliArgs, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args_flags_and_positions() {
        let parsed = args(&["song.txt", "12.5", "--export", "NaN", "--json"]).unwrap();
        assert_eq!(parsed.path, PathBuf::from("song.txt"));
        assert_eq!(parsed.positions.len(), 2);
        assert!(parsed.positions[1].is_nan());
        assert!(parsed.as_json && parsed.export);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["--json"]).is_err());
        assert!(args(&["song.txt", "abc"]).is_err());
    }

    #[test]
    fn test_cli_positions_are_sanitized() {
        let mut session = SyncSession::new(InMemoryLyricSource::new());
        session.replace_document(None, parse_lyric_document("1.T\n[0:10]a\n[0:20]b"));
        for raw in [f64::NAN, f64::INFINITY, -4.0] {
            assert_eq!(session.update_position(raw).active_line, None, "位置 {raw}");
            assert_eq!(session.position(), 0.0);
        }
    }
}

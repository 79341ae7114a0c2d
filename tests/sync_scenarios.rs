use lyric_sync::export::{ExportChannel, ExportSink, FileSink};
use lyric_sync::io::InMemoryLyricSource;
use lyric_sync::track_catalog::{PreviousAction, TrackCatalog};
use lyric_sync::{
    DocumentHeader, SyncError, SyncResult, SyncSession, Timestamp, generate_lyric_text,
    parse_lyric_document, previous_stamped_time, reset_all, resolve_active_line, stamp_line,
};

const SCENARIO: &str = "3.Song\n[0:10.00] first\n[0:20.50] second\nthird";

fn approx(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => (x - y).abs() <= 0.01 + 1e-9,
        (None, None) => true,
        _ => false,
    }
}

#[test]
fn scenario_a_parse_and_resolve() {
    let doc = parse_lyric_document(SCENARIO);
    assert_eq!(doc.header, Some(DocumentHeader::new(3, "Song")));

    let summary: Vec<(Option<f64>, &str)> = doc
        .lines
        .iter()
        .map(|l| (l.seconds(), l.text.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![(Some(10.0), "first"), (Some(20.5), "second"), (None, "third")]
    );

    assert_eq!(resolve_active_line(&doc, 15.0), Some(0));
    assert_eq!(resolve_active_line(&doc, 25.0), Some(1));
}

#[test]
fn scenario_b_stamp_then_serialize() {
    let mut doc = parse_lyric_document(SCENARIO);
    assert!(stamp_line(&mut doc, 2, 30.0));
    let text = generate_lyric_text(&doc);
    assert_eq!(text.lines().last(), Some("[0:30.00] third"));
}

#[test]
fn scenario_c_reset_then_serialize() {
    let mut doc = parse_lyric_document(SCENARIO);
    reset_all(&mut doc);
    assert!(doc.lines.iter().all(|l| l.timestamp.is_none()));
    assert_eq!(generate_lyric_text(&doc), "3.Song\nfirst\nsecond\nthird");
}

#[test]
fn resolve_at_zero_is_never_active() {
    let doc = parse_lyric_document("1.T\n[0:00.00] zero\n[0:01.00] one");
    assert_eq!(resolve_active_line(&doc, 0.0), None);
}

#[test]
fn previous_matches_nearest_preceding_stamp() {
    let doc = parse_lyric_document("1.T\n[0:02]a\nb\n[0:06]c\nd\n[0:09]e\n[0:15]f");
    let mut position = 0.5;
    while position < 20.0 {
        if let Some(active) = resolve_active_line(&doc, position) {
            let expected = doc.lines[..active].iter().rev().find_map(|l| l.seconds());
            assert_eq!(previous_stamped_time(&doc, position), expected, "位置 {position}");
        }
        position += 0.5;
    }
}

#[test]
fn edited_document_survives_reparse() {
    let mut doc = parse_lyric_document("42.Long Title. With Dots\nalpha\nbeta\ngamma\ndelta");
    for (line_id, position) in [(0, 1.234), (1, 59.996), (3, 3601.5)] {
        assert!(stamp_line(&mut doc, line_id, position));
    }

    let reparsed = parse_lyric_document(&generate_lyric_text(&doc));
    assert_eq!(reparsed.header, doc.header);
    assert_eq!(reparsed.len(), doc.len());
    for (a, b) in doc.lines.iter().zip(&reparsed.lines) {
        assert_eq!(a.text, b.text);
        assert!(approx(a.seconds(), b.seconds()), "{:?} vs {:?}", a.seconds(), b.seconds());
    }
    assert!(approx(reparsed.lines[1].seconds(), Some(60.0)));
}

#[test]
fn codec_inverse_within_a_centisecond() {
    for t in [0.0, 0.004, 0.005, 9.999, 59.994, 59.996, 61.0, 599.99, 12345.678] {
        let back =
            Timestamp::parse(&Timestamp::from_seconds(t).to_string()).map(Timestamp::seconds);
        assert!(approx(back, Some(t)), "{t} -> {back:?}");
    }
}

struct DeniedClipboard;

impl ExportSink for DeniedClipboard {
    fn name(&self) -> &str {
        "剪贴板"
    }

    fn deliver(&mut self, _content: &str) -> SyncResult<()> {
        Err(SyncError::Custom("clipboard denied".to_string()))
    }
}

#[test]
fn session_round_trip_through_catalog_and_file_export() {
    let catalog = TrackCatalog::from_file_names(["3.Song.txt", "1.Intro.txt"]);
    let source: InMemoryLyricSource = [(3, SCENARIO), (1, "1.Intro\nhum")].into_iter().collect();
    let mut session = SyncSession::new(source);

    let first = catalog.first().cloned().unwrap();
    assert_eq!(first.track_number, 1);
    session.select_track(first);
    assert_eq!(session.document().len(), 1);

    let next = catalog.next_track(1).and_then(|n| catalog.get(n)).cloned().unwrap();
    let generation = session.select_track(next);
    assert!(session.is_current(generation));

    session.update_position(30.0);
    assert!(session.stamp_line(2));

    let dir = tempfile::tempdir().unwrap();
    let header = session.document().header.clone().unwrap();
    let mut file_sink = FileSink::for_header(dir.path(), &header);
    let channel = session.export(&mut DeniedClipboard, &mut file_sink).unwrap();
    assert_eq!(channel, ExportChannel::Fallback);

    let saved = std::fs::read_to_string(dir.path().join("3.Song.txt")).unwrap();
    assert_eq!(saved, session.serialize());
    assert!(saved.ends_with("\n[0:30.00] third"));

    assert_eq!(
        catalog.previous_action(3, session.position(), 5.0),
        PreviousAction::RestartCurrent
    );
}

//! JSON-lines row sink tests.

use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use mailtriage::report::ReportRow;
use mailtriage::sink::{JsonlSink, RowSink};

#[derive(Clone)]
struct SharedBuf(Arc<Mutex<Cursor<Vec<u8>>>>);

impl SharedBuf {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Cursor::new(Vec::new()))))
    }
    fn contents(&self) -> String {
        let c = self.0.lock().expect("test lock");
        String::from_utf8_lossy(c.get_ref()).to_string()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("test lock").write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().expect("test lock").flush()
    }
}

fn row(summary: &str) -> ReportRow {
    ReportRow {
        summary: summary.to_owned(),
        category: "IT".to_owned(),
        urgency: "Critical".to_owned(),
        action_required: "Yes".to_owned(),
    }
}

#[test]
fn appends_one_json_object_per_row() {
    let buf = SharedBuf::new();
    let sink = JsonlSink::from_writer(Box::new(buf.clone()));

    sink.append(&row("first")).expect("append should succeed");
    sink.append(&row("second")).expect("append should succeed");

    let contents = buf.contents();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(contents.ends_with('\n'));

    let entry: Value = serde_json::from_str(lines[0]).expect("line should be JSON");
    assert_eq!(entry["summary"], "first");
    assert_eq!(entry["category"], "IT");
    assert_eq!(entry["urgency"], "Critical");
    assert_eq!(entry["action_required"], "Yes");

    let recorded_at = entry["recorded_at"].as_str().expect("timestamp string");
    assert!(chrono::DateTime::parse_from_rfc3339(recorded_at).is_ok());

    let second: Value = serde_json::from_str(lines[1]).expect("line should be JSON");
    assert_eq!(second["summary"], "second");
}

#[test]
fn file_sink_appends_across_instances() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rows.jsonl");

    JsonlSink::new(&path)
        .expect("sink should open")
        .append(&row("one"))
        .expect("append should succeed");
    JsonlSink::new(&path)
        .expect("sink should reopen")
        .append(&row("two"))
        .expect("append should succeed");

    let contents = std::fs::read_to_string(&path).expect("read sink file");
    let summaries: Vec<String> = contents
        .lines()
        .map(|line| {
            let entry: Value = serde_json::from_str(line).expect("line should be JSON");
            entry["summary"].as_str().unwrap_or_default().to_owned()
        })
        .collect();
    assert_eq!(summaries, vec!["one", "two"]);
}

#[test]
fn unopenable_path_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing-dir").join("rows.jsonl");
    assert!(JsonlSink::new(&path).is_err());
}

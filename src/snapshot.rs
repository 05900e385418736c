//! Tab snapshot files and metric extraction.

use crate::config::Metric;
use crate::error::{PlotError, Result};
use serde_json::{Number, Value};
use std::fs;
use std::io;
use std::path::Path;

/// One captured snapshot of the browser's tabs.
///
/// Only `tab_infos` is kept; other keys such as `timestamp` are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub tab_infos: Vec<Value>,
}

impl Snapshot {
    /// Parse a snapshot document. Only malformed JSON is rejected.
    pub fn from_slice(bytes: &[u8]) -> std::result::Result<Self, String> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        Ok(Self::from_value(value))
    }

    /// A document that is not an object, or whose `tab_infos` is not a list,
    /// carries no tabs.
    pub fn from_value(value: Value) -> Self {
        let tab_infos = match value {
            Value::Object(mut map) => match map.remove("tab_infos") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Self { tab_infos }
    }

    /// First entry of `tab_infos`, if the list is non-empty
    pub fn first_tab(&self) -> Option<&Value> {
        self.tab_infos.first()
    }

    /// Value of `metric` in the first tab.
    ///
    /// `Ok(None)` means the snapshot carries no tabs. A first tab that lacks
    /// the field or holds a non-numeric value is an error.
    pub fn metric(&self, metric: Metric) -> std::result::Result<Option<Number>, String> {
        let Some(tab) = self.first_tab() else {
            return Ok(None);
        };
        let tab = tab
            .as_object()
            .ok_or_else(|| "first tab_infos entry is not an object".to_string())?;
        match tab.get(metric.field()) {
            Some(Value::Number(n)) => Ok(Some(n.clone())),
            Some(other) => Err(format!("'{}' is not a number: {}", metric.field(), other)),
            None => Err(format!("first tab_infos entry has no '{}'", metric.field())),
        }
    }
}

/// Read and parse the snapshot at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Option<Snapshot>> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PlotError::FileRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    Snapshot::from_slice(&bytes)
        .map(Some)
        .map_err(|reason| PlotError::parse(path, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Snapshot {
        Snapshot::from_slice(json.as_bytes()).unwrap()
    }

    #[test]
    fn extracts_first_tab_only() {
        let snap = parse(
            r#"{"timestamp": 1.5, "tab_infos": [
                {"title": "a", "cpu_usage": 37.5, "rss": 204800},
                {"title": "b", "cpu_usage": 99.0, "rss": 1}
            ]}"#,
        );
        assert_eq!(snap.metric(Metric::CpuUsage).unwrap().unwrap().as_f64(), Some(37.5));
        assert_eq!(snap.metric(Metric::Rss).unwrap().unwrap().as_u64(), Some(204800));
    }

    #[test]
    fn keeps_integer_type() {
        let snap = parse(r#"{"tab_infos": [{"cpu_usage": 3, "rss": 10}]}"#);
        let cpu = snap.metric(Metric::CpuUsage).unwrap().unwrap();
        assert!(cpu.is_u64());
        assert_eq!(cpu, Number::from(3));
    }

    #[test]
    fn no_tabs_is_not_an_error() {
        for json in [
            r#"{}"#,
            r#"{"tab_infos": []}"#,
            r#"{"tab_infos": null}"#,
            r#"{"tab_infos": 5}"#,
            r#"[1, 2]"#,
            r#""tab_infos""#,
            r#"true"#,
            r#"null"#,
            r#"42"#,
        ] {
            assert_eq!(parse(json).metric(Metric::Rss), Ok(None), "{}", json);
        }
    }

    #[test]
    fn later_entries_are_not_inspected() {
        let snap = parse(r#"{"tab_infos": [{"cpu_usage": 1.0, "rss": 2}, 42, "junk"]}"#);
        assert!(snap.metric(Metric::CpuUsage).unwrap().is_some());
    }

    #[test]
    fn bad_first_entry_is_an_error() {
        assert!(parse(r#"{"tab_infos": [{"rss": 2}]}"#).metric(Metric::CpuUsage).is_err());
        assert!(parse(r#"{"tab_infos": [{"cpu_usage": "high"}]}"#).metric(Metric::CpuUsage).is_err());
        assert!(parse(r#"{"tab_infos": [7]}"#).metric(Metric::Rss).is_err());
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(Snapshot::from_slice(b"{\"tab_infos\": [").is_err());
        assert!(Snapshot::from_slice(b"").is_err());
        assert!(Snapshot::from_slice(b"[1, 2").is_err());
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_snapshot(dir.path().join("data-0.json")).unwrap(), None);
    }

    #[test]
    fn directory_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_snapshot(dir.path()).unwrap_err();
        assert_eq!(err.kind(), "file-read-error");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data-0.json");
        fs::write(&path, "not json").unwrap();
        let err = load_snapshot(&path).unwrap_err();
        assert_eq!(err.kind(), "parse-error");
        assert_eq!(err.path(), path.as_path());
    }
}

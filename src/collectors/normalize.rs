use crate::error::LoadError;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Some producers write this marker in front of the real document.
const VERSION_PREFIX: &str = r#"{"version":"3"}"#;

/// Where the server list lives inside one JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{"minio": {"info": {"servers": [...]}}}` (diagnostic bundle)
    Wrapped,
    /// `{"info": {"servers": [...]}}`
    Direct,
}

impl Shape {
    fn info_path(self) -> &'static [&'static str] {
        match self {
            Shape::Wrapped => &["minio", "info"],
            Shape::Direct  => &["info"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// The whole file is one JSON value.
    Document,
    /// One JSON value per line.
    Lines,
}

/// One normalization attempt. Tried in table order, first hit wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub framing: Framing,
    pub shapes:  &'static [Shape],
}

pub const STRATEGIES: &[Strategy] = &[
    Strategy { framing: Framing::Document, shapes: &[Shape::Wrapped] },
    Strategy { framing: Framing::Document, shapes: &[Shape::Direct] },
    Strategy { framing: Framing::Lines,    shapes: &[Shape::Wrapped, Shape::Direct] },
];

/// Canonical form of a snapshot: the info object and its non-empty server list.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub info:    Value,
    pub servers: Vec<Value>,
    pub shape:   Shape,
    pub framing: Framing,
}

/// Read `path` and normalize its contents.
pub fn load(path: &Path) -> Result<Snapshot, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = raw.len(), "read snapshot");
    normalize(&raw)
}

pub fn normalize(raw: &str) -> Result<Snapshot, LoadError> {
    let text = raw.replacen(VERSION_PREFIX, "", 1);
    let document: Option<Value> = serde_json::from_str(&text).ok();

    for strategy in STRATEGIES {
        let found = match strategy.framing {
            Framing::Document => document.as_ref()
                .and_then(|doc| try_shapes(doc, strategy.shapes)),
            Framing::Lines => text.lines()
                .filter(|l| !l.trim().is_empty())
                .filter_map(|l| serde_json::from_str::<Value>(l).ok())
                .find_map(|doc| try_shapes(&doc, strategy.shapes)),
        };
        debug!(?strategy, matched = found.is_some(), "normalization attempt");
        if let Some((shape, info, servers)) = found {
            return Ok(Snapshot { info, servers, shape, framing: strategy.framing });
        }
    }

    Err(LoadError::Schema { keys: top_level_keys(document.as_ref(), &text) })
}

fn try_shapes(doc: &Value, shapes: &[Shape]) -> Option<(Shape, Value, Vec<Value>)> {
    shapes.iter().find_map(|&shape| {
        let info = shape.info_path().iter().try_fold(doc, |v, key| v.get(*key))?;
        let servers = info.get("servers")?.as_array()?;
        if servers.is_empty() { return None; }
        Some((shape, info.clone(), servers.clone()))
    })
}

/// Keys of the whole document, or of the first parseable line when the
/// file is not a single JSON value.
fn top_level_keys(document: Option<&Value>, text: &str) -> Vec<String> {
    let first_line;
    let source = match document {
        Some(doc) => Some(doc),
        None => {
            first_line = text.lines()
                .filter_map(|l| serde_json::from_str::<Value>(l).ok())
                .find(|v| v.is_object());
            first_line.as_ref()
        }
    };
    let mut keys: Vec<String> = source
        .and_then(|v| v.as_object())
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default();
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVERS: &str = r#"{"servers":[{"endpoint":"node1:9000","drives":[]}]}"#;

    #[test]
    fn reads_wrapped_document() {
        let raw = format!(r#"{{"minio":{{"info":{}}}}}"#, SERVERS);
        let snap = normalize(&raw).unwrap();
        assert_eq!(snap.shape, Shape::Wrapped);
        assert_eq!(snap.framing, Framing::Document);
        assert_eq!(snap.servers.len(), 1);
    }

    #[test]
    fn reads_direct_document() {
        let raw = format!(r#"{{"status":"success","info":{}}}"#, SERVERS);
        let snap = normalize(&raw).unwrap();
        assert_eq!(snap.shape, Shape::Direct);
    }

    #[test]
    fn wrapped_shape_is_preferred() {
        let raw = format!(
            r#"{{"info":{{"servers":[{{"endpoint":"direct"}}]}},"minio":{{"info":{{"servers":[{{"endpoint":"wrapped"}}]}}}}}}"#
        );
        let snap = normalize(&raw).unwrap();
        assert_eq!(snap.shape, Shape::Wrapped);
        assert_eq!(snap.servers[0]["endpoint"], "wrapped");
    }

    #[test]
    fn strips_version_prefix() {
        let raw = format!(r#"{{"version":"3"}}{{"info":{}}}"#, SERVERS);
        let snap = normalize(&raw).unwrap();
        assert_eq!(snap.framing, Framing::Document);
        assert_eq!(snap.shape, Shape::Direct);
    }

    #[test]
    fn falls_back_to_line_framing() {
        let raw = format!(
            "{{\"kind\":\"header\"}}\nnot json at all\n\n{{\"info\":{{\"servers\":[]}}}}\n{{\"minio\":{{\"info\":{}}}}}\n",
            SERVERS
        );
        let snap = normalize(&raw).unwrap();
        assert_eq!(snap.framing, Framing::Lines);
        assert_eq!(snap.shape, Shape::Wrapped);
    }

    #[test]
    fn empty_server_list_does_not_match() {
        let err = normalize(r#"{"info":{"servers":[]},"zeta":1}"#).unwrap_err();
        match err {
            LoadError::Schema { keys } => assert_eq!(keys, vec!["info", "zeta"]),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn schema_error_reports_keys_of_first_line() {
        let err = normalize("{\"b\":1,\"a\":2}\n{\"c\":3}\n").unwrap_err();
        assert!(err.to_string().contains("[a, b]"), "{}", err);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = load(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, LoadError::Input { .. }));
        assert!(err.to_string().contains("/nonexistent/snapshot.json"));
    }
}

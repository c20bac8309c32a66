// Snapshot loading: framings, shapes and the two load failures

mod common;

use common::*;
use mdb::collectors::normalize::{self, Framing, Shape};
use mdb::config::ReportConfig;
use mdb::error::{ConfigError, LoadError};
use mdb::models::cluster::Cluster;
use serde_json::json;

#[test]
fn test_version_prefixed_bundle() {
    let raw = format!("{}{}", r#"{"version":"3"}"#, wrapped(two_pool_servers()));
    let (_dir, path) = write_snapshot(&raw);
    let snap = normalize::load(&path).expect("load");
    assert_eq!(snap.shape, Shape::Wrapped);
    assert_eq!(snap.framing, Framing::Document);
    assert_eq!(snap.servers.len(), 4);
}

#[test]
fn test_newline_delimited_file() {
    let direct = json!({ "status": "success", "info": { "servers": two_pool_servers() } });
    let raw = format!(
        "{}\nnot json at all\n\n{}\n",
        json!({ "version": "3" }),
        direct
    );
    let (_dir, path) = write_snapshot(&raw);
    let snap = normalize::load(&path).expect("load");
    assert_eq!(snap.framing, Framing::Lines);
    assert_eq!(snap.shape, Shape::Direct);

    let cluster = Cluster::from_snapshot(&snap, "");
    assert_eq!(cluster.disks.len(), 8);
    assert_eq!(cluster.parity_disks, 2);
    assert_eq!(cluster.deployment_id, None);
}

#[test]
fn test_unknown_shape_reports_keys() {
    let (_dir, path) = write_snapshot(r#"{"status":"success","data":{"servers":[]},"error":null}"#);
    let err = normalize::load(&path).unwrap_err();
    match &err {
        LoadError::Schema { keys } => assert_eq!(keys, &["data", "error", "status"]),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(
        err.to_string(),
        "could not find servers in JSON structure (available top-level keys: [data, error, status])"
    );
}

#[test]
fn test_empty_server_list_is_not_a_match() {
    let (_dir, path) = write_snapshot(r#"{"info":{"servers":[]}}"#);
    assert!(matches!(normalize::load(&path), Err(LoadError::Schema { .. })));
}

#[test]
fn test_missing_file_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = normalize::load(&path).unwrap_err();
    assert!(matches!(err, LoadError::Input { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_parity_from_storage_class_environment() {
    let mut servers = two_pool_servers();
    servers[0]["minio_env_vars"] = json!({ "MINIO_STORAGE_CLASS_STANDARD": "EC:3" });
    let raw = json!({ "info": { "servers": servers } }).to_string();
    let (_dir, path) = write_snapshot(&raw);
    let cluster = Cluster::from_snapshot(&normalize::load(&path).unwrap(), "");
    assert_eq!(cluster.parity_disks, 3);
    // four-drive sets at EC:3 keep a quarter of raw capacity
    let text = mdb::util::report::summary(&cluster).to_plain();
    assert!(text.contains("  Usable Capacity: 0.2 TB\n"));
}

#[test]
fn test_invalid_flags_rejected_before_loading() {
    // the file does not exist; validation must fail first
    let cfg = ReportConfig {
        json_file: "/nonexistent/snapshot.json".into(),
        low_space: Some(10.0),
        ..Default::default()
    };
    assert_eq!(cfg.validate(), Err(ConfigError::LowSpaceWithoutSummary));
    assert_eq!(
        ConfigError::LowSpaceWithoutSummary.to_string(),
        "--low-space option requires --summary mode"
    );
}

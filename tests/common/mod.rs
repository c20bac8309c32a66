// Shared snapshot fixtures

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const GB: i64 = 1 << 30;

/// One drive record as the diagnostic tool writes it.
pub fn drive(pool: i64, set: i64, index: i64, state: &str, total: i64, used: i64) -> Value {
    json!({
        "endpoint":    format!("https://node{}.lab.example.com:9000/data{}/minio", index + 1, pool),
        "path":        format!("/data{}", pool),
        "state":       state,
        "uuid":        format!("1f0c6b3e-9a2d-4c1e-8b77-{:04}{:04}{:04}", pool, set, index),
        "pool_index":  pool,
        "set_index":   set,
        "disk_index":  index,
        "totalspace":  total,
        "usedspace":   used,
        "availspace":  total - used,
        "used_inodes": 1200,
        "free_inodes": 98800,
        "local":       true,
    })
}

/// Two pools, one erasure set of four 100 GB drives each, every drive half
/// full. Each of the four servers holds one drive of each pool.
pub fn two_pool_servers() -> Vec<Value> {
    (0..4).map(|i| {
        json!({
            "endpoint": format!("node{}.lab.example.com:9000", i + 1),
            "state":    "online",
            "edition":  "AGPLv3",
            "version":  "2024-05-10T01:41:38Z",
            "commitID": "b5984027386ec1e55c504d27f42ef40a189cdb4f",
            "uptime":   3 * 86400 + 7,
            "mem_stats": { "alloc": 512 * 1024 * 1024 },
            "drives": [
                drive(0, 0, i, "ok", 100 * GB, 50 * GB),
                drive(1, 0, i, "ok", 100 * GB, 50 * GB),
            ],
        })
    })
    .collect()
}

/// `{"minio":{"info":{...}}}` around the given servers.
pub fn wrapped(servers: Vec<Value>) -> String {
    json!({
        "minio": {
            "info": {
                "deploymentID": "6faeded5-5cf3-4133-8a37-07c5d500207c",
                "backend": {
                    "backendType":       "Erasure",
                    "totalSets":         [1, 1],
                    "totalDrivesPerSet": [4, 4],
                    "standardSCParity":  2,
                    "rrSCParity":        1,
                },
                "buckets":  { "count": 12 },
                "objects":  { "count": 4096 },
                "usage":    { "size": 1536 },
                "servers":  servers,
            }
        }
    })
    .to_string()
}

/// Write `contents` into a fresh temp dir; the dir must outlive the path.
pub fn write_snapshot(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");
    fs::write(&path, contents).expect("write snapshot");
    (dir, path)
}

use crate::collectors::normalize::Snapshot;
use crate::models::cluster::{BackendInfo, Cluster, PoolIndex, ScannerStatus, ServerInfo};
use crate::models::disk::{Disk, DiskIndex, DiskMetrics};
use crate::util::natural::natural_cmp;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;
use tracing::{debug, info};

/// Parity assumed when the snapshot does not say.
pub const DEFAULT_PARITY: usize = 2;

const STORAGE_CLASS_ENV: &str = "MINIO_STORAGE_CLASS_STANDARD";

impl Cluster {
    pub fn from_snapshot(snap: &Snapshot, trim_domain: &str) -> Self {
        let disks   = extract_disks(&snap.servers, trim_domain);
        let pools   = PoolIndex::from_disks(&disks);
        let servers = extract_servers(&snap.servers, trim_domain, &pools);
        let parity_disks = detect_parity(&snap.info, &snap.servers);
        info!(
            servers = snap.servers.len(),
            disks   = disks.len(),
            pools   = pools.pool_count(),
            sets    = pools.set_count(),
            parity  = parity_disks,
            "snapshot extracted"
        );
        Cluster {
            disks,
            servers,
            pools,
            deployment_id: str_opt(&snap.info["deploymentID"]),
            parity_disks,
            backend: parse_backend(&snap.info["backend"]),
            scanner: parse_scanner(&snap.info),
        }
    }
}

/// One `Disk` per drive entry of every server, in snapshot order.
pub fn extract_disks(servers: &[Value], trim_domain: &str) -> Vec<Disk> {
    servers.iter().flat_map(|server| {
        let host = host_name(server["endpoint"].as_str().unwrap_or(""), trim_domain);
        drives(server).iter().map(move |d| parse_drive(d, &host)).collect::<Vec<_>>()
    })
    .collect()
}

fn drives(server: &Value) -> &[Value] {
    server["drives"].as_array().map(|v| v.as_slice()).unwrap_or(&[])
}

fn parse_drive(d: &Value, host: &str) -> Disk {
    let path = match str_opt(&d["path"]) {
        Some(p) => p,
        None    => path_from_endpoint(d["endpoint"].as_str().unwrap_or("")),
    };
    let disk_index = match &d["disk_index"] {
        Value::Number(n) => match n.as_i64() {
            Some(i) => DiskIndex::Numeric(i),
            None    => DiskIndex::Raw(n.to_string()),
        },
        Value::String(s) => DiskIndex::from_text(s),
        _                => DiskIndex::Raw("N/A".into()),
    };

    Disk {
        server:          host.to_string(),
        path,
        state:           str_opt(&d["state"]).unwrap_or_else(|| "unknown".into()),
        uuid:            str_opt(&d["uuid"]).unwrap_or_else(|| "N/A".into()),
        scanning:        flag(&d["healing"]) || flag(&d["scanning"]),
        local:           flag(&d["local"]),
        pool_index:      d["pool_index"].as_i64().unwrap_or(0),
        set_index:       d["set_index"].as_i64().unwrap_or(0),
        disk_index,
        total_space:     count(&d["totalspace"]),
        used_space:      count(&d["usedspace"]),
        available_space: count(&d["availspace"]),
        used_inodes:     count(&d["used_inodes"]),
        free_inodes:     count(&d["free_inodes"]),
        metrics:         parse_metrics(&d["metrics"]),
    }
}

fn parse_metrics(m: &Value) -> Option<DiskMetrics> {
    if !m.is_object() { return None; }
    Some(DiskMetrics {
        tokens:              m["totalTokens"].as_u64().unwrap_or(0),
        writes:              m["totalWrites"].as_u64().unwrap_or(0),
        deletes:             m["totalDeletes"].as_u64().unwrap_or(0),
        waiting:             m["totalWaiting"].as_u64().unwrap_or(0),
        timeout_errors:      m["totalErrorsTimeout"].as_u64().unwrap_or(0),
        availability_errors: m["totalErrorsAvailability"].as_u64().unwrap_or(0),
    })
}

/// Servers merged by normalized name, in natural name order.
fn extract_servers(servers: &[Value], trim_domain: &str, pools: &PoolIndex) -> Vec<ServerInfo> {
    let mut merged: BTreeMap<String, (ServerInfo, BTreeSet<i64>)> = BTreeMap::new();

    for s in servers {
        let name = host_name(s["endpoint"].as_str().unwrap_or(""), trim_domain);
        let served: BTreeSet<i64> = drives(s).iter()
            .map(|d| d["pool_index"].as_i64().unwrap_or(0))
            .filter(|p| pools.contains(*p))
            .collect();

        let entry = merged.entry(name.clone()).or_insert_with(|| {
            let info = ServerInfo {
                name,
                state:       s["state"].as_str().unwrap_or("").to_string(),
                edition:     s["edition"].as_str().unwrap_or("").to_string(),
                version:     s["version"].as_str().unwrap_or("").to_string(),
                commit_id:   s["commitID"].as_str().unwrap_or("").to_string(),
                mem_alloc:   s["mem_stats"]["alloc"].as_u64().unwrap_or(0),
                ilm_expiry:  flag(&s["ilmExpiryInProgress"]),
                uptime_secs: s["uptime"].as_i64().unwrap_or(0),
                pools:       Vec::new(),
            };
            (info, BTreeSet::new())
        });
        entry.1.extend(served);
    }

    let mut out: Vec<ServerInfo> = merged.into_values()
        .map(|(mut info, pools)| {
            info.pools = pools.into_iter().collect();
            info
        })
        .collect();
    out.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    out
}

/// Parity from the backend description, then from the storage-class
/// environment of the first server that sets it, then the default.
pub fn detect_parity(info: &Value, servers: &[Value]) -> usize {
    if let Some(p) = info["backend"]["standardSCParity"].as_u64().filter(|p| *p > 0) {
        debug!(parity = p, "parity from backend");
        return p as usize;
    }
    for s in servers {
        if let Some(p) = s["minio_env_vars"][STORAGE_CLASS_ENV].as_str().and_then(parse_ec) {
            debug!(parity = p, "parity from storage class environment");
            return p;
        }
    }
    debug!(parity = DEFAULT_PARITY, "parity not advertised, using default");
    DEFAULT_PARITY
}

/// "EC:3" → 3
fn parse_ec(s: &str) -> Option<usize> {
    s.trim().strip_prefix("EC:")?.trim().parse().ok()
}

fn parse_backend(b: &Value) -> Option<BackendInfo> {
    if !b.is_object() { return None; }
    let ints = |v: &Value| -> Vec<i64> {
        v.as_array().map(|a| a.iter().filter_map(Value::as_i64).collect()).unwrap_or_default()
    };
    Some(BackendInfo {
        total_sets:         ints(&b["totalSets"]),
        drives_per_set:     ints(&b["totalDrivesPerSet"]),
        standard_sc_parity: b["standardSCParity"].as_i64().unwrap_or(0),
        rr_sc_parity:       b["rrSCParity"].as_i64().unwrap_or(0),
    })
}

fn parse_scanner(info: &Value) -> ScannerStatus {
    ScannerStatus {
        buckets:        info["buckets"]["count"].as_u64().unwrap_or(0),
        objects:        info["objects"]["count"].as_u64().unwrap_or(0),
        versions:       info["versions"]["count"].as_u64().unwrap_or(0),
        delete_markers: info["deletemarkers"]["count"].as_u64().unwrap_or(0),
        usage_bytes:    info["usage"]["size"].as_u64().unwrap_or(0),
    }
}

// ── Endpoint helpers ──────────────────────────────────────────────────

/// Reduce a server endpoint to a short display name.
///
/// Scheme, path and port are dropped. IP addresses come back in canonical
/// form. Otherwise the first DNS label is kept, or, when `trim_domain` is
/// set, exactly that suffix (and one trailing dot) is removed.
pub fn host_name(endpoint: &str, trim_domain: &str) -> String {
    let mut host = endpoint;
    if let Some(i) = host.find("://") {
        host = &host[i + 3..];
    }
    if let Some(i) = host.find(['/', '?', '#']) {
        host = &host[..i];
    }
    if let Some(i) = host.rfind('@') {
        host = &host[i + 1..];
    }
    let host = strip_port(host);

    if let Ok(ip) = host.trim_matches(|c| c == '[' || c == ']').parse::<IpAddr>() {
        return ip.to_string();
    }

    if trim_domain.is_empty() {
        return host.split('.').next().unwrap_or("").to_string();
    }
    let trimmed = host.strip_suffix(trim_domain).unwrap_or(host);
    trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        // "[v6]:port" → "v6"; "[v6]" alone is left for the IP check
        if let Some(end) = rest.find(']') {
            if rest[end + 1..].starts_with(':') {
                return &rest[..end];
            }
        }
        return host;
    }
    match host.rfind(':') {
        Some(i) if !host[..i].contains(':') => &host[..i],
        _ => host,
    }
}

/// Drive path recovered from a drive endpoint such as
/// `https://node1:9000/data1/minio` or `https://node1:21000/hadoop/data1`.
pub fn path_from_endpoint(endpoint: &str) -> String {
    if let Some(rest) = endpoint.split("/hadoop/").nth(1) {
        return format!("/{}", rest);
    }
    let parts: Vec<&str> = endpoint.split('/').collect();
    if parts.len() > 3 {
        return format!("/{}", parts[3..].join("/"));
    }
    String::new()
}

// ── JSON helpers ──────────────────────────────────────────────────────

fn str_opt(v: &Value) -> Option<String> {
    v.as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn flag(v: &Value) -> bool {
    v.as_bool().unwrap_or(false)
}

/// Non-negative byte/inode counter; floats are truncated, negatives become 0.
fn count(v: &Value) -> i64 {
    v.as_i64()
        .or_else(|| v.as_u64().map(|u| u.min(i64::MAX as u64) as i64))
        .or_else(|| v.as_f64().map(|f| f as i64))
        .unwrap_or(0)
        .max(0)
}

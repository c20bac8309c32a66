use crate::models::disk::Disk;
use std::collections::{BTreeMap, BTreeSet};

/// Erasure-coding layout as advertised by the snapshot's `backend` object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendInfo {
    pub total_sets:         Vec<i64>,
    pub drives_per_set:     Vec<i64>,
    pub standard_sc_parity: i64,
    pub rr_sc_parity:       i64,
}

/// Object counters gathered by the background scanner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScannerStatus {
    pub buckets:        u64,
    pub objects:        u64,
    pub versions:       u64,
    pub delete_markers: u64,
    pub usage_bytes:    u64,
}

/// One server entry from the snapshot, with its endpoint already normalized.
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    pub name:          String,
    pub state:         String,
    pub edition:       String,
    pub version:       String,
    pub commit_id:     String,
    pub mem_alloc:     u64,
    pub ilm_expiry:    bool,
    pub uptime_secs:   i64,
    /// Distinct pool indices of this server's drives, ascending.
    pub pools:         Vec<i64>,
}

impl ServerInfo {
    pub fn is_offline(&self) -> bool {
        self.state == "offline"
    }
}

/// Pools and erasure sets actually referenced by at least one disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolIndex(BTreeMap<i64, BTreeSet<i64>>);

impl PoolIndex {
    pub fn from_disks(disks: &[Disk]) -> Self {
        let mut map: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
        for d in disks {
            map.entry(d.pool_index).or_default().insert(d.set_index);
        }
        PoolIndex(map)
    }

    pub fn pools(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.keys().copied()
    }

    pub fn contains(&self, pool: i64) -> bool {
        self.0.contains_key(&pool)
    }

    pub fn pool_count(&self) -> usize {
        self.0.len()
    }

    pub fn set_count(&self) -> usize {
        self.0.values().map(|s| s.len()).sum()
    }

    pub fn sets_in_pool(&self, pool: i64) -> usize {
        self.0.get(&pool).map(|s| s.len()).unwrap_or(0)
    }
}

/// Everything the report needs from one snapshot. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub disks:         Vec<Disk>,
    pub servers:       Vec<ServerInfo>,
    pub pools:         PoolIndex,
    pub deployment_id: Option<String>,
    pub parity_disks:  usize,
    pub backend:       Option<BackendInfo>,
    pub scanner:       ScannerStatus,
}

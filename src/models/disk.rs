use std::cmp::Ordering;
use std::fmt;

/// Position of a drive inside its erasure set.
///
/// Snapshots carry it either as a JSON number or as a string; anything that
/// is not an integer is kept verbatim and sorts by its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiskIndex {
    Numeric(i64),
    Raw(String),
}

impl DiskIndex {
    pub fn from_text(s: &str) -> Self {
        match s.trim().parse::<i64>() {
            Ok(n)  => DiskIndex::Numeric(n),
            Err(_) => DiskIndex::Raw(s.to_string()),
        }
    }
}

impl fmt::Display for DiskIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiskIndex::Numeric(n) => write!(f, "{}", n),
            DiskIndex::Raw(s)     => f.write_str(s),
        }
    }
}

impl Ord for DiskIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DiskIndex::Numeric(a), DiskIndex::Numeric(b)) => a.cmp(b),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl PartialOrd for DiskIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-drive API counters, as reported under a drive's `metrics` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskMetrics {
    pub tokens:              u64,
    pub writes:              u64,
    pub deletes:             u64,
    pub waiting:             u64,
    pub timeout_errors:      u64,
    pub availability_errors: u64,
}

/// One storage device as reported by one server.
#[derive(Debug, Clone)]
pub struct Disk {
    pub server:          String,
    pub path:            String,
    pub state:           String,
    pub uuid:            String,
    pub scanning:        bool,
    pub local:           bool,
    pub pool_index:      i64,
    pub set_index:       i64,
    pub disk_index:      DiskIndex,
    pub total_space:     i64,
    pub used_space:      i64,
    pub available_space: i64,
    pub used_inodes:     i64,
    pub free_inodes:     i64,
    pub metrics:         Option<DiskMetrics>,
}

impl Disk {
    pub fn is_ok(&self) -> bool {
        self.state == "ok"
    }

    pub fn used_space_pct(&self) -> f64 {
        pct(self.used_space, self.total_space)
    }

    pub fn free_space_pct(&self) -> f64 {
        pct(self.available_space, self.total_space)
    }

    pub fn inode_used_pct(&self) -> f64 {
        pct(self.used_inodes, self.used_inodes.saturating_add(self.free_inodes))
    }

    /// Display order inside every disk table.
    pub fn position_cmp(&self, other: &Disk) -> Ordering {
        self.pool_index.cmp(&other.pool_index)
            .then(self.set_index.cmp(&other.set_index))
            .then_with(|| self.disk_index.cmp(&other.disk_index))
    }
}

/// Sum of byte or inode counters, accumulated wide and clamped to `i64`.
pub fn total<I: IntoIterator<Item = i64>>(values: I) -> i64 {
    clamp_wide(values.into_iter().map(i128::from).sum())
}

pub(crate) fn clamp_wide(v: i128) -> i64 {
    v.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// `part / whole * 100`, 0 for an empty whole, clamped to [0, 100].
pub fn pct(part: i64, whole: i64) -> f64 {
    if whole <= 0 { return 0.0; }
    (part as f64 / whole as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
pub(crate) fn test_disk(pool: i64, set: i64, idx: i64) -> Disk {
    Disk {
        server:          format!("node{}", idx),
        path:            format!("/data{}", idx),
        state:           "ok".into(),
        uuid:            format!("uuid-{}-{}-{}", pool, set, idx),
        scanning:        false,
        local:           true,
        pool_index:      pool,
        set_index:       set,
        disk_index:      DiskIndex::Numeric(idx),
        total_space:     0,
        used_space:      0,
        available_space: 0,
        used_inodes:     0,
        free_inodes:     0,
        metrics:         None,
    }
}
